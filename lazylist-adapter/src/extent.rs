use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// How tall the scrollable viewport is, as configured by the host.
///
/// With `feature = "serde"`, the extent is (de)serialized as the host's height string
/// (`"400px"`, `"50vh"`, `"auto"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum ViewportExtent {
    /// A fixed height (`"400px"`).
    Pixels(u32),
    /// A percentage of the window height (`"50vh"`).
    WindowPercent(u32),
    /// The full window height (any value without a unit).
    #[default]
    Window,
}

impl ViewportExtent {
    /// Resolves the extent against the current window height.
    pub fn resolve(&self, window_height: u32) -> u32 {
        match *self {
            Self::Pixels(px) => px,
            Self::WindowPercent(pct) => {
                let px = window_height as u64 * pct as u64 / 100;
                u32::try_from(px).unwrap_or(u32::MAX)
            }
            Self::Window => window_height,
        }
    }

    /// Parses a host height string, degrading a malformed `px`/`vh` value to a zero extent.
    ///
    /// The list then renders an empty window instead of failing to mount.
    pub fn parse_lossy(s: &str) -> Self {
        match s.parse() {
            Ok(extent) => extent,
            Err(_err) => {
                lwarn!(error = %_err, "ViewportExtent: falling back to a zero extent");
                Self::Pixels(0)
            }
        }
    }
}

impl fmt::Display for ViewportExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::WindowPercent(pct) => write!(f, "{pct}vh"),
            Self::Window => f.write_str("auto"),
        }
    }
}

impl TryFrom<String> for ViewportExtent {
    type Error = ParseExtentError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ViewportExtent> for String {
    fn from(extent: ViewportExtent) -> Self {
        extent.to_string()
    }
}

/// Returned when a `px`/`vh` extent does not start with a number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseExtentError {
    input: String,
}

impl ParseExtentError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseExtentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid viewport extent `{}`", self.input)
    }
}

impl core::error::Error for ParseExtentError {}

impl FromStr for ViewportExtent {
    type Err = ParseExtentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unit: fn(u32) -> Self = if s.contains("vh") {
            Self::WindowPercent
        } else if s.contains("px") {
            Self::Pixels
        } else {
            return Ok(Self::Window);
        };
        leading_number(s).map(unit).ok_or_else(|| ParseExtentError {
            input: s.into(),
        })
    }
}

/// Parses the leading decimal digits of `s`, ignoring any fraction and suffix.
fn leading_number(s: &str) -> Option<u32> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}
