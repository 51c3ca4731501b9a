use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

/// An opaque row identifier.
///
/// Identifiers are compared by their string value and must be unique within a list.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RowId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for RowId {
    fn from(value: u64) -> Self {
        use alloc::string::ToString;
        Self(value.to_string())
    }
}

/// How row heights are tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeightMode {
    /// Every row has the configured `row_height`.
    #[default]
    Fixed,
    /// Rows are measured individually once their content is available.
    Variable,
}

/// The materialized index range, plus the start of the previous pass.
///
/// Invariant: `start_index <= stop_index <= row count`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub start_index: usize,
    pub stop_index: usize, // exclusive
    pub previous_start_index: usize,
}

impl WindowState {
    pub fn len(&self) -> usize {
        self.stop_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.stop_index
    }

    /// Signed difference between the current and previous start index.
    pub fn drift(&self) -> isize {
        self.start_index as isize - self.previous_start_index as isize
    }
}

/// A window range rounded outward to page boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchRange {
    pub start_index: usize,
    pub stop_index: usize, // exclusive
}

impl FetchRange {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.stop_index
    }
}

/// Instance-local diagnostic counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub render_passes: u64,
    pub fetches_issued: u64,
    pub fetches_failed: u64,
    pub fetches_in_flight: usize,
    pub mutations_applied: u64,
    pub mutations_ignored: u64,
}
