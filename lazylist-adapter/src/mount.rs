use alloc::string::String;
use alloc::vec::Vec;

use lazylist::{
    DEFAULT_PAGE_SIZE, DEFAULT_RENDER_AHEAD, DEFAULT_SCOPE, DEFAULT_THROTTLE_MS, HeightMode,
    ListOptions, RowId,
};

use crate::ViewportExtent;

/// What the host hands over when a list is mounted.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`, so it can be read
/// straight from the host's attributes or a config file. `height` is the host's height string;
/// a malformed one is read as a zero extent (see [`ViewportExtent::parse_lossy`]).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MountConfig {
    pub ids: Vec<RowId>,
    pub row_height: u32,
    pub height_mode: HeightMode,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "lossy_extent"))]
    pub height: ViewportExtent,
    pub page_size: usize,
    pub render_ahead: usize,
    pub throttle_ms: u64,
    pub scope: String,
    pub debug: bool,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            row_height: 0,
            height_mode: HeightMode::Fixed,
            height: ViewportExtent::Window,
            page_size: DEFAULT_PAGE_SIZE,
            render_ahead: DEFAULT_RENDER_AHEAD,
            throttle_ms: DEFAULT_THROTTLE_MS,
            scope: DEFAULT_SCOPE.into(),
            debug: false,
        }
    }
}

impl MountConfig {
    pub fn new(ids: impl IntoIterator<Item = RowId>, row_height: u32) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            row_height,
            ..Self::default()
        }
    }

    /// Builds list options, resolving the viewport extent against `window_height`.
    ///
    /// Variable mode still needs a measure hook; see
    /// [`ListOptions::with_variable_heights`].
    pub fn into_options<R>(
        self,
        window_height: u32,
        placeholder: impl Fn(&RowId) -> R + Send + Sync + 'static,
    ) -> ListOptions<R> {
        let viewport_extent = self.height.resolve(window_height);
        let mut options = ListOptions::new(self.ids, self.row_height, placeholder)
            .with_page_size(self.page_size)
            .with_render_ahead(self.render_ahead)
            .with_viewport_extent(viewport_extent)
            .with_throttle_ms(self.throttle_ms)
            .with_scope(self.scope)
            .with_debug(self.debug);
        options.height_mode = self.height_mode;
        options
    }
}

#[cfg(feature = "serde")]
fn lossy_extent<'de, D>(deserializer: D) -> Result<ViewportExtent, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = <String as serde::Deserialize>::deserialize(deserializer)?;
    Ok(ViewportExtent::parse_lossy(&s))
}
