use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{HeightMode, RowId};

/// Produces the stand-in shown for a row whose content has not been fetched yet.
pub type PlaceholderFactory<R> = Arc<dyn Fn(&RowId) -> R + Send + Sync>;

/// Samples the rendered height of a row (Variable mode).
///
/// A DOM adapter typically attaches an off-window clone, reads its extent and detaches it.
pub type MeasureRow<R> = Arc<dyn Fn(&R) -> u32 + Send + Sync>;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_RENDER_AHEAD: usize = 10;
pub const DEFAULT_THROTTLE_MS: u64 = 200;
pub const DEFAULT_SCOPE: &str = "virtualized";

/// Configuration for [`crate::VirtualList`].
///
/// Cheap to clone: closures are stored in `Arc`s.
pub struct ListOptions<R> {
    /// Initial row sequence, in display order.
    pub ids: Vec<RowId>,
    /// Rows whose content is known up front.
    pub preloaded: Vec<(RowId, R)>,
    /// Row height in Fixed mode; in Variable mode the estimate used before rows are measured.
    pub row_height: u32,
    pub height_mode: HeightMode,
    /// Rows per fetch, and the granularity of page-aligned fetch ranges.
    pub page_size: usize,
    /// Extra rows materialized on each side of the visible range.
    pub render_ahead: usize,
    /// Height of the scrollable viewport.
    pub viewport_extent: u32,
    /// Minimum spacing between fetch flushes.
    pub throttle_ms: u64,
    /// Instance scope: filters scoped mutation messages and keys persisted state.
    pub scope: String,
    /// Scroll offset applied at construction (e.g. a restored position).
    pub initial_offset: u64,
    /// Logs render timings.
    pub debug: bool,
    pub placeholder: PlaceholderFactory<R>,
    pub measure_row: Option<MeasureRow<R>>,
}

impl<R: Clone> Clone for ListOptions<R> {
    fn clone(&self) -> Self {
        Self {
            ids: self.ids.clone(),
            preloaded: self.preloaded.clone(),
            row_height: self.row_height,
            height_mode: self.height_mode,
            page_size: self.page_size,
            render_ahead: self.render_ahead,
            viewport_extent: self.viewport_extent,
            throttle_ms: self.throttle_ms,
            scope: self.scope.clone(),
            initial_offset: self.initial_offset,
            debug: self.debug,
            placeholder: Arc::clone(&self.placeholder),
            measure_row: self.measure_row.clone(),
        }
    }
}

impl<R> ListOptions<R> {
    /// Creates Fixed-mode options for `ids` with every row `row_height` tall.
    pub fn new(
        ids: impl IntoIterator<Item = RowId>,
        row_height: u32,
        placeholder: impl Fn(&RowId) -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            preloaded: Vec::new(),
            row_height,
            height_mode: HeightMode::Fixed,
            page_size: DEFAULT_PAGE_SIZE,
            render_ahead: DEFAULT_RENDER_AHEAD,
            viewport_extent: 0,
            throttle_ms: DEFAULT_THROTTLE_MS,
            scope: DEFAULT_SCOPE.into(),
            initial_offset: 0,
            debug: false,
            placeholder: Arc::new(placeholder),
            measure_row: None,
        }
    }

    /// Switches to Variable mode, sampling row heights with `measure_row`.
    ///
    /// `row_height` is kept as the estimate used until rows have been measured.
    pub fn with_variable_heights(
        mut self,
        measure_row: impl Fn(&R) -> u32 + Send + Sync + 'static,
    ) -> Self {
        self.height_mode = HeightMode::Variable;
        self.measure_row = Some(Arc::new(measure_row));
        self
    }

    pub fn with_preloaded(mut self, rows: impl IntoIterator<Item = (RowId, R)>) -> Self {
        self.preloaded = rows.into_iter().collect();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_render_ahead(mut self, render_ahead: usize) -> Self {
        self.render_ahead = render_ahead;
        self
    }

    pub fn with_viewport_extent(mut self, viewport_extent: u32) -> Self {
        self.viewport_extent = viewport_extent;
        self
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Reports configuration problems that degrade rendering instead of failing it.
    pub(crate) fn warn_if_degraded(&self) {
        if self.viewport_extent == 0 {
            lwarn!(
                scope = self.scope.as_str(),
                "ListOptions: zero viewport extent, nothing will be rendered"
            );
        }
        if self.row_height == 0 {
            lwarn!(
                scope = self.scope.as_str(),
                mode = ?self.height_mode,
                "ListOptions: zero row height, the window stays empty until rows are measured"
            );
        }
        if self.page_size == 0 {
            lwarn!(
                scope = self.scope.as_str(),
                "ListOptions: zero page size, fetching one row at a time"
            );
        }
        if self.height_mode == HeightMode::Variable && self.measure_row.is_none() {
            lwarn!(
                scope = self.scope.as_str(),
                "ListOptions: Variable mode without a measure hook, rows stay zero-height"
            );
        }
    }
}

impl<R> core::fmt::Debug for ListOptions<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("ids", &self.ids.len())
            .field("preloaded", &self.preloaded.len())
            .field("row_height", &self.row_height)
            .field("height_mode", &self.height_mode)
            .field("page_size", &self.page_size)
            .field("render_ahead", &self.render_ahead)
            .field("viewport_extent", &self.viewport_extent)
            .field("throttle_ms", &self.throttle_ms)
            .field("scope", &self.scope)
            .field("initial_offset", &self.initial_offset)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
