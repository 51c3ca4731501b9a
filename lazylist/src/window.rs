use crate::height::HeightModel;
use crate::{FetchRange, WindowState};

/// Turns a scroll position into the materialized index range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Windower {
    pub render_ahead: usize,
    pub page_size: usize,
}

impl Windower {
    pub fn new(render_ahead: usize, page_size: usize) -> Self {
        Self {
            render_ahead,
            page_size,
        }
    }

    /// Computes `[start_index, stop_index)` for the given scroll offset and viewport extent.
    ///
    /// The range is widened by `render_ahead` rows on both sides and clamped to the row count.
    /// A zero viewport extent, or a list with no usable row height, yields an empty window.
    pub fn compute_window(
        &self,
        heights: &HeightModel,
        scroll_offset: u64,
        viewport_extent: u32,
        previous_start_index: usize,
    ) -> WindowState {
        let count = heights.len();
        let raw_start = heights
            .start_index_for_offset(scroll_offset)
            .saturating_sub(self.render_ahead);
        let start_index = raw_start.min(count);

        let visible = match heights.average_row_height() {
            Some(row_height) if viewport_extent > 0 => (viewport_extent as usize)
                .div_ceil(row_height as usize)
                .saturating_add(self.render_ahead.saturating_mul(2)),
            _ => 0,
        };
        let visible = visible.min(count - start_index);

        WindowState {
            start_index,
            stop_index: start_index + visible,
            previous_start_index,
        }
    }

    /// Rounds the window outward to page boundaries, clamped to the row count.
    pub fn fetch_range(&self, window: &WindowState, count: usize) -> FetchRange {
        if window.is_empty() || self.page_size == 0 {
            return FetchRange {
                start_index: window.start_index,
                stop_index: window.stop_index,
            };
        }
        let page = self.page_size;
        let start_index = (window.start_index / page) * page;
        let stop_index = window
            .stop_index
            .div_ceil(page)
            .saturating_mul(page)
            .min(count);
        FetchRange {
            start_index,
            stop_index,
        }
    }
}
