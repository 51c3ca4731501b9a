use alloc::vec::Vec;

use crate::height::HeightModel;
use crate::loader::{FetchBatch, FetchError, LoadCoordinator};
use crate::mutation::{Applied, Mutation, MutationMessage};
use crate::reconcile::{Patch, Reconciler, RowSurface};
use crate::scheduler::RenderScheduler;
use crate::store::RowStore;
use crate::window::Windower;
use crate::{FetchRange, HeightMode, ListOptions, RowId, Stats, WindowState};

/// The outcome of one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub window: WindowState,
    pub fetch_range: FetchRange,
    /// Offset at which the materialized block starts; the host translates the content by this.
    pub content_offset: u64,
    /// Height of the whole list, used to size the scrollable area.
    pub total_extent: u64,
    /// Rows in the fetch range that are not cached yet.
    pub missing: usize,
    pub patch: Patch,
}

/// Everything a [`VirtualList::tick`] produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutput {
    pub frame: Option<Frame>,
    pub fetch: Option<FetchBatch>,
}

/// A windowed view over a long, lazily loaded row sequence.
///
/// The list holds no UI objects and no clock. The host drives it:
/// - [`VirtualList::set_scroll_offset`] / [`VirtualList::set_viewport_extent`] on scroll and
///   resize,
/// - [`VirtualList::tick`] once per frame with the current time, rendering into a
///   [`RowSurface`] and handing out fetch batches,
/// - [`VirtualList::complete_fetch`] when a batch has been loaded (or failed),
/// - [`VirtualList::handle_message`] / [`VirtualList::apply`] for structural edits.
pub struct VirtualList<R> {
    options: ListOptions<R>,
    store: RowStore<R>,
    windower: Windower,
    window: WindowState,
    loader: LoadCoordinator,
    scheduler: RenderScheduler,
    reconciler: Reconciler,
    scroll_offset: u64,
    viewport_extent: u32,
    stats: Stats,
}

impl<R: Clone + PartialEq> VirtualList<R> {
    pub fn new(mut options: ListOptions<R>) -> Self {
        options.warn_if_degraded();
        ldebug!(
            scope = options.scope.as_str(),
            rows = options.ids.len(),
            preloaded = options.preloaded.len(),
            mode = ?options.height_mode,
            "VirtualList::new"
        );
        let store = RowStore::new(
            options.height_mode,
            options.row_height,
            core::mem::take(&mut options.ids),
        );
        let preloaded = core::mem::take(&mut options.preloaded);
        let mut list = Self {
            store,
            windower: Windower::new(options.render_ahead, options.page_size),
            window: WindowState::default(),
            loader: LoadCoordinator::new(options.page_size, options.throttle_ms),
            scheduler: RenderScheduler::new(),
            reconciler: Reconciler,
            scroll_offset: options.initial_offset,
            viewport_extent: options.viewport_extent,
            stats: Stats::default(),
            options,
        };
        for (id, row) in preloaded {
            if let Some(index) = list.store.fill(id, row) {
                list.measure_at(index);
            }
        }
        list.scheduler.request();
        list
    }

    pub fn options(&self) -> &ListOptions<R> {
        &self.options
    }

    pub fn scope(&self) -> &str {
        &self.options.scope
    }

    pub fn store(&self) -> &RowStore<R> {
        &self.store
    }

    pub fn heights(&self) -> &HeightModel {
        self.store.heights()
    }

    pub fn loader(&self) -> &LoadCoordinator {
        &self.loader
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn ids(&self) -> &[RowId] {
        self.store.ids()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.store.get(id)
    }

    /// The window of the most recent render pass.
    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn stats(&self) -> Stats {
        Stats {
            fetches_in_flight: self.loader.outstanding(),
            ..self.stats
        }
    }

    pub fn total_extent(&self) -> u64 {
        self.store.heights().total_extent()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn viewport_extent(&self) -> u32 {
        self.viewport_extent
    }

    /// Whether a render pass is waiting for the next frame.
    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Marks the list dirty. Returns `true` when this scheduled a new frame.
    pub fn request_render(&mut self) -> bool {
        self.scheduler.request()
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        ltrace!(offset, "VirtualList::set_scroll_offset");
        self.scroll_offset = offset;
        self.request_render();
    }

    pub fn set_viewport_extent(&mut self, extent: u32) {
        if extent == 0 {
            lwarn!(
                scope = self.options.scope.as_str(),
                "VirtualList: zero viewport extent"
            );
        }
        self.viewport_extent = extent;
        self.request_render();
    }

    /// Runs one frame: the scheduled render pass (if any), then the throttled fetch flush.
    pub fn tick<S>(&mut self, now_ms: u64, surface: &mut S) -> TickOutput
    where
        S: RowSurface<R> + ?Sized,
    {
        let frame = self.render_frame(now_ms, surface);
        let fetch = self.poll_fetch(now_ms);
        TickOutput { frame, fetch }
    }

    /// Renders if a frame is scheduled; requests made during the pass schedule one more frame.
    pub fn render_frame<S>(&mut self, now_ms: u64, surface: &mut S) -> Option<Frame>
    where
        S: RowSurface<R> + ?Sized,
    {
        if !self.scheduler.begin_frame() {
            return None;
        }
        let frame = self.render(now_ms, surface);
        self.scheduler.end_frame();
        Some(frame)
    }

    /// Hands out the next fetch batch once the throttle interval has elapsed.
    pub fn poll_fetch(&mut self, now_ms: u64) -> Option<FetchBatch> {
        let batch = self.loader.poll(now_ms)?;
        self.stats.fetches_issued += 1;
        Some(batch)
    }

    /// Performs a render pass unconditionally.
    pub fn render<S>(&mut self, now_ms: u64, surface: &mut S) -> Frame
    where
        S: RowSurface<R> + ?Sized,
    {
        #[cfg(feature = "tracing")]
        let started = self.options.debug.then(std::time::Instant::now);

        let heights = self.store.heights();
        let window = self.windower.compute_window(
            heights,
            self.scroll_offset,
            self.viewport_extent,
            self.window.start_index,
        );
        let count = self.store.len();
        debug_assert!(window.start_index <= window.stop_index && window.stop_index <= count);

        let placeholder = &self.options.placeholder;
        let rows: Vec<R> = self.store.ids()[window.start_index..window.stop_index]
            .iter()
            .map(|id| match self.store.get(id.as_str()) {
                Some(row) => row.clone(),
                None => placeholder(id),
            })
            .collect();
        let patch = self
            .reconciler
            .apply_window(surface, rows, window.drift());

        let fetch_range = self.windower.fetch_range(&window, count);
        let missing = self
            .store
            .missing_in(fetch_range.start_index, fetch_range.stop_index);
        let missing_len = missing.len();
        if !missing.is_empty() {
            self.loader.note_missing(missing);
        }
        if self.loader.pending_len() > 0 {
            self.loader.schedule_flush(now_ms);
        }

        let frame = Frame {
            window,
            fetch_range,
            content_offset: self.store.heights().row_start(window.start_index),
            total_extent: self.store.heights().total_extent(),
            missing: missing_len,
            patch,
        };
        self.window = window;
        self.stats.render_passes += 1;

        ltrace!(
            start = window.start_index,
            stop = window.stop_index,
            drift = window.drift(),
            ops = patch.ops(),
            full = patch.full,
            missing = missing_len,
            "VirtualList::render"
        );
        #[cfg(feature = "tracing")]
        if let Some(started) = started {
            ldebug!(
                scope = self.options.scope.as_str(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "render pass"
            );
        }
        frame
    }

    /// Reports the result of a fetch issued by [`VirtualList::tick`] / [`VirtualList::poll_fetch`].
    ///
    /// Delivered rows are cached even if they have scrolled out of the window. Requested ids the
    /// response did not contain, or all of them on failure, stay pending for a later flush.
    pub fn complete_fetch(
        &mut self,
        batch: &FetchBatch,
        result: Result<Vec<(RowId, R)>, FetchError>,
    ) {
        let rows = match result {
            Ok(rows) => rows,
            Err(_err) => {
                self.stats.fetches_failed += 1;
                ldebug!(
                    ticket = batch.ticket.0,
                    ids = batch.ids.len(),
                    error = %_err,
                    "VirtualList: fetch failed"
                );
                let unresolved = self.unresolved(&batch.ids);
                self.loader.complete(batch, unresolved);
                return;
            }
        };

        let mut filled = 0usize;
        for (id, row) in rows {
            self.loader.forget(id.as_str());
            if let Some(index) = self.store.fill(id, row) {
                self.measure_at(index);
                filled += 1;
            }
        }
        let unresolved = self.unresolved(&batch.ids);
        ldebug!(
            ticket = batch.ticket.0,
            filled,
            unresolved = unresolved.len(),
            "VirtualList: fetch completed"
        );
        self.loader.complete(batch, unresolved);
        if filled > 0 {
            self.request_render();
        }
    }

    /// Applies a mutation message from a shared stream.
    ///
    /// Messages scoped to another instance, unknown actions and malformed messages are ignored.
    pub fn handle_message(&mut self, message: MutationMessage<R>) -> Option<Applied> {
        if !message.is_for(&self.options.scope) {
            ltrace!(
                scope = self.options.scope.as_str(),
                target = message.target.as_str(),
                "VirtualList: message for another scope"
            );
            return None;
        }
        match message.into_mutation() {
            Ok(mutation) => self.apply(mutation),
            Err(_err) => {
                lwarn!(
                    scope = self.options.scope.as_str(),
                    error = %_err,
                    "VirtualList: ignoring mutation message"
                );
                self.stats.mutations_ignored += 1;
                None
            }
        }
    }

    /// Applies a structural edit and requests a render.
    pub fn apply(&mut self, mutation: Mutation<R>) -> Option<Applied> {
        #[cfg(feature = "tracing")]
        let action = mutation.action();
        let Some(applied) = mutation.apply(&mut self.store) else {
            ldebug!(%action, "VirtualList: mutation was a no-op");
            self.stats.mutations_ignored += 1;
            return None;
        };
        match &applied {
            Applied::Inserted { index, cached } => {
                if *cached {
                    self.forget_at(*index);
                    self.measure_at(*index);
                }
            }
            Applied::Replaced { index, previous } => {
                if let Some(previous) = previous {
                    self.loader.forget(previous.as_str());
                }
                self.forget_at(*index);
                self.measure_at(*index);
            }
            Applied::Removed { id, .. } => self.loader.forget(id.as_str()),
        }
        ldebug!(%action, applied = ?applied, len = self.store.len(), "VirtualList: mutation applied");
        self.stats.mutations_applied += 1;
        self.request_render();
        Some(applied)
    }

    pub fn append(&mut self, id: impl Into<RowId>, row: Option<R>) -> Option<Applied> {
        self.apply(Mutation::Append { id: id.into(), row })
    }

    pub fn prepend(&mut self, id: impl Into<RowId>, row: Option<R>) -> Option<Applied> {
        self.apply(Mutation::Prepend { id: id.into(), row })
    }

    pub fn insert_after(
        &mut self,
        id: impl Into<RowId>,
        after: impl Into<RowId>,
        row: Option<R>,
    ) -> Option<Applied> {
        self.apply(Mutation::InsertAfter {
            id: id.into(),
            after: after.into(),
            row,
        })
    }

    pub fn insert_before(
        &mut self,
        id: impl Into<RowId>,
        before: impl Into<RowId>,
        row: Option<R>,
    ) -> Option<Applied> {
        self.apply(Mutation::InsertBefore {
            id: id.into(),
            before: before.into(),
            row,
        })
    }

    pub fn replace(
        &mut self,
        target: impl Into<RowId>,
        row: R,
        new_id: Option<RowId>,
    ) -> Option<Applied> {
        self.apply(Mutation::Replace {
            target: target.into(),
            row,
            new_id,
        })
    }

    pub fn remove(&mut self, target: impl Into<RowId>) -> Option<Applied> {
        self.apply(Mutation::Remove {
            target: target.into(),
        })
    }

    /// Drops all rows, caches and pending work.
    pub fn clear(&mut self) {
        ldebug!(scope = self.options.scope.as_str(), "VirtualList::clear");
        self.store.clear();
        self.loader.clear();
        self.scheduler.cancel();
        self.window = WindowState::default();
    }

    fn unresolved(&self, ids: &[RowId]) -> Vec<RowId> {
        ids.iter()
            .filter(|id| self.store.contains(id.as_str()) && !self.store.is_cached(id.as_str()))
            .cloned()
            .collect()
    }

    fn forget_at(&mut self, index: usize) {
        if let Some(id) = self.store.id_at(index) {
            self.loader.forget(id.as_str());
        }
    }

    fn measure_at(&mut self, index: usize) {
        if self.store.heights().mode() != HeightMode::Variable {
            return;
        }
        let Some(measure) = self.options.measure_row.as_ref() else {
            return;
        };
        let height = match self.store.id_at(index).and_then(|id| self.store.get(id.as_str())) {
            Some(row) => measure(row),
            None => return,
        };
        self.store.measure(index, height);
    }
}

impl<R> core::fmt::Debug for VirtualList<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualList")
            .field("scope", &self.options.scope)
            .field("len", &self.store.len())
            .field("cached", &self.store.cached_len())
            .field("window", &self.window)
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_extent", &self.viewport_extent)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
