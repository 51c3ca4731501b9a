use alloc::string::String;
use alloc::vec::Vec;

use lazylist::{
    Applied, FetchBatch, FetchError, Frame, ListOptions, MutationMessage, RowId, RowSurface,
    VirtualList,
};

use crate::{Listeners, RowFetcher, ScrollStore, position_key};

/// A framework-neutral controller that owns a [`VirtualList`], the surface it renders into,
/// the host listener registrations and the scroll-position store.
///
/// Adapters drive it by calling:
/// - `on_scroll` / `on_resize` / `on_message` / `on_row_added` when host events occur
/// - `tick(now_ms)` each frame, forwarding the returned batch to their transport
/// - `complete_fetch` when that transport answers
///
/// The current scroll offset is saved after every render pass and restored at mount.
pub struct Controller<R, S, P> {
    list: VirtualList<R>,
    surface: S,
    positions: P,
    position_key: String,
    listeners: Listeners,
    mounted: bool,
}

impl<R, S, P> Controller<R, S, P>
where
    R: Clone + PartialEq,
    S: RowSurface<R>,
    P: ScrollStore,
{
    /// Creates the list, restoring the scroll offset saved for its scope (if any).
    pub fn mount(mut options: ListOptions<R>, surface: S, positions: P) -> Self {
        let position_key = position_key(&options.scope);
        if let Some(offset) = positions.load(&position_key) {
            ldebug!(key = position_key.as_str(), offset, "Controller: restoring scroll offset");
            options.initial_offset = offset;
        }
        Self {
            list: VirtualList::new(options),
            surface,
            positions,
            position_key,
            listeners: Listeners::new(),
            mounted: true,
        }
    }

    pub fn list(&self) -> &VirtualList<R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList<R> {
        &mut self.list
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn positions(&self) -> &P {
        &self.positions
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Registers the detach half of a host listener; it runs at unmount.
    pub fn listen(&mut self, detach: impl FnOnce() + 'static) {
        self.listeners.push(detach);
    }

    pub fn on_scroll(&mut self, offset: u64) {
        if self.mounted {
            self.list.set_scroll_offset(offset);
        }
    }

    pub fn on_resize(&mut self, viewport_extent: u32) {
        if self.mounted {
            self.list.set_viewport_extent(viewport_extent);
        }
    }

    pub fn on_message(&mut self, message: MutationMessage<R>) -> Option<Applied> {
        if !self.mounted {
            return None;
        }
        self.list.handle_message(message)
    }

    /// Handles a host "row added" event: `row` is inserted right after `anchor`.
    pub fn on_row_added(
        &mut self,
        anchor: impl Into<RowId>,
        id: impl Into<RowId>,
        row: R,
    ) -> Option<Applied> {
        if !self.mounted {
            return None;
        }
        self.list.insert_after(id, anchor, Some(row))
    }

    /// Runs one frame and returns the fetch batch the host should load, if any.
    pub fn tick(&mut self, now_ms: u64) -> (Option<Frame>, Option<FetchBatch>) {
        if !self.mounted {
            return (None, None);
        }
        let out = self.list.tick(now_ms, &mut self.surface);
        if out.frame.is_some() {
            self.positions
                .save(&self.position_key, self.list.scroll_offset());
        }
        (out.frame, out.fetch)
    }

    /// Like [`Controller::tick`], but loads any batch right away through `fetcher`.
    pub fn tick_with<F: RowFetcher<R>>(&mut self, now_ms: u64, fetcher: &mut F) -> Option<Frame> {
        let (frame, batch) = self.tick(now_ms);
        if let Some(batch) = batch {
            let result = fetcher.fetch(&batch);
            self.complete_fetch(&batch, result);
        }
        frame
    }

    pub fn complete_fetch(
        &mut self,
        batch: &FetchBatch,
        result: Result<Vec<(RowId, R)>, FetchError>,
    ) {
        self.list.complete_fetch(batch, result);
    }

    /// Detaches every listener and drops the list's rows and pending work.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        ldebug!(scope = self.list.scope(), "Controller::unmount");
        self.listeners.release();
        self.list.clear();
        self.surface.replace_all(Vec::new());
        self.mounted = false;
    }
}

impl<R, S, P> core::fmt::Debug for Controller<R, S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("list", &self.list)
            .field("position_key", &self.position_key)
            .field("listeners", &self.listeners)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
