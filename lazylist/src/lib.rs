//! A headless windowing and reconciliation engine for huge, lazily loaded lists.
//!
//! Only a small window of rows is ever materialized. The engine:
//! - maps a scroll offset to the visible index range, for uniform or measured row heights,
//! - patches the live row sequence by the scroll drift instead of re-rendering it,
//! - batches missing rows into throttled, page-aligned fetches with a bounded backlog,
//! - applies insert/replace/remove edits (including id remapping) delivered as messages.
//!
//! It is UI-agnostic. A host is expected to provide:
//! - the viewport extent and scroll offset,
//! - a [`RowSurface`] the reconciler patches (DOM children, terminal lines, ...),
//! - a transport that loads [`FetchBatch`]es and reports back via
//!   [`VirtualList::complete_fetch`],
//! - a clock, passed to [`VirtualList::tick`] once per frame.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod fenwick;
mod height;
mod key;
mod list;
mod loader;
mod mutation;
mod options;
mod reconcile;
mod scheduler;
mod store;
mod types;
mod window;


pub use height::HeightModel;
pub use list::{Frame, TickOutput, VirtualList};
pub use loader::{FetchBatch, FetchError, FetchTicket, LoadCoordinator};
pub use mutation::{Action, Applied, Mutation, MutationError, MutationMessage, ParseActionError};
pub use options::{
    DEFAULT_PAGE_SIZE, DEFAULT_RENDER_AHEAD, DEFAULT_SCOPE, DEFAULT_THROTTLE_MS, ListOptions,
    MeasureRow, PlaceholderFactory,
};
pub use reconcile::{Patch, Reconciler, RowSurface, VecSurface};
pub use scheduler::RenderScheduler;
pub use store::RowStore;
pub use types::{FetchRange, HeightMode, RowId, Stats, WindowState};
pub use window::Windower;
