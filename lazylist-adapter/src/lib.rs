//! Host lifecycle utilities for the `lazylist` crate.
//!
//! The `lazylist` crate is UI-agnostic and owns the windowing math and row state. This crate
//! provides the small, framework-neutral pieces a host integration needs around it:
//!
//! - Mount-time configuration, including viewport heights such as `"400px"` or `"50vh"`
//! - Scoped listener registrations that are detached together at unmount
//! - Best-effort scroll-position persistence keyed by list scope
//! - A [`Controller`] that drives the list from host events and a frame clock
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod extent;
mod fetch;
mod listeners;
mod mount;
mod persist;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use extent::{ParseExtentError, ViewportExtent};
pub use fetch::{ID_QUERY_PARAM, RowFetcher, query_pairs};
pub use listeners::Listeners;
pub use mount::MountConfig;
pub use persist::{MemoryScrollStore, NoScrollStore, ScrollStore, position_key};
