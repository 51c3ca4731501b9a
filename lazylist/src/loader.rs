use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::RowId;
use crate::key::{RowMap, RowSet};

/// Identifies one outstanding fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchTicket(pub u64);

/// A batch of ids the host should load.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchBatch {
    pub ticket: FetchTicket,
    pub ids: Vec<RowId>,
}

/// Why a fetch produced no rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchError {
    reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row fetch failed: {}", self.reason)
    }
}

impl core::error::Error for FetchError {}

/// Tracks rows whose content is missing and turns them into throttled, page-sized fetches.
///
/// The coordinator never fetches anything itself: [`LoadCoordinator::poll`] hands out a
/// [`FetchBatch`] once the throttle interval has elapsed and the host reports the result through
/// [`LoadCoordinator::complete`].
///
/// Pending ids are kept most-recently-noted first. After each flush the backlog is trimmed to
/// `2 * page_size` ids; trimmed ids are only fetched again once re-noted.
#[derive(Clone, Debug)]
pub struct LoadCoordinator {
    page_size: usize,
    throttle_ms: u64,
    pending: VecDeque<RowId>,
    pending_set: RowSet,
    in_flight: RowSet,
    batches: RowMap<FetchTicket>,
    next_ticket: u64,
    flush_due_ms: Option<u64>,
    outstanding: usize,
}

impl LoadCoordinator {
    pub fn new(page_size: usize, throttle_ms: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            throttle_ms,
            pending: VecDeque::new(),
            pending_set: RowSet::default(),
            in_flight: RowSet::default(),
            batches: RowMap::default(),
            next_ticket: 0,
            flush_due_ms: None,
            outstanding: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending_set.contains(id)
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &RowId> {
        self.pending.iter()
    }

    /// Number of fetches issued but not yet completed.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// The time at which the next throttled flush will run, if one is scheduled.
    pub fn flush_due_ms(&self) -> Option<u64> {
        self.flush_due_ms
    }

    /// Merges `ids` into the pending set, ahead of everything already pending.
    pub fn note_missing(&mut self, ids: impl IntoIterator<Item = RowId>) {
        let mut front = Vec::new();
        for id in ids {
            if self.pending_set.contains(&id) {
                if let Some(pos) = self.pending.iter().position(|x| *x == id) {
                    self.pending.remove(pos);
                }
            } else {
                self.pending_set.insert(id.clone());
            }
            if !front.contains(&id) {
                front.push(id);
            }
        }
        for id in front.into_iter().rev() {
            self.pending.push_front(id);
        }
    }

    /// Requests a flush; calls within one throttle interval coalesce into a single trailing run.
    pub fn schedule_flush(&mut self, now_ms: u64) {
        if self.flush_due_ms.is_none() {
            self.flush_due_ms = Some(now_ms.saturating_add(self.throttle_ms));
        }
    }

    /// Runs the scheduled flush when it is due.
    pub fn poll(&mut self, now_ms: u64) -> Option<FetchBatch> {
        let due = self.flush_due_ms?;
        if now_ms < due {
            return None;
        }
        self.flush_due_ms = None;
        let batch = self.flush();
        if self.has_fetchable() {
            self.schedule_flush(now_ms);
        }
        batch
    }

    /// Takes up to `page_size` pending ids that are not already in flight and marks them in
    /// flight. Pending ids that are already being fetched are dropped from the backlog.
    pub fn flush(&mut self) -> Option<FetchBatch> {
        let mut ids = Vec::new();
        let mut rest = VecDeque::with_capacity(self.pending.len());
        for id in self.pending.drain(..) {
            if self.in_flight.contains(&id) {
                self.pending_set.remove(&id);
            } else if ids.len() < self.page_size {
                self.pending_set.remove(&id);
                ids.push(id);
            } else {
                rest.push_back(id);
            }
        }
        self.pending = rest;

        let cap = self.page_size.saturating_mul(2);
        if self.pending.len() > cap {
            ldebug!(
                pending = self.pending.len(),
                cap,
                "LoadCoordinator: trimming backlog"
            );
            for id in self.pending.drain(cap..) {
                self.pending_set.remove(&id);
            }
        }

        if ids.is_empty() {
            return None;
        }

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        for id in &ids {
            self.in_flight.insert(id.clone());
            self.batches.insert(id.clone(), ticket);
        }
        self.outstanding += 1;
        ldebug!(
            ticket = ticket.0,
            ids = ids.len(),
            pending = self.pending.len(),
            "LoadCoordinator: fetch issued"
        );
        Some(FetchBatch { ticket, ids })
    }

    /// Releases the in-flight ids of a finished fetch, whatever its outcome.
    ///
    /// `unresolved` lists ids the fetch did not deliver (all of them when it failed); they go
    /// back to the tail of the backlog without scheduling a flush, so a failed fetch is retried
    /// on the next `note_missing`/`schedule_flush` cycle rather than on a timer.
    pub fn complete(&mut self, batch: &FetchBatch, unresolved: impl IntoIterator<Item = RowId>) {
        let mut released = false;
        for id in &batch.ids {
            if self.batches.get(id) == Some(&batch.ticket) {
                self.batches.remove(id);
                self.in_flight.remove(id);
                released = true;
            }
        }
        if released {
            self.outstanding = self.outstanding.saturating_sub(1);
        }
        for id in unresolved {
            if self.in_flight.contains(&id) || !self.pending_set.insert(id.clone()) {
                continue;
            }
            self.pending.push_back(id);
        }
    }

    /// Forgets `id` everywhere, e.g. after it was removed from the list or its content arrived
    /// through another path.
    pub fn forget(&mut self, id: &str) {
        if self.pending_set.remove(id) {
            if let Some(pos) = self.pending.iter().position(|x| x.as_str() == id) {
                self.pending.remove(pos);
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.pending_set.clear();
        self.in_flight.clear();
        self.batches.clear();
        self.flush_due_ms = None;
        self.outstanding = 0;
    }

    fn has_fetchable(&self) -> bool {
        self.pending.iter().any(|id| !self.in_flight.contains(id))
    }
}
