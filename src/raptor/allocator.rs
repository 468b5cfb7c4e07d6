use bitvec::prelude::*;

use crate::shared::time::Time;
use crate::timetable::entities::StopIdx;

use super::state::{Parent, Update};

/// Pre-allocated scratch space for one RAPTOR query, reusable across
/// queries against the same timetable to avoid per-query heap churn.
pub struct Allocator {
    pub(crate) stop_count: usize,
    pub(crate) max_rounds: usize,

    /// τ*(p): best arrival at `p` across all rounds so far.
    pub(crate) tau_star: Vec<Time>,
    /// The round in which `tau_star[p]` was last improved; `None` if `p`
    /// has never been reached. Reconstruction starts its walk here.
    pub(crate) best_round: Vec<Option<usize>>,
    /// Stops improved during the round in progress.
    pub(crate) marked: BitVec,
    /// τ(k−1, ·).
    pub(crate) prev: Vec<Time>,
    /// τ(k, ·), seeded as a copy of `prev` at the start of each round.
    pub(crate) curr: Vec<Time>,
    /// Flattened `(max_rounds + 1) * stop_count` back-pointer matrix.
    pub(crate) parents: Vec<Option<Parent>>,
    /// Candidate improvements collected by a parallel scan, applied to the
    /// shared arrays afterward in a single sequential pass.
    pub(crate) updates: Vec<Update>,
}

impl Allocator {
    pub fn new(stop_count: usize, max_rounds: usize) -> Self {
        Self {
            stop_count,
            max_rounds,
            tau_star: vec![Time::INFINITY; stop_count],
            best_round: vec![None; stop_count],
            marked: bitvec![0; stop_count],
            prev: vec![Time::INFINITY; stop_count],
            curr: vec![Time::INFINITY; stop_count],
            parents: vec![None; (max_rounds + 1) * stop_count],
            updates: Vec::with_capacity(1024),
        }
    }

    pub fn reset(&mut self) {
        self.tau_star.fill(Time::INFINITY);
        self.best_round.fill(None);
        self.marked.fill(false);
        self.prev.fill(Time::INFINITY);
        self.curr.fill(Time::INFINITY);
        self.parents.fill(None);
        self.updates.clear();
    }

    fn parent_index(&self, round: usize, stop: StopIdx) -> usize {
        round * self.stop_count + stop as usize
    }

    pub(crate) fn apply_updates(&mut self, round: usize) {
        for update in self.updates.drain(..) {
            if update.arrival < self.tau_star[update.stop as usize] {
                self.curr[update.stop as usize] = update.arrival;
                self.tau_star[update.stop as usize] = update.arrival;
                self.best_round[update.stop as usize] = Some(round);
                let idx = self.parent_index(round, update.stop);
                self.parents[idx] = Some(update.parent);
                self.marked.set(update.stop as usize, true);
            }
        }
    }

    pub(crate) fn parent(&self, round: usize, stop: StopIdx) -> Option<Parent> {
        self.parents[self.parent_index(round, stop)]
    }
}

/// Per-worker accumulation buffer for a parallel route/transfer scan,
/// allocated lazily so routes/stops that produce no improvement never
/// touch the heap.
pub struct LazyBuffer<T> {
    buffer: Option<Vec<T>>,
}

impl<T> LazyBuffer<T> {
    pub fn new() -> Self {
        Self { buffer: None }
    }

    pub fn push(&mut self, value: T) {
        self.buffer.get_or_insert_with(Vec::new).push(value);
    }

    pub fn swap(&mut self) -> Vec<T> {
        self.buffer.take().unwrap_or_default()
    }
}

impl<T> Default for LazyBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
