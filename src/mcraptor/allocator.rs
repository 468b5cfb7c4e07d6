use bitvec::prelude::*;

use crate::timetable::entities::StopIdx;

use super::label::Label;

/// Per-round bag storage for one McRAPTOR query, flattened into a single
/// `(max_rounds + 1) * stop_count` buffer rather than a nested
/// `Vec<Vec<Bag>>`, per §4.4's note that full per-round history is kept
/// (reconstruction only needs direct label back-pointers, but the bag grid
/// itself is still addressed this way to avoid one heap allocation per
/// round).
pub struct Allocator {
    pub(crate) stop_count: usize,
    pub(crate) max_rounds: usize,
    pub(crate) bags: Vec<Vec<Label>>,
    /// Stops whose bag changed during the round in progress.
    pub(crate) marked: BitVec,
}

impl Allocator {
    pub fn new(stop_count: usize, max_rounds: usize) -> Self {
        Self {
            stop_count,
            max_rounds,
            bags: (0..(max_rounds + 1) * stop_count).map(|_| Vec::new()).collect(),
            marked: bitvec![0; stop_count],
        }
    }

    fn index(&self, round: usize, stop: StopIdx) -> usize {
        round * self.stop_count + stop as usize
    }

    pub(crate) fn bag(&self, round: usize, stop: StopIdx) -> &[Label] {
        &self.bags[self.index(round, stop)]
    }

    pub(crate) fn bag_mut(&mut self, round: usize, stop: StopIdx) -> &mut Vec<Label> {
        let idx = self.index(round, stop);
        &mut self.bags[idx]
    }

    /// Copies every stop's bag from round `from` into round `to` — the
    /// `B(k, ·) <- B(k-1, ·)` step at the start of each round.
    pub(crate) fn copy_round(&mut self, from: usize, to: usize) {
        for stop in 0..self.stop_count {
            let source = self.bag(from, stop as StopIdx).to_vec();
            *self.bag_mut(to, stop as StopIdx) = source;
        }
    }
}
