use std::time::Duration;

use log::debug;

use crate::pkg::board::paginator::{select_page, DelayPolicy, PageSlice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Displaying,
    Waiting,
}

/// Result of one DISPLAYING step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
    pub slice: PageSlice,
    pub item_count: usize,
    pub delay: Duration,
}

/// Cursor and phase for one running board. Owned by whoever drives the loop.
#[derive(Debug, Clone)]
pub struct DisplaySession {
    page_size: usize,
    policy: DelayPolicy,
    cursor: usize,
    phase: Phase,
    cycles: u64,
}

impl DisplaySession {
    pub fn new(page_size: usize, policy: DelayPolicy) -> Self {
        Self {
            page_size: page_size.max(1),
            policy,
            cursor: 0,
            phase: Phase::Displaying,
            cycles: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Slices the snapshot, advances the cursor and moves to `Waiting`.
    ///
    /// Calling this while already waiting resumes first, so a cycle is never
    /// skipped or shown twice.
    pub fn display(&mut self, item_count: usize) -> Cycle {
        if self.phase == Phase::Waiting {
            self.resume();
        }

        let slice = select_page(item_count, self.page_size, self.cursor);
        let delay = self
            .policy
            .compute_delay(item_count, self.page_size, slice.start);

        debug!(
            "cycle {}: cursor {} -> showing [{}, {}) of {}, next cursor {}",
            self.cycles, self.cursor, slice.start, slice.end, item_count, slice.next_cursor
        );

        self.cursor = slice.next_cursor;
        self.phase = Phase::Waiting;
        self.cycles += 1;

        Cycle {
            slice,
            item_count,
            delay,
        }
    }

    /// Ends the wait; the next `display` call shows the following page.
    pub fn resume(&mut self) {
        self.phase = Phase::Displaying;
    }
}
