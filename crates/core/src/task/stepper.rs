// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual stepping of a single task outside the scheduler
//!
//! Applies the scheduler's per-tick contract to one task: the first advance
//! initializes, every advance executes, and the advance on which
//! `is_finished` turns true ends the task with `end(false)`.

use super::Task;

/// Iterator that drives one task tick by tick
///
/// Yields the number of `execute` calls made so far. Dropping the iterator
/// before the task finishes ends it with `end(true)`.
pub struct StepIter<'a> {
    task: &'a mut dyn Task,
    started: bool,
    done: bool,
    ticks: usize,
}

impl<'a> StepIter<'a> {
    pub fn new(task: &'a mut dyn Task) -> Self {
        Self {
            task,
            started: false,
            done: false,
            ticks: 0,
        }
    }

    /// Whether the task has ended
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// End the task early with `end(true)`; a no-op once it has ended
    pub fn cancel(mut self) {
        self.interrupt();
    }

    fn interrupt(&mut self) {
        if self.started && !self.done {
            self.task.end(true);
            self.done = true;
        }
    }
}

impl Iterator for StepIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done {
            return None;
        }
        if !self.started {
            self.task.initialize();
            self.started = true;
        }
        self.task.execute();
        self.ticks += 1;
        if self.task.is_finished() {
            self.task.end(false);
            self.done = true;
        }
        Some(self.ticks)
    }
}

impl Drop for StepIter<'_> {
    fn drop(&mut self) {
        self.interrupt();
    }
}

/// Step a task until it finishes or `max_ticks` is reached
///
/// Returns the number of ticks executed. A task still running after
/// `max_ticks` is ended with `end(true)`.
pub fn run_to_completion(task: &mut dyn Task, max_ticks: usize) -> usize {
    let mut steps = StepIter::new(task);
    let mut ticks = 0;
    for tick in steps.by_ref().take(max_ticks) {
        ticks = tick;
    }
    ticks
}
