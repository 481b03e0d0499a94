// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::{collections::HashMap, time::Duration};

#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone, PartialOrd, Ord)]
pub struct EventId(pub u64);

/// A scheduler to schedule and cancel single-shot timeouts.
///
/// When a scheduled timeout expires the host is expected to hand its `EventId` back to the
/// owner of the `Timer`, which resolves it with `Timer::triggered`.
pub trait Scheduler {
    /// Requests a timeout `after` from now. Returns a unique ID used to cancel the scheduled
    /// event and to identify it once it fires.
    fn schedule(&mut self, after: Duration) -> EventId;
    /// Cancels a previously scheduled event.
    fn cancel(&mut self, id: EventId);
}

/// A timer to schedule and cancel timeouts and retrieve triggered events.
pub struct Timer<E> {
    events: HashMap<EventId, E>,
    scheduler: Box<dyn Scheduler>,
}

impl<E> Timer<E> {
    pub fn new(scheduler: Box<dyn Scheduler>) -> Self {
        Self { events: HashMap::default(), scheduler }
    }

    /// Returns the event scheduled under `event_id`, or None if it was cancelled or already
    /// triggered.
    pub fn triggered(&mut self, event_id: &EventId) -> Option<E> {
        self.events.remove(event_id)
    }

    pub fn schedule_after(&mut self, after: Duration, event: E) -> EventId {
        let event_id = self.scheduler.schedule(after);
        self.events.insert(event_id, event);
        event_id
    }

    pub fn cancel_event(&mut self, event_id: EventId) {
        if self.events.remove(&event_id).is_some() {
            self.scheduler.cancel(event_id);
        }
    }

    pub fn cancel_all(&mut self) {
        for event_id in self.events.keys() {
            self.scheduler.cancel(*event_id);
        }
        self.events.clear();
    }

    pub fn is_scheduled(&self, event_id: &EventId) -> bool {
        self.events.contains_key(event_id)
    }

    pub fn scheduled_count(&self) -> usize {
        self.events.len()
    }
}

impl<E> Drop for Timer<E> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Scheduler for tests. Timeouts never fire on their own; tests fire them explicitly.
pub mod testing {
    use {
        super::*,
        std::{cell::RefCell, rc::Rc},
    };

    #[derive(Debug, Default)]
    pub struct FakeSchedulerState {
        next_id: u64,
        /// Every timeout requested so far, in order.
        pub scheduled: Vec<(EventId, Duration)>,
        pub cancelled: Vec<EventId>,
        /// Scheduled timeouts which were neither cancelled nor fired.
        pub pending: Vec<EventId>,
    }

    /// Clones share state, so a test can keep a handle after boxing one into a `Timer`.
    #[derive(Clone, Debug, Default)]
    pub struct FakeScheduler {
        pub state: Rc<RefCell<FakeSchedulerState>>,
    }

    impl FakeScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn as_scheduler(&self) -> Box<dyn Scheduler> {
            Box::new(self.clone())
        }

        /// Removes the oldest pending timeout and returns its ID so the test can deliver it.
        pub fn fire_next(&self) -> Option<EventId> {
            let mut state = self.state.borrow_mut();
            if state.pending.is_empty() {
                None
            } else {
                Some(state.pending.remove(0))
            }
        }

        pub fn pending(&self) -> Vec<EventId> {
            self.state.borrow().pending.clone()
        }

        pub fn last_scheduled(&self) -> Option<(EventId, Duration)> {
            self.state.borrow().scheduled.last().cloned()
        }

        pub fn scheduled_count(&self) -> usize {
            self.state.borrow().scheduled.len()
        }

        pub fn cancelled(&self) -> Vec<EventId> {
            self.state.borrow().cancelled.clone()
        }
    }

    impl Scheduler for FakeScheduler {
        fn schedule(&mut self, after: Duration) -> EventId {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = EventId(state.next_id);
            state.scheduled.push((id, after));
            state.pending.push(id);
            id
        }

        fn cancel(&mut self, id: EventId) {
            let mut state = self.state.borrow_mut();
            state.pending.retain(|pending| *pending != id);
            state.cancelled.push(id);
        }
    }
}
