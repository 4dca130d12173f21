//! Bounded job pool
//!
//! Jobs live in a fixed arena of slots addressed by index, linked into
//! either the time-ascending scheduled list or the free list. Dispatch
//! is O(1): one job at most per tick, so tick latency stays bounded
//! regardless of queue depth.

use crate::channel::{Channel, NUM_CHANNELS};
use crate::relay::{RelayInterlock, TransitionResult};
use crate::traits::{EventSink, RelayBank};

/// Pool capacity: two transitions per channel
pub const MAX_JOBS: usize = 2 * NUM_CHANNELS;

/// Scheduling failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// No free slot in the pool
    PoolExhausted,
}

/// One arena slot
///
/// The payload is meaningful only while the slot sits on the scheduled
/// list; `next` threads both lists.
#[derive(Debug, Clone, Copy)]
struct Slot {
    due_s: u32,
    channel: Channel,
    want_on: bool,
    next: Option<u8>,
}

/// Time-ordered pool of deferred channel transitions
#[derive(Debug)]
pub struct JobQueue {
    slots: [Slot; MAX_JOBS],
    /// Head of the scheduled list, earliest due time first
    head: Option<u8>,
    /// Head of the free list
    free: Option<u8>,
}

impl JobQueue {
    /// Create an empty pool
    pub fn new() -> Self {
        let mut slots = [Slot {
            due_s: 0,
            channel: Channel::Pump,
            want_on: false,
            next: None,
        }; MAX_JOBS];
        for i in 0..MAX_JOBS - 1 {
            slots[i].next = Some(i as u8 + 1);
        }
        Self {
            slots,
            head: None,
            free: Some(0),
        }
    }

    /// Schedule a channel transition
    ///
    /// Inserts in strictly time-ascending order; jobs with equal due
    /// times keep their insertion order. Fails when the pool is full,
    /// leaving the queue unchanged.
    pub fn schedule(&mut self, due_s: u32, channel: Channel, want_on: bool) -> Result<(), ScheduleError> {
        let Some(index) = self.free else {
            return Err(ScheduleError::PoolExhausted);
        };
        self.free = self.slots[index as usize].next;

        self.slots[index as usize] = Slot {
            due_s,
            channel,
            want_on,
            next: None,
        };

        // insert before the first job with a strictly later due time
        let mut prev: Option<u8> = None;
        let mut cur = self.head;
        while let Some(c) = cur {
            if self.slots[c as usize].due_s > due_s {
                break;
            }
            prev = Some(c);
            cur = self.slots[c as usize].next;
        }
        self.slots[index as usize].next = cur;
        match prev {
            None => self.head = Some(index),
            Some(p) => self.slots[p as usize].next = Some(index),
        }
        Ok(())
    }

    /// Execute the earliest job if it is due
    ///
    /// Dispatches at most one job per call and returns its outcome. The
    /// slot is released before dispatch so the pool never leaks.
    pub fn tick<B: RelayBank, S: EventSink>(
        &mut self,
        now_s: u32,
        relays: &mut RelayInterlock,
        bank: &mut B,
        sink: &mut S,
    ) -> Option<TransitionResult> {
        let head = self.head?;
        let slot = self.slots[head as usize];
        if slot.due_s > now_s {
            return None;
        }

        self.head = slot.next;
        self.slots[head as usize].next = self.free;
        self.free = Some(head);

        Some(relays.set_channel(slot.channel, slot.want_on, now_s, bank, sink))
    }

    /// Check for queued jobs
    pub fn has_pending(&self) -> bool {
        self.head.is_some()
    }

    /// Number of queued jobs
    pub fn pending(&self) -> usize {
        let mut count = 0;
        let mut cur = self.head;
        while let Some(c) = cur {
            count += 1;
            cur = self.slots[c as usize].next;
        }
        count
    }

    /// Number of free slots
    pub fn free_slots(&self) -> usize {
        MAX_JOBS - self.pending()
    }

    /// Peek at the earliest due time
    pub fn next_due_s(&self) -> Option<u32> {
        self.head.map(|h| self.slots[h as usize].due_s)
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}
