//! Bounded blocking queue of owned strings.
//!
//! A [`Channel`] is a fixed-capacity FIFO ring guarded by one mutex, with
//! three [`Latch`]es: space-available (producers wait on it when full),
//! item-available (consumers wait on it when empty), and finished (signaled
//! once by the owning worker when its consume loop exits).
//!
//! The blocking protocol is reset-then-wait: under the ring mutex, while the
//! wait condition holds, clear the relevant latch, release the mutex, block
//! on the latch, re-acquire, and re-check. The latch is only ever signaled
//! by the opposite side *after* it changed the ring under the same mutex, so
//! a signal landing between the unlock and the wait persists in the latch
//! until the next reset; no wakeup is missed. The re-check loop guards
//! against several producers racing for a single freed slot.

use crate::sync::latch::{Latch, SyncError};
use std::sync::Mutex;
use thiserror::Error;

/// Errors surfaced by [`Channel`] operations.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("queue capacity must be at least 1")]
    InvalidCapacity,

    #[error("queue wait failed: {0}")]
    Wait(#[from] SyncError),
}

/// Ring storage. Slots in `[head, head + count)` (mod capacity) hold live
/// strings; all others are `None`.
struct Ring {
    buf: Box<[Option<String>]>,
    capacity: usize,
    count: usize,
    head: usize,
}

impl Ring {
    fn new(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity);
        buf.resize_with(capacity, || None);
        Self {
            buf: buf.into_boxed_slice(),
            capacity,
            count: 0,
            head: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    fn push(&mut self, item: String) {
        debug_assert!(!self.is_full());
        let tail = (self.head + self.count) % self.capacity;
        self.buf[tail] = Some(item);
        self.count += 1;
    }

    fn pop(&mut self) -> Option<String> {
        if self.count == 0 {
            return None;
        }
        let item = self.buf[self.head].take();
        self.head = (self.head + 1) % self.capacity;
        self.count -= 1;
        item
    }
}

/// Fixed-capacity blocking FIFO of owned strings.
pub struct Channel {
    ring: Mutex<Ring>,
    capacity: usize,
    space: Latch,
    items: Latch,
    finished: Latch,
}

impl Channel {
    /// Creates a channel holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, ChannelError> {
        if capacity == 0 {
            return Err(ChannelError::InvalidCapacity);
        }
        Ok(Self {
            ring: Mutex::new(Ring::new(capacity)),
            capacity,
            space: Latch::new(),
            items: Latch::new(),
            finished: Latch::new(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items currently queued.
    pub fn len(&self) -> Result<usize, ChannelError> {
        let ring = self.ring.lock().map_err(SyncError::from)?;
        Ok(ring.count)
    }

    pub fn is_empty(&self) -> Result<bool, ChannelError> {
        Ok(self.len()? == 0)
    }

    /// Copies `item` into the queue, blocking while the queue is full.
    ///
    /// The caller keeps its borrow; the channel owns the copy until a
    /// [`get`] hands it to a consumer.
    ///
    /// [`get`]: Channel::get
    pub fn put(&self, item: &str) -> Result<(), ChannelError> {
        let mut ring = self.ring.lock().map_err(SyncError::from)?;
        while ring.is_full() {
            self.space.reset();
            drop(ring);
            self.space.wait()?;
            ring = self.ring.lock().map_err(SyncError::from)?;
        }
        ring.push(item.to_owned());
        self.items.signal();
        Ok(())
    }

    /// Removes and returns the oldest item, blocking while the queue is
    /// empty. Ownership transfers to the caller.
    pub fn get(&self) -> Result<String, ChannelError> {
        let mut ring = self.ring.lock().map_err(SyncError::from)?;
        loop {
            if let Some(item) = ring.pop() {
                self.space.signal();
                return Ok(item);
            }
            self.items.reset();
            drop(ring);
            self.items.wait()?;
            ring = self.ring.lock().map_err(SyncError::from)?;
        }
    }

    /// Marks the owning worker's consume loop as exited. Once signaled, all
    /// present and future [`wait_finished`] calls return.
    ///
    /// [`wait_finished`]: Channel::wait_finished
    pub fn signal_finished(&self) {
        self.finished.signal();
    }

    /// Blocks until [`signal_finished`] has been called at least once.
    ///
    /// [`signal_finished`]: Channel::signal_finished
    pub fn wait_finished(&self) -> Result<(), ChannelError> {
        self.finished.wait()?;
        Ok(())
    }
}
