//! Thread-synchronization primitives the pipeline is built on.
//!
//! Everything here is deliberately built from `std::sync::Mutex` and
//! `Condvar`: the [`Latch`] is a manual-reset, multi-waiter event whose set
//! state persists until explicitly cleared, and the [`Channel`] layers a
//! bounded string ring on top of three latches. A counting semaphore is not
//! a substitute: every waiter must observe a single signal, and the signal
//! must stay observable until the next reset.

pub mod channel;
pub mod latch;

pub use channel::{Channel, ChannelError};
pub use latch::{Latch, SyncError};
