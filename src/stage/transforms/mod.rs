//! The built-in text transforms.
//!
//! Each transform is a pure, allocation-only string function wrapped in a
//! unit struct implementing [`Transform`](crate::stage::Transform). The
//! printing stages (`logger`, `typewriter`) write to stdout as a side
//! effect and pass the line through unchanged.

mod expander;
mod flipper;
mod logger;
mod rotator;
mod typewriter;
mod uppercaser;

pub use expander::{expand, ExpanderTransform};
pub use flipper::{flip, FlipperTransform};
pub use logger::LoggerTransform;
pub use rotator::{rotate, RotatorTransform};
pub use typewriter::{TypewriterTransform, CHAR_DELAY};
pub use uppercaser::{uppercase, UppercaserTransform};
