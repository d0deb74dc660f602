//! Prints each line one character at a time, then passes it through.

use crate::stage::transform::Transform;
use std::io::Write;
use std::time::Duration;

/// Delay between printed characters.
pub const CHAR_DELAY: Duration = Duration::from_millis(100);

pub struct TypewriterTransform;

impl Transform for TypewriterTransform {
    fn name(&self) -> &str {
        "typewriter"
    }

    fn apply(&mut self, input: &str) -> Option<String> {
        // Empty lines produce no partial tag.
        if !input.is_empty() {
            let mut out = std::io::stdout().lock();
            let _ = write!(out, "[typewriter] ");
            let _ = out.flush();
            for ch in input.chars() {
                let _ = write!(out, "{ch}");
                let _ = out.flush();
                std::thread::sleep(CHAR_DELAY);
            }
            let _ = writeln!(out);
        }
        Some(input.to_owned())
    }
}
