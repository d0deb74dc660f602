//! Logs every line that passes through to stdout, unchanged.

use crate::stage::transform::Transform;
use std::io::Write;

pub struct LoggerTransform;

impl Transform for LoggerTransform {
    fn name(&self) -> &str {
        "logger"
    }

    fn apply(&mut self, input: &str) -> Option<String> {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[logger] {input}");
        let _ = out.flush();
        Some(input.to_owned())
    }
}
