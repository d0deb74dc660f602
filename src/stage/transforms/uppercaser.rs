//! Converts every character of a line to uppercase.

use crate::stage::transform::Transform;

pub fn uppercase(input: &str) -> String {
    input.to_uppercase()
}

pub struct UppercaserTransform;

impl Transform for UppercaserTransform {
    fn name(&self) -> &str {
        "uppercaser"
    }

    fn apply(&mut self, input: &str) -> Option<String> {
        Some(uppercase(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_ascii() {
        assert_eq!(uppercase("hello"), "HELLO");
    }

    #[test]
    fn leaves_non_letters_alone() {
        assert_eq!(uppercase("a1b2-c3"), "A1B2-C3");
    }

    #[test]
    fn empty_line_stays_empty() {
        assert_eq!(uppercase(""), "");
    }
}
