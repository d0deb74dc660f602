//! Reverses the order of characters in a line.

use crate::stage::transform::Transform;

pub fn flip(input: &str) -> String {
    input.chars().rev().collect()
}

pub struct FlipperTransform;

impl Transform for FlipperTransform {
    fn name(&self) -> &str {
        "flipper"
    }

    fn apply(&mut self, input: &str) -> Option<String> {
        Some(flip(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_characters() {
        assert_eq!(flip("hello"), "olleh");
    }

    #[test]
    fn single_character_is_unchanged() {
        assert_eq!(flip("x"), "x");
    }

    #[test]
    fn empty_line_stays_empty() {
        assert_eq!(flip(""), "");
    }
}
