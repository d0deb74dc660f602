//! Bounded line reading for the feed phase.
//!
//! Input items are capped at [`MAX_LINE_LEN`] bytes. A single trailing
//! newline is trimmed. A line that exactly fills the cap with no terminator
//! is delivered as-is and a lone immediately-following newline is swallowed
//! rather than producing an empty item; the remainder of a longer line
//! continues as the next item.

use crate::config::MAX_LINE_LEN;
use std::io::{self, BufRead};

/// Reads newline-delimited items of at most [`MAX_LINE_LEN`] bytes.
pub struct BoundedLineReader<R> {
    inner: R,
    /// Set after an item exactly filled the cap with no terminator.
    swallow_newline: bool,
}

impl<R: BufRead> BoundedLineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            swallow_newline: false,
        }
    }

    /// Next input item, or `None` at end of input.
    ///
    /// Invalid UTF-8 is decoded lossily (replacement characters), since
    /// items cross the pipeline as owned strings.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let chunk = self.inner.fill_buf()?;
            if chunk.is_empty() {
                // EOF
                if buf.is_empty() {
                    return Ok(None);
                }
                break;
            }

            if self.swallow_newline {
                self.swallow_newline = false;
                if chunk[0] == b'\n' {
                    self.inner.consume(1);
                    continue;
                }
            }

            let room = MAX_LINE_LEN - buf.len();
            let window = &chunk[..chunk.len().min(room)];
            match window.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    buf.extend_from_slice(&window[..pos]);
                    self.inner.consume(pos + 1);
                    break;
                }
                None => {
                    let taken = window.len();
                    buf.extend_from_slice(window);
                    self.inner.consume(taken);
                    if buf.len() == MAX_LINE_LEN {
                        self.swallow_newline = true;
                        break;
                    }
                }
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> Vec<String> {
        let mut reader = BoundedLineReader::new(Cursor::new(input.to_owned()));
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn trims_single_trailing_newline() {
        assert_eq!(read_all("hello\nworld\n"), vec!["hello", "world"]);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        assert_eq!(read_all("hello\nworld"), vec!["hello", "world"]);
    }

    #[test]
    fn empty_lines_are_items() {
        assert_eq!(read_all("a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(read_all("").is_empty());
    }

    #[test]
    fn long_lines_are_split_at_the_cap() {
        let long = "x".repeat(MAX_LINE_LEN + 10);
        let lines = read_all(&format!("{long}\n"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
        assert_eq!(lines[1], "x".repeat(10));
    }

    #[test]
    fn newline_after_exactly_full_item_is_swallowed() {
        let exact = "y".repeat(MAX_LINE_LEN);
        let lines = read_all(&format!("{exact}\nnext\n"));
        assert_eq!(lines, vec![exact, "next".to_string()]);
    }

    #[test]
    fn exactly_full_item_at_eof() {
        let exact = "z".repeat(MAX_LINE_LEN);
        let lines = read_all(&exact);
        assert_eq!(lines, vec![exact]);
    }
}
