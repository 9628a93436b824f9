//! Content line unfolding.
//!
//! Turns physical lines into logical lines, keeping track of the physical lines each
//! logical line was built from so unknown properties can be re-emitted verbatim.

use std::str::Lines;

/// A logical line and the physical lines it was unfolded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    /// 1-based number of the first physical line.
    pub line_num: usize,
    /// Physical lines consumed, carriage returns stripped, otherwise verbatim.
    pub physical: Vec<&'a str>,
    /// Unfolded line text.
    pub text: String,
}

impl<'a> LogicalLine<'a> {
    fn start(line_num: usize, physical: &'a str) -> Self {
        Self {
            line_num,
            physical: vec![physical],
            text: physical.trim().to_string(),
        }
    }

    fn empty(line_num: usize) -> Self {
        Self {
            line_num,
            physical: Vec::new(),
            text: String::new(),
        }
    }

    fn push_continuation(&mut self, physical: &'a str) {
        self.physical.push(physical);
        self.text.push_str(physical.trim());
    }
}

/// Lazy iterator over the logical lines of a folded document.
///
/// Continuation lines start with a space or a tab; they are trimmed and appended to
/// the pending logical line with no separator. One logical line is buffered at a
/// time and flushed when the next non-continuation line arrives, or at end of input.
pub struct Unfolder<'a> {
    lines: Lines<'a>,
    line_num: usize,
    pending: Option<LogicalLine<'a>>,
}

impl<'a> Unfolder<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            line_num: 0,
            pending: None,
        }
    }
}

impl<'a> Iterator for Unfolder<'a> {
    type Item = LogicalLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.lines.by_ref() {
            self.line_num += 1;
            let line = raw.trim_end_matches('\r');

            if line.starts_with([' ', '\t']) {
                self.pending
                    .get_or_insert_with(|| LogicalLine::empty(self.line_num))
                    .push_continuation(line);
                continue;
            }

            let next = LogicalLine::start(self.line_num, line);
            if let Some(flushed) = self.pending.replace(next) {
                return Some(flushed);
            }
        }

        self.pending.take()
    }
}

/// Unfolds a whole document into owned logical line texts.
#[must_use]
pub fn unfold(input: &str) -> Vec<String> {
    Unfolder::new(input).map(|line| line.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfold_joins_without_separator() {
        assert_eq!(
            unfold("SUMMARY:Team mee\r\n ting\r\n"),
            vec!["SUMMARY:Team meeting"]
        );
    }

    #[test]
    fn unfold_strips_continuation_whitespace() {
        assert_eq!(
            unfold("DESCRIPTION:First\r\n\t Second  \r\n   Third\r\nUID:1\r\n"),
            vec!["DESCRIPTION:FirstSecondThird", "UID:1"]
        );
    }

    #[test]
    fn unfold_flushes_last_line_at_end_of_input() {
        assert_eq!(unfold("UID:1\r\nSUMMARY:last"), vec!["UID:1", "SUMMARY:last"]);
        assert_eq!(unfold("UID:1\nSUMMARY:la\n st\n"), vec!["UID:1", "SUMMARY:last"]);
    }

    #[test]
    fn unfold_keeps_physical_lines() {
        let lines: Vec<_> = Unfolder::new("X-FOO:a\r\n b\r\nUID:1\r\n").collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].physical, vec!["X-FOO:a", " b"]);
        assert_eq!(lines[0].text, "X-FOO:ab");
        assert_eq!(lines[0].line_num, 1);
        assert_eq!(lines[1].physical, vec!["UID:1"]);
        assert_eq!(lines[1].line_num, 3);
    }

    #[test]
    fn leading_continuation_starts_empty_line() {
        let lines: Vec<_> = Unfolder::new(" orphan\r\nUID:1").collect();

        assert_eq!(lines[0].text, "orphan");
        assert_eq!(lines[0].physical, vec![" orphan"]);
        assert_eq!(lines[1].text, "UID:1");
    }

    #[test]
    fn blank_lines_are_logical_lines() {
        assert_eq!(unfold("A:1\r\n\r\nB:2\r\n"), vec!["A:1", "", "B:2"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(Unfolder::new("").count(), 0);
    }
}
