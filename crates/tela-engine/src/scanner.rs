// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::matcher;

/// Lua source opening a verbatim text run.
///
/// Level-1 long brackets keep template text containing plain `]]` intact,
/// and Lua strips exactly one newline right after the opening bracket, which
/// protects a text run that itself starts with a newline.
const OPEN_TEXT: &str = "_o([=[\n";
/// Lua source closing a verbatim text run.
const CLOSE_TEXT: &str = "]=])";
/// Lua source opening the emit call generated for an expression tag.
const OPEN_EXPRESSION: &str = "_o(";
/// Lua source closing the emit call generated for an expression tag.
const CLOSE_EXPRESSION: &str = ")";
/// Statement bodies become bare Lua statements padded with spaces.
const STATEMENT_PAD: &str = " ";

/// One pulled unit of generated Lua source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// A fixed marker emitted around tags and text runs.
    Literal(&'static str),
    /// A verbatim slice of the template source.
    Source(&'a str),
}

impl<'a> Fragment<'a> {
    /// Returns the fragment text.
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        match self {
            Fragment::Literal(text) => text,
            Fragment::Source(text) => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Begin,
    Text,
    TextEnd,
    Expression,
    ExpressionEnd,
    Statement,
    StatementEnd,
    Str,
}

/// Streaming transformation of template source into an equivalent Lua
/// program.
///
/// Each call to [`Scanner::next_fragment`] consumes at most one span of the
/// template and returns the next piece of generated Lua; concatenating every
/// fragment in pull order yields the complete program. The scanner never
/// rescans: it owns a shrinking view into the source and cannot be rewound,
/// only rebuilt over new input.
///
/// Unterminated tags or strings at end of input are not errors; the scanner
/// closes them gracefully and emits whatever was accumulated; whether the
/// resulting Lua parses is the loader's concern.
pub struct Scanner<'a> {
    rest: &'a str,
    mode: Mode,
    /// Quote byte that opened the current string, while in `Str` mode.
    delimiter: u8,
    /// Mode to return to once the current string closes.
    from: Mode,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            mode: Mode::Begin,
            delimiter: 0,
            from: Mode::Begin,
        }
    }

    /// Pulls the next fragment of generated Lua, or `None` once the template
    /// is exhausted. `None` is sticky.
    pub fn next_fragment(&mut self) -> Option<Fragment<'a>> {
        match self.mode {
            Mode::Begin => {
                if matcher::consume_open_expression(&mut self.rest) {
                    self.mode = Mode::Expression;
                    Some(Fragment::Literal(OPEN_EXPRESSION))
                } else if matcher::consume_open_statement(&mut self.rest) {
                    self.mode = Mode::Statement;
                    Some(Fragment::Literal(STATEMENT_PAD))
                } else if self.rest.is_empty() {
                    None
                } else {
                    self.mode = Mode::Text;
                    Some(Fragment::Literal(OPEN_TEXT))
                }
            }
            Mode::Text => {
                let bytes = self.rest.as_bytes();
                let mut size = 0;
                while size < bytes.len()
                    && !matcher::open_expression_at(self.rest, size)
                    && !matcher::open_statement_at(self.rest, size)
                {
                    // A backslash shields the next character from being read
                    // as the start of a tag; both stay in the output.
                    if bytes[size] == b'\\' && size + 1 < bytes.len() {
                        size += 1;
                    }
                    size += 1;
                }
                self.mode = Mode::TextEnd;
                Some(Fragment::Source(self.consume(size)))
            }
            Mode::TextEnd => {
                self.mode = Mode::Begin;
                Some(Fragment::Literal(CLOSE_TEXT))
            }
            Mode::Expression => {
                let bytes = self.rest.as_bytes();
                let mut size = 0;
                while size < bytes.len() && !matcher::close_expression_at(self.rest, size) {
                    let byte = bytes[size];
                    if byte == b'"' || byte == b'\'' {
                        return Some(self.enter_string(byte, size, Mode::Expression));
                    }
                    size += 1;
                }
                if size > 0 || self.rest.is_empty() {
                    self.mode = Mode::ExpressionEnd;
                    return Some(Fragment::Source(self.consume(size)));
                }
                // The closer sits right here: skip the empty body and close
                // in the same pull.
                Some(self.finish_expression())
            }
            Mode::ExpressionEnd => Some(self.finish_expression()),
            Mode::Statement => {
                let bytes = self.rest.as_bytes();
                let mut size = 0;
                while size < bytes.len() && !matcher::close_statement_at(self.rest, size) {
                    let byte = bytes[size];
                    if byte == b'"' || byte == b'\'' {
                        return Some(self.enter_string(byte, size, Mode::Statement));
                    }
                    size += 1;
                }
                if size > 0 || self.rest.is_empty() {
                    self.mode = Mode::StatementEnd;
                    return Some(Fragment::Source(self.consume(size)));
                }
                Some(self.finish_statement())
            }
            Mode::StatementEnd => Some(self.finish_statement()),
            Mode::Str => {
                let bytes = self.rest.as_bytes();
                let mut size = 0;
                while size < bytes.len() {
                    let byte = bytes[size];
                    if byte == self.delimiter {
                        self.mode = self.from;
                        return Some(Fragment::Source(self.consume(size + 1)));
                    }
                    // Escape pairs are consumed two at a time, so an escaped
                    // quote cannot terminate the string and an escaped
                    // backslash cannot disarm the quote after it.
                    if byte == b'\\' && size + 1 < bytes.len() {
                        size += 1;
                    }
                    size += 1;
                }
                // Unterminated string: close at end of input.
                self.mode = self.from;
                Some(Fragment::Source(self.consume(size)))
            }
        }
    }

    fn enter_string(&mut self, delimiter: u8, size: usize, from: Mode) -> Fragment<'a> {
        self.delimiter = delimiter;
        self.from = from;
        self.mode = Mode::Str;
        // The opening quote travels with the tag-body span.
        Fragment::Source(self.consume(size + 1))
    }

    fn finish_expression(&mut self) -> Fragment<'a> {
        // Best effort: the closer is absent when the tag ran into end of
        // input, and that is fine.
        matcher::consume_close_expression(&mut self.rest);
        self.mode = Mode::Begin;
        Fragment::Literal(CLOSE_EXPRESSION)
    }

    fn finish_statement(&mut self) -> Fragment<'a> {
        matcher::consume_close_statement(&mut self.rest);
        self.mode = Mode::Begin;
        Fragment::Literal(STATEMENT_PAD)
    }

    fn consume(&mut self, size: usize) -> &'a str {
        let (consumed, rest) = self.rest.split_at(size);
        self.rest = rest;
        consumed
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Fragment<'a>;

    fn next(&mut self) -> Option<Fragment<'a>> {
        self.next_fragment()
    }
}
