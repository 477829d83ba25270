// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Anchored recognition of the template tag delimiters.
//!
//! The `*_at` predicates test whether a delimiter starts at a byte offset
//! without consuming anything; the `consume_*` functions advance a shrinking
//! remaining-source view when the delimiter is present. Offsets at or past
//! the end of input never match. Everything here works on bytes: all
//! delimiters are ASCII, so offsets that fall inside a multi-byte character
//! simply fail to match.

/// Opening delimiter of an expression tag.
pub const OPEN_EXPRESSION: &str = "{{";
/// Closing delimiter of an expression tag.
pub const CLOSE_EXPRESSION: &str = "}}";

fn starts_with_at(source: &str, offset: usize, prefix: &[u8]) -> bool {
    source
        .as_bytes()
        .get(offset..)
        .is_some_and(|rest| rest.starts_with(prefix))
}

/// Reports whether an expression opener (`{{`) starts at `offset`.
#[must_use]
pub fn open_expression_at(source: &str, offset: usize) -> bool {
    starts_with_at(source, offset, OPEN_EXPRESSION.as_bytes())
}

/// Reports whether an expression closer (`}}`) starts at `offset`.
#[must_use]
pub fn close_expression_at(source: &str, offset: usize) -> bool {
    starts_with_at(source, offset, CLOSE_EXPRESSION.as_bytes())
}

/// Reports whether a statement opener starts at `offset`.
///
/// Matches `{%` and `{%-` directly, and also the line-owning form where a
/// newline and a run of spaces precede `{%-`; in that form the newline and
/// spaces belong to the tag.
#[must_use]
pub fn open_statement_at(source: &str, offset: usize) -> bool {
    if starts_with_at(source, offset, b"{%") {
        return true;
    }
    let Some(rest) = source.as_bytes().get(offset..) else {
        return false;
    };
    if rest.first() != Some(&b'\n') {
        return false;
    }
    let mut index = 1;
    while rest.get(index) == Some(&b' ') {
        index += 1;
    }
    rest[index..].starts_with(b"{%-")
}

/// Reports whether a statement closer (`%}` or `-%}`) starts at `offset`.
#[must_use]
pub fn close_statement_at(source: &str, offset: usize) -> bool {
    starts_with_at(source, offset, b"%}") || starts_with_at(source, offset, b"-%}")
}

fn consume_prefix(rest: &mut &str, prefix: &str) -> bool {
    if let Some(stripped) = rest.strip_prefix(prefix) {
        *rest = stripped;
        true
    } else {
        false
    }
}

/// Consumes an expression opener, returning whether one was present.
pub fn consume_open_expression(rest: &mut &str) -> bool {
    consume_prefix(rest, OPEN_EXPRESSION)
}

/// Consumes an expression closer, returning whether one was present.
pub fn consume_close_expression(rest: &mut &str) -> bool {
    consume_prefix(rest, CLOSE_EXPRESSION)
}

/// Consumes a statement opener in any of its three spellings.
///
/// The line-owning form consumes the newline, the space run and `{%-` as one
/// unit, so the preceding blank prefix never reaches the output.
pub fn consume_open_statement(rest: &mut &str) -> bool {
    let bytes = rest.as_bytes();
    if bytes.first() == Some(&b'\n') {
        let mut index = 1;
        while bytes.get(index) == Some(&b' ') {
            index += 1;
        }
        if bytes[index..].starts_with(b"{%-") {
            *rest = &rest[index + 3..];
            return true;
        }
        return false;
    }
    if consume_prefix(rest, "{%-") {
        return true;
    }
    consume_prefix(rest, "{%")
}

/// Consumes a statement closer.
///
/// The whitespace-control form `-%}` also swallows trailing spaces and one
/// trailing newline, but only when that newline is actually present; a bare
/// `-%}` followed by non-blank text consumes the three delimiter bytes only.
pub fn consume_close_statement(rest: &mut &str) -> bool {
    if rest.starts_with("-%}") {
        let bytes = rest.as_bytes();
        let mut index = 3;
        while bytes.get(index) == Some(&b' ') {
            index += 1;
        }
        if bytes.get(index) == Some(&b'\n') {
            *rest = &rest[index + 1..];
        } else {
            *rest = &rest[3..];
        }
        return true;
    }
    consume_prefix(rest, "%}")
}
