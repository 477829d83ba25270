#![forbid(unsafe_code)]
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Streaming compiler turning template text into an equivalent Lua program.
//!
//! Templates mix verbatim text with expression tags (`{{ ... }}`) and
//! statement tags (`{% ... %}`, or the whitespace-controlling `{%- ... -%}`).
//! The [`Scanner`] consumes the template left to right and hands out the
//! generated Lua one [`Fragment`] at a time, so a loader can stream the
//! program instead of materialising it. Verbatim text and expression
//! results become calls to an `_o` emit function the host is expected to
//! provide; statement bodies pass through as bare Lua.
//!
//! ```
//! let program = tela_engine::compile("Hello {{ name }}!");
//! assert_eq!(program, "_o([=[\nHello ]=])_o( name )_o([=[\n!]=])");
//! ```
//!
//! This crate only produces source text; loading and running it against an
//! actual emit function is the `tela-runtime` crate's job.

pub mod matcher;
mod scanner;

pub use scanner::{Fragment, Scanner};

/// Runs a scanner over `source` to completion and returns the concatenated
/// Lua program.
#[must_use]
pub fn compile(source: &str) -> String {
    let mut program = String::with_capacity(source.len() + 16);
    for fragment in Scanner::new(source) {
        program.push_str(fragment.as_str());
    }
    program
}
