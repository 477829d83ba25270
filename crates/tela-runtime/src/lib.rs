#![forbid(unsafe_code)]
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Lua-backed execution for tela templates.
//!
//! The [`Engine`] owns a Lua VM and turns template source into rendered
//! output: the source is compiled to a Lua program by `tela-engine`, the
//! program is run inside a per-render environment, and everything it emits
//! is accumulated into named [`Blocks`].
//!
//! Templates write output through three injected callbacks: `_o(...)`
//! appends its stringified arguments to the currently open block,
//! `beginblock(name)` opens a named block, and `endblock()` closes the most
//! recently opened one. Output emitted while no block is open lands in the
//! default block, named [`DEFAULT_BLOCK`].
//!
//! Renders are isolated from each other: globals assigned by one template
//! are gone by the next, and the caller's context is rebound from scratch
//! every time.
//!
//! ```
//! use serde_json::json;
//!
//! let engine = tela_runtime::Engine::new();
//! let blocks = engine
//!     .render("greeting", "Hello {{ name }}!", &json!({ "name": "world" }))
//!     .unwrap();
//! assert_eq!(blocks.default_block(), "Hello world!");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use mlua::Lua;
use serde_json::Value;

mod blocks;
mod error;
mod sandbox;

pub use blocks::{Blocks, DEFAULT_BLOCK};
pub use error::Error;
pub use tela_engine::{compile, Fragment, Scanner};

use blocks::BlockStore;

/// A reusable template executor backed by a single Lua VM.
///
/// The VM is shared across renders but per-render state never is; see the
/// crate docs for the isolation rules. `Engine` is deliberately not `Sync`;
/// use one per thread.
pub struct Engine {
    lua: Lua,
}

impl Engine {
    /// Creates an engine with a fresh Lua VM and its standard library.
    #[must_use]
    pub fn new() -> Self {
        Engine { lua: Lua::new() }
    }

    /// Renders a template and returns every block it produced.
    ///
    /// `name` labels the template in error messages and stack traces.
    /// `context` must be a JSON object, whose entries become read-only
    /// bindings visible to the template, or [`Value::Null`] for no bindings.
    ///
    /// # Errors
    ///
    /// [`Error::Compile`] when the generated program is not valid Lua,
    /// [`Error::Eval`] when it fails at runtime, which includes misuse of
    /// the block callbacks and a non-object, non-null context.
    pub fn render(&self, name: &str, source: &str, context: &Value) -> Result<Blocks, Error> {
        self.execute(name, source, context, true)
    }

    /// Renders a template that uses no named blocks and returns its output
    /// directly.
    ///
    /// The block callbacks are not installed, so a template referring to
    /// `beginblock` or `endblock` fails with an [`Error::Eval`]; everything
    /// else behaves as in [`Engine::render`].
    ///
    /// # Errors
    ///
    /// Same as [`Engine::render`].
    pub fn render_to_string(
        &self,
        name: &str,
        source: &str,
        context: &Value,
    ) -> Result<String, Error> {
        let blocks = self.execute(name, source, context, false)?;
        Ok(blocks.default_block().to_string())
    }

    fn execute(
        &self,
        name: &str,
        source: &str,
        context: &Value,
        named_blocks: bool,
    ) -> Result<Blocks, Error> {
        let program = compile(source);
        tracing::debug!(
            template = name,
            source_len = source.len(),
            program_len = program.len(),
            "compiled template"
        );

        let store = Rc::new(RefCell::new(BlockStore::default()));
        let run = || -> mlua::Result<()> {
            let env = sandbox::environment(&self.lua, context)?;
            if named_blocks {
                sandbox::install_output_api(&self.lua, &env, &store)?;
            } else {
                sandbox::install_emit(&self.lua, &env, &store)?;
            }
            self.lua
                .load(&program)
                .set_name(name)
                .set_environment(env)
                .exec()
        };
        run().map_err(|err| {
            let err = Error::from_lua(name, err);
            tracing::debug!(template = name, error = %err, "render failed");
            err
        })?;

        // The Lua closures still hold clones of the Rc; take the store's
        // contents instead of trying to unwrap it.
        let blocks = std::mem::take(&mut *store.borrow_mut()).into_blocks();
        tracing::debug!(template = name, blocks = blocks.len(), "render finished");
        Ok(blocks)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}
