// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::collections::HashMap;

use smallvec::SmallVec;

/// Name of the block that receives output while no named block is open.
pub const DEFAULT_BLOCK: &str = "_";

/// Accumulated output of one template execution, keyed by block name.
///
/// A key is present only once something (possibly the empty string) was
/// emitted to that block. Iteration order is unspecified; block content only
/// ever grows by appends during the execution that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks {
    map: HashMap<String, String>,
}

impl Blocks {
    /// Returns the content of a named block, if anything was emitted to it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Returns the default block's content, or the empty string when
    /// nothing was emitted outside named blocks.
    #[must_use]
    pub fn default_block(&self) -> &str {
        self.get(DEFAULT_BLOCK).unwrap_or("")
    }

    /// Returns the number of blocks that received output.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Reports whether no block received any output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over `(name, content)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(name, text)| (name.as_str(), text.as_str()))
    }

    /// Consumes the result into the underlying map.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, String> {
        self.map
    }
}

/// `end` was requested with no block open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockUnderflow;

/// Scratch state threaded through the output callbacks of one execution.
///
/// The stack tracks currently open named blocks; its top is the emit target,
/// falling back to [`DEFAULT_BLOCK`] when no block is open. The stack is
/// discarded after the run, the accumulated blocks are handed back.
#[derive(Debug, Default)]
pub(crate) struct BlockStore {
    stack: SmallVec<[String; 4]>,
    blocks: Blocks,
}

impl BlockStore {
    /// Appends `text` to the block currently on top of the stack.
    pub(crate) fn emit(&mut self, text: &str) {
        let name = self.stack.last().map_or(DEFAULT_BLOCK, String::as_str);
        match self.blocks.map.get_mut(name) {
            Some(value) => value.push_str(text),
            None => {
                self.blocks.map.insert(name.to_string(), text.to_string());
            }
        }
    }

    pub(crate) fn begin(&mut self, name: String) {
        self.stack.push(name);
    }

    pub(crate) fn end(&mut self) -> Result<(), BlockUnderflow> {
        self.stack.pop().map(|_| ()).ok_or(BlockUnderflow)
    }

    pub(crate) fn into_blocks(self) -> Blocks {
        self.blocks
    }
}
