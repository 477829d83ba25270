// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Per-execution environment construction and output-callback injection.
//!
//! Generated code runs inside a fresh environment table: reads fall through
//! to the VM globals so the Lua standard library stays usable, while writes
//! land in the fresh table and die with it. The environment is built for
//! one run and never reused, so nothing needs cleaning up afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use mlua::{Lua, LuaSerdeExt, Table, Value as LuaValue, Variadic};
use serde_json::Value;

use crate::blocks::BlockStore;

/// Builds the isolated environment for one execution and installs the
/// caller's context bindings in it.
///
/// `context` must be a JSON object (each entry becomes a readable binding)
/// or null. `_G` inside the environment is shadowed by the environment
/// itself, so even explicit global writes stay contained.
pub(crate) fn environment(lua: &Lua, context: &Value) -> mlua::Result<Table> {
    let env = lua
        .load("return setmetatable({}, { __index = _G })")
        .set_name("=tela.sandbox")
        .eval::<Table>()?;
    env.set("_G", env.clone())?;

    match context {
        Value::Null => {}
        Value::Object(bindings) => {
            for (name, value) in bindings {
                env.set(name.as_str(), lua.to_value(value)?)?;
            }
        }
        other => {
            return Err(mlua::Error::RuntimeError(format!(
                "context must be an object or null, got {}",
                json_kind(other)
            )));
        }
    }

    Ok(env)
}

/// Injects the full output API (`_o`, `beginblock`, `endblock`) into
/// `env`, all writing through the execution's block store.
pub(crate) fn install_output_api(
    lua: &Lua,
    env: &Table,
    store: &Rc<RefCell<BlockStore>>,
) -> mlua::Result<()> {
    install_emit(lua, env, store)?;

    let begin_store = Rc::clone(store);
    let beginblock = lua.create_function(move |_, values: Variadic<LuaValue>| {
        if values.len() != 1 {
            return Err(mlua::Error::RuntimeError(format!(
                "beginblock() expects 1 argument, got {}",
                values.len()
            )));
        }
        // Block names follow `tostring` semantics, same as emitted values.
        let name = values[0].to_string()?;
        begin_store.borrow_mut().begin(name);
        Ok(())
    })?;
    env.set("beginblock", beginblock)?;

    let end_store = Rc::clone(store);
    let endblock = lua.create_function(move |_, values: Variadic<LuaValue>| {
        if !values.is_empty() {
            return Err(mlua::Error::RuntimeError(format!(
                "endblock() expects 0 arguments, got {}",
                values.len()
            )));
        }
        end_store.borrow_mut().end().map_err(|_| {
            mlua::Error::RuntimeError("endblock() called with no open block".to_string())
        })
    })?;
    env.set("endblock", endblock)?;

    Ok(())
}

/// Injects only the `_o` emit callback, for the simplified single-block
/// protocol.
pub(crate) fn install_emit(
    lua: &Lua,
    env: &Table,
    store: &Rc<RefCell<BlockStore>>,
) -> mlua::Result<()> {
    let emit_store = Rc::clone(store);
    let emit = lua.create_function(move |_, values: Variadic<LuaValue>| {
        let mut text = String::new();
        for value in values.iter() {
            append_value(&mut text, value)?;
        }
        emit_store.borrow_mut().emit(&text);
        Ok(())
    })?;
    env.set("_o", emit)
}

/// Appends one emitted value to `text`: nil becomes the empty string,
/// everything else goes through Lua's `tostring` semantics, so values with
/// a `__tostring` metamethod stringify themselves.
fn append_value(text: &mut String, value: &LuaValue) -> mlua::Result<()> {
    match value {
        LuaValue::Nil => {}
        LuaValue::String(value) => text.push_str(&value.to_str()?),
        other => text.push_str(&other.to_string()?),
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
