// SPDX-License-Identifier: Apache-2.0 OR MIT
use thiserror::Error;

/// Unified error type for template execution.
///
/// `Compile` means the generated Lua program failed to load, almost always
/// because of a malformed expression or statement body in the template. `Eval` means
/// the program loaded but failed while running, which includes misuse of the
/// injected block callbacks. Message text originates from the Lua engine and
/// is surfaced verbatim; the underlying [`mlua::Error`] stays reachable
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum Error {
    /// The generated program was rejected by the Lua loader.
    #[error("compile error in {name}: {message}")]
    Compile {
        /// Template name the chunk was loaded under.
        name: String,
        /// Loader message, verbatim.
        message: String,
        /// Originating engine error.
        #[source]
        source: mlua::Error,
    },
    /// The generated program failed while running.
    #[error("eval error in {name}: {message}")]
    Eval {
        /// Template name the chunk was loaded under.
        name: String,
        /// Root-cause message, verbatim.
        message: String,
        /// Originating engine error.
        #[source]
        source: mlua::Error,
    },
}

impl Error {
    /// Classifies an engine failure for template `name`.
    pub(crate) fn from_lua(name: &str, source: mlua::Error) -> Self {
        let message = root_cause(&source);
        match source {
            mlua::Error::SyntaxError { .. } => Error::Compile {
                name: name.to_string(),
                message,
                source,
            },
            _ => Error::Eval {
                name: name.to_string(),
                message,
                source,
            },
        }
    }

    /// Reports whether the failure happened while loading the generated
    /// program, as opposed to while running it.
    #[must_use]
    pub fn is_compile(&self) -> bool {
        matches!(self, Error::Compile { .. })
    }
}

/// Unwraps callback-error chains down to the error the callback raised.
fn root_cause(error: &mlua::Error) -> String {
    match error {
        mlua::Error::CallbackError { cause, .. } => root_cause(cause.as_ref()),
        other => other.to_string(),
    }
}
