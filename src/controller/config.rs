//! Runtime configuration, read from TOML.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::RuntimeError;
use crate::runner::plugin::types::DEFAULT_MAX_CALL_DEPTH;

pub const DEFAULT_VIEW: &str = "Form";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// View whose scripts are listed for a doctype.
    pub view: String,
    pub capabilities: CapabilityConfig,
    pub interpreter: InterpreterConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapabilityConfig {
    /// `None` exposes every capability the host registered.
    pub allow: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterConfig {
    pub max_call_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Await point between two controller handlers of one dispatch.
    pub yield_between_handlers: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            view: DEFAULT_VIEW.to_string(),
            capabilities: CapabilityConfig::default(),
            interpreter: InterpreterConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            yield_between_handlers: true,
        }
    }
}

impl RuntimeConfig {
    pub fn parse(text: &str) -> Result<Self, RuntimeError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RuntimeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}
