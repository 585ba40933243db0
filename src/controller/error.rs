use std::path::PathBuf;

use thiserror::Error;

use crate::runner::ds::error::ScriptErrorType;

/// Failure of the host's script listing call.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("script listing for '{doctype}' failed: {message}")]
    Listing { doctype: String, message: String },
    #[error("malformed script records: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure of the host's metadata resolver. Scripts see it as a TypeError
/// thrown from `getMeta`.
#[derive(Debug, Error)]
pub enum MetaError {
    #[error("no metadata for doctype '{0}'")]
    NotFound(String),
    #[error("metadata for '{doctype}' unavailable: {message}")]
    Unavailable { doctype: String, message: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("script '{script}' failed to compile: {cause}")]
    Compilation {
        script: String,
        #[source]
        cause: ScriptErrorType,
    },
    #[error("{class}.{handler} failed: {cause}")]
    Handler {
        class: String,
        handler: String,
        #[source]
        cause: ScriptErrorType,
    },
    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

impl RuntimeError {
    /// The script-level error behind a compilation or handler failure.
    pub fn script_error(&self) -> Option<&ScriptErrorType> {
        match self {
            RuntimeError::Compilation { cause, .. } | RuntimeError::Handler { cause, .. } => {
                Some(cause)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::value::ScriptValue;

    #[test]
    fn test_handler_error_message() {
        let err = RuntimeError::Handler {
            class: "Lead".to_string(),
            handler: "email".to_string(),
            cause: ScriptErrorType::Thrown(ScriptValue::String("invalid email".to_string())),
        };
        assert!(err.to_string().starts_with("Lead.email failed: "));
        assert!(matches!(err.script_error(), Some(ScriptErrorType::Thrown(_))));
    }

    #[test]
    fn test_source_error_converts() {
        let err: RuntimeError = SourceError::Listing {
            doctype: "Lead".to_string(),
            message: "timeout".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "script listing for 'Lead' failed: timeout");
        assert!(err.script_error().is_none());
    }
}
