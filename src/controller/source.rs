//! Script records and the host seam that lists them.

use std::cell::RefCell;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::SourceError;

/// One named unit of form-script source for a (doctype, view).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptRecord {
    pub name: String,
    pub dt: String,
    pub view: String,
    pub script: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ScriptRecord {
    pub fn new(name: impl Into<String>, dt: impl Into<String>, script: impl Into<String>) -> Self {
        ScriptRecord {
            name: name.into(),
            dt: dt.into(),
            view: super::config::DEFAULT_VIEW.to_string(),
            script: script.into(),
            enabled: true,
        }
    }

    pub fn in_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Lists the script records of a doctype for a view, in the host's order.
#[async_trait(?Send)]
pub trait ScriptSource {
    async fn list_scripts(&self, doctype: &str, view: &str) -> Result<Vec<ScriptRecord>, SourceError>;
}

/// In-process record store.
#[derive(Default)]
pub struct MemoryScriptSource {
    records: RefCell<Vec<ScriptRecord>>,
    calls: RefCell<usize>,
}

impl MemoryScriptSource {
    pub fn new(records: Vec<ScriptRecord>) -> Self {
        MemoryScriptSource {
            records: RefCell::new(records),
            calls: RefCell::new(0),
        }
    }

    /// Records as returned by the listing call, as a JSON array.
    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        let records: Vec<ScriptRecord> = serde_json::from_str(text)?;
        Ok(Self::new(records))
    }

    pub fn push(&self, record: ScriptRecord) {
        self.records.borrow_mut().push(record);
    }

    /// How many times `list_scripts` was called.
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

#[async_trait(?Send)]
impl ScriptSource for MemoryScriptSource {
    async fn list_scripts(&self, doctype: &str, view: &str) -> Result<Vec<ScriptRecord>, SourceError> {
        *self.calls.borrow_mut() += 1;
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|r| r.dt == doctype && r.view == view)
            .cloned()
            .collect())
    }
}
