//! The host-facing runtime: compiles, composes and memoizes controllers.

use std::rc::Rc;

use tracing::debug;

use super::cache::{DocumentKey, RuntimeCache, RuntimeState};
use super::compiler::{CompiledScript, ControllerCompiler};
use super::composer::compose;
use super::config::RuntimeConfig;
use super::dispatcher::DocumentScripts;
use super::document::Document;
use super::error::RuntimeError;
use super::meta::{MetaCache, MetaResolver};
use super::source::ScriptSource;
use crate::runner::plugin::CapabilitySet;

pub struct ScriptRuntime {
    source: Rc<dyn ScriptSource>,
    compiler: ControllerCompiler,
    meta: Rc<MetaCache>,
    config: RuntimeConfig,
    cache: RuntimeCache,
}

impl ScriptRuntime {
    pub fn new(
        source: Rc<dyn ScriptSource>,
        capabilities: CapabilitySet,
        meta: Rc<dyn MetaResolver>,
        config: RuntimeConfig,
    ) -> Self {
        ScriptRuntime {
            source,
            compiler: ControllerCompiler::new(capabilities, &config),
            meta: Rc::new(MetaCache::new(meta)),
            config,
            cache: RuntimeCache::new(),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Compiles and composes the controllers of `document`. Repeated and
    /// concurrent calls for the same (doctype, name) share one result; the
    /// first caller's document is the one bound.
    pub async fn setup_script(&self, document: Document) -> Result<Rc<DocumentScripts>, RuntimeError> {
        let key: DocumentKey = (document.doctype.clone(), document.name.clone());
        let slot = self.cache.document_slot(&key);
        if let Some(scripts) = slot.get() {
            debug!(doctype = %key.0, docname = %key.1, "controller cache hit");
            return Ok(scripts.clone());
        }
        let scripts = slot
            .get_or_try_init(|| async {
                self.cache.set_state(&key, RuntimeState::Compiling);
                let compiled = match self.compiled_scripts(&document.doctype).await {
                    Ok(c) => c,
                    Err(e) => {
                        self.cache.set_state(&key, RuntimeState::Uninitialized);
                        return Err(e);
                    }
                };
                let composition = compose(&compiled, &document, self.meta.clone());
                self.cache.set_state(&key, RuntimeState::Composed);
                let scripts = DocumentScripts::new(document, composition, &self.config.dispatch);
                self.cache.set_state(&key, RuntimeState::DispatchReady);
                Ok(Rc::new(scripts))
            })
            .await?;
        Ok(scripts.clone())
    }

    /// The composed controllers of a document already set up.
    pub fn document(&self, doctype: &str, name: &str) -> Option<Rc<DocumentScripts>> {
        self.cache.document(&(doctype.to_string(), name.to_string()))
    }

    pub fn state(&self, doctype: &str, name: &str) -> RuntimeState {
        self.cache.state(&(doctype.to_string(), name.to_string()))
    }

    /// Forgets every compiled script and composed document.
    pub fn clear_cache(&self) {
        debug!("runtime cache cleared");
        self.cache.clear();
        self.meta.clear();
    }

    /// Forgets the scripts and documents of one doctype; the next setup lists
    /// and compiles its scripts again.
    pub fn reload(&self, doctype: &str) {
        debug!(doctype, "doctype reloaded");
        self.cache.remove_doctype(doctype);
    }

    pub fn evict(&self, doctype: &str, name: &str) {
        debug!(doctype, docname = name, "document evicted");
        self.cache.evict(&(doctype.to_string(), name.to_string()));
    }

    async fn compiled_scripts(&self, doctype: &str) -> Result<Rc<Vec<CompiledScript>>, RuntimeError> {
        let slot = self.cache.scripts_slot(doctype);
        let compiled = slot
            .get_or_try_init(|| async {
                let records = self.source.list_scripts(doctype, &self.config.view).await?;
                debug!(doctype, view = %self.config.view, records = records.len(), "scripts listed");
                Ok::<_, RuntimeError>(Rc::new(self.compiler.compile_records(&records)))
            })
            .await?;
        Ok(compiled.clone())
    }
}
