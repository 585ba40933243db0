//! Lifecycle dispatch over the controllers of one document.
//!
//! Every trigger resolves the controllers for its scope and calls the
//! matching handler on each, one at a time, in composition order. Only
//! `trigger_on_change` reports a handler failure to the caller; it also
//! undoes the optimistic field write. Other triggers log and move on.

use std::rc::Rc;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::composer::Composition;
use super::config::DispatchConfig;
use super::document::{row_cursor, sanitize_doctype, string_field, Document};
use super::error::RuntimeError;
use super::instance::{ControllerInstance, ControllerRegistry};
use super::mirror::MirrorGroup;
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::{ObjectRef, ScriptObject};
use crate::runner::ds::operations::json::from_json;
use crate::runner::ds::operations::object::{get_callable_property, get_object_property, set_object_property};
use crate::runner::ds::value::ScriptValue;
use crate::runner::eval::call_function;

pub const ON_LOAD: [&str; 3] = ["onLoad", "on_load", "onload"];
pub const ON_BEFORE_CREATE: [&str; 2] = ["onBeforeCreate", "on_before_create"];
pub const ON_SAVE: [&str; 2] = ["onSave", "on_save"];
pub const ON_REFRESH: [&str; 1] = ["refresh"];
pub const ON_CREATE_LEAD: [&str; 2] = ["onCreateLead", "on_create_lead"];
pub const CONVERT_TO_DEAL: [&str; 2] = ["convertToDeal", "convert_to_deal"];

/// What a non-transactional trigger did.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DispatchOutcome {
    /// Handlers that ran, including failed ones.
    pub invoked: usize,
    pub failed: usize,
}

/// The composed controllers of one document and its trigger entry points.
pub struct DocumentScripts {
    document: Document,
    instances: Vec<Rc<ControllerInstance>>,
    registry: ControllerRegistry,
    mirrors: MirrorGroup,
    yield_between_handlers: bool,
    /// Held for the length of a dispatch chain.
    chain: Mutex<()>,
}

impl DocumentScripts {
    pub fn new(document: Document, composition: Composition, config: &DispatchConfig) -> Self {
        DocumentScripts {
            document,
            instances: composition.instances,
            registry: composition.registry,
            mirrors: composition.mirrors,
            yield_between_handlers: config.yield_between_handlers,
            chain: Mutex::new(()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All controllers in composition order.
    pub fn controllers(&self) -> &[Rc<ControllerInstance>] {
        &self.instances
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Controllers for the root document, or for `row`'s doctype.
    pub fn get_controllers(&self, row: Option<&ObjectRef>) -> Vec<Rc<ControllerInstance>> {
        let doctype = row
            .and_then(|r| string_field(r, "doctype"))
            .unwrap_or_else(|| self.document.doctype.clone());
        self.registry.get(&sanitize_doctype(&doctype)).to_vec()
    }

    /// The root controller's `doc` proxy, or the raw document when the
    /// doctype has no root controller.
    pub fn doc(&self) -> ScriptValue {
        match self.get_controllers(None).first() {
            Some(c) => c.doc(),
            None => ScriptValue::Object(self.document.object().clone()),
        }
    }

    /// `row` through the proxy of its first controller, or raw.
    pub fn row(&self, row: &ObjectRef) -> ScriptValue {
        let owner = self
            .get_controllers(Some(row))
            .first()
            .cloned()
            .or_else(|| self.get_controllers(None).first().cloned());
        match owner {
            Some(c) => ScriptValue::Object(super::proxy::DocumentProxy::new(&c.object).wrap(row)),
            None => ScriptValue::Object(row.clone()),
        }
    }

    /// Calls `target[method](...args)`, e.g. `doc.trigger` on a proxy.
    pub fn call_method(
        &self,
        target: &ScriptValue,
        method: &str,
        args: Vec<ScriptValue>,
    ) -> Result<ScriptValue, ScriptErrorType> {
        let func = get_callable_property(target, method)?;
        let mut ctx = match self.instances.first() {
            Some(c) => c.scope.context(),
            None => {
                return Err(ScriptErrorType::TypeError(format!(
                    "{} has no controllers",
                    self.document.doctype
                )))
            }
        };
        call_function(&mut ctx, &func, target.clone(), args)
    }

    pub async fn trigger_on_load(&self) -> DispatchOutcome {
        self.dispatch("on-load", None, |_| Some(vec![]), &ON_LOAD).await
    }

    pub async fn trigger_on_before_create(&self, args: Vec<serde_json::Value>) -> DispatchOutcome {
        let args: Vec<ScriptValue> = args.iter().map(from_json).collect();
        self.dispatch("on-before-create", None, |_| Some(args.clone()), &ON_BEFORE_CREATE)
            .await
    }

    pub async fn trigger_on_save(&self) -> DispatchOutcome {
        self.dispatch("on-save", None, |_| Some(vec![]), &ON_SAVE).await
    }

    pub async fn trigger_on_refresh(&self) -> DispatchOutcome {
        self.dispatch("on-refresh", None, |_| Some(vec![]), &ON_REFRESH).await
    }

    pub async fn trigger_on_create_lead(&self, args: Vec<serde_json::Value>) -> DispatchOutcome {
        let args: Vec<ScriptValue> = args.iter().map(from_json).collect();
        self.dispatch("on-create-lead", None, |_| Some(args.clone()), &ON_CREATE_LEAD)
            .await
    }

    pub async fn trigger_convert_to_deal(&self, args: Vec<serde_json::Value>) -> DispatchOutcome {
        let args: Vec<ScriptValue> = args.iter().map(from_json).collect();
        self.dispatch("convert-to-deal", None, |_| Some(args.clone()), &CONVERT_TO_DEAL)
            .await
    }

    /// Calls `{parentfield}_add` with `currentRowIdx` and `value` set to the row.
    pub async fn trigger_on_row_add(&self, row: &ObjectRef) -> DispatchOutcome {
        let parentfield = match string_field(row, "parentfield") {
            Some(f) => f,
            None => {
                warn!(doctype = %self.document.doctype, "row without parentfield, on-row-add skipped");
                return DispatchOutcome::default();
            }
        };
        let handler = format!("{}_add", parentfield);
        let cursor = row_cursor(self.document.object(), row);
        let value = ScriptValue::Object(row.clone());
        self.dispatch(
            "on-row-add",
            Some(row),
            |c| {
                c.set("currentRowIdx", cursor.clone());
                c.set("value", value.clone());
                Some(vec![])
            },
            &[handler.as_str()],
        )
        .await
    }

    /// Calls `{parentfield}_remove` for the first row's table. Rows are
    /// selected by `name`: one selection sets `currentRowIdx` to that name and
    /// `value` to the row, several set arrays of both.
    pub async fn trigger_on_row_remove(&self, selected: &[String], rows: &[ObjectRef]) -> DispatchOutcome {
        let first = match rows.first() {
            Some(r) => r,
            None => {
                debug!(doctype = %self.document.doctype, "on-row-remove with no rows");
                return DispatchOutcome::default();
            }
        };
        let parentfield = match string_field(first, "parentfield") {
            Some(f) => f,
            None => {
                warn!(doctype = %self.document.doctype, "row without parentfield, on-row-remove skipped");
                return DispatchOutcome::default();
            }
        };
        let handler = format!("{}_remove", parentfield);
        let named = |name: &str| {
            rows.iter()
                .find(|r| string_field(r, "name").as_deref() == Some(name))
                .cloned()
        };
        let (cursor, value) = if selected.len() == 1 {
            let value = named(&selected[0])
                .map(ScriptValue::Object)
                .unwrap_or(ScriptValue::Undefined);
            (ScriptValue::String(selected[0].clone()), value)
        } else {
            let names = selected.iter().map(|s| ScriptValue::String(s.clone())).collect();
            let matched = selected
                .iter()
                .filter_map(|s| named(s))
                .map(ScriptValue::Object)
                .collect();
            (
                ScriptValue::Object(ScriptObject::new_array(names)),
                ScriptValue::Object(ScriptObject::new_array(matched)),
            )
        };
        self.dispatch(
            "on-row-remove",
            Some(first),
            |c| {
                c.set("currentRowIdx", cursor.clone());
                c.set("value", value.clone());
                Some(vec![])
            },
            &[handler.as_str()],
        )
        .await
    }

    /// Writes `value` into `field` of `row` (or the document), then calls the
    /// handler named `field` on each controller with `value`, `oldValue` and,
    /// for rows, `currentRowIdx` set. The first failing handler restores the
    /// field and stops the chain.
    pub async fn trigger_on_change(
        &self,
        field: &str,
        value: serde_json::Value,
        row: Option<&ObjectRef>,
    ) -> Result<(), RuntimeError> {
        let _chain = self.chain.lock().await;
        let target = row.cloned().unwrap_or_else(|| self.document.object().clone());
        let value = from_json(&value);
        let had_field = target.borrow().has_own(field);
        let old_value = get_object_property(&target, field).unwrap_or(ScriptValue::Undefined);
        set_object_property(&target, field, value.clone()).map_err(|cause| RuntimeError::Handler {
            class: self.document.doctype.clone(),
            handler: field.to_string(),
            cause,
        })?;
        let cursor = row.map(|r| row_cursor(self.document.object(), r));

        let controllers = self.get_controllers(row);
        for (i, c) in controllers.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            c.sync_mirror();
            c.set("value", value.clone());
            c.set("oldValue", old_value.clone());
            if let Some(cursor) = &cursor {
                c.set("currentRowIdx", cursor.clone());
            }
            if !c.has_method(field) {
                continue;
            }
            if let Err(cause) = c.call(field, vec![]) {
                rollback(&target, field, had_field, old_value);
                self.mirrors.sync_all(self.document.object());
                error!(
                    doctype = %self.document.doctype,
                    docname = %self.document.name,
                    class = %c.class_name,
                    controller = %c.id,
                    handler = field,
                    error = %cause,
                    "field change rejected, value rolled back"
                );
                return Err(RuntimeError::Handler {
                    class: c.class_name.clone(),
                    handler: field.to_string(),
                    cause,
                });
            }
        }
        Ok(())
    }

    /// Runs the first defined of `names` on each controller in scope.
    /// `prepare` sets per-controller context and returns the call arguments,
    /// or `None` to skip the controller.
    async fn dispatch<F>(
        &self,
        event: &str,
        row: Option<&ObjectRef>,
        mut prepare: F,
        names: &[&str],
    ) -> DispatchOutcome
    where
        F: FnMut(&ControllerInstance) -> Option<Vec<ScriptValue>>,
    {
        let _chain = self.chain.lock().await;
        let mut outcome = DispatchOutcome::default();
        let controllers = self.get_controllers(row);
        debug!(doctype = %self.document.doctype, docname = %self.document.name, event, controllers = controllers.len(), "dispatch");
        for (i, c) in controllers.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            c.sync_mirror();
            let handler = match c.find_handler(names) {
                Some(h) => h,
                None => continue,
            };
            let args = match prepare(c) {
                Some(args) => args,
                None => continue,
            };
            outcome.invoked += 1;
            if let Err(e) = c.call(handler, args) {
                outcome.failed += 1;
                error!(
                    doctype = %self.document.doctype,
                    docname = %self.document.name,
                    class = %c.class_name,
                    controller = %c.id,
                    handler,
                    error = %e,
                    "{} handler failed",
                    event
                );
            }
        }
        outcome
    }

    async fn pause(&self) {
        if self.yield_between_handlers {
            tokio::task::yield_now().await;
        }
    }
}

fn rollback(target: &ObjectRef, field: &str, had_field: bool, old_value: ScriptValue) {
    if had_field {
        let _ = set_object_property(target, field, old_value);
    } else {
        target.borrow_mut().remove_own(field);
    }
}
