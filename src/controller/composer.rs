//! Builds the controller instances of one document from its compiled scripts.

use std::rc::{Rc, Weak};

use tracing::{debug, error, warn};
use uuid::Uuid;

use super::compiler::{CompiledScript, ControllerClass, ScriptScope};
use super::document::{find_row, sanitize_doctype, Document};
use super::instance::{ControllerInstance, ControllerRegistry};
use super::meta::MetaCache;
use super::mirror::MirrorGroup;
use super::proxy::DocumentProxy;
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::{ObjectRef, ScriptObject};
use crate::runner::ds::operations::object::{get_callable_property, get_object_property};
use crate::runner::ds::operations::type_conversion::to_display_string;
use crate::runner::ds::value::ScriptValue;
use crate::runner::eval::{call_function, instantiate_class};
use crate::runner::plugin::types::native_fn;

pub const GET_ROW: &str = "getRow";
pub const GET_META: &str = "getMeta";

/// Controllers of a document in composition order, and the same controllers
/// by class name.
pub struct Composition {
    pub instances: Vec<Rc<ControllerInstance>>,
    pub registry: ControllerRegistry,
    /// Field mirrors of every composed controller.
    pub mirrors: MirrorGroup,
}

/// One controller per class, in script then declaration order. A class named
/// after the doctype is a root controller; every other class is a child-row
/// controller attached to the most recent root and is skipped if none exists.
pub fn compose(scripts: &[CompiledScript], document: &Document, meta: Rc<MetaCache>) -> Composition {
    let root_name = sanitize_doctype(&document.doctype);
    let mut instances = vec![];
    let mut registry = ControllerRegistry::new();
    let mirrors = MirrorGroup::new();
    let mut parent: Option<Rc<ControllerInstance>> = None;

    for script in scripts {
        for class in &script.classes {
            let is_root = class.name == root_name;
            if !is_root && parent.is_none() {
                error!(
                    doctype = %document.doctype,
                    script = %class.script,
                    class = %class.name,
                    "parent class '{}' must be declared before child class, even if empty",
                    root_name
                );
                continue;
            }
            let parent_instance = if is_root { None } else { parent.clone() };
            match instantiate(class, &script.scope, document, parent_instance, &meta, &mirrors) {
                Ok(instance) => {
                    let instance = Rc::new(instance);
                    if is_root {
                        registry.set_root_index(instances.len());
                        parent = Some(instance.clone());
                    }
                    registry.register(instance.clone());
                    instances.push(instance);
                }
                Err(e) => error!(
                    doctype = %document.doctype,
                    script = %class.script,
                    class = %class.name,
                    error = %e,
                    "controller could not be instantiated"
                ),
            }
        }
    }
    debug!(doctype = %document.doctype, docname = %document.name, controllers = instances.len(), "controllers composed");
    Composition {
        instances,
        registry,
        mirrors,
    }
}

fn instantiate(
    class: &ControllerClass,
    scope: &Rc<ScriptScope>,
    document: &Document,
    parent: Option<Rc<ControllerInstance>>,
    meta: &Rc<MetaCache>,
    mirrors: &MirrorGroup,
) -> Result<ControllerInstance, ScriptErrorType> {
    let mut ctx = scope.context();
    let object = match instantiate_class(&mut ctx, &class.class, vec![])? {
        ScriptValue::Object(o) => o,
        other => {
            return Err(ScriptErrorType::TypeError(format!(
                "{} did not construct an object: {}",
                class.name, other
            )))
        }
    };
    let bound = document.object().clone();

    {
        let mut o = object.borrow_mut();
        o.define_hidden(GET_META, get_meta_helper(meta.clone()));
        if !class.class.has_method(GET_ROW) {
            o.define_hidden(GET_ROW, get_row_helper(Rc::downgrade(&object), bound.clone()));
        }
        if let Some(p) = &parent {
            o.define_hidden("parent", p.value());
        }
    }

    // Child controllers share the root document, owned by the parent.
    let owner = parent.as_ref().map(|p| p.object.clone()).unwrap_or_else(|| object.clone());
    let mirror = mirrors.join(&object);
    let mut proxy = DocumentProxy::new(&owner).mirroring(mirrors.clone());
    if let Some(method) = bound_method(&object, GET_ROW)? {
        proxy = proxy.with_method(GET_ROW, method);
    }
    let doc = proxy.wrap(&bound);
    object.borrow_mut().define_hidden("doc", ScriptValue::Object(doc.clone()));

    let instance = ControllerInstance {
        id: Uuid::new_v4(),
        class_name: class.name.clone(),
        script: class.script.clone(),
        object,
        bound,
        doc,
        mirror,
        parent,
        scope: scope.clone(),
    };
    instance.sync_mirror();
    debug!(class = %instance.class_name, controller = %instance.id, child = instance.is_child(), "controller bound");
    Ok(instance)
}

/// `getMeta(doctype)`, resolved once per doctype through the runtime's cache.
fn get_meta_helper(meta: Rc<MetaCache>) -> ScriptValue {
    let func = native_fn(move |_ctx, _this, args| {
        let doctype = args.first().map(to_display_string).unwrap_or_default();
        meta.get(&doctype)
            .map_err(|e| ScriptErrorType::TypeError(e.to_string()))
    });
    ScriptValue::Object(ScriptObject::new_native(GET_META, func))
}

/// `getRow(parentField, idx = this.currentRowIdx)`: a proxy of the matching
/// row owned by this controller, or undefined.
fn get_row_helper(owner: Weak<std::cell::RefCell<ScriptObject>>, doc: ObjectRef) -> ScriptValue {
    let func = native_fn(move |_ctx, _this, args| {
        let owner = match owner.upgrade() {
            Some(o) => o,
            None => return Ok(ScriptValue::Undefined),
        };
        let mut args = args.into_iter();
        let parent_field = args.next().map(|v| to_display_string(&v)).unwrap_or_default();
        let idx = match args.next() {
            Some(v) if !v.is_nullish() => v,
            _ => get_object_property(&owner, "currentRowIdx")?,
        };
        Ok(match find_row(&doc, &parent_field, &idx) {
            Some(row) => ScriptValue::Object(DocumentProxy::new(&owner).wrap(&row)),
            None => ScriptValue::Undefined,
        })
    });
    ScriptValue::Object(ScriptObject::new_native(GET_ROW, func))
}

/// The instance's method `name` bound to the instance, if it has one.
fn bound_method(object: &ObjectRef, name: &str) -> Result<Option<ScriptValue>, ScriptErrorType> {
    let method = get_callable_property(&ScriptValue::Object(object.clone()), name)?;
    if !method.is_callable() {
        return Ok(None);
    }
    let this = Rc::downgrade(object);
    let func = native_fn(move |ctx, _this, args| match this.upgrade() {
        Some(o) => call_function(ctx, &method, ScriptValue::Object(o), args),
        None => {
            warn!("bound method called after its controller was dropped");
            Ok(ScriptValue::Undefined)
        }
    });
    Ok(Some(ScriptValue::Object(ScriptObject::new_native(name, func))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::compiler::ControllerCompiler;
    use crate::controller::config::RuntimeConfig;
    use crate::controller::meta::StaticMetaResolver;
    use crate::controller::source::ScriptRecord;
    use crate::runner::ds::operations::object::get_property;
    use crate::runner::plugin::CapabilitySet;
    use serde_json::json;

    fn compile(scripts: &[&str]) -> Vec<CompiledScript> {
        let compiler = ControllerCompiler::new(CapabilitySet::new(), &RuntimeConfig::default());
        let records: Vec<ScriptRecord> = scripts
            .iter()
            .enumerate()
            .map(|(i, s)| ScriptRecord::new(format!("script {}", i), "Widget", *s))
            .collect();
        compiler.compile_records(&records)
    }

    fn meta() -> Rc<MetaCache> {
        let resolver = StaticMetaResolver::new().with("Widget", json!({ "fields": ["qty"] }));
        Rc::new(MetaCache::new(Rc::new(resolver)))
    }

    fn widget() -> Document {
        Document::from_json(
            "Widget",
            "W-1",
            &json!({ "title": "first", "items": [{ "idx": 1, "parentfield": "items", "doctype": "Widget Items" }] }),
        )
    }

    fn class_names(composition: &Composition) -> Vec<&str> {
        composition
            .instances
            .iter()
            .map(|i| i.class_name.as_str())
            .collect()
    }

    #[test]
    fn test_root_then_children() {
        let scripts = compile(&["class Widget {}\nclass WidgetItems {}", "class WidgetItems {}"]);
        let composition = compose(&scripts, &widget(), meta());
        assert_eq!(class_names(&composition), vec!["Widget", "WidgetItems", "WidgetItems"]);
        assert_eq!(composition.registry.get("WidgetItems").len(), 2);
        assert_eq!(composition.registry.root_index(), Some(0));

        let child = &composition.instances[1];
        assert!(Rc::ptr_eq(child.parent().unwrap(), &composition.instances[0]));
        let parent = get_property(&child.value(), "parent").unwrap();
        assert_eq!(parent, composition.instances[0].value());
    }

    #[test]
    fn test_child_without_root_is_skipped() {
        let scripts = compile(&["class WidgetItems {}", "class Widget {}\nclass WidgetItems {}"]);
        let composition = compose(&scripts, &widget(), meta());
        assert_eq!(class_names(&composition), vec!["Widget", "WidgetItems"]);
    }

    #[test]
    fn test_zero_scripts() {
        let composition = compose(&[], &widget(), meta());
        assert!(composition.instances.is_empty());
        assert!(composition.registry.is_empty());
    }

    #[test]
    fn test_fields_are_mirrored_but_reserved_names_kept() {
        let document = Document::from_json("Widget", "W-2", &json!({ "title": "t", "doc": "shadow", "value": 3 }));
        let composition = compose(&compile(&["class Widget {}"]), &document, meta());
        let instance = &composition.instances[0];
        assert_eq!(instance.get("title").unwrap(), ScriptValue::String("t".to_string()));
        assert_eq!(instance.get("value").unwrap(), ScriptValue::Undefined);
        let doc = instance.get("doc").unwrap();
        assert_eq!(get_property(&doc, "doc").unwrap(), ScriptValue::String("shadow".to_string()));
    }

    #[test]
    fn test_get_meta_is_cached() {
        let composition = compose(&compile(&["class Widget {}"]), &widget(), meta());
        let instance = &composition.instances[0];
        let first = instance.call(GET_META, vec![ScriptValue::String("Widget".to_string())]).unwrap();
        let second = instance.call(GET_META, vec![ScriptValue::String("Widget".to_string())]).unwrap();
        assert_eq!(first, second);
        let missing = instance.call(GET_META, vec![ScriptValue::String("Other".to_string())]);
        assert!(matches!(
            missing,
            Err(ScriptErrorType::TypeError(ref m)) if m == "no metadata for doctype 'Other'"
        ));
    }

    #[test]
    fn test_get_row_defaults_to_cursor() {
        let composition = compose(&compile(&["class Widget {}"]), &widget(), meta());
        let instance = &composition.instances[0];
        instance.set("currentRowIdx", ScriptValue::from_i64(1));
        let row = instance.call(GET_ROW, vec![ScriptValue::String("items".to_string())]).unwrap();
        assert_eq!(get_property(&row, "idx").unwrap(), ScriptValue::from_i64(1));
        let missing = instance
            .call(GET_ROW, vec![ScriptValue::String("items".to_string()), ScriptValue::from_i64(9)])
            .unwrap();
        assert_eq!(missing, ScriptValue::Undefined);
    }

    #[test]
    fn test_class_get_row_is_hoisted_onto_doc() {
        let scripts = compile(&["class Widget { getRow(field, idx) { return field + ':' + idx } }"]);
        let composition = compose(&scripts, &widget(), meta());
        let instance = &composition.instances[0];
        assert!(!instance.object.borrow().has_own(GET_ROW));
        let result = instance
            .call("getRow", vec![ScriptValue::String("items".to_string()), ScriptValue::from_i64(2)])
            .unwrap();
        assert_eq!(result, ScriptValue::String("items:2".to_string()));
        let hoisted = get_property(&instance.doc(), GET_ROW).unwrap();
        assert!(hoisted.is_callable());
    }

    #[test]
    fn test_throwing_constructor_skips_controller() {
        let scripts = compile(&["class Widget { constructor() { throw 'nope' } }"]);
        let composition = compose(&scripts, &widget(), meta());
        assert!(composition.instances.is_empty());
    }
}
