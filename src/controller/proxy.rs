//! Document proxies: transparent wrappers over a document or row that expose
//! the `trigger` bridge to the owning controller.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use tracing::{trace, warn};

use super::mirror::MirrorGroup;

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::{ObjectRef, ProxyHandler, ScriptObject};
use crate::runner::ds::operations::object::{get_callable_property, get_object_property, set_object_property};
use crate::runner::ds::operations::type_conversion::to_display_string;
use crate::runner::ds::value::ScriptValue;
use crate::runner::eval::call_function;
use crate::runner::plugin::types::native_fn;

pub const TRIGGER: &str = "trigger";

/// Instance properties the runtime manages. Document fields never overwrite
/// them when mirrored onto a controller.
pub const RESERVED_NAMES: [&str; 8] = [
    "doc",
    "value",
    "oldValue",
    "currentRowIdx",
    "getMeta",
    "getRow",
    "parent",
    TRIGGER,
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Proxy handler for one document or row, owned by one controller instance.
///
/// Reads pass through except `trigger` and hoisted methods. Writes always go
/// to the target; when the target is a mirrored document, every controller
/// bound to it gets the new field value as well.
pub struct DocumentProxy {
    owner: Weak<RefCell<ScriptObject>>,
    mirrors: Option<MirrorGroup>,
    bridge: ScriptValue,
    hoisted: RefCell<IndexMap<String, ScriptValue>>,
}

impl DocumentProxy {
    pub fn new(owner: &ObjectRef) -> Self {
        DocumentProxy {
            owner: Rc::downgrade(owner),
            mirrors: None,
            bridge: trigger_bridge(Rc::downgrade(owner)),
            hoisted: RefCell::new(IndexMap::new()),
        }
    }

    /// Forwards writes to the mirrors of `group`.
    pub fn mirroring(mut self, group: MirrorGroup) -> Self {
        self.mirrors = Some(group);
        self
    }

    /// Adds a non-enumerable method to the proxy only. The target is untouched.
    pub fn with_method(self, name: impl Into<String>, method: ScriptValue) -> Self {
        self.hoisted.borrow_mut().insert(name.into(), method);
        self
    }

    pub fn wrap(self, target: &ObjectRef) -> ObjectRef {
        if target.borrow().has_own(TRIGGER) {
            warn!("document field 'trigger' is shadowed by the trigger bridge");
        }
        ScriptObject::new_proxy(target.clone(), Rc::new(self))
    }
}

impl ProxyHandler for DocumentProxy {
    fn get(&self, target: &ObjectRef, key: &str) -> Result<ScriptValue, ScriptErrorType> {
        if key == TRIGGER {
            return Ok(self.bridge.clone());
        }
        if let Some(method) = self.hoisted.borrow().get(key) {
            return Ok(method.clone());
        }
        get_object_property(target, key)
    }

    fn set(&self, target: &ObjectRef, key: &str, value: ScriptValue) -> Result<(), ScriptErrorType> {
        set_object_property(target, key, value.clone())?;
        if let Some(mirrors) = &self.mirrors {
            mirrors.write(key, value);
        }
        Ok(())
    }
}

/// `(methodName, ...args) => owner[methodName](...args)`.
fn trigger_bridge(owner: Weak<RefCell<ScriptObject>>) -> ScriptValue {
    let bridge = native_fn(move |ctx, _this, args| {
        let mut args = args.into_iter();
        let method = args
            .next()
            .map(|v| to_display_string(&v))
            .unwrap_or_default();
        let owner = match owner.upgrade() {
            Some(o) => ScriptValue::Object(o),
            None => {
                warn!(method = %method, "trigger called after its controller was dropped");
                return Ok(ScriptValue::Undefined);
            }
        };
        let func = get_callable_property(&owner, &method)?;
        if !func.is_callable() {
            warn!(method = %method, "trigger: controller has no such method");
            return Ok(ScriptValue::Undefined);
        }
        trace!(method = %method, "trigger bridge call");
        call_function(ctx, &func, owner, args.collect())
    });
    ScriptValue::Object(ScriptObject::new_native(TRIGGER, bridge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::operations::object::{get_property, own_enumerable_keys, set_property};
    use crate::runner::plugin::types::EvalContext;
    use crate::runner::plugin::SuperGlobalEnvironment;

    fn ctx() -> EvalContext {
        EvalContext::new(Rc::new(SuperGlobalEnvironment::new()))
    }

    fn object(entries: &[(&str, ScriptValue)]) -> ObjectRef {
        let o = ScriptObject::new_ordinary();
        for (k, v) in entries {
            o.borrow_mut().set_own(k, v.clone());
        }
        o
    }

    fn s(v: &str) -> ScriptValue {
        ScriptValue::String(v.to_string())
    }

    #[test]
    fn test_reads_and_writes_pass_through() {
        let target = object(&[("status", s("Open"))]);
        let owner = ScriptObject::new_ordinary();
        let proxy = ScriptValue::Object(DocumentProxy::new(&owner).wrap(&target));

        assert_eq!(get_property(&proxy, "status").unwrap(), s("Open"));
        set_property(&proxy, "status", s("Won")).unwrap();
        assert_eq!(get_property(&proxy, "status").unwrap(), s("Won"));
        assert_eq!(target.borrow().get_own("status"), Some(&s("Won")));
        assert_eq!(get_property(&proxy, "missing").unwrap(), ScriptValue::Undefined);
    }

    #[test]
    fn test_mirror_follows_writes() {
        let target = object(&[]);
        let owner = object(&[("value", ScriptValue::from_i64(1))]);
        let sibling = object(&[]);
        let group = MirrorGroup::new();
        group.join(&owner);
        group.join(&sibling);
        let proxy = ScriptValue::Object(DocumentProxy::new(&owner).mirroring(group).wrap(&target));

        set_property(&proxy, "amount", ScriptValue::from_i64(10)).unwrap();
        set_property(&proxy, "value", ScriptValue::from_i64(99)).unwrap();
        let o = owner.borrow();
        assert_eq!(o.get_own("amount"), Some(&ScriptValue::from_i64(10)));
        assert_eq!(o.get_own("value"), Some(&ScriptValue::from_i64(1)));
        assert_eq!(sibling.borrow().get_own("amount"), Some(&ScriptValue::from_i64(10)));
    }

    #[test]
    fn test_trigger_calls_owner_method() {
        let owner = ScriptObject::new_ordinary();
        let double = native_fn(|_, _, args| match args.first() {
            Some(ScriptValue::Number(n)) => Ok(ScriptValue::from_f64(n.as_f64() * 2.0)),
            _ => Ok(ScriptValue::Undefined),
        });
        owner
            .borrow_mut()
            .set_own("double", ScriptValue::Object(ScriptObject::new_native("double", double)));
        let target = object(&[("trigger", s("field value"))]);
        let proxy = ScriptValue::Object(DocumentProxy::new(&owner).wrap(&target));

        let trigger = get_property(&proxy, TRIGGER).unwrap();
        assert!(trigger.is_callable());
        let result = call_function(
            &mut ctx(),
            &trigger,
            proxy.clone(),
            vec![s("double"), ScriptValue::from_i64(21)],
        )
        .unwrap();
        assert_eq!(result, ScriptValue::from_i64(42));

        let missing = call_function(&mut ctx(), &trigger, proxy, vec![s("nope")]).unwrap();
        assert_eq!(missing, ScriptValue::Undefined);
    }

    #[test]
    fn test_hoisted_method_is_not_enumerable() {
        let target = object(&[("a", ScriptValue::from_i64(1))]);
        let owner = ScriptObject::new_ordinary();
        let get_row = ScriptValue::Object(ScriptObject::new_native(
            "getRow",
            native_fn(|_, _, _| Ok(ScriptValue::Null)),
        ));
        let proxy = DocumentProxy::new(&owner)
            .with_method("getRow", get_row)
            .wrap(&target);

        assert!(get_property(&ScriptValue::Object(proxy.clone()), "getRow")
            .unwrap()
            .is_callable());
        assert_eq!(own_enumerable_keys(&proxy), vec!["a".to_string()]);
        assert!(!target.borrow().has_own("getRow"));
    }
}
