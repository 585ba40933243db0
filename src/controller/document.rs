//! The live document a runtime is bound to, and row helpers.

use crate::runner::ds::object::{ObjectRef, ScriptObject};
use crate::runner::ds::operations::json::{from_json, to_json};
use crate::runner::ds::operations::object::get_object_property;
use crate::runner::ds::operations::test_and_comparison::is_strictly_equal;
use crate::runner::ds::value::ScriptValue;

/// A document and its child rows. Clones share the same underlying object,
/// so a host holding a clone observes every mutation scripts make.
#[derive(Clone)]
pub struct Document {
    pub doctype: String,
    pub name: String,
    doc: ObjectRef,
}

impl Document {
    /// A non-object `value` yields an empty document.
    pub fn from_json(doctype: impl Into<String>, name: impl Into<String>, value: &serde_json::Value) -> Self {
        let doc = match from_json(value) {
            ScriptValue::Object(o) => o,
            _ => ScriptObject::new_ordinary(),
        };
        Document {
            doctype: doctype.into(),
            name: name.into(),
            doc,
        }
    }

    pub fn object(&self) -> &ObjectRef {
        &self.doc
    }

    pub fn to_json(&self) -> serde_json::Value {
        to_json(&ScriptValue::Object(self.doc.clone()))
    }

    /// A top-level field as JSON; `Null` when absent.
    pub fn get(&self, field: &str) -> serde_json::Value {
        get_object_property(&self.doc, field)
            .map(|v| to_json(&v))
            .unwrap_or(serde_json::Value::Null)
    }

    /// The row objects of a child table field.
    pub fn rows(&self, parentfield: &str) -> Vec<ObjectRef> {
        rows_of(&self.doc, parentfield)
    }

    /// Row whose `idx` is `idx`, else the row at that position.
    pub fn row(&self, parentfield: &str, idx: i64) -> Option<ObjectRef> {
        find_row(&self.doc, parentfield, &ScriptValue::from_i64(idx))
    }
}

/// Strips all whitespace: "CRM Deal" names the class `CRMDeal`.
pub fn sanitize_doctype(doctype: &str) -> String {
    doctype.split_whitespace().collect()
}

pub(crate) fn string_field(row: &ObjectRef, key: &str) -> Option<String> {
    match row.borrow().get_own(key) {
        Some(ScriptValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

pub(crate) fn rows_of(doc: &ObjectRef, parentfield: &str) -> Vec<ObjectRef> {
    match get_object_property(doc, parentfield) {
        Ok(ScriptValue::Object(o)) => {
            let rows = o
                .borrow()
                .as_array()
                .map(|items| items.iter().filter_map(|v| v.as_object().cloned()).collect())
                .unwrap_or_default();
            rows
        }
        _ => vec![],
    }
}

pub(crate) fn find_row(doc: &ObjectRef, parentfield: &str, idx: &ScriptValue) -> Option<ObjectRef> {
    let rows = rows_of(doc, parentfield);
    let by_idx = rows.iter().find(|row| {
        row.borrow()
            .get_own("idx")
            .map_or(false, |v| is_strictly_equal(v, idx))
    });
    if let Some(row) = by_idx {
        return Some(row.clone());
    }
    match idx {
        ScriptValue::Number(n) => {
            let f = n.as_f64();
            if f >= 0.0 && f.fract() == 0.0 {
                rows.get(f as usize).cloned()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// The row's `idx`, else its position in its parent collection.
pub(crate) fn row_cursor(doc: &ObjectRef, row: &ObjectRef) -> ScriptValue {
    if let Some(idx) = row.borrow().get_own("idx") {
        if !matches!(idx, ScriptValue::Undefined) {
            return idx.clone();
        }
    }
    string_field(row, "parentfield")
        .and_then(|field| {
            rows_of(doc, &field)
                .iter()
                .position(|r| std::rc::Rc::ptr_eq(r, row))
        })
        .map(|i| ScriptValue::from_i64(i as i64))
        .unwrap_or(ScriptValue::Undefined)
}
