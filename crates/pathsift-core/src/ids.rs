//! Identifier canonicalization strategies.
//!
//! The same element id can reach a filter in several encodings (a native
//! integer, its decimal text, ...). Which encodings are interchangeable is a
//! property of the backing store, so the rule is a strategy the store (or the
//! engine configuration) supplies rather than something the filter hard-codes.

use crate::value::Value;
use std::fmt;

pub trait IdCanonicalizer: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Map an id in any accepted encoding to the one comparable form.
    fn canonicalize(&self, id: &Value) -> Value;

    /// Key used by ordering and range tests on ids (`gt`, `between`, ...).
    ///
    /// Must preserve the order of the ids it accepts, so that a range that
    /// validated on the operands as given stays a valid range.
    fn ordering_key(&self, id: &Value) -> Value {
        self.canonicalize(id)
    }
}

/// Ids are compared exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeIds;

impl IdCanonicalizer for NativeIds {
    fn name(&self) -> &'static str {
        "native"
    }

    fn canonicalize(&self, id: &Value) -> Value {
        id.clone()
    }
}

/// Integer ids: decimal text and integral floats collapse to `Value::Int`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericIds;

impl IdCanonicalizer for NumericIds {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn canonicalize(&self, id: &Value) -> Value {
        match id {
            Value::Str(s) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Int(i),
                Err(_) => id.clone(),
            },
            Value::Float(_) => id.as_i64().map(Value::Int).unwrap_or_else(|| id.clone()),
            _ => id.clone(),
        }
    }
}

/// Every id is compared for equality by its textual rendering.
///
/// Text is not ordered like the numbers it spells (`"11" < "7"`), so ids
/// that read as integers are ordered numerically.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextualIds;

impl IdCanonicalizer for TextualIds {
    fn name(&self) -> &'static str {
        "textual"
    }

    fn canonicalize(&self, id: &Value) -> Value {
        match id {
            Value::Str(_) => id.clone(),
            other => Value::Str(other.to_string()),
        }
    }

    fn ordering_key(&self, id: &Value) -> Value {
        NumericIds.canonicalize(id)
    }
}
