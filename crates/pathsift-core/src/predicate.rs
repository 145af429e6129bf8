//! Predicate algebra over [`Value`]s.
//!
//! A predicate is an immutable tree. Leaves compare the candidate against
//! operand values; `And`, `Or`, and `Not` nodes combine sub-predicates in
//! exactly the shape the caller built (there is no precedence to resolve).
//!
//! Ordering leaves (`gt`, `between`, ...) report `false` when the candidate
//! and operand are not mutually orderable. Equality leaves (`eq`, `within`,
//! ...) are total: values of different kinds are simply unequal.

use crate::error::{PredicateError, RangeFault};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Not;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Predicate {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// `lo <= v < hi`
    Between(Value, Value),
    /// `lo < v < hi`
    Inside(Value, Value),
    /// `v < lo || v > hi`
    Outside(Value, Value),
    Within(Vec<Value>),
    Without(Vec<Value>),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(value: impl Into<Value>) -> Self {
        Predicate::Eq(value.into())
    }

    pub fn neq(value: impl Into<Value>) -> Self {
        Predicate::Neq(value.into())
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Predicate::Gt(value.into())
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Predicate::Gte(value.into())
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Predicate::Lt(value.into())
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Predicate::Lte(value.into())
    }

    pub fn between(lo: impl Into<Value>, hi: impl Into<Value>) -> Result<Self, PredicateError> {
        let (lo, hi) = checked_range("between", lo.into(), hi.into())?;
        Ok(Predicate::Between(lo, hi))
    }

    pub fn inside(lo: impl Into<Value>, hi: impl Into<Value>) -> Result<Self, PredicateError> {
        let (lo, hi) = checked_range("inside", lo.into(), hi.into())?;
        Ok(Predicate::Inside(lo, hi))
    }

    pub fn outside(lo: impl Into<Value>, hi: impl Into<Value>) -> Result<Self, PredicateError> {
        let (lo, hi) = checked_range("outside", lo.into(), hi.into())?;
        Ok(Predicate::Outside(lo, hi))
    }

    pub fn within<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::Within(values.into_iter().map(Into::into).collect())
    }

    pub fn without<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::Without(values.into_iter().map(Into::into).collect())
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Evaluate against one candidate value.
    pub fn test(&self, v: &Value) -> bool {
        self.test_keyed(v, v)
    }

    /// Evaluate with separate candidate keys: `eq_key` feeds the equality
    /// and membership leaves, `ord_key` the ordering and range leaves.
    ///
    /// Id filters use this when an id's comparable form for equality is not
    /// ordered like the id itself (see `IdCanonicalizer::ordering_key`).
    pub fn test_keyed(&self, eq_key: &Value, ord_key: &Value) -> bool {
        let v = ord_key;
        match self {
            Predicate::Eq(x) => eq_key == x,
            Predicate::Neq(x) => eq_key != x,
            Predicate::Gt(x) => v.compare(x) == Some(Ordering::Greater),
            Predicate::Gte(x) => matches!(v.compare(x), Some(Ordering::Greater | Ordering::Equal)),
            Predicate::Lt(x) => v.compare(x) == Some(Ordering::Less),
            Predicate::Lte(x) => matches!(v.compare(x), Some(Ordering::Less | Ordering::Equal)),
            Predicate::Between(lo, hi) => {
                matches!(v.compare(lo), Some(Ordering::Greater | Ordering::Equal))
                    && v.compare(hi) == Some(Ordering::Less)
            }
            Predicate::Inside(lo, hi) => {
                v.compare(lo) == Some(Ordering::Greater) && v.compare(hi) == Some(Ordering::Less)
            }
            Predicate::Outside(lo, hi) => {
                v.compare(lo) == Some(Ordering::Less) || v.compare(hi) == Some(Ordering::Greater)
            }
            Predicate::Within(set) => set.iter().any(|x| eq_key == x),
            Predicate::Without(set) => !set.iter().any(|x| eq_key == x),
            Predicate::And(l, r) => l.test_keyed(eq_key, ord_key) && r.test_keyed(eq_key, ord_key),
            Predicate::Or(l, r) => l.test_keyed(eq_key, ord_key) || r.test_keyed(eq_key, ord_key),
            Predicate::Not(p) => !p.test_keyed(eq_key, ord_key),
        }
    }

    /// Rebuild the tree with every operand passed through `f`.
    ///
    /// Range bounds are not re-validated, so `f` must preserve order.
    pub fn map_operands(&self, f: &dyn Fn(&Value) -> Value) -> Predicate {
        self.map_operands_keyed(f, f)
    }

    /// Like [`Predicate::map_operands`], with `eq` applied to equality and
    /// membership operands and `ord` to ordering and range operands. The
    /// result is meant for [`Predicate::test_keyed`].
    pub fn map_operands_keyed(
        &self,
        eq: &dyn Fn(&Value) -> Value,
        ord: &dyn Fn(&Value) -> Value,
    ) -> Predicate {
        match self {
            Predicate::Eq(x) => Predicate::Eq(eq(x)),
            Predicate::Neq(x) => Predicate::Neq(eq(x)),
            Predicate::Gt(x) => Predicate::Gt(ord(x)),
            Predicate::Gte(x) => Predicate::Gte(ord(x)),
            Predicate::Lt(x) => Predicate::Lt(ord(x)),
            Predicate::Lte(x) => Predicate::Lte(ord(x)),
            Predicate::Between(lo, hi) => Predicate::Between(ord(lo), ord(hi)),
            Predicate::Inside(lo, hi) => Predicate::Inside(ord(lo), ord(hi)),
            Predicate::Outside(lo, hi) => Predicate::Outside(ord(lo), ord(hi)),
            Predicate::Within(set) => Predicate::Within(set.iter().map(eq).collect()),
            Predicate::Without(set) => Predicate::Without(set.iter().map(eq).collect()),
            Predicate::And(l, r) => {
                l.map_operands_keyed(eq, ord).and(r.map_operands_keyed(eq, ord))
            }
            Predicate::Or(l, r) => {
                l.map_operands_keyed(eq, ord).or(r.map_operands_keyed(eq, ord))
            }
            Predicate::Not(p) => p.map_operands_keyed(eq, ord).negate(),
        }
    }

    /// The accepted values when this predicate is a plain membership test
    /// (`eq(x)` or `within(xs)`).
    pub fn as_value_set(&self) -> Option<&[Value]> {
        match self {
            Predicate::Eq(x) => Some(std::slice::from_ref(x)),
            Predicate::Within(set) => Some(set),
            _ => None,
        }
    }

    /// Canonical text: the functional form with canonical value keys and
    /// membership sets sorted and deduplicated.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        let leaf = |out: &mut String, name: &str, x: &Value| {
            out.push_str(name);
            out.push('(');
            out.push_str(&x.canonical_key());
            out.push(')');
        };
        let range = |out: &mut String, name: &str, lo: &Value, hi: &Value| {
            out.push_str(name);
            out.push('(');
            out.push_str(&lo.canonical_key());
            out.push(',');
            out.push_str(&hi.canonical_key());
            out.push(')');
        };
        let set = |out: &mut String, name: &str, xs: &[Value]| {
            let keys: BTreeSet<String> = xs.iter().map(Value::canonical_key).collect();
            out.push_str(name);
            out.push('[');
            out.push_str(&keys.into_iter().collect::<Vec<_>>().join(","));
            out.push(']');
        };

        match self {
            Predicate::Eq(x) => leaf(out, "eq", x),
            Predicate::Neq(x) => leaf(out, "neq", x),
            Predicate::Gt(x) => leaf(out, "gt", x),
            Predicate::Gte(x) => leaf(out, "gte", x),
            Predicate::Lt(x) => leaf(out, "lt", x),
            Predicate::Lte(x) => leaf(out, "lte", x),
            Predicate::Between(lo, hi) => range(out, "between", lo, hi),
            Predicate::Inside(lo, hi) => range(out, "inside", lo, hi),
            Predicate::Outside(lo, hi) => range(out, "outside", lo, hi),
            Predicate::Within(xs) => set(out, "within", xs),
            Predicate::Without(xs) => set(out, "without", xs),
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                out.push_str(if matches!(self, Predicate::And(..)) {
                    "and("
                } else {
                    "or("
                });
                l.write_canonical(out);
                out.push(',');
                r.write_canonical(out);
                out.push(')');
            }
            Predicate::Not(p) => {
                out.push_str("not(");
                p.write_canonical(out);
                out.push(')');
            }
        }
    }
}

fn checked_range(op: &'static str, lo: Value, hi: Value) -> Result<(Value, Value), PredicateError> {
    let fault = match lo.compare(&hi) {
        Some(Ordering::Less | Ordering::Equal) => return Ok((lo, hi)),
        Some(Ordering::Greater) => RangeFault::Inverted,
        None => RangeFault::Unorderable,
    };
    Err(PredicateError::InvalidRange { op, lo, hi, fault })
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(values: &[Value]) -> String {
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }

        match self {
            Predicate::Eq(x) => write!(f, "eq({x})"),
            Predicate::Neq(x) => write!(f, "neq({x})"),
            Predicate::Gt(x) => write!(f, "gt({x})"),
            Predicate::Gte(x) => write!(f, "gte({x})"),
            Predicate::Lt(x) => write!(f, "lt({x})"),
            Predicate::Lte(x) => write!(f, "lte({x})"),
            Predicate::Between(lo, hi) => write!(f, "between({lo}, {hi})"),
            Predicate::Inside(lo, hi) => write!(f, "inside({lo}, {hi})"),
            Predicate::Outside(lo, hi) => write!(f, "outside({lo}, {hi})"),
            Predicate::Within(xs) => write!(f, "within([{}])", list(xs)),
            Predicate::Without(xs) => write!(f, "without([{}])", list(xs)),
            Predicate::And(l, r) => write!(f, "and({l}, {r})"),
            Predicate::Or(l, r) => write!(f, "or({l}, {r})"),
            Predicate::Not(p) => write!(f, "not({p})"),
        }
    }
}
