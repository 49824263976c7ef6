//! Tolerant equivalence between two producers' field values.
//!
//! Absorbs formatting noise (one trailing punctuation character, sequence
//! ordering, `[""]` vs `[]`) while keeping real content differences apart.

use std::cmp::Ordering;

use serde_json::Value;

use crate::config::ArrayPolicy;

/// Scalar equivalence. `v2 == None` means the candidate lacks the field.
pub fn equal_value(v1: &Value, v2: Option<&Value>) -> bool {
    let v2 = v2.unwrap_or(&Value::Null);
    if v1 == v2 {
        return true;
    }
    if v2.is_null() {
        return false;
    }

    match (v1, v2) {
        (Value::String(a), Value::String(b)) => equal_but_trailing_char(a, b),
        _ => false,
    }
}

/// Sequence equivalence under the default (lenient) array policy.
pub fn equal_array(a: &[Value], b: &Value) -> bool {
    equal_array_with(a, b, ArrayPolicy::Lenient)
}

/// Sequence equivalence: order-insensitive, element-wise [`equal_value`].
pub fn equal_array_with(a: &[Value], b: &Value, policy: ArrayPolicy) -> bool {
    let Value::Array(b) = b else {
        return false;
    };

    // An empty field: [""] on one side, [] on the other
    if b.is_empty() && matches!(a, [Value::String(s)] if s.is_empty()) {
        return true;
    }

    if policy == ArrayPolicy::Strict && a.len() != b.len() {
        return false;
    }

    let a_sorted = sorted(a);
    let b_sorted = sorted(b);

    a_sorted
        .iter()
        .enumerate()
        .all(|(i, x)| equal_value(x, b_sorted.get(i).copied()))
}

/// Equal after dropping at most one trailing character from either side.
///
/// Same length: both lose their last character. Different lengths: only the
/// longer one does. Strings of fewer than two characters are never shortened.
fn equal_but_trailing_char(a: &str, b: &str) -> bool {
    match a.chars().count().cmp(&b.chars().count()) {
        Ordering::Equal => strip_last(a) == strip_last(b),
        Ordering::Greater => strip_last(a) == b,
        Ordering::Less => a == strip_last(b),
    }
}

fn strip_last(s: &str) -> &str {
    match s.char_indices().next_back() {
        Some((idx, _)) if idx > 0 => &s[..idx],
        _ => s,
    }
}

fn sorted(values: &[Value]) -> Vec<&Value> {
    let mut out: Vec<&Value> = values.iter().collect();
    out.sort_by(|x, y| compare_values(x, y));
    out
}

/// Total order over JSON values: null < bool < number < string < array < object.
/// Distinct values never compare `Equal`, so sorting a permutation is stable.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (fx, fy) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            fx.partial_cmp(&fy)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.to_string().cmp(&y.to_string()))
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        _ if rank(a) == rank(b) => a.to_string().cmp(&b.to_string()),
        _ => rank(a).cmp(&rank(b)),
    }
}
