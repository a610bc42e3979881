use crate::core::merge::MergeError;
use crate::core::rule::{OptionDescriptor, ValueKind};
use serde_json::{Map, Value};

/// Coerce a raw user value to its declared kind. Lossy conversions are
/// errors, never silent adjustments. Nested objects and lists recurse and
/// report every failure, addressed by a dotted/indexed path.
pub fn coerce(path: &str, kind: &ValueKind, raw: &Value, errors: &mut Vec<MergeError>) -> Option<Value> {
    match kind {
        ValueKind::Text => coerce_text(path, raw, errors),
        ValueKind::Int => coerce_int(path, raw, errors),
        ValueKind::Float => coerce_float(path, raw, errors),
        ValueKind::Boolean => coerce_boolean(path, raw, errors),
        ValueKind::Enumerated(variants) => coerce_enumerated(path, variants, raw, errors),
        ValueKind::Object(children) => coerce_object(path, children, raw, errors),
        ValueKind::List(element) => coerce_list(path, element, raw, errors),
    }
}

fn coercion_error(path: &str, expected: &str, raw: &Value) -> MergeError {
    MergeError::ValueCoercionError {
        option: path.to_string(),
        expected: expected.to_string(),
        value: raw.clone(),
    }
}

fn coerce_text(path: &str, raw: &Value, errors: &mut Vec<MergeError>) -> Option<Value> {
    match raw {
        Value::String(s) => Some(Value::String(s.clone())),
        // Scalar renderings are lossless.
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => {
            errors.push(coercion_error(path, "text", raw));
            None
        }
    }
}

fn coerce_int(path: &str, raw: &Value, errors: &mut Vec<MergeError>) -> Option<Value> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Value::from(i));
            }
            if let Some(f) = n.as_f64() {
                // A fractional value never silently truncates.
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    return Some(Value::from(f as i64));
                }
            }
            errors.push(coercion_error(path, "integer", raw));
            None
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => Some(Value::from(i)),
            Err(_) => {
                errors.push(coercion_error(path, "integer", raw));
                None
            }
        },
        _ => {
            errors.push(coercion_error(path, "integer", raw));
            None
        }
    }
}

fn coerce_float(path: &str, raw: &Value, errors: &mut Vec<MergeError>) -> Option<Value> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.and_then(serde_json::Number::from_f64) {
        Some(n) => Some(Value::Number(n)),
        None => {
            errors.push(coercion_error(path, "float", raw));
            None
        }
    }
}

fn coerce_boolean(path: &str, raw: &Value, errors: &mut Vec<MergeError>) -> Option<Value> {
    match raw {
        Value::Bool(b) => Some(Value::Bool(*b)),
        Value::String(s) if s == "true" => Some(Value::Bool(true)),
        Value::String(s) if s == "false" => Some(Value::Bool(false)),
        _ => {
            errors.push(coercion_error(path, "boolean", raw));
            None
        }
    }
}

fn coerce_enumerated(
    path: &str,
    variants: &[String],
    raw: &Value,
    errors: &mut Vec<MergeError>,
) -> Option<Value> {
    match raw {
        Value::String(s) if variants.iter().any(|v| v == s) => Some(Value::String(s.clone())),
        _ => {
            errors.push(coercion_error(
                path,
                &format!("one of [{}]", variants.join(", ")),
                raw,
            ));
            None
        }
    }
}

fn coerce_object(
    path: &str,
    children: &[OptionDescriptor],
    raw: &Value,
    errors: &mut Vec<MergeError>,
) -> Option<Value> {
    let Value::Object(map) = raw else {
        errors.push(coercion_error(path, "object", raw));
        return None;
    };

    let before = errors.len();
    let mut out = Map::new();
    for child in children {
        let child_path = format!("{}.{}", path, child.name);
        match map.get(&child.name) {
            Some(value) => {
                if let Some(coerced) = coerce(&child_path, &child.kind, value, errors) {
                    out.insert(child.name.clone(), coerced);
                }
            }
            None => {
                if let Some(default) = &child.default {
                    out.insert(child.name.clone(), default.clone());
                } else if child.required {
                    errors.push(MergeError::MissingRequiredOption { option: child_path });
                }
            }
        }
    }
    (errors.len() == before).then_some(Value::Object(out))
}

fn coerce_list(
    path: &str,
    element: &ValueKind,
    raw: &Value,
    errors: &mut Vec<MergeError>,
) -> Option<Value> {
    let Value::Array(items) = raw else {
        errors.push(coercion_error(path, "list", raw));
        return None;
    };

    let before = errors.len();
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_path = format!("{}[{}]", path, index);
        if let Some(coerced) = coerce(&item_path, element, item, errors) {
            out.push(coerced);
        }
    }
    (errors.len() == before).then_some(Value::Array(out))
}
