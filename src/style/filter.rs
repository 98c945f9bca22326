use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::StyleError;
use crate::scene::Properties;

/// Filter expression as found in style documents, e.g. `["==", "id", 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub Value);

impl From<Value> for Filter {
    fn from(value: Value) -> Self {
        Filter(value)
    }
}

/// Decides whether a feature's attributes satisfy a filter.
///
/// Hosts can plug their own expression language in; errors are treated by the
/// rule evaluator as "does not match".
pub trait FilterEvaluator: Send + Sync {
    fn matches(&self, filter: &Filter, properties: &Properties) -> Result<bool, StyleError>;
}

/// Evaluator for GeoStyler style array expressions.
///
/// Supported operators:
/// - comparisons `["==" | "!=" | "<" | "<=" | ">" | ">=", attribute, value]`
/// - substring match `["*=", attribute, "text"]`
/// - combinators `["&&", f, ...]`, `["||", f, ...]` and `["!", f]`
/// - literal `true` / `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionFilter;

impl FilterEvaluator for ExpressionFilter {
    fn matches(&self, filter: &Filter, properties: &Properties) -> Result<bool, StyleError> {
        evaluate(&filter.0, properties)
    }
}

fn evaluate(expr: &Value, properties: &Properties) -> Result<bool, StyleError> {
    let items = match expr {
        Value::Bool(b) => return Ok(*b),
        Value::Array(items) => items,
        other => return Err(StyleError::FilterEvaluation(format!("unsupported expression {other}"))),
    };

    let op = items
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| StyleError::FilterEvaluation(format!("missing operator in {expr}")))?;
    let args = &items[1..];

    match op {
        "&&" => {
            for f in args {
                if !evaluate(f, properties)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        "||" => {
            for f in args {
                if evaluate(f, properties)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        "!" => match args {
            [f] => Ok(!evaluate(f, properties)?),
            _ => Err(StyleError::FilterEvaluation(format!("`!` takes one operand in {expr}"))),
        },
        "==" | "!=" | "<" | "<=" | ">" | ">=" | "*=" => {
            let (attribute, expected) = match args {
                [Value::String(attribute), expected] => (attribute, expected),
                _ => {
                    return Err(StyleError::FilterEvaluation(format!(
                        "`{op}` expects an attribute name and a value in {expr}"
                    )))
                }
            };
            let actual = properties.get(attribute).unwrap_or(&Value::Null);
            Ok(compare(op, actual, expected))
        }
        other => Err(StyleError::FilterEvaluation(format!("unknown operator `{other}`"))),
    }
}

fn compare(op: &str, actual: &Value, expected: &Value) -> bool {
    match op {
        "==" => loosely_equal(actual, expected),
        "!=" => !loosely_equal(actual, expected),
        "*=" => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(e)) => a.contains(e),
            _ => false,
        },
        _ => {
            let Some(ordering) = order(actual, expected) else {
                return false;
            };
            match op {
                "<" => ordering == Ordering::Less,
                "<=" => ordering != Ordering::Greater,
                ">" => ordering == Ordering::Greater,
                ">=" => ordering != Ordering::Less,
                _ => false,
            }
        }
    }
}

// `1` and `1.0` are the same attribute value.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
