//! Transformers for untyped JSON payloads, addressed by JSON pointer.

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

/// Items stored under `pointer`, which must be an array (`""` is the whole body).
pub fn items_at(data: &Value, pointer: &str) -> Result<Vec<Value>> {
    let node = lookup(data, pointer)?;
    node.as_array()
        .cloned()
        .ok_or_else(|| anyhow!("Expected an array at '{}'", pointer))
}

/// Integer stored under `pointer`; numeric strings are accepted too.
pub fn count_at(data: &Value, pointer: &str) -> Result<i64> {
    let node = lookup(data, pointer)?;
    extract_count(node).ok_or_else(|| anyhow!("Expected an integer at '{}', found {}", pointer, node))
}

/// Non-negative integer stored under `pointer`.
pub fn total_at(data: &Value, pointer: &str) -> Result<u64> {
    let count = count_at(data, pointer)?;
    u64::try_from(count).with_context(|| format!("Negative total at '{}'", pointer))
}

fn lookup<'a>(data: &'a Value, pointer: &str) -> Result<&'a Value> {
    data.pointer(pointer)
        .ok_or_else(|| anyhow!("Nothing found at '{}'", pointer))
}

fn extract_count(node: &Value) -> Option<i64> {
    match node {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(raw) => raw.trim().parse().ok(),
        _ => None,
    }
}
