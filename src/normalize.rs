//! Response-envelope normalization.
//!
//! The console API is not uniform: list endpoints return `{data, pagination}`,
//! `{rows, count}`, or a bare array depending on the resource's vintage. This
//! module converts every shape to one canonical `(items, total)` result at the
//! transport boundary so every layer above deals with exactly one shape.
//!
//! Normalization is total: unknown shapes degrade to an empty list with a
//! logged diagnostic instead of an error.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::models::page::ListResult;

const TOTAL_KEYS: &[&str] = &["totalItems", "total_items", "totalCount", "total", "count"];

/// Reduce a raw list body to `(items, total)`.
pub fn normalize_list(body: Value) -> (Vec<Value>, u64) {
    match body {
        Value::Array(items) => {
            let total = items.len() as u64;
            (items, total)
        }
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data") {
                let Value::Array(items) = data else {
                    warn!("[NORMALIZE] `data` field is not an array, treating as empty");
                    return (Vec::new(), 0);
                };
                let total = map
                    .get("pagination")
                    .and_then(total_hint)
                    .or_else(|| total_hint(&Value::Object(map)))
                    .unwrap_or(items.len() as u64);
                (items, total)
            } else if let Some(rows) = map.remove("rows") {
                let Value::Array(items) = rows else {
                    warn!("[NORMALIZE] `rows` field is not an array, treating as empty");
                    return (Vec::new(), 0);
                };
                let total = total_hint(&Value::Object(map)).unwrap_or(items.len() as u64);
                (items, total)
            } else {
                warn!("[NORMALIZE] unrecognized list envelope, treating as empty");
                (Vec::new(), 0)
            }
        }
        other => {
            warn!("[NORMALIZE] unsupported list body ({}), treating as empty", kind(&other));
            (Vec::new(), 0)
        }
    }
}

/// Normalize and decode a list body into typed items.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Result<ListResult<T>> {
    let (raw, total_items) = normalize_list(body);
    let mut items = Vec::with_capacity(raw.len());
    for value in raw {
        items.push(serde_json::from_value(value)?);
    }
    Ok(ListResult { items, total_items })
}

/// Peel the single-entity envelope: `{data: {...}}` or a bare object.
pub fn unwrap_item(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Read the first recognized total-count key off an object.
fn total_hint(value: &Value) -> Option<u64> {
    let map = value.as_object()?;
    TOTAL_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_u64))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_pagination_envelope() {
        let body = json!({
            "data": [{"id": 1}, {"id": 2}],
            "pagination": {"page": 1, "pageSize": 10, "totalItems": 23, "totalPages": 3}
        });
        let (items, total) = normalize_list(body);
        assert_eq!(items.len(), 2);
        assert_eq!(total, 23);
    }

    #[test]
    fn test_rows_count_envelope() {
        let body = json!({"rows": [{"id": 1}], "count": 41});
        let (items, total) = normalize_list(body);
        assert_eq!(items.len(), 1);
        assert_eq!(total, 41);
    }

    #[test]
    fn test_bare_array() {
        let body = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        let (items, total) = normalize_list(body);
        assert_eq!(items.len(), 3);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_unknown_shape_degrades_to_empty() {
        let (items, total) = normalize_list(json!({"unexpected": true}));
        assert!(items.is_empty());
        assert_eq!(total, 0);

        let (items, total) = normalize_list(json!("nope"));
        assert!(items.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_data_without_pagination_falls_back_to_len() {
        let body = json!({"data": [{"id": 1}, {"id": 2}]});
        let (items, total) = normalize_list(body);
        assert_eq!(items.len(), 2);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_sibling_total_outside_pagination() {
        let body = json!({"data": [{"id": 1}], "total": 12});
        let (_, total) = normalize_list(body);
        assert_eq!(total, 12);
    }

    #[test]
    fn test_unwrap_item_variants() {
        assert_eq!(unwrap_item(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_item(json!({"id": 1})), json!({"id": 1}));
    }

    #[test]
    fn test_decode_list_reports_bad_items() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[allow(dead_code)]
            id: i64,
        }
        let result = decode_list::<Row>(json!([{"id": "not a number"}]));
        assert!(result.is_err());
    }
}
