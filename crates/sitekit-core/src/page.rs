// ── Wire envelopes ──
//
// List responses look like `{ "<list_key>": [...], "total": n, "totalPages": m }`.
// The item key varies per collection, so decoding goes through
// `serde_json::Value` instead of a fixed struct.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CoreError;
use crate::model::ResourceKind;
use crate::query::CollectionQuery;

/// One fetched page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionPage<T> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Matching items across all pages, as reported by the server.
    pub total_count: u64,
    pub total_pages: u32,
    /// The page requested (echoed from the query, not read from the body).
    pub page: u32,
}

impl<T> CollectionPage<T> {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T: DeserializeOwned> CollectionPage<T> {
    /// Decode a list response body for `query`.
    pub fn decode(
        body: Value,
        kind: &ResourceKind,
        query: &CollectionQuery,
    ) -> Result<Self, CoreError> {
        let mut map = match body {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::Parse {
                    message: format!(
                        "expected an object for {} list, got {}",
                        kind.plural,
                        type_name(&other)
                    ),
                });
            }
        };

        let raw_items = [kind.list_key, "items", "data"]
            .into_iter()
            .find_map(|key| map.remove(key))
            .ok_or_else(|| CoreError::Parse {
                message: format!("missing `{}` array in list response", kind.list_key),
            })?;
        let items: Vec<T> = serde_json::from_value(raw_items)?;

        let item_count = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let total_count = ["total", "totalCount"]
            .into_iter()
            .find_map(|key| map.get(key).and_then(Value::as_u64))
            .unwrap_or(item_count);

        let total_pages = map
            .get("totalPages")
            .and_then(Value::as_u64)
            .map_or_else(
                || derive_total_pages(total_count, query.page_size()),
                |pages| u32::try_from(pages).unwrap_or(u32::MAX),
            );

        Ok(Self {
            items,
            total_count,
            total_pages,
            page: query.page(),
        })
    }
}

fn derive_total_pages(total: u64, page_size: u32) -> u32 {
    let pages = total.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Decode a single entity, bare or wrapped under `entity_key` / `data`.
///
/// Returns `Ok(None)` for a `null` body or a `null` wrapped entity.
pub fn decode_entity<T: DeserializeOwned>(
    body: Value,
    kind: &ResourceKind,
) -> Result<Option<T>, CoreError> {
    let entity = match body {
        Value::Null => return Ok(None),
        Value::Object(mut map) => {
            let wrapped = [kind.entity_key, "data"]
                .into_iter()
                .find(|key| map.get(*key).is_some_and(|v| v.is_object() || v.is_null()));
            match wrapped {
                Some(key) => map.remove(key).unwrap_or(Value::Null),
                None => Value::Object(map),
            }
        }
        other => {
            return Err(CoreError::Parse {
                message: format!("expected a {} object, got {}", kind.singular, type_name(&other)),
            });
        }
    };

    if entity.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(entity)?))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
