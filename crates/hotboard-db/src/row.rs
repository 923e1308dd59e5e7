//! The single place where storage rows cross into application types.
//!
//! Reads select whole rows as JSONB (`snake_case` keys), convert the keys
//! with [`hotboard_core::to_camel`] and deserialize field-by-field into the
//! typed projection. Writes run the other way to derive column names.

use hotboard_core::{to_camel, to_snake};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::DbError;

pub(crate) fn decode<T: DeserializeOwned>(entity: &'static str, raw: Value) -> Result<T, DbError> {
    serde_json::from_value(to_camel(raw)).map_err(|source| DbError::Decode { entity, source })
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    entity: &'static str,
    rows: Vec<Value>,
) -> Result<Vec<T>, DbError> {
    rows.into_iter().map(|raw| decode(entity, raw)).collect()
}

/// Serializes `dto` into `column -> value` pairs, rejecting any column not in
/// `writable`. Column names are spliced into SQL, so the allow-list is the
/// only thing standing between a DTO field and the query text.
pub(crate) fn encode_columns<T: Serialize>(
    entity: &'static str,
    dto: &T,
    writable: &[&str],
) -> Result<Map<String, Value>, DbError> {
    let value = serde_json::to_value(dto).map_err(|e| DbError::Encode {
        entity,
        reason: e.to_string(),
    })?;

    let Value::Object(columns) = to_snake(value) else {
        return Err(DbError::Encode {
            entity,
            reason: "expected a JSON object".to_string(),
        });
    };

    if let Some(column) = columns.keys().find(|c| !writable.contains(&c.as_str())) {
        return Err(DbError::Encode {
            entity,
            reason: format!("column '{column}' is not writable"),
        });
    }

    Ok(columns)
}
