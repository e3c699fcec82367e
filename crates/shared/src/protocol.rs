//! JSON mapping between catalog rows and the per-catalog wire shape.
//!
//! Every catalog uses its own key for the display name (`nombre_os`,
//! `nombre_ant`, ...), so rows travel as plain JSON objects and are mapped
//! through a [`CatalogSchema`] instead of a fixed serde struct.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{CatalogId, CatalogItem, CatalogSchema};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("expected a JSON object for a catalog row")]
    NotAnObject,
    #[error("expected a JSON array of catalog rows")]
    NotAList,
    #[error("catalog row is missing field `{0}`")]
    MissingField(String),
    #[error("catalog row field `{0}` has an unsupported type")]
    InvalidField(String),
}

pub fn decode_item(value: &Value, schema: &CatalogSchema) -> Result<CatalogItem, ProtocolError> {
    let row = value.as_object().ok_or(ProtocolError::NotAnObject)?;

    let id = match field(row, &schema.id_field)? {
        Value::Number(n) => n
            .as_i64()
            .map(CatalogId::Int)
            .ok_or_else(|| ProtocolError::InvalidField(schema.id_field.clone()))?,
        Value::String(s) => CatalogId::Text(s.clone()),
        _ => return Err(ProtocolError::InvalidField(schema.id_field.clone())),
    };

    let name = match field(row, &schema.name_field)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(ProtocolError::InvalidField(schema.name_field.clone())),
    };

    Ok(CatalogItem { id, name })
}

/// Decodes a list response. Paginated bodies (`{"results": [...]}`) are
/// unwrapped.
pub fn decode_list(value: &Value, schema: &CatalogSchema) -> Result<Vec<CatalogItem>, ProtocolError> {
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(ProtocolError::NotAList),
        },
        _ => return Err(ProtocolError::NotAList),
    };
    rows.iter().map(|row| decode_item(row, schema)).collect()
}

pub fn encode_item(item: &CatalogItem, schema: &CatalogSchema) -> Value {
    let mut row = Map::new();
    let id = match &item.id {
        CatalogId::Int(id) => Value::from(*id),
        CatalogId::Text(id) => Value::from(id.clone()),
    };
    row.insert(schema.id_field.clone(), id);
    row.insert(schema.name_field.clone(), Value::from(item.name.clone()));
    Value::Object(row)
}

/// Request body for create and update calls.
pub fn name_payload(schema: &CatalogSchema, name: &str) -> Value {
    let mut row = Map::new();
    row.insert(schema.name_field.clone(), Value::from(name));
    Value::Object(row)
}

fn field<'a>(row: &'a Map<String, Value>, key: &str) -> Result<&'a Value, ProtocolError> {
    row.get(key)
        .ok_or_else(|| ProtocolError::MissingField(key.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::CatalogKind;

    #[test]
    fn decodes_rows_with_catalog_specific_name_field() {
        let schema = CatalogKind::ObrasSociales.schema();
        let items = decode_list(
            &json!([{"id": 1, "nombre_os": "OSDE"}, {"id": 2, "nombre_os": "Swiss Medical"}]),
            &schema,
        )
        .expect("list");
        assert_eq!(items[0], CatalogItem::new(1, "OSDE"));
        assert_eq!(items[1].name, "Swiss Medical");
    }

    #[test]
    fn unwraps_paginated_results() {
        let schema = CatalogKind::Antecedentes.schema();
        let items = decode_list(
            &json!({"count": 1, "results": [{"id": 4, "nombre_ant": "Diabetes"}]}),
            &schema,
        )
        .expect("list");
        assert_eq!(items, vec![CatalogItem::new(4, "Diabetes")]);
    }

    #[test]
    fn reports_missing_name_field() {
        let schema = CatalogKind::Tratamientos.schema();
        let err = decode_item(&json!({"id": 1, "nombre": "Limpieza"}), &schema)
            .expect_err("must fail");
        assert_eq!(err, ProtocolError::MissingField("nombre_trat".into()));
    }

    #[test]
    fn honours_custom_id_field() {
        let schema = CatalogSchema::new("nombre_cara").with_id_field("codigo");
        let item = decode_item(&json!({"codigo": "V", "nombre_cara": "Vestibular"}), &schema)
            .expect("row");
        assert_eq!(item.id, CatalogId::Text("V".into()));
        assert_eq!(
            encode_item(&item, &schema),
            json!({"codigo": "V", "nombre_cara": "Vestibular"})
        );
    }

    #[test]
    fn name_payload_uses_schema_key() {
        let schema = CatalogKind::AnalisisFuncional.schema();
        assert_eq!(
            name_payload(&schema, "Respiración bucal"),
            json!({"nombre_analisis": "Respiración bucal"})
        );
    }
}
