//! Request body construction from wizard fields.

use serde_json::{Map, Value};

use crate::core::wizard::fields::{FieldValue, FormFields, MEDIA};
use crate::core::wizard::schema::FormSchema;

/// JSON object sent to the create and update operations.
pub type Payload = Map<String, Value>;

/// Serialize every schema field. List fields are native JSON arrays, text is
/// trimmed, and empty text falls back to the field's default (or `""`).
pub fn build_payload(schema: &FormSchema, fields: &FormFields) -> Payload {
    let mut payload = Payload::new();
    for spec in schema.fields() {
        let value = match fields.get(spec.name) {
            Some(FieldValue::List(items)) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Some(FieldValue::Text(text)) if !text.trim().is_empty() => {
                Value::String(text.trim().to_string())
            }
            _ if spec.is_list() => Value::Array(Vec::new()),
            _ => Value::String(spec.default.unwrap_or_default().to_string()),
        };
        payload.insert(spec.name.to_string(), value);
    }
    payload
}

/// Fold uploaded filenames into the payload as a JSON-stringified array.
pub fn attach_media(payload: &mut Payload, filenames: &[String]) -> Result<(), serde_json::Error> {
    let encoded = serde_json::to_string(filenames)?;
    payload.insert(MEDIA.to_string(), Value::String(encoded));
    Ok(())
}
