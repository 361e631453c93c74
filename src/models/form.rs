use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::field::{Field, FieldType, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub Uuid);

impl FormId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FormId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn from_json(field: Field, value: &Value) -> Result<Self, String> {
        match (field.field_type(), value) {
            (FieldType::String, Value::String(s)) => Ok(FieldValue::Text(s.clone())),
            (FieldType::String, Value::Number(n)) => Ok(FieldValue::Text(n.to_string())),
            (FieldType::Boolean, Value::Bool(b)) => Ok(FieldValue::Flag(*b)),
            (FieldType::Boolean, Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" => Ok(FieldValue::Flag(true)),
                "false" | "no" => Ok(FieldValue::Flag(false)),
                _ => Err(format!("{field} should be true or false, got {s:?}")),
            },
            (expected, other) => Err(format!(
                "{field} should be a {}, got {other}",
                expected.as_str()
            )),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            FieldValue::Text(_) => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => json!(s),
            FieldValue::Flag(b) => json!(b),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// The values collected so far for one appointment request.
///
/// Two records are equal only when they share a [`FormId`]; identical field
/// values in separate calls stay distinct. Not `Clone` for the same reason.
#[derive(Debug)]
pub struct FormRecord {
    id: FormId,
    values: BTreeMap<Field, FieldValue>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self {
            id: FormId::new(),
            values: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> FormId {
        self.id
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn flag(&self, field: Field) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_flag)
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            form_id: self.id,
            fields: Field::ALL
                .into_iter()
                .map(|f| {
                    let value = self.get(f).map(FieldValue::to_json).unwrap_or(Value::Null);
                    (f.as_str().to_string(), value)
                })
                .collect(),
        }
    }

    pub fn details_text(&self) -> String {
        let stages: Vec<Value> = Stage::ALL
            .into_iter()
            .map(|stage| {
                let group: Map<String, Value> = stage
                    .fields()
                    .map(|f| {
                        let value = self.get(f).map(FieldValue::to_json).unwrap_or(Value::Null);
                        (f.as_str().to_string(), value)
                    })
                    .collect();
                Value::Object(group)
            })
            .collect();
        serde_json::to_string_pretty(&json!({ "appointment_info": stages }))
            .unwrap_or_default()
    }
}

impl Default for FormRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FormRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FormRecord {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub form_id: FormId,
    pub fields: Map<String, Value>,
}
