use serde::{Deserialize, Serialize};

/// Raw cell value as delivered by a grid widget: free text for typed
/// fields, a number when the widget already coerced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// The value as the user-visible string the validators run against.
    /// Numbers format the way grids display them (`12` not `12.0`).
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Number(n) => format_number(*n),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Grid Adapter -> Edit Reducer event shape:
/// `{ "position": int, "field": string, "rawValue": string|number }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEditEvent {
    pub position: usize,
    pub field: String,
    pub raw_value: RawValue,
}

/// Success body of both save endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
}

/// How a bare identifier is wrapped before being appended to the
/// identifier batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierRecord {
    pub identifier: u64,
}
