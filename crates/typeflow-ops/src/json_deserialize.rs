use serde_json::Value;
use typeflow_core::{Datum, JsonData, Operation, OperationError, Rejection};

/// Parses text into a JSON object. Anything but an object is a `ParseError`.
#[derive(Debug, Default)]
pub struct JsonDeserializeOperation;

fn parse_object(text: &str) -> Result<JsonData, OperationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| OperationError::parse(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(JsonData::new(map)),
        other => Err(OperationError::parse(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Operation for JsonDeserializeOperation {
    fn input_type(&self) -> &'static str {
        Datum::TEXT
    }

    fn name(&self) -> &'static str {
        "JsonDeserializeOperation"
    }

    fn execute(&self, input: Datum) -> Result<Datum, Rejection> {
        let text = match input {
            Datum::Text(text) => text,
            other => return Err(crate::wrong_input(self, other)),
        };

        match parse_object(&text) {
            Ok(data) => Ok(Datum::Json(data)),
            Err(error) => Err(error.reject(Datum::Text(text))),
        }
    }
}
