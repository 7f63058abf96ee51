//! User Data: an extension datum defined outside the core crate
use serde::{Deserialize, Serialize};
use typeflow_core::{Datum, Extension, JsonData, Operation, OperationError, Rejection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl UserData {
    pub const TYPE: &'static str = "type/object/userdata";
}

impl Extension for UserData {
    fn extension_type(&self) -> &'static str {
        Self::TYPE
    }
}

/// Maps a `{ userId, name, email }` JSON object into `UserData`.
#[derive(Debug, Default)]
pub struct UserDataDeserializationOperation;

fn string_field(data: &JsonData, key: &str) -> Result<String, OperationError> {
    data.get_str(key)
        .map(str::to_string)
        .ok_or_else(|| OperationError::parse(format!("missing string field '{}'", key)))
}

fn user_from_json(data: &JsonData) -> Result<UserData, OperationError> {
    Ok(UserData {
        user_id: string_field(data, "userId")?,
        name: string_field(data, "name")?,
        email: string_field(data, "email")?,
    })
}

impl Operation for UserDataDeserializationOperation {
    fn input_type(&self) -> &'static str {
        Datum::JSON
    }

    fn name(&self) -> &'static str {
        "UserDataDeserializationOperation"
    }

    fn execute(&self, input: Datum) -> Result<Datum, Rejection> {
        let user = match input.as_json().map(user_from_json) {
            Some(Ok(user)) => user,
            Some(Err(error)) => return Err(error.reject(input)),
            None => {
                let error = OperationError::registry(format!(
                    "{} consumes {}, got {}",
                    self.name(),
                    Datum::JSON,
                    input.type_id()
                ));
                return Err(error.reject(input));
            }
        };
        Ok(Datum::extension(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typeflow_core::ErrorKind;

    fn json_datum(value: serde_json::Value) -> Datum {
        match value {
            serde_json::Value::Object(map) => Datum::Json(JsonData::new(map)),
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_user_is_extracted() {
        let out = UserDataDeserializationOperation
            .execute(json_datum(json!({
                "userId": "11",
                "name": "John Smith",
                "email": "john.smith@gmail.com"
            })))
            .unwrap();

        assert_eq!(out.type_id(), UserData::TYPE);
        let user = out.downcast::<UserData>().unwrap();
        assert_eq!(user.name, "John Smith");
        assert_eq!(user.user_id, "11");
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let rejection = UserDataDeserializationOperation
            .execute(json_datum(json!({ "userId": "11" })))
            .unwrap_err();

        assert_eq!(rejection.error.kind, ErrorKind::ParseError);
        assert_eq!(rejection.error.description, "missing string field 'name'");
        assert_eq!(rejection.input.type_id(), Datum::JSON);
    }
}
