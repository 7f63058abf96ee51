//! Data Model: typed datums flowing between operations
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

/// Object-safe access to `Any` for extension kinds.
///
/// Implemented automatically for every `'static + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// A datum kind compiled outside this crate.
///
/// The identifier must not collide with the built-in `type/*` kinds or with
/// any other extension registered in the same pipeline.
pub trait Extension: AsAny + fmt::Debug {
    /// Stable identifier of the kind (ex: "type/object/userdata")
    fn extension_type(&self) -> &'static str;
}

/// String-keyed JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonData(Map<String, Value>);

impl JsonData {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Shortcut for string-valued fields.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for JsonData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One unit of typed payload.
///
/// A datum is moved from stage to stage; it is never shared between two
/// operations.
#[derive(Debug)]
pub enum Datum {
    Uri(String),
    Text(String),
    Compressed(Vec<u8>),
    RawImage(Vec<u8>),
    DecodedImage(Vec<u8>),
    Json(JsonData),
    Extension(Box<dyn Extension>),
}

impl Datum {
    pub const URI: &'static str = "type/uri";
    pub const TEXT: &'static str = "type/text";
    pub const COMPRESSED: &'static str = "type/compressed";
    pub const RAW_IMAGE: &'static str = "type/raw_image";
    pub const DECODED_IMAGE: &'static str = "type/decoded_image";
    pub const JSON: &'static str = "type/json";

    /// Wraps an extension value.
    pub fn extension<E: Extension>(value: E) -> Self {
        Datum::Extension(Box::new(value))
    }

    /// Dispatch key of this datum. Never consumes the datum.
    pub fn type_id(&self) -> &'static str {
        match self {
            Datum::Uri(_) => Self::URI,
            Datum::Text(_) => Self::TEXT,
            Datum::Compressed(_) => Self::COMPRESSED,
            Datum::RawImage(_) => Self::RAW_IMAGE,
            Datum::DecodedImage(_) => Self::DECODED_IMAGE,
            Datum::Json(_) => Self::JSON,
            Datum::Extension(ext) => ext.extension_type(),
        }
    }

    /// Byte payload of the binary kinds.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Datum::Compressed(bytes) | Datum::RawImage(bytes) | Datum::DecodedImage(bytes) => {
                Some(bytes)
            }
            _ => None,
        }
    }

    /// Text payload of the string kinds.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::Uri(s) | Datum::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&JsonData> {
        match self {
            Datum::Json(data) => Some(data),
            _ => None,
        }
    }

    /// Checked borrow of an extension payload.
    pub fn downcast_ref<T: Extension>(&self) -> Option<&T> {
        match self {
            Datum::Extension(ext) => (**ext).as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Checked unwrap of an extension payload. Hands the datum back untouched
    /// when it holds some other kind.
    pub fn downcast<T: Extension>(self) -> Result<T, Datum> {
        match self {
            Datum::Extension(ext) if (*ext).as_any().is::<T>() => {
                match ext.into_any().downcast::<T>() {
                    Ok(value) => Ok(*value),
                    Err(_) => unreachable!("extension type checked before downcast"),
                }
            }
            other => Err(other),
        }
    }

    /// `blake3:<hex>` digest of built-in payloads; `None` for extensions.
    pub fn digest(&self) -> Option<String> {
        let hash = match self {
            Datum::Uri(s) | Datum::Text(s) => blake3::hash(s.as_bytes()),
            Datum::Compressed(bytes) | Datum::RawImage(bytes) | Datum::DecodedImage(bytes) => {
                blake3::hash(bytes)
            }
            Datum::Json(data) => blake3::hash(&serde_json::to_vec(data).ok()?),
            Datum::Extension(_) => return None,
        };
        Some(format!("blake3:{}", hash))
    }
}
