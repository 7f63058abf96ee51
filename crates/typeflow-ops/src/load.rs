use once_cell::sync::Lazy;
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;
use typeflow_core::{Datum, Operation, OperationError, Rejection};

/// Body served for plain `http://` URIs by the canned fetcher.
static HTTP_BODY: Lazy<String> = Lazy::new(|| {
    json!({
        "objectType": "ImageMeta",
        "format": "jpeg",
    })
    .to_string()
});

const HTTPS_BODY: &str = "Hello World!";

/// Network access behind `http://` and `https://` URIs.
pub trait Fetcher: Send + Sync {
    /// Returns the response body, or a description of why it failed.
    fn fetch(&self, uri: &str) -> Result<String, String>;
}

/// Offline fetcher with fixed responses.
///
/// Explicit entries win; otherwise `http://` answers with a small JSON object
/// and `https://` with plain text.
#[derive(Debug, Clone, Default)]
pub struct CannedFetcher {
    responses: HashMap<String, Result<String, String>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, uri: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses.insert(uri.into(), Ok(body.into()));
        self
    }

    /// Makes `uri` fail as if the host were unreachable.
    pub fn with_failure(mut self, uri: impl Into<String>, reason: impl Into<String>) -> Self {
        self.responses.insert(uri.into(), Err(reason.into()));
        self
    }
}

impl Fetcher for CannedFetcher {
    fn fetch(&self, uri: &str) -> Result<String, String> {
        if let Some(response) = self.responses.get(uri) {
            return response.clone();
        }
        if uri.starts_with("https://") {
            Ok(HTTPS_BODY.to_string())
        } else {
            Ok(HTTP_BODY.clone())
        }
    }
}

/// Resolves a URI into its payload.
///
/// | scheme      | source              | output       | failure     |
/// |-------------|---------------------|--------------|-------------|
/// | `http(s)://`| `Fetcher`           | `type/text`  | NetworkError|
/// | `file://`   | local filesystem    | `type/compressed` | FileError |
/// | `bundle://` | in-memory assets    | `type/raw_image`  | ReadError |
///
/// Any other scheme is a `ReadError`.
pub struct LoadOperation {
    fetcher: Box<dyn Fetcher>,
    bundle: HashMap<String, Vec<u8>>,
}

impl Default for LoadOperation {
    fn default() -> Self {
        Self::new(CannedFetcher::default())
    }
}

impl LoadOperation {
    pub fn new<F: Fetcher + 'static>(fetcher: F) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            bundle: HashMap::new(),
        }
    }

    /// Adds an asset served under `bundle://<name>`.
    pub fn with_asset(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.bundle.insert(name.into(), bytes);
        self
    }

    fn load(&self, uri: &str) -> Result<Datum, OperationError> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            let body = self.fetcher.fetch(uri).map_err(OperationError::network)?;
            return Ok(Datum::Text(body));
        }

        if let Some(path) = uri.strip_prefix("file://") {
            let bytes = std::fs::read(path)
                .map_err(|e| OperationError::file(format!("{}: {}", path, e)))?;
            debug!(path, len = bytes.len(), "file loaded");
            return Ok(Datum::Compressed(bytes));
        }

        if let Some(name) = uri.strip_prefix("bundle://") {
            let bytes = self
                .bundle
                .get(name)
                .cloned()
                .ok_or_else(|| OperationError::read(format!("no bundled asset named '{}'", name)))?;
            return Ok(Datum::RawImage(bytes));
        }

        Err(OperationError::read(format!("Unsupported URI: {}", uri)))
    }
}

impl Operation for LoadOperation {
    fn input_type(&self) -> &'static str {
        Datum::URI
    }

    fn name(&self) -> &'static str {
        "LoadOperation"
    }

    fn execute(&self, input: Datum) -> Result<Datum, Rejection> {
        let uri = match input {
            Datum::Uri(uri) => uri,
            other => return Err(crate::wrong_input(self, other)),
        };

        self.load(&uri).map_err(|error| error.reject(Datum::Uri(uri)))
    }
}
