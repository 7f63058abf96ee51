use tracing::debug;
use typeflow_core::{Datum, Operation, OperationError, Rejection};

/// Inflates a zstd frame into UTF-8 text.
///
/// A corrupt frame is a `ReadError`; bytes that inflate but are not UTF-8
/// are a `ParseError`.
#[derive(Debug, Default)]
pub struct DecompressOperation;

impl DecompressOperation {
    fn decompress(bytes: &[u8]) -> Result<String, OperationError> {
        let inflated = zstd::stream::decode_all(bytes)
            .map_err(|e| OperationError::read(format!("zstd decode failed: {}", e)))?;
        debug!(compressed = bytes.len(), inflated = inflated.len(), "frame inflated");

        String::from_utf8(inflated)
            .map_err(|e| OperationError::parse(format!("decompressed payload is not UTF-8: {}", e)))
    }
}

impl Operation for DecompressOperation {
    fn input_type(&self) -> &'static str {
        Datum::COMPRESSED
    }

    fn name(&self) -> &'static str {
        "DecompressOperation"
    }

    fn execute(&self, input: Datum) -> Result<Datum, Rejection> {
        let bytes = match input {
            Datum::Compressed(bytes) => bytes,
            other => return Err(crate::wrong_input(self, other)),
        };

        match Self::decompress(&bytes) {
            Ok(text) => Ok(Datum::Text(text)),
            Err(error) => Err(error.reject(Datum::Compressed(bytes))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeflow_core::ErrorKind;

    #[test]
    fn test_inflates_text() {
        let frame = zstd::encode_all(&b"{\"object\":\"a\"}"[..], 3).unwrap();
        let out = DecompressOperation.execute(Datum::Compressed(frame)).unwrap();
        assert_eq!(out.as_str(), Some("{\"object\":\"a\"}"));
    }

    #[test]
    fn test_garbage_is_read_error() {
        let rejection = DecompressOperation
            .execute(Datum::Compressed(vec![0xFF, 0xAA, 0x11]))
            .unwrap_err();

        assert_eq!(rejection.error.kind, ErrorKind::ReadError);
        assert_eq!(rejection.input.as_bytes(), Some(&[0xFF, 0xAA, 0x11][..]));
    }

    #[test]
    fn test_non_utf8_is_parse_error() {
        let frame = zstd::encode_all(&[0xC3u8, 0x28][..], 0).unwrap();
        let rejection = DecompressOperation.execute(Datum::Compressed(frame)).unwrap_err();
        assert_eq!(rejection.error.kind, ErrorKind::ParseError);
    }
}
