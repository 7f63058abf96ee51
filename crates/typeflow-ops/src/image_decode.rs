use typeflow_core::{Datum, Operation, OperationError, Rejection};

/// Turns raw image bytes into decoded pixels.
///
/// Raw images are stored bottom-up; decoding flips them into top-down
/// order. An empty image is a `ParseError`.
#[derive(Debug, Default)]
pub struct ImageDecodeOperation;

impl Operation for ImageDecodeOperation {
    fn input_type(&self) -> &'static str {
        Datum::RAW_IMAGE
    }

    fn name(&self) -> &'static str {
        "ImageDecodeOperation"
    }

    fn execute(&self, input: Datum) -> Result<Datum, Rejection> {
        let mut bytes = match input {
            Datum::RawImage(bytes) => bytes,
            other => return Err(crate::wrong_input(self, other)),
        };

        if bytes.is_empty() {
            return Err(OperationError::parse("raw image is empty").reject(Datum::RawImage(bytes)));
        }

        bytes.reverse();
        Ok(Datum::DecodedImage(bytes))
    }
}
