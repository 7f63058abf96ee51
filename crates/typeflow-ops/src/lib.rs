//! Typeflow Ops: reference operations for the compute pipeline.
//!
//! These operations stay intentionally small and deterministic. They cover
//! the built-in datum kinds so a pipeline can run end to end without bespoke
//! business logic. Teams are expected to replace or extend them.
//!
//! # Type Flow
//!
//! ```text
//! uri ──Load──┬── http(s):// → text ──JsonDeserialize──→ json
//!             ├── file://    → compressed ──Decompress──→ text → json
//!             └── bundle://  → raw_image ──ImageDecode──→ decoded_image
//! ```

mod decompress;
mod image_decode;
mod json_deserialize;
mod load;

pub use decompress::DecompressOperation;
pub use image_decode::ImageDecodeOperation;
pub use json_deserialize::JsonDeserializeOperation;
pub use load::{CannedFetcher, Fetcher, LoadOperation};

use typeflow_core::{ComputePipeline, Datum, Operation, OperationError, PipelineBuilder, Rejection};

/// Rejection for a datum the engine should never have dispatched here.
pub(crate) fn wrong_input(op: &dyn Operation, input: Datum) -> Rejection {
    OperationError::registry(format!(
        "{} consumes {}, got {}",
        op.name(),
        op.input_type(),
        input.type_id()
    ))
    .reject(input)
}

// ============================================================================
// CONVENIENCE BUILDERS
// ============================================================================

/// The four reference operations, one per consumed type.
pub fn default_operations() -> Vec<Box<dyn Operation>> {
    vec![
        Box::new(LoadOperation::default()),
        Box::new(DecompressOperation),
        Box::new(JsonDeserializeOperation),
        Box::new(ImageDecodeOperation),
    ]
}

/// Builder preloaded with `load`, leaving room for more registrations.
pub fn standard_builder(load: LoadOperation) -> PipelineBuilder {
    let mut builder = ComputePipeline::builder();
    builder.register(Box::new(load));
    builder.register(Box::new(DecompressOperation));
    builder.register(Box::new(JsonDeserializeOperation));
    builder.register(Box::new(ImageDecodeOperation));
    builder
}

/// Pipeline with every reference operation and default settings.
pub fn standard_pipeline() -> ComputePipeline {
    let mut builder = ComputePipeline::builder();
    for op in default_operations() {
        builder.register(op);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_operations_cover_distinct_types() {
        let pipeline = standard_pipeline();
        assert_eq!(pipeline.registry().len(), 4);
        assert_eq!(
            pipeline.registry().input_types(),
            vec![Datum::COMPRESSED, Datum::RAW_IMAGE, Datum::TEXT, Datum::URI]
        );
    }

    #[test]
    fn test_wrong_input_is_registry_error() {
        let rejection = ImageDecodeOperation.execute(Datum::Text("nope".into())).unwrap_err();
        assert_eq!(rejection.error.kind, typeflow_core::ErrorKind::RegistryError);
        assert_eq!(
            rejection.error.description,
            "ImageDecodeOperation consumes type/raw_image, got type/text"
        );
        assert_eq!(rejection.input.as_str(), Some("nope"));
    }
}
