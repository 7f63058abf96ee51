//! Typeflow Core: Datum model, Operation trait, Registry and Engine
//!
//! Data-driven execution: the next operation is picked by the type of the
//! datum currently in hand, never by a declared graph. A run ends when no
//! operation is registered for the current type, or on the first failure.
//!
//! ```text
//! Datum(A) → registry[A] → Datum(B) → registry[B] → Datum(C) → (no match) → done
//! ```

pub mod config;
pub mod datum;
pub mod error;
pub mod execution;
pub mod operation;
pub mod pipeline;
pub mod registry;

pub use config::PipelineConfig;
pub use datum::{Datum, Extension, JsonData};
pub use error::{ErrorKind, OperationError, Rejection};
pub use execution::{Execution, ExecutionReport, Failure, Outcome, RunStatus, StepRecord};
pub use operation::{from_fn, FnOperation, Operation};
pub use pipeline::{ComputePipeline, PipelineBuilder};
pub use registry::OperationRegistry;

/// Engine version
pub const TYPEFLOW_VERSION: &str = env!("CARGO_PKG_VERSION");
