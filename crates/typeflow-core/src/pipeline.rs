//! Compute Pipeline: dispatches each datum to the operation registered for its type
use crate::config::PipelineConfig;
use crate::datum::Datum;
use crate::error::{OperationError, Rejection};
use crate::execution::{Execution, Failure, Outcome, StepRecord};
use crate::operation::Operation;
use crate::registry::OperationRegistry;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

/// Collects registrations before the pipeline is frozen.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    registry: OperationRegistry,
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns `false` if an operation is already registered for `op`'s input type.
    pub fn register(&mut self, op: Box<dyn Operation>) -> bool {
        self.registry.register(op)
    }

    /// Chainable `register`. A duplicate is dropped (and logged by the registry).
    pub fn with<O: Operation + 'static>(mut self, op: O) -> Self {
        self.register(Box::new(op));
        self
    }

    pub fn build(self) -> ComputePipeline {
        info!(
            operations = self.registry.len(),
            max_steps = ?self.config.max_steps,
            "pipeline built"
        );
        ComputePipeline {
            registry: self.registry,
            config: self.config,
        }
    }
}

/// A frozen registry plus the execution loop.
///
/// `execute` only borrows `self`, so a pipeline can be shared (e.g. behind an
/// `Arc`) by any number of concurrent runs.
#[derive(Debug)]
pub struct ComputePipeline {
    registry: OperationRegistry,
    config: PipelineConfig,
}

impl ComputePipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the operation that would consume a datum of `type_id`.
    pub fn operation_for(&self, type_id: &str) -> Option<&'static str> {
        self.registry.lookup(type_id).map(|op| op.name())
    }

    /// Runs `input` through the chain until no operation matches or a step fails.
    pub fn execute(&self, input: Datum) -> Execution {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let span = info_span!("execute", %run_id);
        let _enter = span.enter();

        info!(input_type = input.type_id(), "pipeline run started");

        let mut current = input;
        let mut steps: Vec<StepRecord> = Vec::new();

        let outcome = loop {
            let input_type = current.type_id();
            let Some(operation) = self.registry.lookup(input_type) else {
                break Outcome::Success(current);
            };

            if let Some(limit) = self.config.max_steps {
                if steps.len() >= limit {
                    error!(limit, next = operation.name(), "step limit exceeded");
                    let error = OperationError::registry(format!(
                        "step limit of {} exceeded; registry likely cyclic",
                        limit
                    ))
                    .attributed_to(operation.name());
                    break Outcome::Failure(Failure {
                        error,
                        last_result: current,
                    });
                }
            }

            if operation.input_type() != input_type {
                error!(
                    operation = operation.name(),
                    declared = operation.input_type(),
                    actual = input_type,
                    "registry dispatched a datum of the wrong type"
                );
                let error = OperationError::registry(format!(
                    "wrong type registration: operation consumes {}, datum is {}",
                    operation.input_type(),
                    input_type
                ))
                .attributed_to(operation.name());
                break Outcome::Failure(Failure {
                    error,
                    last_result: current,
                });
            }

            let start = Instant::now();
            match operation.execute(current) {
                Ok(output) => {
                    let latency_ms = start.elapsed().as_millis() as u64;
                    debug!(
                        operation = operation.name(),
                        from = input_type,
                        to = output.type_id(),
                        latency_ms,
                        "step completed"
                    );
                    steps.push(StepRecord {
                        operation: operation.name().to_string(),
                        input_type: input_type.to_string(),
                        output_type: output.type_id().to_string(),
                        output_digest: if self.config.record_digests {
                            output.digest()
                        } else {
                            None
                        },
                        latency_ms,
                    });
                    current = output;
                }
                Err(Rejection { error, input }) => {
                    let error = error.attributed_to(operation.name());
                    warn!(%error, completed = steps.len(), "operation failed");
                    break Outcome::Failure(Failure {
                        error,
                        last_result: input,
                    });
                }
            }
        };

        info!(
            steps = steps.len(),
            success = matches!(outcome, Outcome::Success(_)),
            "pipeline run finished"
        );

        Execution {
            run_id,
            started_at,
            finished_at: Utc::now(),
            steps,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::operation::from_fn;

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = ComputePipeline::builder().build();
        let run = pipeline.execute(Datum::Text("as-is".into()));

        assert!(run.is_success());
        assert!(run.executed_operations().is_empty());
        assert_eq!(run.data().and_then(Datum::as_str), Some("as-is"));
    }

    #[test]
    fn test_builder_with_drops_duplicates() {
        let pipeline = ComputePipeline::builder()
            .with(from_fn("First", Datum::TEXT, |_| Ok(Datum::Compressed(vec![1]))))
            .with(from_fn("Second", Datum::TEXT, |_| Ok(Datum::Compressed(vec![2]))))
            .build();

        assert_eq!(pipeline.registry().len(), 1);
        assert_eq!(pipeline.operation_for(Datum::TEXT), Some("First"));
        assert_eq!(pipeline.operation_for(Datum::COMPRESSED), None);
    }

    #[test]
    fn test_step_limit_stops_cycles() {
        let pipeline = ComputePipeline::builder()
            .config(PipelineConfig::default().with_max_steps(5))
            .with(from_fn("Ping", Datum::TEXT, |d| match d {
                Datum::Text(t) => Ok(Datum::Uri(t)),
                other => Ok(other),
            }))
            .with(from_fn("Pong", Datum::URI, |d| match d {
                Datum::Uri(u) => Ok(Datum::Text(u)),
                other => Ok(other),
            }))
            .build();

        let run = pipeline.execute(Datum::Text("loop".into()));
        let error = run.error().unwrap();

        assert_eq!(error.kind, ErrorKind::RegistryError);
        assert_eq!(run.steps().len(), 5);
        // ping, pong, ping, pong, ping: the uri left over was headed for pong
        assert_eq!(error.operation, "Pong");
        assert_eq!(run.last_result().map(Datum::type_id), Some(Datum::URI));
    }

    #[test]
    fn test_digests_can_be_disabled() {
        let pipeline = ComputePipeline::builder()
            .config(PipelineConfig::default().with_digests(false))
            .with(from_fn("Zip", Datum::TEXT, |_| Ok(Datum::Compressed(vec![9]))))
            .build();

        let run = pipeline.execute(Datum::Text("x".into()));
        assert_eq!(run.steps()[0].output_digest, None);
        assert_eq!(run.steps()[0].output_type, Datum::COMPRESSED);
    }
}
