//! Execution Result: outcome, trace and step records of one run
use crate::datum::Datum;
use crate::error::OperationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One successfully executed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub operation: String,
    pub input_type: String,
    pub output_type: String,
    pub output_digest: Option<String>,
    pub latency_ms: u64,
}

/// A run that stopped on an operation error.
///
/// `last_result` is the datum that was current when the failing operation
/// was dispatched; calling `execute` on it again resumes from that point.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Failure {
    pub error: OperationError,
    pub last_result: Datum,
}

#[derive(Debug)]
pub enum Outcome {
    /// Terminal datum: no operation is registered for its type.
    Success(Datum),
    Failure(Failure),
}

/// Everything a caller gets back from `ComputePipeline::execute`.
#[derive(Debug)]
pub struct Execution {
    pub(crate) run_id: Uuid,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) finished_at: DateTime<Utc>,
    pub(crate) steps: Vec<StepRecord>,
    pub(crate) outcome: Outcome,
}

impl Execution {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Names of the operations that completed, in execution order.
    pub fn executed_operations(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.operation.as_str()).collect()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// Terminal datum of a successful run.
    pub fn data(&self) -> Option<&Datum> {
        match &self.outcome {
            Outcome::Success(datum) => Some(datum),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&OperationError> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(&failure.error),
        }
    }

    /// Last datum produced before a failure. `None` on success.
    pub fn last_result(&self) -> Option<&Datum> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(&failure.last_result),
        }
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    pub fn into_result(self) -> Result<Datum, Failure> {
        match self.outcome {
            Outcome::Success(datum) => Ok(datum),
            Outcome::Failure(failure) => Err(failure),
        }
    }

    /// Serializable summary of the run.
    pub fn report(&self) -> ExecutionReport {
        let (status, datum, error) = match &self.outcome {
            Outcome::Success(datum) => (RunStatus::Ok, datum, None),
            Outcome::Failure(failure) => {
                (RunStatus::Failed, &failure.last_result, Some(failure.error.clone()))
            }
        };

        ExecutionReport {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: self.finished_at,
            status,
            data_type: datum.type_id().to_string(),
            data_digest: datum.digest(),
            error,
            steps: self.steps.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: RunStatus,
    /// Type of the terminal datum, or of the last good datum on failure
    pub data_type: String,
    pub data_digest: Option<String>,
    pub error: Option<OperationError>,
    pub steps: Vec<StepRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execution(outcome: Outcome, steps: Vec<StepRecord>) -> Execution {
        let now = Utc::now();
        Execution {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            steps,
            outcome,
        }
    }

    fn step(name: &str) -> StepRecord {
        StepRecord {
            operation: name.to_string(),
            input_type: Datum::URI.to_string(),
            output_type: Datum::TEXT.to_string(),
            output_digest: None,
            latency_ms: 0,
        }
    }

    #[test]
    fn test_success_accessors() {
        let run = execution(Outcome::Success(Datum::Text("done".into())), vec![step("Load")]);

        assert!(run.is_success());
        assert_eq!(run.executed_operations(), vec!["Load"]);
        assert_eq!(run.data().and_then(Datum::as_str), Some("done"));
        assert!(run.error().is_none());
        assert!(run.last_result().is_none());
    }

    #[test]
    fn test_failure_report() {
        let failure = Failure {
            error: OperationError::file("missing").attributed_to("Load"),
            last_result: Datum::Uri("file:///nope".into()),
        };
        let run = execution(Outcome::Failure(failure), vec![]);
        let report = run.report();

        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.data_type, Datum::URI);
        assert_eq!(report.error.as_ref().map(|e| e.operation.as_str()), Some("Load"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["kind"], "FileError");

        let failure = run.into_result().unwrap_err();
        assert_eq!(failure.to_string(), "FILE/Load: missing");
    }
}
