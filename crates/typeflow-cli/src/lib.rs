//! Typeflow CLI: runs URIs through the reference pipeline
pub mod user_data;

pub use user_data::{UserData, UserDataDeserializationOperation};

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use typeflow_core::{ComputePipeline, Datum, ExecutionReport, PipelineConfig};
use typeflow_ops::{standard_builder, CannedFetcher, LoadOperation};

/// URI run when none is given on the command line.
pub const DEFAULT_URI: &str = "http://website.com/data.json";

/// Result of one URI, as printed by the binary.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub uri: String,
    pub report: ExecutionReport,
    pub user: Option<UserData>,
}

/// Reference operations plus the user-data step, with a canned user record
/// behind `DEFAULT_URI` and a tiny image behind `bundle://logo.raw`.
pub fn build_pipeline(config: PipelineConfig) -> ComputePipeline {
    let user = json!({
        "userId": "11",
        "name": "John Smith",
        "email": "john.smith@gmail.com",
    });
    let fetcher = CannedFetcher::new().with_response(DEFAULT_URI, user.to_string());
    let load = LoadOperation::new(fetcher).with_asset("logo.raw", vec![0x00, 0x11, 0x22]);

    standard_builder(load)
        .config(config)
        .with(UserDataDeserializationOperation)
        .build()
}

/// Executes every URI on the blocking pool, one independent run each.
///
/// Outputs come back in the order of `uris`.
pub async fn run(uris: Vec<String>, pipeline: Arc<ComputePipeline>) -> anyhow::Result<Vec<RunOutput>> {
    let handles: Vec<_> = uris
        .into_iter()
        .map(|uri| {
            let pipeline = Arc::clone(&pipeline);
            tokio::task::spawn_blocking(move || {
                let execution = pipeline.execute(Datum::Uri(uri.clone()));
                (uri, execution)
            })
        })
        .collect();

    let mut outputs = Vec::with_capacity(handles.len());
    for handle in handles {
        let (uri, execution) = handle.await?;
        let user = execution
            .data()
            .and_then(|datum| datum.downcast_ref::<UserData>())
            .cloned();

        match (&user, execution.error()) {
            (Some(user), _) => tracing::info!(%uri, name = %user.name, "received user"),
            (None, Some(error)) => tracing::warn!(%uri, %error, "run failed"),
            (None, None) => tracing::info!(%uri, "run finished"),
        }

        outputs.push(RunOutput {
            uri,
            report: execution.report(),
            user,
        });
    }

    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeflow_core::RunStatus;

    #[tokio::test]
    async fn test_default_uri_yields_user() {
        let pipeline = Arc::new(build_pipeline(PipelineConfig::default()));
        let outputs = run(vec![DEFAULT_URI.to_string()], pipeline).await.unwrap();

        let output = &outputs[0];
        assert_eq!(output.report.status, RunStatus::Ok);
        assert_eq!(output.report.data_type, UserData::TYPE);
        assert_eq!(output.user.as_ref().map(|u| u.name.as_str()), Some("John Smith"));
        let trace: Vec<_> = output.report.steps.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(
            trace,
            vec![
                "LoadOperation",
                "JsonDeserializeOperation",
                "UserDataDeserializationOperation"
            ]
        );
    }

    #[tokio::test]
    async fn test_outputs_keep_input_order() {
        let pipeline = Arc::new(build_pipeline(PipelineConfig::default()));
        let uris = vec![
            "bundle://logo.raw".to_string(),
            "ftp://unsupported".to_string(),
            DEFAULT_URI.to_string(),
        ];

        let outputs = run(uris.clone(), pipeline).await.unwrap();

        let seen: Vec<_> = outputs.iter().map(|o| o.uri.clone()).collect();
        assert_eq!(seen, uris);
        assert_eq!(outputs[0].report.data_type, Datum::DECODED_IMAGE);
        assert_eq!(outputs[1].report.status, RunStatus::Failed);
        assert_eq!(
            outputs[1].report.error.as_ref().map(|e| e.operation.as_str()),
            Some("LoadOperation")
        );
    }
}
