//! Binary entrypoint for the typeflow CLI.
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use typeflow_cli::{build_pipeline, run, DEFAULT_URI};
use typeflow_core::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log level from RUST_LOG, defaults to info. Logs go to stderr, reports to stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut uris: Vec<String> = std::env::args().skip(1).collect();
    if uris.is_empty() {
        uris.push(DEFAULT_URI.to_string());
    }

    let pipeline = Arc::new(build_pipeline(PipelineConfig::from_env()));
    let outputs = run(uris, pipeline).await?;

    let failed = outputs.iter().filter(|o| o.report.error.is_some()).count();
    for output in &outputs {
        println!("{}", serde_json::to_string_pretty(output)?);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} runs failed", failed, outputs.len());
    }
    Ok(())
}
