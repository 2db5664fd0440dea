//! AWS Lambda entrypoint
//!
//! The trigger event (schedule or manual invoke) carries no parameters the pipeline uses;
//! it is logged and otherwise ignored.

use crate::pipeline::ImagePipeline;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};

/// Run the pipeline once per invocation
///
/// Returns `true` when the run finished. Fatal pipeline errors are returned to the runtime,
/// which reports the invocation as failed.
pub async fn function_handler(event: LambdaEvent<Value>, pipeline: &ImagePipeline) -> Result<bool, Error> {
    let (payload, context) = event.into_parts();
    let span = info_span!("invocation", request_id = %context.request_id);

    async move {
        debug!(event = %payload, "Invocation received");

        let report = pipeline.run().await?;

        if !report.is_complete() {
            warn!(
                run_id = %report.run_id,
                partial = report.partial(),
                failed = report.failed(),
                "Run finished with skipped uploads"
            );
        }

        Ok::<_, Error>(true)
    }
    .instrument(span)
    .await
}
