//! Tolerant recovery of a JSON object from free-text model output.

use serde_json::Value;
use tracing::debug;

use crate::error::AnalysisError;

/// Parses `model_output` as JSON, falling back to the span between the first
/// `{` and the last `}`. Models routinely wrap the object in prose or a
/// markdown fence; the greedy span recovers those replies without a repair
/// parser. Two separate objects in one reply still fail, because the span
/// covering both is not itself valid JSON.
pub fn extract_json_object(model_output: &str) -> Result<Value, AnalysisError> {
    if let Ok(value) = serde_json::from_str::<Value>(model_output) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (model_output.find('{'), model_output.rfind('}')) {
        if start < end {
            let candidate = &model_output[start..=end];
            match serde_json::from_str::<Value>(candidate) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!("Brace-delimited span is not valid JSON: {}", e);
                }
            }
        }
    }

    Err(AnalysisError::ExtractionFailure {
        raw_output: model_output.to_string(),
    })
}
