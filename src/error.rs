use thiserror::Error;

/// Failure classes surfaced by the analysis pipeline. Each maps to a distinct
/// remediation: retry with manual content, inspect the raw model output, or
/// fix provider configuration.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Direct fetch and every proxy fallback failed for one URL.
    #[error("could not retrieve {url} directly or through any proxy; check the URL or supply the page text manually")]
    FetchFailure { url: String },

    /// The provider replied, but no JSON object could be recovered from the
    /// reply. The raw output is preserved so it can be inspected or re-parsed.
    #[error("the model reply contained no parseable JSON object")]
    ExtractionFailure { raw_output: String },

    /// The provider could not be reached, rejected the request, or is not
    /// configured with a credential.
    #[error("model provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },
}
