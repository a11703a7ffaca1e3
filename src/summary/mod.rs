//! Natural-language report over [`SummaryStats`].
//!
//! ```text
//!   SummaryStats ──► prompt ──► TextGenerator ──► "**Live AI Analysis** ..."
//!                                   │ error
//!                                   ▼
//!                              fallback template ──► "**Credit Risk Analysis** (local fallback) ..."
//! ```
//!
//! [`SummaryStats`]: crate::data::aggregate::SummaryStats

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

use crate::data::aggregate::SummaryStats;

pub use client::{OpenAiClient, TextGenerator};
pub use config::SummaryConfig;
pub use error::SummaryServiceError;

/// Prefix of a report written by the text service.
pub const GENERATED_MARKER: &str = "**Live AI Analysis**";
/// Prefix of a report rendered locally after the service failed.
pub const FALLBACK_MARKER: &str = "**Credit Risk Analysis** (local fallback)";

/// How a summary was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    Generated { model: String, text: String },
    Fallback { error: String, text: String },
}

impl SummaryOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SummaryOutcome::Fallback { .. })
    }

    /// Final report text, marker included.
    pub fn text(&self) -> &str {
        match self {
            SummaryOutcome::Generated { text, .. } | SummaryOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            SummaryOutcome::Generated { text, .. } | SummaryOutcome::Fallback { text, .. } => text,
        }
    }
}

/// Turns stats into report text through a [`TextGenerator`], falling back to
/// a local template on any failure. One attempt per call, no retries.
pub struct Summarizer<G> {
    generator: G,
}

impl<G: TextGenerator> Summarizer<G> {
    pub fn new(generator: G) -> Self {
        Summarizer { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Always returns a non-empty report.
    pub fn summarize(&self, stats: &SummaryStats) -> String {
        self.summarize_outcome(stats).into_text()
    }

    pub fn summarize_outcome(&self, stats: &SummaryStats) -> SummaryOutcome {
        let prompt = prompt::render_prompt(stats);
        log::debug!("Requesting summary from {}", self.generator.model());
        match self.generator.generate(&prompt) {
            Ok(body) if !body.trim().is_empty() => SummaryOutcome::Generated {
                model: self.generator.model().to_string(),
                text: format!("{GENERATED_MARKER} ({})\n\n{}", self.generator.model(), body.trim()),
            },
            Ok(_) => {
                let err = SummaryServiceError::MalformedResponse("empty completion".to_string());
                fall_back(stats, &err)
            }
            Err(err) => fall_back(stats, &err),
        }
    }
}

fn fall_back(stats: &SummaryStats, err: &SummaryServiceError) -> SummaryOutcome {
    log::warn!("Summary service failed, using local template: {err}");
    let error = err.to_string();
    SummaryOutcome::Fallback {
        text: prompt::render_fallback(stats, &error),
        error,
    }
}

/// Summarize through a fresh [`OpenAiClient`] built from `config`. A client
/// that cannot be built takes the fallback branch like any other failure.
pub fn summarize_with(config: &SummaryConfig, stats: &SummaryStats) -> SummaryOutcome {
    match OpenAiClient::new(config.clone()) {
        Ok(client) => Summarizer::new(client).summarize_outcome(stats),
        Err(err) => fall_back(stats, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::RiskEstimate;

    struct Failing;

    impl TextGenerator for Failing {
        fn model(&self) -> &str {
            "failing"
        }
        fn generate(&self, _prompt: &str) -> Result<String, SummaryServiceError> {
            Err(SummaryServiceError::MissingCredential)
        }
    }

    struct Canned(&'static str);

    impl TextGenerator for Canned {
        fn model(&self) -> &str {
            "canned-model"
        }
        fn generate(&self, prompt: &str) -> Result<String, SummaryServiceError> {
            assert!(prompt.contains("Total records: 42"));
            Ok(self.0.to_string())
        }
    }

    fn stats() -> SummaryStats {
        SummaryStats {
            count: 42,
            mean_credit_amount: Some(3271.26),
            mean_age: Some(35.5),
            mean_duration: Some(20.9),
            risk: Some(RiskEstimate::placeholder()),
        }
    }

    #[test]
    fn failure_falls_back_with_count_and_error() {
        let text = Summarizer::new(Failing).summarize(&stats());
        assert!(text.starts_with(FALLBACK_MARKER));
        assert!(text.contains("42"));
        assert!(text.contains(&SummaryServiceError::MissingCredential.to_string()));
    }

    #[test]
    fn fallback_keeps_count_ungrouped() {
        let stats = SummaryStats {
            count: 1000,
            ..stats()
        };
        let text = Summarizer::new(Failing).summarize(&stats);
        assert!(text.contains("1000 credit applications analyzed"));
    }

    #[test]
    fn success_is_marked_generated() {
        let outcome = Summarizer::new(Canned("  insights  ")).summarize_outcome(&stats());
        assert!(!outcome.is_fallback());
        assert_eq!(outcome.text(), format!("{GENERATED_MARKER} (canned-model)\n\ninsights"));
    }

    #[test]
    fn blank_completion_counts_as_failure() {
        let outcome = Summarizer::new(Canned("   ")).summarize_outcome(&stats());
        assert!(outcome.is_fallback());
    }

    #[test]
    fn empty_view_summary_has_no_nan() {
        let empty = SummaryStats {
            count: 0,
            mean_credit_amount: None,
            mean_age: None,
            mean_duration: None,
            risk: None,
        };
        let text = Summarizer::new(Failing).summarize(&empty);
        assert!(!text.is_empty());
        assert!(!text.contains("NaN"));
        assert!(text.contains('0'));
    }
}
