//! Sequential batch driver with a per-record all-or-nothing gate.
//!
//! Records are processed strictly one at a time, in input order. For a
//! record, all four content kinds must come back non-empty before any
//! assembly starts; the first failure marks the record failed and the
//! driver moves to the next jurisdiction without writing anything for
//! this one. A failed record never has a partial document on disk.
//!
//! Concurrency is deliberately absent: the content calls dominate the
//! runtime and the hosted API rate-limits aggressively, so interleaving
//! records buys little and makes the log unreadable. Cancellation (the
//! CLI's Ctrl-C handler) is a flag checked between records, so the
//! summary always reflects completed work only.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::config::{GenerationConfig, OutputFormat};
use crate::error::{ContractGenError, RecordError};
use crate::pipeline::assemble::{assemble, ContentSet};
use crate::pipeline::content::ContentService;
use crate::prompts::{self, PromptVariant};
use crate::states::{ContentKind, JurisdictionRecord};
use crate::artifact;

/// What happened to one jurisdiction.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub state: String,
    pub abbrev: String,
    /// Paths written for this record; empty when the record failed.
    pub artifacts: Vec<PathBuf>,
    pub error: Option<RecordError>,
}

impl RecordOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Records the driver actually started (≤ input length when
    /// interrupted).
    pub attempted: usize,
    pub succeeded: usize,
    /// True when cancellation stopped the run before the last record.
    pub interrupted: bool,
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchSummary {
    pub fn failed(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn failure_count(&self) -> usize {
        self.attempted - self.succeeded
    }

    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.succeeded == 0
    }
}

fn prompt_variant(format: OutputFormat) -> PromptVariant {
    match format {
        OutputFormat::Pdf => PromptVariant::Markdown,
        OutputFormat::Html => PromptVariant::Html,
    }
}

/// Generate and assemble one jurisdiction's document.
///
/// The content gate runs first: each of the four kinds is requested in a
/// fixed order and the first sentinel or whitespace-only reply fails the
/// record before any assembly or filesystem work happens.
pub async fn run_record<C: ContentService>(
    config: &GenerationConfig,
    record: &JurisdictionRecord,
    service: &C,
    date: NaiveDate,
) -> RecordOutcome {
    let variant = prompt_variant(config.format);
    let mut content = ContentSet::default();

    for kind in ContentKind::ALL {
        let prompt = prompts::build(kind, variant, record);
        match service.generate(&prompt).await {
            None => {
                warn!(state = %record.state, %kind, "content call failed");
                return failed_outcome(
                    record,
                    RecordError::ContentFailed {
                        state: record.state.clone(),
                        kind,
                    },
                );
            }
            Some(reply) if reply.trim().is_empty() => {
                warn!(state = %record.state, %kind, "content reply was empty");
                return failed_outcome(
                    record,
                    RecordError::EmptyContent {
                        state: record.state.clone(),
                        kind,
                    },
                );
            }
            Some(reply) => content.set(kind, reply),
        }
    }

    match assemble(config, record, &content, date).await {
        Ok(artifacts) => {
            info!(state = %record.state, count = artifacts.len(), "record complete");
            RecordOutcome {
                state: record.state.clone(),
                abbrev: record.abbrev.clone(),
                artifacts,
                error: None,
            }
        }
        Err(e) => {
            error!(state = %record.state, error = %e, "assembly failed");
            failed_outcome(record, e)
        }
    }
}

fn failed_outcome(record: &JurisdictionRecord, error: RecordError) -> RecordOutcome {
    RecordOutcome {
        state: record.state.clone(),
        abbrev: record.abbrev.clone(),
        artifacts: Vec::new(),
        error: Some(error),
    }
}

/// Run the full batch sequentially.
///
/// `on_record` is called after each record completes (success or
/// failure) — the CLI hooks its progress display here. `cancel` is
/// polled between records; once set, no further record starts and the
/// summary is marked interrupted.
pub async fn run_batch<C, F>(
    config: &GenerationConfig,
    records: &[JurisdictionRecord],
    service: &C,
    date: NaiveDate,
    cancel: &AtomicBool,
    mut on_record: F,
) -> Result<BatchSummary, ContractGenError>
where
    C: ContentService,
    F: FnMut(&RecordOutcome),
{
    artifact::ensure_output_dir(&config.output_dir).await?;
    info!(
        records = records.len(),
        format = config.format.as_str(),
        output_dir = %config.output_dir.display(),
        "starting batch"
    );

    let mut summary = BatchSummary::default();
    for record in records {
        if cancel.load(Ordering::Relaxed) {
            warn!("cancelled; stopping before {}", record.state);
            summary.interrupted = true;
            break;
        }

        summary.attempted += 1;
        let outcome = run_record(config, record, service, date).await;
        if outcome.succeeded() {
            summary.succeeded += 1;
        }
        on_record(&outcome);
        summary.outcomes.push(outcome);
    }

    info!(
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failure_count(),
        interrupted = summary.interrupted,
        "batch finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states;

    /// Canned service: table prompts get a rectangular pipe table,
    /// everything else gets headed prose. Prompts mentioning a state in
    /// `fail_for` get the failure sentinel.
    struct StubService {
        fail_for: Vec<&'static str>,
        empty_for: Vec<&'static str>,
    }

    impl StubService {
        fn healthy() -> Self {
            Self {
                fail_for: vec![],
                empty_for: vec![],
            }
        }
    }

    impl ContentService for StubService {
        async fn generate(&self, prompt: &str) -> Option<String> {
            if self.fail_for.iter().any(|s| prompt.contains(s)) {
                return None;
            }
            if self.empty_for.iter().any(|s| prompt.contains(s)) {
                return Some("   \n".to_string());
            }
            if prompt.contains("pipe-separated") {
                Some("Col A | Col B\none | two\nthree | four".to_string())
            } else {
                Some("# Contract\n## Scope\nProse paragraph.".to_string())
            }
        }
    }

    fn two_records() -> Vec<JurisdictionRecord> {
        states::filter_by_abbrev(states::builtin().to_vec(), "FL,TX").unwrap()
    }

    fn config_in(dir: &std::path::Path) -> GenerationConfig {
        GenerationConfig::builder()
            .output_dir(dir)
            .build()
            .unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn failed_content_gate_skips_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let service = StubService {
            fail_for: vec!["Florida"],
            empty_for: vec![],
        };
        let outcome = run_record(&config_in(dir.path()), &two_records()[0], &service, date()).await;
        assert!(!outcome.succeeded());
        assert!(outcome.artifacts.is_empty());
        assert!(matches!(
            outcome.error,
            Some(RecordError::ContentFailed {
                kind: ContentKind::Contract,
                ..
            })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn whitespace_reply_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let service = StubService {
            fail_for: vec![],
            empty_for: vec!["Florida"],
        };
        let outcome = run_record(&config_in(dir.path()), &two_records()[0], &service, date()).await;
        assert!(matches!(
            outcome.error,
            Some(RecordError::EmptyContent { .. })
        ));
    }

    #[tokio::test]
    async fn batch_continues_past_a_failed_record() {
        let dir = tempfile::tempdir().unwrap();
        let service = StubService {
            fail_for: vec!["Florida"],
            empty_for: vec![],
        };
        let cancel = AtomicBool::new(false);
        let summary = run_batch(
            &config_in(dir.path()),
            &two_records(),
            &service,
            date(),
            &cancel,
            |_| {},
        )
        .await
        .unwrap();
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failure_count(), 1);
        assert!(!summary.interrupted);
        let failed: Vec<_> = summary.failed().map(|o| o.abbrev.as_str()).collect();
        assert_eq!(failed, vec!["FL"]);
    }

    #[tokio::test]
    async fn cancel_flag_stops_before_next_record() {
        let dir = tempfile::tempdir().unwrap();
        let service = StubService::healthy();
        let cancel = AtomicBool::new(true);
        let summary = run_batch(
            &config_in(dir.path()),
            &two_records(),
            &service,
            date(),
            &cancel,
            |_| {},
        )
        .await
        .unwrap();
        assert_eq!(summary.attempted, 0);
        assert!(summary.interrupted);
    }

    #[tokio::test]
    async fn all_failed_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let service = StubService {
            fail_for: vec!["Florida", "Texas"],
            empty_for: vec![],
        };
        let cancel = AtomicBool::new(false);
        let summary = run_batch(
            &config_in(dir.path()),
            &two_records(),
            &service,
            date(),
            &cancel,
            |_| {},
        )
        .await
        .unwrap();
        assert!(summary.all_failed());
    }
}
