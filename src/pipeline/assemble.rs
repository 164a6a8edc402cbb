//! Document assembly: four content replies → on-disk artifacts.
//!
//! One entry point, [`assemble`], dispatches on the configured
//! [`OutputFormat`]. Both variants share naming ([`crate::artifact`])
//! and the atomic-write discipline; they differ in how much structure
//! they impose on the replies. The direct-PDF variant parses prose and
//! tables into models and refuses malformed tables; the HTML variant
//! embeds the model's table fragments verbatim and delegates rendering
//! to `wkhtmltopdf`.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::artifact;
use crate::config::{GenerationConfig, OutputFormat};
use crate::error::{ContractGenError, RecordError};
use crate::pipeline::{html, parse, pdf};
use crate::states::{ContentKind, JurisdictionRecord};

pub const RATES_TITLE: &str = "Attachment A: Rate Schedule";
pub const SERVICE_AREAS_TITLE: &str = "Attachment B: Service Areas";
pub const PERFORMANCE_TITLE: &str = "Attachment C: Performance Standards";

/// The four replies for one record, all present and non-empty — the
/// batch driver's gate guarantees that before assembly starts.
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    pub contract: String,
    pub rates: String,
    pub service_areas: String,
    pub performance: String,
}

impl ContentSet {
    pub fn set(&mut self, kind: ContentKind, text: String) {
        match kind {
            ContentKind::Contract => self.contract = text,
            ContentKind::Rates => self.rates = text,
            ContentKind::ServiceAreas => self.service_areas = text,
            ContentKind::Performance => self.performance = text,
        }
    }

    pub fn get(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Contract => &self.contract,
            ContentKind::Rates => &self.rates,
            ContentKind::ServiceAreas => &self.service_areas,
            ContentKind::Performance => &self.performance,
        }
    }
}

/// Assemble and write the artifacts for one record.
///
/// Returns the paths written, in write order. On error nothing new is
/// left behind except, in HTML mode, the `.html` intermediate (kept
/// deliberately when only the external render step fails).
pub async fn assemble(
    config: &GenerationConfig,
    record: &JurisdictionRecord,
    content: &ContentSet,
    date: NaiveDate,
) -> Result<Vec<PathBuf>, RecordError> {
    let stem = artifact::basename(&config.base_name, &record.abbrev, date);
    match config.format {
        OutputFormat::Pdf => assemble_pdf(config, record, content, date, &stem).await,
        OutputFormat::Html => assemble_html(config, record, content, date, &stem).await,
    }
}

async fn assemble_pdf(
    config: &GenerationConfig,
    record: &JurisdictionRecord,
    content: &ContentSet,
    date: NaiveDate,
    stem: &str,
) -> Result<Vec<PathBuf>, RecordError> {
    let body = parse::parse_blocks(&content.contract);
    let tables = vec![
        (RATES_TITLE.to_string(), parse::parse_pipe_table(&content.rates)),
        (
            SERVICE_AREAS_TITLE.to_string(),
            parse::parse_pipe_table(&content.service_areas),
        ),
        (
            PERFORMANCE_TITLE.to_string(),
            parse::parse_pipe_table(&content.performance),
        ),
    ];

    let bytes = pdf::render_pdf(record, &body, &tables, date)?;

    let path = config.output_dir.join(format!("{stem}.pdf"));
    artifact::write_atomic(&path, &bytes)
        .await
        .map_err(|e| write_failed(record, &path, e))?;
    info!(state = %record.state, path = %path.display(), "wrote contract PDF");
    Ok(vec![path])
}

async fn assemble_html(
    config: &GenerationConfig,
    record: &JurisdictionRecord,
    content: &ContentSet,
    date: NaiveDate,
    stem: &str,
) -> Result<Vec<PathBuf>, RecordError> {
    let body = html::blocks_to_html(&parse::parse_blocks(&content.contract));
    let document = html::render_document(
        record,
        date,
        &body,
        &content.rates,
        &content.service_areas,
        &content.performance,
    );

    let html_path = config.output_dir.join(format!("{stem}.html"));
    artifact::write_atomic(&html_path, document.as_bytes())
        .await
        .map_err(|e| write_failed(record, &html_path, e))?;

    let pdf_path = config.output_dir.join(format!("{stem}.pdf"));
    html::convert_to_pdf(config, record, date, &document, &html_path, &pdf_path).await?;
    info!(state = %record.state, path = %pdf_path.display(), "wrote contract PDF via renderer");
    Ok(vec![html_path, pdf_path])
}

fn write_failed(
    record: &JurisdictionRecord,
    path: &std::path::Path,
    source: ContractGenError,
) -> RecordError {
    RecordError::WriteFailed {
        state: record.state.clone(),
        path: path.display().to_string(),
        detail: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states;

    fn record() -> JurisdictionRecord {
        states::builtin()
            .iter()
            .find(|s| s.abbrev == "CA")
            .unwrap()
            .clone()
    }

    fn content() -> ContentSet {
        let table = "Service Type | Base Rate\nStandard | $45\nStretcher | $120";
        ContentSet {
            contract: "# Contract\n## Scope\nThe provider shall operate statewide.".into(),
            rates: table.into(),
            service_areas: table.into(),
            performance: table.into(),
        }
    }

    #[test]
    fn content_set_round_trips_by_kind() {
        let mut set = ContentSet::default();
        for kind in ContentKind::ALL {
            set.set(kind, format!("reply for {kind}"));
        }
        for kind in ContentKind::ALL {
            assert_eq!(set.get(kind), format!("reply for {kind}"));
        }
    }

    #[tokio::test]
    async fn pdf_assembly_writes_one_dated_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::builder()
            .output_dir(dir.path())
            .build()
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let paths = assemble(&config, &record(), &content(), date).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(
            paths[0].file_name().unwrap(),
            "Transportation_Contract_CA_20240315.pdf"
        );
        assert!(paths[0].exists());
    }

    #[tokio::test]
    async fn ragged_table_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::builder()
            .output_dir(dir.path())
            .build()
            .unwrap();
        let mut bad = content();
        bad.rates = "A | B | C\n1 | 2".into();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let err = assemble(&config, &record(), &bad, date).await.unwrap_err();
        assert!(matches!(err, RecordError::TableShape { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn html_assembly_writes_html_even_when_renderer_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::builder()
            .format(OutputFormat::Html)
            .output_dir(dir.path())
            .wkhtmltopdf("/nonexistent/wkhtmltopdf-binary")
            .build()
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let err = assemble(&config, &record(), &content(), date).await.unwrap_err();
        assert!(matches!(err, RecordError::RenderFailed { .. }));
        assert!(dir
            .path()
            .join("Transportation_Contract_CA_20240315.html")
            .exists());
    }
}
