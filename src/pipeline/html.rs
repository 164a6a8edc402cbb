//! HTML assembly and external PDF conversion.
//!
//! The HTML variant builds one self-contained document from a fixed
//! template (inline stylesheet, print-media rules) and four content
//! slots, writes it as an artifact, then shells out to `wkhtmltopdf` to
//! produce the PDF. Table fragments from the model are embedded verbatim
//! — the prompt already requested `<thead>`/`<tbody>` markup, and
//! `wkhtmltopdf` is tolerant of imperfect table HTML in a way a drawing
//! engine is not.
//!
//! Conversion tries each configured [`RenderStrategy`] in order and
//! stops at the first success. When every strategy fails the record
//! fails with the collected reasons; the `.html` artifact written before
//! conversion is left in place so the run can be diagnosed (and the
//! document recovered by hand).

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use chrono::NaiveDate;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::{GenerationConfig, RenderStrategy};
use crate::error::RecordError;
use crate::pipeline::parse::DocumentBlock;
use crate::states::JurisdictionRecord;

/// Document shell. Slots are substituted by [`render_document`];
/// everything else, including the stylesheet, is fixed.
const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body {
    font-family: Arial, Helvetica, sans-serif;
    font-size: 11pt;
    line-height: 1.5;
    color: #1a1a1a;
    margin: 0;
}
h1 { font-size: 20pt; color: #2c3e50; border-bottom: 2px solid #2c3e50; padding-bottom: 6px; }
h2 { font-size: 15pt; color: #2c3e50; margin-top: 22px; }
h3 { font-size: 12pt; color: #34495e; }
p { text-align: justify; }
.cover { text-align: center; margin-top: 220px; page-break-after: always; }
.cover h1 { border: none; font-size: 26pt; }
.cover .date { font-size: 12pt; color: #555; }
.attachment { page-break-before: always; }
table {
    border-collapse: collapse;
    width: 100%;
    margin: 14px 0;
    font-size: 9pt;
}
th {
    background-color: #2c3e50;
    color: #ffffff;
    font-weight: bold;
    padding: 6px 8px;
    text-align: center;
}
td { border: 1px solid #999; padding: 5px 8px; }
tr:nth-child(even) { background-color: #f4f6f7; }
@media print {
    h1, h2, h3 { page-break-after: avoid; }
    table { page-break-inside: avoid; }
    tr { page-break-inside: avoid; }
}
</style>
</head>
<body>
<div class="cover">
<h1>{{ title }}</h1>
<p class="date">Generated: {{ date }}</p>
</div>
{{ contract_content }}
<div class="attachment">
<h2>Attachment A: Rate Schedule</h2>
{{ rate_schedule }}
</div>
<div class="attachment">
<h2>Attachment B: Service Areas</h2>
{{ service_areas }}
</div>
<div class="attachment">
<h2>Attachment C: Performance Standards</h2>
{{ performance_standards }}
</div>
</body>
</html>
"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convert parsed prose blocks into an HTML body fragment.
///
/// Heading depth maps to `<h1>`–`<h6>` (clamped). A line that already
/// starts with a tag is passed through verbatim: contract replies in
/// HTML mode arrive pre-tagged and must not be double-escaped.
pub fn blocks_to_html(blocks: &[DocumentBlock]) -> String {
    let mut html = String::new();
    for block in blocks {
        if block.is_heading() {
            let level = block.level.clamp(1, 6);
            html.push_str(&format!("<h{level}>{}</h{level}>\n", escape(&block.text)));
        } else if block.text.trim_start().starts_with('<') {
            html.push_str(&block.text);
            html.push('\n');
        } else {
            html.push_str(&format!("<p>{}</p>\n", escape(&block.text)));
        }
    }
    html
}

/// Substitute the four content slots plus title and date into the shell.
pub fn render_document(
    record: &JurisdictionRecord,
    date: NaiveDate,
    contract: &str,
    rates: &str,
    areas: &str,
    performance: &str,
) -> String {
    TEMPLATE
        .replace("{{ title }}", &escape(&record.document_title()))
        .replace("{{ date }}", &date.format("%B %d, %Y").to_string())
        .replace("{{ contract_content }}", contract)
        .replace("{{ rate_schedule }}", rates)
        .replace("{{ service_areas }}", areas)
        .replace("{{ performance_standards }}", performance)
}

/// Run `wkhtmltopdf`, trying each configured strategy in order.
///
/// `html_path` must already hold the document (the file-input strategies
/// read it); `html` is the same content, used by the stdin strategy.
pub async fn convert_to_pdf(
    config: &GenerationConfig,
    record: &JurisdictionRecord,
    date: NaiveDate,
    html: &str,
    html_path: &Path,
    pdf_path: &Path,
) -> Result<(), RecordError> {
    let mut failures: Vec<String> = Vec::new();

    for strategy in &config.render_strategies {
        match run_strategy(config, record, date, *strategy, html, html_path, pdf_path).await {
            Ok(()) => {
                debug!(?strategy, pdf = %pdf_path.display(), "render succeeded");
                return Ok(());
            }
            Err(reason) => {
                warn!(?strategy, %reason, "render strategy failed, trying next");
                failures.push(format!("{strategy:?}: {reason}"));
            }
        }
    }

    Err(RecordError::RenderFailed {
        state: record.state.clone(),
        attempts: config.render_strategies.len(),
        detail: failures.join("; "),
    })
}

/// The header/footer/margin option block shared by the file-input and
/// stdin strategies.
fn full_option_args(record: &JurisdictionRecord, date: NaiveDate) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "--margin-top",
        "25mm",
        "--margin-bottom",
        "25mm",
        "--margin-left",
        "25mm",
        "--margin-right",
        "25mm",
        "--enable-local-file-access",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push("--header-left".into());
    args.push(record.document_title().into());
    args.push("--header-right".into());
    args.push(format!("Generated: {}", date.format("%B %d, %Y")).into());
    args.extend(
        [
            "--header-font-size",
            "9",
            "--footer-left",
            "Confidential and Proprietary",
            "--footer-right",
            "[page] of [topage]",
            "--footer-font-size",
            "9",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args
}

/// Build the full argument list for one strategy. `FullOptions` and
/// `StdinInput` carry identical options and differ only in the input
/// channel; `MinimalOptions` drops everything but page size and
/// encoding.
fn strategy_args(
    record: &JurisdictionRecord,
    date: NaiveDate,
    strategy: RenderStrategy,
    html_path: &Path,
    pdf_path: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["--page-size", "Letter", "--encoding", "UTF-8", "--quiet"]
        .into_iter()
        .map(OsString::from)
        .collect();
    match strategy {
        RenderStrategy::FullOptions => {
            args.extend(full_option_args(record, date));
            args.push(html_path.as_os_str().to_owned());
        }
        RenderStrategy::StdinInput => {
            args.extend(full_option_args(record, date));
            args.push("-".into());
        }
        RenderStrategy::MinimalOptions => {
            args.push(html_path.as_os_str().to_owned());
        }
    }
    args.push(pdf_path.as_os_str().to_owned());
    args
}

async fn run_strategy(
    config: &GenerationConfig,
    record: &JurisdictionRecord,
    date: NaiveDate,
    strategy: RenderStrategy,
    html: &str,
    html_path: &Path,
    pdf_path: &Path,
) -> Result<(), String> {
    let mut cmd = Command::new(&config.wkhtmltopdf);
    cmd.args(strategy_args(record, date, strategy, html_path, pdf_path));
    if strategy == RenderStrategy::StdinInput {
        cmd.stdin(Stdio::piped());
    }
    cmd.stdout(Stdio::null()).stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|e| format!("failed to launch '{}': {e}", config.wkhtmltopdf.display()))?;

    if strategy == RenderStrategy::StdinInput {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|e| format!("failed to feed stdin: {e}"))?;
            // Dropping stdin closes the pipe so the renderer sees EOF.
        }
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| format!("renderer did not exit cleanly: {e}"))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "exit status {}: {}",
            output.status,
            stderr.trim().lines().last().unwrap_or("no diagnostics")
        ))
    }
}
