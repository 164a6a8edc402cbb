//! contractgen — batch generator for per-state medical-transportation
//! contract documents.
//!
//! Each jurisdiction record (contracting agency, provider, regions,
//! dates, fleet facts) drives four content requests against a hosted
//! text model — contract body, rate schedule, service areas, and
//! performance standards — whose replies are parsed and assembled into
//! one dated document per state. Two assemblers are available: direct
//! PDF layout (title page, table of contents, styled attachment tables)
//! or an HTML document converted by an external `wkhtmltopdf`.
//!
//! The batch driver is strictly sequential and all-or-nothing per
//! record: a state either gets its complete document or nothing at all,
//! and one failed state never stops the rest of the batch.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//!
//! use contractgen::pipeline::AnthropicClient;
//! use contractgen::{run_batch, states, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::builder()
//!         .output_dir("contracts")
//!         .build()?;
//!     let client = AnthropicClient::from_env(&config)?;
//!     let records = states::builtin().to_vec();
//!     let today = chrono::Local::now().date_naive();
//!     let cancel = AtomicBool::new(false);
//!
//!     let summary = run_batch(&config, &records, &client, today, &cancel, |outcome| {
//!         println!("{}: {}", outcome.abbrev, if outcome.succeeded() { "ok" } else { "failed" });
//!     })
//!     .await?;
//!
//!     println!("{}/{} documents written", summary.succeeded, summary.attempted);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod states;

pub use batch::{run_batch, run_record, BatchSummary, RecordOutcome};
pub use config::{GenerationConfig, GenerationConfigBuilder, OutputFormat, RenderStrategy};
pub use error::{ContractGenError, RecordError};
pub use pipeline::{AnthropicClient, ContentService};
pub use states::{ContentKind, JurisdictionRecord};
