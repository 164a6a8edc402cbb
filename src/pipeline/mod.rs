//! The contract-generation pipeline.
//!
//! Data flows through four stages per jurisdiction record:
//!
//! ```text
//! JurisdictionRecord
//!        │  prompts::build (×4 content kinds)
//!        ▼
//! [content]   one model call per kind; `None` = failed, no retry
//!        │
//!        ▼
//! [parse]     prose → DocumentBlocks, tables → TableModel   (PDF mode)
//!        │
//!        ▼
//! [assemble]  dispatch on OutputFormat
//!        ├── [pdf]   direct layout via printpdf, two-pass TOC
//!        └── [html]  templated document + external wkhtmltopdf
//! ```
//!
//! Stages are independently testable: parsing and layout are pure,
//! content is behind the [`content::ContentService`] seam, and assembly
//! touches the filesystem only through [`crate::artifact`].

pub mod assemble;
pub mod content;
pub mod html;
pub mod parse;
pub mod pdf;

pub use assemble::{assemble, ContentSet};
pub use content::{AnthropicClient, ContentService};
pub use parse::{parse_blocks, parse_pipe_table, DocumentBlock, TableModel};
