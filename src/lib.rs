//! Vigil - LLM-assisted source review engine
//!
//! A bounded, concurrent analysis engine that checks source files against
//! natural-language rules by delegating judgment to an external oracle.
//! It provides:
//! - Cost-bounded file segmentation with overlap
//! - Per-segment and per-file wall-clock deadlines
//! - A bounded worker pool streaming results in completion order
//! - Durable, resumable per-run progress
//! - Deduplication of findings produced by overlapping segments

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export the core surface
pub use models::finding::Finding;
pub use models::result::{FileResult, FileStatus};
pub use models::rule::{Rule, Severity};
pub use models::run::{RunState, RunStatus};
pub use models::settings::ReviewConfig;
pub use services::analyzer::file::FileAnalyzer;
pub use services::batch::{BatchEvent, BatchOrchestrator, BatchRunResult, RunSummary};
pub use services::discovery::discover_files;
pub use services::rules::{RuleSource, StaticRuleSource};
pub use services::segmenter::{Segment, Segmenter};
pub use storage::runs::{RunOverview, RunStore};
pub use utils::error::{AppError, AppResult};
