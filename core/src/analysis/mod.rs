//! Streaming analysis: records in, one LLM-backed result record per chunk out
//!
//! - `record`: input `Record`, output `ResultRecord`, `AnalysisResult`
//! - `format`: event rendering for prompts
//! - `prompt`: chunk and synthesis prompt templates
//! - `summary`: carryover digest heuristic
//! - `options`: command options and their resolution against config
//! - `pipeline`: the chunking state machine

mod format;
mod options;
mod pipeline;
mod prompt;
mod record;
mod summary;

pub use format::format_events;
pub use options::{
    AnalysisSettings, AnalyzeOptions, CHUNK_SIZE_RANGE, MAX_TOKENS_RANGE, TEMPERATURE_RANGE,
};
pub use pipeline::ChunkPipeline;
pub use prompt::{build_prompt, mode_instruction, synthesis_prompt, PromptInput};
pub use record::{AnalysisResult, ChunkId, ChunkOutcome, Record, ResultRecord, StreamFailure};
pub use summary::{extract_summary, locate_summary};
