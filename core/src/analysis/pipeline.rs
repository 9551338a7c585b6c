//! Chunking pipeline behind the `llmhandler` streaming command.
//!
//! Records accumulate into a buffer; when the buffer reaches the chunk size it
//! is flushed: formatted, sent to the LLM, and projected into one output
//! record. Every call is awaited before the next chunk starts so the carryover
//! summary of chunk `k` is available to chunk `k + 1`.

use super::format::format_events;
use super::options::{AnalysisSettings, CHUNK_SIZE_RANGE};
use super::prompt::{build_prompt, synthesis_prompt, PromptInput};
use super::record::{AnalysisResult, ChunkId, ChunkOutcome, Record, ResultRecord};
use super::summary::{extract_summary, locate_summary};
use crate::llm::{GenerateRequest, LlmBackend};
use tracing::{debug, error, info};

pub struct ChunkPipeline<'a> {
    backend: &'a dyn LlmBackend,
    settings: AnalysisSettings,
    buffer: Vec<Record>,
    chunks_flushed: usize,
    carryover: Option<String>,
}

impl<'a> ChunkPipeline<'a> {
    /// A chunk size of 0 disables size-based flushing (one chunk at end of
    /// input); sizes above the maximum are clamped.
    pub fn new(backend: &'a dyn LlmBackend, mut settings: AnalysisSettings) -> Self {
        settings.chunk_size = settings.chunk_size.min(*CHUNK_SIZE_RANGE.end());
        Self {
            backend,
            settings,
            buffer: Vec::new(),
            chunks_flushed: 0,
            carryover: None,
        }
    }

    /// Number of chunks flushed so far
    pub fn chunks_flushed(&self) -> usize {
        self.chunks_flushed
    }

    /// Buffer one record; returns the chunk's output record when it filled up
    pub async fn push(&mut self, record: Record) -> Option<ResultRecord> {
        self.buffer.push(record);
        let size = self.settings.chunk_size;
        if size > 0 && self.buffer.len() >= size {
            Some(self.flush().await.into_record())
        } else {
            None
        }
    }

    /// Flush any partial chunk, then add the synthesis record when more than
    /// one chunk was analyzed
    pub async fn finish(mut self) -> Vec<ResultRecord> {
        let mut out = Vec::new();
        if !self.buffer.is_empty() {
            out.push(self.flush().await.into_record());
        }
        if self.chunks_flushed > 1 {
            out.push(self.synthesize().await.into_record());
        }
        info!(target = "llmhandler", chunks = self.chunks_flushed, "Analysis complete");
        out
    }

    /// Push every record then finish, collecting outputs in order
    pub async fn run<I>(mut self, records: I) -> Vec<ResultRecord>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut out = Vec::new();
        for record in records {
            if let Some(r) = self.push(record).await {
                out.push(r);
            }
        }
        out.extend(self.finish().await);
        out
    }

    async fn flush(&mut self) -> AnalysisResult {
        self.chunks_flushed += 1;
        let chunk_number = self.chunks_flushed;
        let events = std::mem::take(&mut self.buffer);
        let event_count = events.len();

        let formatted = format_events(&events);
        let prompt = build_prompt(&PromptInput {
            formatted_events: &formatted,
            chunk_number,
            previous_summary: self.carryover.as_deref(),
            user_prompt: &self.settings.user_prompt,
            analysis_mode: &self.settings.analysis_mode,
            system_prompt: &self.settings.system_prompt,
        });
        debug!(target = "llmhandler", chunk = chunk_number, events = event_count, prompt_chars = prompt.len(), "Analyzing chunk");

        let outcome = match self.call(prompt).await {
            Ok(response) => {
                self.carryover = locate_summary(&response).filter(|s| !s.is_empty());
                let summary = extract_summary(&response);
                info!(target = "llmhandler", chunk = chunk_number, events = event_count, "Chunk analyzed");
                ChunkOutcome::Success { response, summary }
            }
            Err(e) => {
                error!(target = "llmhandler", chunk = chunk_number, error = %e, "Error processing chunk");
                self.carryover = None;
                ChunkOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        AnalysisResult {
            chunk: ChunkId::Index(chunk_number),
            event_count,
            outcome,
        }
    }

    async fn synthesize(&self) -> AnalysisResult {
        let prompt = synthesis_prompt(self.chunks_flushed, &self.settings.user_prompt);
        let outcome = match self.call(prompt).await {
            Ok(response) => ChunkOutcome::Success {
                response,
                summary: "Final synthesis across all analyzed chunks".to_string(),
            },
            Err(e) => {
                error!(target = "llmhandler", error = %e, "Final synthesis failed");
                ChunkOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        // a failed synthesis reports no event count
        let event_count = match outcome {
            ChunkOutcome::Success { .. } => self.chunks_flushed,
            ChunkOutcome::Failed { .. } => 0,
        };
        AnalysisResult {
            chunk: ChunkId::Final,
            event_count,
            outcome,
        }
    }

    async fn call(&self, prompt: String) -> crate::llm::LlmResult<String> {
        let request = GenerateRequest::new(
            self.settings.model.clone(),
            prompt,
            self.settings.generate,
        );
        self.backend.generate(&self.settings.endpoint, &request).await
    }
}
