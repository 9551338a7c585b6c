//! Prompt templates for chunk analysis and the final synthesis

use crate::config::AnalysisMode;

impl AnalysisMode {
    /// Mode-specific instruction line
    pub fn instruction(&self) -> &'static str {
        match self {
            AnalysisMode::Summary => "Provide a concise summary of key findings.",
            AnalysisMode::Detailed => "Provide detailed analysis of each significant event.",
            AnalysisMode::Forensic => {
                "Focus on forensic artifacts, timeline reconstruction, and evidence preservation. Identify potential indicators of compromise."
            }
            AnalysisMode::ThreatIntelligence => {
                "Focus on threat actor TTPs, IOCs, and attribution indicators."
            }
        }
    }
}

/// Instruction for a free-text mode name; unknown names get an empty instruction
pub fn mode_instruction(mode: &str) -> &'static str {
    mode.parse::<AnalysisMode>()
        .map(|m| m.instruction())
        .unwrap_or("")
}

/// Everything a chunk prompt is assembled from
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub formatted_events: &'a str,
    pub chunk_number: usize,
    pub previous_summary: Option<&'a str>,
    pub user_prompt: &'a str,
    pub analysis_mode: &'a str,
    pub system_prompt: &'a str,
}

/// Assemble one chunk's prompt.
///
/// The previous-context section is included only when a non-empty carryover
/// exists and this is not the first chunk.
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    let mut parts: Vec<String> = vec![
        format!("System: {}", input.system_prompt),
        format!("\nAnalysis Mode: {}", input.analysis_mode),
        format!("\n{}", mode_instruction(input.analysis_mode)),
        format!("\nUser Question: {}", input.user_prompt),
    ];

    match input.previous_summary.filter(|s| !s.is_empty()) {
        Some(prev) if input.chunk_number > 1 => {
            parts.push(format!(
                "\n\nPrevious Analysis Context (Chunk {}):",
                input.chunk_number - 1
            ));
            parts.push(prev.to_string());
            parts.push(format!("\n\nNow analyzing Chunk {}:", input.chunk_number));
        }
        _ => parts.push(format!("\n\nAnalyzing Chunk {}:", input.chunk_number)),
    }

    parts.push(format!("\n\n{}", input.formatted_events));

    parts.push("\n\nProvide your analysis in a structured format:".to_string());
    parts.push("1. Key Findings".to_string());
    parts.push("2. Anomalies & IOCs".to_string());
    parts.push("3. Investigation Recommendations".to_string());
    parts.push("4. Summary (concise overview for context carryover)".to_string());

    parts.join("\n")
}

/// Cross-chunk synthesis request issued once after the last chunk
pub fn synthesis_prompt(total_chunks: usize, user_prompt: &str) -> String {
    format!(
        "\nYou have analyzed {total_chunks} chunks of security/DFIR data.\n\
         \n\
         Based on the user's question: \"{user_prompt}\"\n\
         \n\
         Provide a final comprehensive synthesis that:\n\
         1. Integrates findings across all chunks\n\
         2. Identifies patterns and correlations\n\
         3. Prioritizes critical findings\n\
         4. Provides actionable recommendations for the investigation\n\
         \n\
         Focus on the most significant security and forensic insights.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(chunk: usize, prev: Option<&'a str>, mode: &'a str) -> PromptInput<'a> {
        PromptInput {
            formatted_events: "Event 1:\n  host: ws01\n",
            chunk_number: chunk,
            previous_summary: prev,
            user_prompt: "What happened?",
            analysis_mode: mode,
            system_prompt: "You are a DFIR expert.",
        }
    }

    #[test]
    fn first_chunk_has_no_previous_context() {
        let p = build_prompt(&input(1, Some("ignored"), "forensic"));
        assert!(p.starts_with("System: You are a DFIR expert.\n\nAnalysis Mode: forensic"));
        assert!(p.contains("Identify potential indicators of compromise."));
        assert!(p.contains("\nUser Question: What happened?"));
        assert!(p.contains("Analyzing Chunk 1:"));
        assert!(!p.contains("Previous Analysis Context"));
        assert!(!p.contains("ignored"));
        assert!(p.ends_with("4. Summary (concise overview for context carryover)"));
    }

    #[test]
    fn later_chunk_carries_previous_summary() {
        let p = build_prompt(&input(3, Some("mimikatz on ws01"), "summary"));
        assert!(p.contains("Previous Analysis Context (Chunk 2):\nmimikatz on ws01"));
        assert!(p.contains("Now analyzing Chunk 3:"));
        assert!(p.contains("Provide a concise summary of key findings."));
    }

    #[test]
    fn empty_carryover_is_treated_as_absent() {
        let p = build_prompt(&input(2, Some(""), "detailed"));
        assert!(!p.contains("Previous Analysis Context"));
        assert!(p.contains("Analyzing Chunk 2:"));
    }

    #[test]
    fn unknown_mode_degrades_to_empty_instruction() {
        assert_eq!(mode_instruction("haiku"), "");
        let p = build_prompt(&input(1, None, "haiku"));
        assert!(p.contains("Analysis Mode: haiku\n\n\n\nUser Question"));
    }

    #[test]
    fn synthesis_mentions_chunk_count_and_question() {
        let p = synthesis_prompt(3, "Who logged in?");
        assert!(p.contains("You have analyzed 3 chunks"));
        assert!(p.contains("\"Who logged in?\""));
    }
}
