use std::path::Path;

use dfir_copilot_core::{
    AnalysisSettings, AnalyzeOptions, ChunkPipeline, ConfigStore, OllamaClient, Record, Result,
    StreamFailure,
};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// Streaming command: JSON-lines events on stdin, JSON-lines results on stdout.
pub async fn run(app_root: &Path, opts: AnalyzeOptions) -> Result<()> {
    let cfg = ConfigStore::new(app_root).read();
    let settings = AnalysisSettings::resolve(&cfg, opts)?;
    let client = OllamaClient::new(settings.timeout)?;
    info!(
        target = "llmhandler",
        endpoint = %settings.endpoint,
        model = %settings.model,
        chunk_size = settings.chunk_size,
        mode = %settings.analysis_mode,
        "Starting analysis"
    );

    let pipeline = ChunkPipeline::new(&client, settings);
    let mut stdout = tokio::io::stdout();
    stream(BufReader::new(tokio::io::stdin()), &mut stdout, pipeline).await
}

/// Feed every input line through the pipeline, writing each result as soon
/// as its chunk is analyzed.
///
/// A line that cannot be read, is not UTF-8, or is not a JSON object ends the
/// stream with a single error record; the partial chunk is discarded.
pub async fn stream<R, W>(mut reader: R, out: &mut W, mut pipeline: ChunkPipeline<'_>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!(target = "llmhandler", line = line_no + 1, error = %e, "Failed to read input");
                return emit(out, &StreamFailure::new(format!("line {}: {e}", line_no + 1))).await;
            }
        }
        line_no += 1;

        let record = match decode_line(&buf) {
            Ok(Some(r)) => r,
            Ok(None) => continue,
            Err(msg) => {
                error!(target = "llmhandler", line = line_no, error = %msg, "Undecodable input record");
                return emit(out, &StreamFailure::new(format!("line {line_no}: {msg}"))).await;
            }
        };
        if let Some(result) = pipeline.push(record).await {
            emit(out, &result).await?;
        }
    }

    if line_no == 0 {
        warn!(target = "llmhandler", "No input records");
    }
    for result in pipeline.finish().await {
        emit(out, &result).await?;
    }
    Ok(())
}

/// `Ok(None)` for blank lines
fn decode_line(raw: &[u8]) -> std::result::Result<Option<Record>, String> {
    let text = std::str::from_utf8(raw).map_err(|e| format!("invalid UTF-8: {e}"))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some).map_err(|e| e.to_string())
}

async fn emit<W, T>(out: &mut W, record: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}
