//! Batch analysis: reads one text per line, writes one JSON result per line.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use mosaic_ai::{AnalysisError, Analyzer};

const CHUNK_SIZE: usize = 100;

pub struct BatchStats {
    pub total_lines: usize,
    pub elapsed_secs: f64,
}

/// Analyze every line of `input`, writing JSON Lines to `out`.
///
/// Output line N corresponds to input line N; blank lines yield a neutral,
/// emotion-free result. Lines are analyzed in chunks; invalid UTF-8 names the
/// offending line, a failed inference names the chunk, and either aborts the run.
pub fn run_batch<W: Write>(
    analyzer: &Analyzer,
    input: &Path,
    out: &mut W,
) -> anyhow::Result<BatchStats> {
    let start = Instant::now();

    let bytes =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let total_lines = lines.len();

    for (chunk_idx, chunk) in lines.chunks(CHUNK_SIZE).enumerate() {
        let first = chunk_idx * CHUNK_SIZE + 1;
        let texts = chunk
            .iter()
            .enumerate()
            .map(|(offset, &line)| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                std::str::from_utf8(line)
                    .map_err(AnalysisError::from)
                    .with_context(|| format!("line {}", first + offset))
            })
            .collect::<anyhow::Result<Vec<&str>>>()?;

        let last = first + texts.len() - 1;
        let results = analyzer
            .analyze_batch(&texts)
            .with_context(|| format!("lines {first}-{last}"))?;
        for result in &results {
            serde_json::to_writer(&mut *out, result)?;
            out.write_all(b"\n")?;
        }

        if total_lines >= CHUNK_SIZE {
            eprint!(
                "\r  Analyzed {last}/{total_lines} ({:.1}%)",
                last as f64 / total_lines as f64 * 100.0
            );
        }
    }
    if total_lines >= CHUNK_SIZE {
        eprintln!();
    }
    out.flush()?;

    Ok(BatchStats {
        total_lines,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
