//! Vertical card display for sentiment and emotion scores.
//!
//! Renders to a `String` so the commands can print it and tests can inspect it.

use std::fmt::Write;

use mosaic_core::{EmotionScore, SentimentScores};

const BAR_WIDTH: usize = 30;

// ── Public API ──

/// Sentiment breakdown: label, compound score, and the three proportions.
pub fn sentiment_card(scores: &SentimentScores) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", scores.label());
    let _ = writeln!(out, "  {:<12} {:+.4}", "compound", scores.compound);
    let _ = writeln!(out);
    for (name, value) in [
        ("positive", scores.pos),
        ("neutral", scores.neu),
        ("negative", scores.neg),
    ] {
        let _ = writeln!(out, "  {:<12} {:.3}  {}", name, value, bar(value));
    }
    out
}

/// Emotion probabilities in vocabulary order, marking those above `threshold`.
///
/// Unless `show_all` is set, labels at or below the threshold are omitted.
pub fn emotion_table(scores: &[EmotionScore], threshold: f32, show_all: bool) -> String {
    let mut out = String::new();
    let detected = scores.iter().filter(|s| s.probability > threshold).count();
    let _ = writeln!(
        out,
        "=== {detected} emotion{} above {threshold} ===",
        if detected == 1 { "" } else { "s" }
    );

    for score in scores {
        let above = score.probability > threshold;
        if !above && !show_all {
            continue;
        }
        let _ = writeln!(
            out,
            "{} {:<16} {:.4}  {}",
            if above { "*" } else { " " },
            score.label,
            score.probability,
            bar(score.probability)
        );
    }
    out
}

// ── Helpers ──

/// Horizontal bar for a value in [0, 1].
fn bar(value: f32) -> String {
    let filled = (value.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}
