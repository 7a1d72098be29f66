mod batch;
mod display;
mod serve;
#[cfg(test)]
mod test_support;

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mosaic_ai::{Analyzer, Lexicon, SentimentScorer};
use mosaic_core::{AnalyzerConfig, DEFAULT_EMOTION_THRESHOLD};

#[derive(Parser)]
#[command(name = "mosaic", version, about = "Sentiment and emotion analysis for free-form text")]
struct Cli {
    #[command(flatten)]
    resources: ResourceArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ResourceArgs {
    /// Directory with model.onnx, tokenizer.json and config.json.
    #[arg(long, env = "MOSAIC_MODEL_DIR", global = true)]
    model_dir: Option<PathBuf>,

    /// Replacement lexicon in VADER format (defaults to the embedded table).
    #[arg(long, env = "MOSAIC_LEXICON", global = true)]
    lexicon: Option<PathBuf>,

    /// Probability an emotion must exceed to be reported.
    #[arg(long, env = "MOSAIC_EMOTION_THRESHOLD", default_value_t = DEFAULT_EMOTION_THRESHOLD, global = true)]
    threshold: f32,

    /// Token limit; longer inputs are truncated.
    #[arg(long, env = "MOSAIC_MAX_LENGTH", global = true)]
    max_length: Option<usize>,
}

impl ResourceArgs {
    fn config(&self) -> anyhow::Result<AnalyzerConfig> {
        let model_dir = self
            .model_dir
            .clone()
            .context("--model-dir (or MOSAIC_MODEL_DIR) is required")?;
        let mut config = AnalyzerConfig::new(model_dir).with_threshold(self.threshold);
        if let Some(path) = &self.lexicon {
            config = config.with_lexicon(path);
        }
        if let Some(max_length) = self.max_length {
            config = config.with_max_length(max_length);
        }
        config.validate()?;
        Ok(config)
    }

    fn load_analyzer(&self) -> anyhow::Result<Analyzer> {
        let config = self.config()?;
        Analyzer::load(&config).context("loading analyzer")
    }

    /// Lexicon scorer alone; needs no model.
    fn scorer(&self) -> anyhow::Result<SentimentScorer> {
        let lexicon = match &self.lexicon {
            Some(path) => Lexicon::from_file(path)?,
            None => Lexicon::builtin(),
        };
        Ok(SentimentScorer::new(Arc::new(lexicon)))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one text (argument or stdin) and print the JSON result.
    Analyze {
        text: Option<String>,
        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Analyze a file with one text per line; prints JSON Lines.
    Batch {
        #[arg(long)]
        input: PathBuf,
    },
    /// Lexicon sentiment breakdown only.
    Sentiment { text: Option<String> },
    /// Per-label emotion probabilities.
    Emotions {
        text: Option<String>,
        /// Show every label, not just those above the threshold.
        #[arg(long)]
        all: bool,
    },
    /// Serve `POST /analyze` and `GET /health` over HTTP.
    Serve {
        #[arg(long, env = "MOSAIC_BIND", default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
}

/// The positional text, or all of stdin when absent.
fn read_input(text: Option<String>) -> anyhow::Result<Vec<u8>> {
    match text {
        Some(text) => Ok(text.into_bytes()),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> anyhow::Result<()> {
    // stdout carries results; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    tracing::debug!("mosaic v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Analyze { text, pretty } => {
            let input = read_input(text)?;
            let analyzer = cli.resources.load_analyzer()?;
            let result = analyzer.analyze_bytes(&input)?;
            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
        }
        Command::Batch { input } => {
            let analyzer = cli.resources.load_analyzer()?;
            let stdout = std::io::stdout();
            let stats = batch::run_batch(&analyzer, &input, &mut stdout.lock())?;
            eprintln!(
                "  Analyzed {} lines in {:.2}s",
                stats.total_lines, stats.elapsed_secs
            );
        }
        Command::Sentiment { text } => {
            let input = read_input(text)?;
            let text = std::str::from_utf8(&input).context("input is not valid UTF-8")?;
            let scores = cli.resources.scorer()?.polarity_scores(text);
            print!("{}", display::sentiment_card(&scores));
        }
        Command::Emotions { text, all } => {
            let input = read_input(text)?;
            let text = std::str::from_utf8(&input).context("input is not valid UTF-8")?;
            let analyzer = cli.resources.load_analyzer()?;
            let emotions = analyzer.emotions();
            let scores = emotions.scores(text)?;
            print!(
                "{}",
                display::emotion_table(&scores, emotions.threshold(), all)
            );
        }
        Command::Serve { bind } => {
            let config = cli.resources.config()?;
            tokio::runtime::Runtime::new()?.block_on(serve::run(config, bind))?;
        }
    }
    Ok(())
}
