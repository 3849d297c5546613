use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "spam-detector",
    about = "Classify emails as spam or safe and explain their lexical risk",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.spam-detector/config.toml, fallback ~/.config/spam-detector/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact path (overrides `[model] path`)
    #[arg(long, global = true, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Debug logging and per-record detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results, no progress or banners
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Train a model from a labeled CSV (`text`, `label` columns)
    Train {
        /// Training data
        data: PathBuf,

        /// Where to write the model [default: --model or config]
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Split seed
        #[arg(long)]
        seed: Option<u64>,

        /// Held-out share of each class
        #[arg(long, value_name = "RATIO")]
        test_ratio: Option<f64>,
    },

    /// Classify a single email from an argument, a file, or stdin
    Predict {
        /// Email text; read from --file or stdin when omitted
        text: Option<String>,

        /// Read the email from a file
        #[arg(long, value_name = "FILE", conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,
    },

    /// Score every record of a CSV with a `text` column
    Batch {
        /// Input CSV
        input: PathBuf,

        /// Output file [default: stdout]
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format
        #[arg(long, default_value = "csv", value_name = "FORMAT")]
        report: BatchFormat,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BatchFormat {
    Terminal,
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict() {
        let cli = Cli::try_parse_from(["spam-detector", "predict", "hello", "--report", "json"]).unwrap();
        match cli.command {
            Command::Predict { text, report, .. } => {
                assert_eq!(text.as_deref(), Some("hello"));
                assert!(matches!(report, ReportFormat::Json));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spam-detector", "train", "emails.csv", "--seed", "7", "--model", "m.bin", "-q",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.model, Some(PathBuf::from("m.bin")));
        assert!(matches!(cli.command, Command::Train { seed: Some(7), .. }));
    }

    #[test]
    fn test_text_and_file_conflict() {
        assert!(Cli::try_parse_from(["spam-detector", "predict", "hi", "--file", "x.txt"]).is_err());
    }
}
