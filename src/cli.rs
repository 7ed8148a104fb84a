use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vocadeck")]
#[command(author, version, about = "Turn vocabulary lists into Anki decks")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an Anki package from a CSV or Markdown vocabulary list
    Build {
        /// Vocabulary list to read
        #[arg(required = true)]
        input: PathBuf,

        /// Deck name (defaults to the input file stem)
        #[arg(long)]
        deck_name: Option<String>,

        /// Package file name (defaults to `<deck>.apkg`)
        #[arg(long)]
        package_name: Option<String>,

        /// Directory the package is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Language code used for speech, images and phonetics
        #[arg(short, long)]
        language: Option<String>,

        /// Ignore unrecognized columns instead of failing
        #[arg(long)]
        tolerant: bool,

        /// Do not call any provider; media slots are reported as failed
        #[arg(long)]
        offline: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the inferred note templates for a vocabulary list
    Inspect {
        /// Vocabulary list to read
        #[arg(required = true)]
        input: PathBuf,

        /// Ignore unrecognized columns instead of failing
        #[arg(long)]
        tolerant: bool,
    },

    /// Dump the notes of an .apkg package as CSV files
    Dump {
        /// Package to read
        #[arg(required = true)]
        package: PathBuf,

        /// Directory the CSV files are written to
        #[arg(short, long, default_value = "deck")]
        output_dir: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
