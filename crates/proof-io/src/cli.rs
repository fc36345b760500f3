//! Command-line argument parsing (§6 CLI, §10.6).

use clap::Parser;

/// Structa — Shogi Proof Game Proofer.
#[derive(Debug, Parser)]
#[command(name = "structa", about = "Shogi proof-game solver")]
pub struct Cli {
    /// Input (problem) file path; overrides `config.txt`'s `INPUT_FILE`.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output file path; overrides `config.txt`'s `OUTPUT_FILE`.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Wait for Enter before exiting.
    #[arg(long, conflicts_with = "nowait")]
    pub wait: bool,

    /// Don't wait for Enter before exiting (the default).
    #[arg(long)]
    pub nowait: bool,
}

impl Cli {
    /// Whether the process should block on stdin before exiting.
    pub fn should_wait(&self) -> bool {
        self.wait && !self.nowait
    }
}
