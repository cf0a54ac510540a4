use crate::runtime::DEFAULT_MAX_DEPTH;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about = "A line-oriented, dictionary-driven stack language")]
pub struct Args {
    /// Maximum nesting of dictionary expansions before a word is reported as a cycle
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read commands line by line from standard input (the default)
    Stdin {
        /// Do not move the cursor back onto the typed line before reporting
        #[arg(long)]
        no_echo: bool,
    },

    /// Start an interactive session with line editing and history
    Repl {
        /// Number of lines kept in the history file
        #[arg(long, default_value_t = 20)]
        history_size: usize,
    },
}
