mod commands;
mod engine;
mod parser;
mod paths;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trix",
    about = "Trick dependency graphs: resolve prerequisites, lay them out, learn in order"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialise a trix catalog in the current directory
    Init,
    /// List categories and tricks in catalog order
    List,
    /// Build every category graph, reporting unresolved prerequisites and cycles
    Check {
        /// Check a single category only
        #[arg(long)]
        category: Option<String>,
    },
    /// Compute and print the layered layout for a category
    Layout {
        #[arg(long)]
        category: String,
        /// Whose completion state to annotate edges with
        #[arg(long, default_value = "default")]
        user: String,
        /// Ranks flow left-to-right instead of top-to-bottom
        #[arg(long)]
        horizontal: bool,
    },
    /// Show the tricks still to learn, in render order
    Next {
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "default")]
        user: String,
        /// Step the focus marker through the list interactively
        #[arg(long)]
        walk: bool,
    },
    /// Toggle a trick between learned and unlearned
    Done {
        #[arg(long)]
        category: String,
        /// Trick id (see `trix list`)
        #[arg(long)]
        trick: String,
        #[arg(long, default_value = "default")]
        user: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init => commands::init::run(),
        Command::List => commands::list::run(),
        Command::Check { category } => commands::check::run(category.as_deref()),
        Command::Layout {
            category,
            user,
            horizontal,
        } => commands::layout::run(&category, &user, horizontal),
        Command::Next {
            category,
            user,
            walk,
        } => commands::next::run(&category, &user, walk),
        Command::Done {
            category,
            trick,
            user,
        } => commands::done::run(&category, &user, &trick),
    }
}
