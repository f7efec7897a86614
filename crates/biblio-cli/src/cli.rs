use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "biblio",
    about = "Biblio — a small book catalog backed by a key-value store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file; environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the web server
    Serve(ServeArgs),
    /// List all books
    List,
    /// Show one book
    Show(IdArgs),
    /// Add a book
    Add(AddArgs),
    /// Change fields of a book
    Edit(EditArgs),
    /// Delete a book
    Delete(IdArgs),
    /// Find books by title, author, or genre
    Search(SearchArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
    /// Keep books in process memory instead of connecting to a store
    #[arg(long)]
    pub memory: bool,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: u64,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub genre: String,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(default_value = "")]
    pub query: String,
}
