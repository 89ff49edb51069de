use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod parsers;


pub use args::{PageArg, QueryArg};
pub use parsers::LanguageBinding;

#[derive(Debug, Parser)]
#[command(name = "helpindex")]
#[command(about = "Search bundled per-language HTML help pages", version)]
pub struct Cli {
    /// Resource root that relative help locations resolve against.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// TOML manifest listing the help location of each language.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Extra or overriding language, as CODE=LOCATION (repeatable).
    #[arg(
        long = "lang",
        value_name = "CODE=LOCATION",
        value_parser = parsers::parse_language_binding
    )]
    pub languages: Vec<LanguageBinding>,

    /// Language to query; defaults to the manifest default or the first registered one.
    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub build_delay_ms: Option<u64>,

    #[arg(long, default_value_t = 30_000, value_parser = parsers::parse_min_one_u64)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Titles containing the query.
    Titles(QueryArg),
    /// Indexed tokens containing the query, with the pages they appear on.
    Search(QueryArg),
    /// Title of one page.
    Page(PageArg),
    /// Per-language build statistics.
    Stats,
    /// Registry lifecycle snapshot, taken without waiting for the build.
    Status,
}

impl Commands {
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Titles(_) => "titles",
            Self::Search(_) => "search",
            Self::Page(_) => "page",
            Self::Stats => "stats",
            Self::Status => "status",
        }
    }

    pub const fn waits_for_index(&self) -> bool {
        !matches!(self, Self::Status)
    }
}
