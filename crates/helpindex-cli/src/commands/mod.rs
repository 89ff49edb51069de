use std::time::Duration;

use anyhow::Result;
use helpindex_core::IndexRegistry;

use crate::cli::{Cli, Commands, PageArg, QueryArg};

mod setup;
mod support;


use self::setup::HelpSetup;
use self::support::{error_payload, print_json, print_stderr_json};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let timeout = Duration::from_millis(cli.timeout_ms);
    let setup = HelpSetup::resolve(&cli)?;
    let registry = setup.start()?;

    if cli.command.waits_for_index() && !registry.wait_ready(timeout) {
        tracing::warn!(
            timeout_ms = cli.timeout_ms,
            state = registry.state().as_str(),
            "help index not ready in time; answering as not ready"
        );
    }
    run_command(&registry, cli.command)
}

fn run_command(registry: &IndexRegistry, command: Commands) -> Result<()> {
    match command {
        Commands::Titles(QueryArg { query }) => print_json(&registry.title_hits(&query)),
        Commands::Search(QueryArg { query }) => print_json(&registry.index_hits(&query)),
        Commands::Page(PageArg { page_name }) => {
            let title = registry.page_title(&page_name);
            print_json(&serde_json::json!({
                "page": page_name,
                "title": title,
            }))
        }
        Commands::Stats => print_json(&registry.stats()),
        Commands::Status => print_json(&registry.status()),
    }
}

pub(crate) fn report_error(operation: &str, err: &anyhow::Error) {
    let payload = error_payload(operation, err);
    if print_stderr_json(&payload).is_err() {
        eprintln!("error: {err:#}");
    }
}
