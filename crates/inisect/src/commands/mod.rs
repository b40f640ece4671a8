use clap::ArgMatches;
use tracing::error;

use inisect_core::events;

mod dump;
mod get;
mod sections;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    match matches.subcommand() {
        Some(("dump", sub_matches)) => dump::handle_dump_command(sub_matches),
        Some(("get", sub_matches)) => get::handle_get_command(sub_matches),
        Some(("sections", sub_matches)) => sections::handle_sections_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Open the config file named by the `file` argument, logging failures.
fn open_config(
    matches: &ArgMatches,
) -> Result<inisect_core::ConfigParser, Box<dyn std::error::Error>> {
    let path = matches
        .get_one::<String>("file")
        .ok_or("File argument is required")?;

    inisect_core::ConfigParser::open(path).map_err(|e| {
        events::log_app_error(&e);
        e.into()
    })
}
