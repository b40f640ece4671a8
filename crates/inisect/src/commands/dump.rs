use clap::ArgMatches;
use tracing::info;

use super::open_config;

pub(crate) fn handle_dump_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = open_config(matches)?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(config.store())?);
    } else {
        print!("{}", config.dump());
    }

    info!(
        event = "cli.dump_completed",
        entries = config.store().len()
    );
    Ok(())
}
