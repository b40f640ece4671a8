use clap::ArgMatches;

use super::open_config;

pub(crate) fn handle_sections_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = open_config(matches)?;

    for name in config.sections() {
        println!("{}", name);
    }

    Ok(())
}
