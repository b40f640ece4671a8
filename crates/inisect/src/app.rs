use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("inisect")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect sectioned INI configuration files")
        .long_about("inisect parses INI-style config files with optional [Section] groups and prints their contents or individual typed values. Diagnostics for skipped lines and failed lookups are logged to stderr as JSON.")
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("dump")
                .about("Parse a config file and print it back in normalized form")
                .arg(
                    Arg::new("file")
                        .help("Path to the config file")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("get")
                .about("Print one typed value from a config file")
                .arg(
                    Arg::new("file")
                        .help("Path to the config file")
                        .required(true)
                        .index(1)
                )
                .arg(
                    Arg::new("key")
                        .help("Key to look up")
                        .required(true)
                        .index(2)
                )
                .arg(
                    Arg::new("section")
                        .long("section")
                        .short('s')
                        .help("Read the key from this subsection instead of the global map")
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .short('t')
                        .help("Type to convert the value to")
                        .value_parser(["string", "int", "float", "bool", "bytes", "quota"])
                        .default_value("string")
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .help("Maximum byte count a quota is a share of (e.g. '10 GiB')")
                        .required_if_eq("type", "quota")
                )
                .arg(
                    Arg::new("default")
                        .long("default")
                        .short('d')
                        .allow_hyphen_values(true) // Allow negative defaults such as -1
                        .help("Print this instead of failing when the value is missing or invalid")
                )
        )
        .subcommand(
            Command::new("sections")
                .about("List subsection names in file order")
                .arg(
                    Arg::new("file")
                        .help("Path to the config file")
                        .required(true)
                        .index(1)
                )
        )
}
