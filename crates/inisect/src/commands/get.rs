use clap::ArgMatches;
use tracing::{error, info};

use inisect_core::{Bytes, ConfigParser, ConfigType, Quota};

use super::open_config;

/// Where to read the key from, and what to print when it cannot be read.
struct Lookup<'a> {
    section: Option<&'a str>,
    key: &'a str,
    default: Option<&'a str>,
}

impl Lookup<'_> {
    fn value<T: ConfigType>(&self, config: &ConfigParser) -> Result<T, Box<dyn std::error::Error>> {
        let Some(text) = self.default else {
            let value = match self.section {
                Some(section) => config.get_from(section, self.key)?,
                None => config.get(self.key)?,
            };
            return Ok(value);
        };

        let fallback = T::from_config_str(text)
            .ok_or_else(|| format!("Default '{}' is not a valid {}", text, T::KIND))?;
        Ok(match self.section {
            Some(section) => config.get_from_or(section, self.key, fallback),
            None => config.get_or(self.key, fallback),
        })
    }

    fn quota(&self, config: &ConfigParser, max: Bytes) -> Result<Quota, Box<dyn std::error::Error>> {
        let Some(text) = self.default else {
            let quota = match self.section {
                Some(section) => config.get_quota_from(section, self.key, max)?,
                None => config.get_quota(self.key, max)?,
            };
            return Ok(quota);
        };

        let fallback = Quota::parse(max, text)?;
        Ok(match self.section {
            Some(section) => config.get_quota_from_or(section, self.key, max, fallback),
            None => config.get_quota_or(self.key, max, fallback),
        })
    }
}

pub(crate) fn handle_get_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = open_config(matches)?;

    let lookup = Lookup {
        section: matches.get_one::<String>("section").map(String::as_str),
        key: matches
            .get_one::<String>("key")
            .ok_or("Key argument is required")?,
        default: matches.get_one::<String>("default").map(String::as_str),
    };
    let value_type = matches
        .get_one::<String>("type")
        .map(String::as_str)
        .unwrap_or("string");

    let result = match value_type {
        "int" => lookup.value::<i64>(&config).map(|v| v.to_string()),
        "float" => lookup.value::<f64>(&config).map(|v| v.to_string()),
        "bool" => lookup.value::<bool>(&config).map(|v| v.to_string()),
        "bytes" => lookup.value::<Bytes>(&config).map(|v| v.get().to_string()),
        "quota" => {
            let max = matches
                .get_one::<String>("max")
                .ok_or("--max is required for quota values")?;
            let max = Bytes::parse(max)?;
            lookup.quota(&config, max).map(|q| q.bytes().get().to_string())
        }
        _ => lookup.value::<String>(&config),
    };

    match result {
        Ok(rendered) => {
            println!("{}", rendered);
            info!(
                event = "cli.get_completed",
                key = lookup.key,
                section = lookup.section.unwrap_or_default(),
                value_type = value_type
            );
            Ok(())
        }
        Err(e) => {
            error!(
                event = "cli.get_failed",
                key = lookup.key,
                section = lookup.section.unwrap_or_default(),
                error = %e
            );
            Err(e)
        }
    }
}
