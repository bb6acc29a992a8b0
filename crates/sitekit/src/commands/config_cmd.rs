//! Config subcommand handlers.

use std::fmt::Write as _;

use sitekit_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.api_token.is_some() {
            profile.api_token = Some(MASK.into());
        }
    }
    cfg
}

/// TOML-looking rendering for the table format.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "debounce_ms = {}", cfg.defaults.debounce_ms);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "base_url = \"{}\"", p.base_url);
        if let Some(ref token) = p.api_token {
            let _ = writeln!(out, "api_token = \"{token}\"");
        }
        if let Some(ref env) = p.api_token_env {
            let _ = writeln!(out, "api_token_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(debounce) = p.debounce_ms {
            let _ = writeln!(out, "debounce_ms = {debounce}");
        }
        if let Some(size) = p.admin_page_size {
            let _ = writeln!(out, "admin_page_size = {size}");
        }
        if let Some(size) = p.feed_page_size {
            let _ = writeln!(out, "feed_page_size = {size}");
        }
    }

    out.trim_end().to_owned()
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config()?);
            let out = match global.format() {
                OutputFormat::Table | OutputFormat::Plain => format_config(&cfg),
                format => output::render_structured(format, &cfg)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            base_url,
            token_env,
            make_default,
            force,
        } => {
            let parsed: url::Url = base_url.parse().map_err(|e| CliError::Validation {
                field: "base-url".into(),
                reason: format!("invalid URL '{base_url}': {e}"),
            })?;

            let mut cfg = config::load_config()?;
            let name = global.profile.clone().unwrap_or_else(|| "default".into());
            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: format!("'{name}' exists; pass --force to replace it"),
                });
            }

            let profile = Profile {
                base_url: parsed.to_string(),
                api_token_env: token_env,
                insecure: global.insecure.then_some(true),
                timeout: global.timeout,
                ..Profile::default()
            };
            cfg.profiles.insert(name.clone(), profile);
            if make_default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Saved profile '{name}' to {}", path.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_masked() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                base_url: "https://example.com/api".into(),
                api_token: Some("s3cret".into()),
                ..Profile::default()
            },
        );
        let shown = format_config(&redacted(&cfg));
        assert!(shown.contains("[profiles.prod]"));
        assert!(shown.contains("api_token = \"****\""));
        assert!(!shown.contains("s3cret"));
    }
}
