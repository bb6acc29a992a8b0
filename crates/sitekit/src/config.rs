//! CLI-side profile resolution.
//!
//! Layers `GlobalOpts` flag overrides (--url, --token, --insecure,
//! --timeout) over the shared `sitekit_config` profile.

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::{debug, warn};

use sitekit_config::{self as shared, Config, Profile};
use sitekit_core::{Backend, ClientConfig, TlsVerification};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Build a `ClientConfig` for this invocation.
///
/// A bare `--url` works without any config file; an explicitly requested
/// profile must exist.
pub fn resolve_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let config = shared::load_config()?;
    let name = active_profile_name(global, &config);

    let profile = match config.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if global.url.is_some() => Profile::default(),
        None if global.profile.is_some() || !config.profiles.is_empty() => {
            let mut names: Vec<_> = config.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: shared::config_path().display().to_string(),
            });
        }
    };

    apply_overrides(&profile, &config, global)
}

fn apply_overrides(
    profile: &Profile,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref url) = global.url {
        profile.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut client = shared::profile_to_client_config(&profile, &config.defaults)?;

    if let Some(ref token) = global.token {
        client.api_token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if client.timeout.is_zero() {
        return Err(CliError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(client)
}

/// Take `--output` from `defaults.output` when neither the flag nor
/// `SITEKIT_OUTPUT` chose one.
pub fn apply_output_default(global: &mut GlobalOpts) {
    if global.output.is_some() {
        return;
    }
    let configured = match shared::load_config() {
        Ok(config) => config.defaults.output,
        Err(e) => {
            debug!(error = %e, "config unreadable; table output");
            return;
        }
    };
    match OutputFormat::from_str(&configured, true) {
        Ok(format) => global.output = Some(format),
        Err(_) => warn!(value = %configured, "ignoring unknown defaults.output"),
    }
}

/// Resolve configuration and build a backend.
pub fn connect(global: &GlobalOpts) -> Result<Backend, CliError> {
    let client = resolve_client_config(global)?;
    debug!(
        base_url = %client.base_url,
        authenticated = client.api_token.is_some(),
        "connecting"
    );
    Ok(Backend::new(client)?)
}
