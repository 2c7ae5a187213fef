//! Config subcommand handlers.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use venntry_config::{self as config, Config};
use venntry_core::Environment;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for a value on the terminal; without one, the flag is required.
fn prompt(label: &str, flag: &str, allow_empty: bool) -> Result<String, CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: flag.into(),
            reason: format!("not a terminal; pass {flag}"),
        });
    }
    Input::<String>::new()
        .with_prompt(label)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(prompt_err)
}

fn detail(cfg: &Config) -> String {
    let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(unset)".into());
    output::detail(&[
        ("api_url", or_unset(cfg.api_url.clone())),
        ("upload_url", or_unset(cfg.upload_url.clone())),
        ("environment", cfg.environment.to_string()),
        ("timeout", format!("{}s", cfg.timeout)),
        (
            "ca_cert",
            or_unset(cfg.ca_cert.as_ref().map(|p| p.display().to_string())),
        ),
        ("data_dir", cfg.data_dir().display().to_string()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(global.output, &cfg, detail, |_| "config".into())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init {
            upload_url,
            environment,
            force,
        } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists; pass --force to overwrite", path.display()),
                });
            }

            let api_url = match global.api_url.clone() {
                Some(url) => url,
                None => prompt("API URL", "--api-url", false)?,
            };
            let upload_url = match upload_url {
                Some(url) => Some(url),
                None if global.api_url.is_some() => None,
                None => Some(prompt("Upload URL (optional)", "--upload-url", true)?)
                    .filter(|u| !u.trim().is_empty()),
            };
            let environment = environment
                .as_deref()
                .map(str::parse::<Environment>)
                .transpose()
                .map_err(|reason| CliError::Validation {
                    field: "environment".into(),
                    reason,
                })?
                .unwrap_or_default();

            let cfg = Config {
                api_url: Some(api_url),
                upload_url,
                environment,
                timeout: global.timeout.unwrap_or(Config::default().timeout),
                ca_cert: None,
                data_dir: global.data_dir.clone(),
            };
            // Reject bad URLs before anything is written.
            cfg.to_client_config()?;

            let written = config::save_config(&cfg)?;
            output::success(
                global,
                format_args!("Configuration written to {}", written.display()),
            );
            Ok(())
        }
    }
}
