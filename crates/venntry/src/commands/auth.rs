//! Auth command handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use venntry_core::api::{LoginRequest, RegisterRequest};
use venntry_core::{AppContext, RouteDecision, Validate};

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Status view ─────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatus {
    authenticated: bool,
    user_id: Option<Uuid>,
    username: Option<String>,
    email: Option<String>,
    current_inventory: Option<String>,
    session_expires_at: Option<DateTime<Utc>>,
}

impl SessionStatus {
    fn read(ctx: &AppContext) -> Self {
        let user = ctx.auth().current_user();
        Self {
            authenticated: ctx.auth().is_authenticated(),
            user_id: user.as_ref().map(|u| u.id),
            username: user.as_ref().map(|u| u.username.clone()),
            email: user.map(|u| u.email),
            current_inventory: ctx.inventories().current().map(|inv| inv.name),
            session_expires_at: ctx.session().current().map(|c| c.expires_at()),
        }
    }

    fn detail(&self) -> String {
        if !self.authenticated {
            return "Not logged in".into();
        }
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        output::detail(&[
            ("User", or_dash(&self.username)),
            ("Email", or_dash(&self.email)),
            ("Inventory", or_dash(&self.current_inventory)),
            (
                "Expires",
                self.session_expires_at
                    .map_or_else(|| "-".into(), |t| t.to_rfc3339()),
            ),
        ])
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Register {
            username,
            email,
            password,
        } => {
            let req = RegisterRequest {
                username,
                email,
                password: util::password_or_prompt(password)?,
            };
            req.validate()?;

            let user =
                util::with_spinner(global, "Creating account", ctx.auth().register(&req)).await?;
            let out = output::render_single(
                global.output,
                &user,
                |u| {
                    output::detail(&[
                        ("ID", u.id.to_string()),
                        ("Username", u.username.clone()),
                        ("Email", u.email.clone()),
                    ])
                },
                |u| u.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            output::success(
                global,
                format_args!(
                    "Account created. Log in with: venntry auth login --email {}",
                    user.email
                ),
            );
            Ok(())
        }

        AuthCommand::Login { email, password } => {
            let req = LoginRequest {
                email,
                password: util::password_or_prompt(password)?,
            };
            req.validate()?;

            let user = util::with_spinner(global, "Logging in", ctx.auth().login(&req)).await?;
            let out = output::render_single(
                global.output,
                &user,
                |u| {
                    output::detail(&[
                        ("User", u.user_name.clone()),
                        ("Email", u.email.clone()),
                        ("Inventories", u.inventories.len().to_string()),
                    ])
                },
                |u| u.user_id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            let message = match ctx.inventories().current() {
                Some(inv) => format!("Logged in; using inventory '{}'", inv.name),
                None => "Logged in; create an inventory with: \
                         venntry inventories create <NAME> --select"
                    .to_owned(),
            };
            output::success(global, message);
            Ok(())
        }

        AuthCommand::Logout => {
            ctx.auth().logout()?;
            output::success(global, "Logged out");
            Ok(())
        }

        AuthCommand::Status => {
            let status = SessionStatus::read(ctx);
            let out = output::render_single(
                global.output,
                &status,
                SessionStatus::detail,
                |s| s.authenticated.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AuthCommand::Check { path } => {
            match util::with_spinner(global, "Checking session", ctx.guard().check(&path)).await {
                RouteDecision::Allow => {
                    output::success(global, format_args!("Access to {path} allowed"));
                    Ok(())
                }
                RouteDecision::Redirect(redirect) => {
                    Err(CliError::SessionRejected { path, redirect })
                }
            }
        }

        AuthCommand::Refresh => {
            util::require_login(ctx)?;
            let profile =
                util::with_spinner(global, "Refreshing profile", ctx.auth().refresh_profile())
                    .await?;
            let out = output::render_single(
                global.output,
                &profile,
                |p| {
                    output::detail(&[
                        ("User", p.username.clone()),
                        ("Email", p.email.clone()),
                        ("Inventories", p.inventories.len().to_string()),
                    ])
                },
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
