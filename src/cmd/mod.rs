//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                          |
//! |------------|-------------------------------------------|
//! | `session`  | `Login`, `Register`, `Logout`, `Whoami`   |
//! | `projects` | `Projects`                                |
//! | `tasks`    | `Tasks`                                   |
//! | `members`  | `Members`                                 |
//! | `profile`  | `Profile`                                 |
//! | `users`    | `Users`                                   |
//! | `config`   | `Config`                                  |

pub mod config;
pub mod members;
pub mod profile;
pub mod projects;
pub mod session;
pub mod tasks;
pub mod users;

use anyhow::{Result, bail};
use dialoguer::Confirm;

use taskdeck::App;
use taskdeck::config::{CliOverrides, TaskdeckConfig};
use taskdeck::errors::{ApiError, SessionError};
use taskdeck::guards::{self, GuardOutcome};
use taskdeck::routes::Navigator;
use taskdeck::ui::{BusyIndicator, NotificationPrinter};

use super::{Cli, Commands};

/// A refusal the user has already seen as a notification.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Notified(pub String);

/// Whether `err` was already reported through a notification.
pub fn already_notified(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>().is_some()
        || err.downcast_ref::<Notified>().is_some()
        || matches!(err.downcast_ref::<SessionError>(), Some(SessionError::Api(_)))
}

pub async fn run(cli: Cli) -> Result<()> {
    let overrides = CliOverrides {
        api_url: cli.api_url.clone(),
        data_dir: cli.data_dir.clone(),
        config: cli.config.clone(),
    };
    let config = TaskdeckConfig::load(&overrides)?;
    taskdeck::logging::init(&config.toml.logging, cli.verbose)?;

    if let Commands::Config { command } = &cli.command {
        return config::cmd_config(&config, command.clone());
    }

    let app = App::build(config)?;
    let printer = NotificationPrinter::start(app.notifications.clone());
    let busy = BusyIndicator::start(&app.activity);

    let result = dispatch(&app, cli.command).await;

    busy.finish();
    printer.finish();
    result
}

async fn dispatch(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login {
            username,
            password,
            remember,
        } => session::cmd_login(app, username, password, remember).await,
        Commands::Register {
            username,
            email,
            password,
        } => session::cmd_register(app, username, email, password).await,
        Commands::Logout => {
            session::cmd_logout(app);
            Ok(())
        }
        Commands::Whoami => {
            session::cmd_whoami(app);
            Ok(())
        }
        Commands::Projects { command } => projects::cmd_projects(app, command).await,
        Commands::Tasks { command } => tasks::cmd_tasks(app, command).await,
        Commands::Members { command } => members::cmd_members(app, command).await,
        Commands::Profile { command } => profile::cmd_profile(app, command).await,
        Commands::Users { command } => users::cmd_users(app, command).await,
        Commands::Config { .. } => Ok(()),
    }
}

/// Fail unless a live session exists. `route` is where the user was heading.
pub(crate) fn require_login(app: &App, route: &str) -> Result<()> {
    match guards::auth_guard(&app.session, route) {
        GuardOutcome::Allow => Ok(()),
        GuardOutcome::Redirect(target) => {
            app.navigator.navigate(&target);
            bail!("Not logged in. Run 'taskdeck login' first.")
        }
    }
}

/// Fail unless the session holds one of `roles`.
pub(crate) fn require_role(app: &App, route: &str, roles: &[&str]) -> Result<()> {
    require_login(app, route)?;
    match guards::role_guard(&app.session, &app.notifications, roles) {
        GuardOutcome::Allow => Ok(()),
        GuardOutcome::Redirect(target) => {
            app.navigator.navigate(&target);
            Err(Notified(guards::PERMISSION_DENIED.to_string()).into())
        }
    }
}

/// Ask before a destructive action unless `--yes` was given.
pub(crate) fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Placeholder for empty optional columns.
pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
