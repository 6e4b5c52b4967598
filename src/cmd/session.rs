//! Sign-in commands: `taskdeck login|register|logout|whoami`.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password};

use taskdeck::App;
use taskdeck::guards::{self, GuardOutcome};
use taskdeck::models::{LoginOptions, LoginRequest, RegisterRequest};
use taskdeck::ui::icons::USER;

pub async fn cmd_login(
    app: &App,
    username: Option<String>,
    password: Option<String>,
    remember: bool,
) -> Result<()> {
    if let GuardOutcome::Redirect(_) = guards::guest_guard(&app.session) {
        println!(
            "Already logged in as {}. Run 'taskdeck logout' to switch accounts.",
            app.session.username().unwrap_or_default()
        );
        return Ok(());
    }

    let username = match username {
        Some(username) => username,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let session = app
        .auth
        .login(
            &LoginRequest { username, password },
            LoginOptions {
                remember_me: remember,
            },
        )
        .await?;
    println!(
        "Session valid until {}",
        session.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

pub async fn cmd_register(
    app: &App,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    app.auth
        .register(&RegisterRequest {
            username,
            email,
            password,
        })
        .await?;
    Ok(())
}

pub fn cmd_logout(app: &App) {
    app.auth.logout();
}

pub fn cmd_whoami(app: &App) {
    let Some(session) = app.session.session().filter(|_| app.session.is_authenticated()) else {
        println!("Not logged in.");
        return;
    };

    let remaining = app.session.codec().time_to_expire(&session.token);
    println!("{}{}", USER, style(&session.username).bold());
    println!("  id:      {}", session.user_id);
    println!(
        "  roles:   {}",
        if session.roles.is_empty() {
            "-".to_string()
        } else {
            session.roles.join(", ")
        }
    );
    println!("  expires: {} min", remaining.as_secs() / 60);
}
