//! Profile commands: `taskdeck profile`.

use anyhow::{Result, bail};
use console::style;
use dialoguer::Password;

use taskdeck::App;
use taskdeck::models::{ChangePasswordRequest, UpdateProfileRequest, UserProfile};
use taskdeck::routes;
use taskdeck::ui::icons::USER;

use super::super::ProfileCommands;
use super::{or_dash, require_login};

const PROFILE_UPDATED: &str = "Profile updated successfully";
const PASSWORD_CHANGED: &str = "Password changed successfully";
const IMAGE_REMOVED: &str = "Profile image removed";

pub async fn cmd_profile(app: &App, command: Option<ProfileCommands>) -> Result<()> {
    require_login(app, routes::PROFILE)?;

    match command {
        None | Some(ProfileCommands::Show) => {
            let profile = app.users.profile().await?;
            print_profile(&profile);
        }
        Some(ProfileCommands::Update { username, email }) => {
            if username.is_none() && email.is_none() {
                bail!("Nothing to update. Pass --username and/or --email.");
            }
            let profile = app
                .users
                .update_profile(&UpdateProfileRequest {
                    user_name: username,
                    email,
                })
                .await?;
            app.notifications.success(PROFILE_UPDATED);
            print_profile(&profile);
        }
        Some(ProfileCommands::Password) => {
            let current_password = Password::new()
                .with_prompt("Current password")
                .interact()?;
            let new_password = Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm new password", "Passwords do not match")
                .interact()?;
            app.users
                .change_password(&ChangePasswordRequest {
                    current_password,
                    new_password,
                })
                .await?;
            app.notifications.success(PASSWORD_CHANGED);
        }
        Some(ProfileCommands::DeleteImage) => {
            app.users.delete_profile_image().await?;
            app.notifications.success(IMAGE_REMOVED);
        }
    }

    Ok(())
}

fn print_profile(profile: &UserProfile) {
    println!();
    println!("{}{}", USER, style(&profile.user_name).bold());
    println!("  id:         {}", profile.id);
    println!("  email:      {}", or_dash(Some(profile.email.as_str())));
    println!("  roles:      {}", profile.roles.join(", "));
    println!("  registered: {}", or_dash(profile.registration_date.get(..10)));
    println!("  image:      {}", or_dash(profile.profile_image_url.as_deref()));
    println!();
}
