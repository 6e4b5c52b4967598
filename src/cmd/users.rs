//! User commands: `taskdeck users`. Everything except `search` is Admin only.

use anyhow::Result;
use console::style;

use taskdeck::App;
use taskdeck::models::user::ADMIN_ROLE;
use taskdeck::models::{ManageRolesRequest, UserDto};
use taskdeck::routes;
use taskdeck::state::users::{UserStats, filter_by_role, filter_by_search, sort_users, stats};

use super::super::UserCommands;
use super::{confirm, or_dash, require_login, require_role};

const ROLES_UPDATED: &str = "User roles updated successfully";
const USER_DELETED: &str = "User deleted successfully";

pub async fn cmd_users(app: &App, command: UserCommands) -> Result<()> {
    match command {
        UserCommands::Search { query } => {
            require_login(app, routes::USER_SEARCH)?;
            let results = app.users.search(&query).await?;
            if results.is_empty() {
                println!("No users match '{query}'.");
                return Ok(());
            }
            for user in results {
                println!(
                    "  {:<24} {:<24} {}",
                    user.user_id,
                    user.user_name,
                    or_dash(Some(user.email.as_str()))
                );
            }
        }
        UserCommands::List {
            search,
            role,
            sort,
            order,
        } => {
            require_role(app, routes::USERS, &[ADMIN_ROLE])?;
            let all = app.users.list_all().await?;
            let mut users = filter_by_role(&all, role.as_deref());
            if let Some(term) = search.as_deref() {
                users = filter_by_search(&users, term);
            }
            if let Some(by) = sort {
                users = sort_users(&users, by, order);
            }
            print_table(&users);
            print_stats(&stats(&all));
        }
        UserCommands::Show { id } => {
            require_role(app, &routes::user_detail(&id), &[ADMIN_ROLE])?;
            let user = app.users.get(&id).await?;
            println!();
            println!("{}", style(&user.user_name).bold());
            println!("  id:         {}", user.id);
            println!("  email:      {}", or_dash(Some(user.email.as_str())));
            println!("  roles:      {}", user.roles.join(", "));
            println!("  registered: {}", or_dash(user.registration_date.get(..10)));
            println!();
        }
        UserCommands::Roles { id, roles } => {
            require_role(app, &routes::user_detail(&id), &[ADMIN_ROLE])?;
            app.users
                .manage_roles(&id, &ManageRolesRequest { roles })
                .await?;
            app.notifications.success(ROLES_UPDATED);
        }
        UserCommands::Delete { id, yes } => {
            require_role(app, &routes::user_detail(&id), &[ADMIN_ROLE])?;
            if !confirm(&format!("Delete user {id}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.users.delete(&id).await?;
            app.notifications.success(USER_DELETED);
        }
    }

    Ok(())
}

fn print_table(users: &[UserDto]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    println!();
    println!("  {:<24} {:<24} {:<30} ROLES", "ID", "NAME", "EMAIL");
    for user in users {
        let roles = user.roles.join(", ");
        let roles = if user.is_admin() {
            style(roles).magenta().to_string()
        } else {
            roles
        };
        println!(
            "  {:<24} {:<24} {:<30} {}",
            user.id,
            user.user_name,
            or_dash(Some(user.email.as_str())),
            roles
        );
    }
}

fn print_stats(stats: &UserStats) {
    println!();
    println!(
        "{} user(s): {} admin, {} regular",
        stats.total, stats.admins, stats.regular
    );
}
