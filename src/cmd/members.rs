//! Member commands: `taskdeck members`.

use anyhow::Result;
use console::style;

use taskdeck::App;
use taskdeck::models::{AddMemberRequest, ProjectMember, ProjectRole, UpdateMemberRoleRequest};
use taskdeck::routes::{self, Navigator};
use taskdeck::state::members::{
    MemberStats, filter_by_role, filter_by_search, role_of, sort_members, stats,
};

use super::super::MemberCommands;
use super::{Notified, confirm, or_dash, require_login};

const MEMBER_ADDED: &str = "Member added successfully";
const ROLE_UPDATED: &str = "Member role updated successfully";
const MEMBER_REMOVED: &str = "Member removed successfully";
const PROJECT_LEFT: &str = "You have left the project";
const CANNOT_MANAGE: &str = "Only the project owner or an admin can manage members.";
const OWNER_CANNOT_LEAVE: &str = "The project owner cannot leave the project.";
const NOT_A_MEMBER: &str = "You are not a member of this project.";

pub async fn cmd_members(app: &App, command: MemberCommands) -> Result<()> {
    match command {
        MemberCommands::List {
            project,
            search,
            role,
            sort,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            let all = app.members.list(&project).await?;
            let mut members = filter_by_role(&all, role);
            if let Some(term) = search.as_deref() {
                members = filter_by_search(&members, term);
            }
            print_table(&sort_members(&members, sort), app.session.user_id().as_deref());
            print_stats(&stats(&all));
        }
        MemberCommands::Add {
            project,
            user_id,
            role,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            require_manager(app, &project).await?;
            let member = app
                .members
                .add(&project, &AddMemberRequest { user_id, role })
                .await?;
            app.notifications.success(MEMBER_ADDED);
            println!("{} joined as {}", member.user_name, member.role);
        }
        MemberCommands::Role {
            project,
            user_id,
            role,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            require_manager(app, &project).await?;
            app.members
                .update_role(&project, &user_id, &UpdateMemberRoleRequest { role })
                .await?;
            app.notifications.success(ROLE_UPDATED);
            println!("{user_id} is now {role}");
        }
        MemberCommands::Remove {
            project,
            user_id,
            yes,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            require_manager(app, &project).await?;
            if !confirm(&format!("Remove {user_id} from project {project}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.members.remove(&project, &user_id).await?;
            app.notifications.success(MEMBER_REMOVED);
        }
        MemberCommands::Leave { project, yes } => {
            require_login(app, &routes::project_detail(&project))?;
            let role = current_role(app, &project).await?;
            if !role.can_leave_project() {
                return Err(refuse(app, OWNER_CANNOT_LEAVE));
            }
            if !confirm(&format!("Leave project {project}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.members.leave(&project).await?;
            app.notifications.success(PROJECT_LEFT);
            app.navigator.navigate(routes::PROJECTS);
        }
    }

    Ok(())
}

async fn current_role(app: &App, project: &str) -> Result<ProjectRole> {
    let members = app.members.list(project).await?;
    let user_id = app.session.user_id().unwrap_or_default();
    role_of(&members, &user_id).ok_or_else(|| refuse(app, NOT_A_MEMBER))
}

async fn require_manager(app: &App, project: &str) -> Result<()> {
    if current_role(app, project).await?.can_manage_members() {
        Ok(())
    } else {
        Err(refuse(app, CANNOT_MANAGE))
    }
}

fn refuse(app: &App, message: &str) -> anyhow::Error {
    app.notifications.error(message);
    Notified(message.to_string()).into()
}

fn print_table(members: &[ProjectMember], user_id: Option<&str>) {
    if members.is_empty() {
        println!("No members found.");
        return;
    }

    println!();
    println!("  {:<24} {:<24} {:<8} {:<30} JOINED", "USER ID", "NAME", "ROLE", "EMAIL");
    for member in members {
        let name = if user_id == Some(member.user_id.as_str()) {
            format!("{} (you)", member.user_name)
        } else {
            member.user_name.clone()
        };
        let role = format!("{:<8}", member.role.as_str());
        let role = match member.role {
            ProjectRole::Owner => style(role).magenta().bold().to_string(),
            ProjectRole::Admin => style(role).cyan().to_string(),
            ProjectRole::Member => role,
        };
        println!(
            "  {:<24} {:<24} {} {:<30} {}",
            member.user_id,
            name,
            role,
            or_dash(member.email.as_deref()),
            or_dash(member.joined_date.get(..10))
        );
    }
}

fn print_stats(stats: &MemberStats) {
    println!();
    println!(
        "{} member(s): {} owner, {} admin, {} member",
        stats.total, stats.owners, stats.admins, stats.members
    );
}
