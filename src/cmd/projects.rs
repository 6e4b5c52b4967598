//! Project commands: `taskdeck projects`.

use anyhow::Result;
use console::style;

use taskdeck::App;
use taskdeck::models::{CreateProjectRequest, Project, ProjectStatus};
use taskdeck::routes;
use taskdeck::state::projects::sort_projects;
use taskdeck::state::{ProjectFilters, ProjectStats};
use taskdeck::ui::icons::FOLDER;

use super::super::ProjectCommands;
use super::{confirm, or_dash, require_login};

pub async fn cmd_projects(app: &App, command: ProjectCommands) -> Result<()> {
    match command {
        ProjectCommands::List {
            search,
            status,
            role,
            sort,
            order,
            stats,
        } => {
            require_login(app, routes::PROJECTS)?;
            app.projects.load().await?;

            if stats {
                print_stats(&app.projects.stats());
                return Ok(());
            }

            app.projects.set_filters(ProjectFilters {
                search,
                status,
                role,
            });
            let mut projects = app.projects.filtered();
            if let Some(by) = sort {
                projects = sort_projects(&projects, by, order);
            }
            print_table(&projects, app.session.user_id().as_deref());
        }
        ProjectCommands::Show { id } => {
            require_login(app, &routes::project_detail(&id))?;
            let project = app.projects.load_one(&id).await?;
            print_project(&project);
        }
        ProjectCommands::Create {
            name,
            description,
            status,
        } => {
            require_login(app, routes::PROJECT_CREATE)?;
            let project = app
                .projects
                .create(&CreateProjectRequest {
                    name,
                    description,
                    status,
                })
                .await?;
            println!("{} ({})", project.name, style(&project.id).dim());
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            status,
        } => {
            require_login(app, &routes::project_edit(&id))?;
            let current = app.projects.load_one(&id).await?;
            let change = CreateProjectRequest {
                name: name.unwrap_or(current.name),
                description: description.or(current.description),
                status: status.unwrap_or(current.status),
            };
            let project = app.projects.update(&id, &change).await?;
            print_project(&project);
        }
        ProjectCommands::Delete { id, yes } => {
            require_login(app, &routes::project_detail(&id))?;
            if !confirm(&format!("Delete project {id}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.projects.delete(&id).await?;
        }
    }

    Ok(())
}

fn status_label(status: ProjectStatus, width: usize) -> String {
    let label = format!("{:<width$}", status.as_str());
    match status {
        ProjectStatus::InProgress => style(label).green().to_string(),
        ProjectStatus::OnHold => style(label).yellow().to_string(),
        ProjectStatus::Completed => style(label).cyan().to_string(),
        ProjectStatus::Archived => style(label).dim().to_string(),
    }
}

fn print_table(projects: &[Project], user_id: Option<&str>) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    println!();
    println!(
        "  {:<24} {:<32} {:<12} {:>7}  OWNER",
        "ID", "NAME", "STATUS", "MEMBERS"
    );
    for project in projects {
        let owner = if user_id == Some(project.owner_id.as_str()) {
            "you"
        } else {
            or_dash(project.owner_name.as_deref())
        };
        println!(
            "  {:<24} {:<32} {} {:>7}  {}",
            project.id,
            project.name,
            status_label(project.status, 12),
            project.members_count,
            owner
        );
    }
    println!();
    println!("{} project(s)", projects.len());
}

fn print_project(project: &Project) {
    println!();
    println!("{}{}", FOLDER, style(&project.name).bold());
    println!("  id:          {}", project.id);
    println!("  status:      {}", status_label(project.status, 0));
    println!("  description: {}", or_dash(project.description.as_deref()));
    println!("  owner:       {}", or_dash(project.owner_name.as_deref()));
    println!("  members:     {}", project.members_count);
    println!("  created:     {}", or_dash(Some(project.creation_date.as_str())));
    println!();
}

fn print_stats(stats: &ProjectStats) {
    println!();
    println!("Projects:    {}", stats.total);
    println!("  owned:     {}", stats.owned);
    println!("  active:    {}", stats.active);
    println!("  completed: {}", stats.completed);
    println!("  on hold:   {}", stats.on_hold);
    println!("  archived:  {}", stats.archived);
    println!();
}
