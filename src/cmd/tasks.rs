//! Task commands: `taskdeck tasks`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use console::style;

use taskdeck::App;
use taskdeck::models::{CreateTaskRequest, Task, TaskPriority, TaskStatus};
use taskdeck::routes;
use taskdeck::state::tasks::{UNASSIGNED, group_tasks, sort_tasks};
use taskdeck::state::{TaskFilters, TaskStats};

use super::super::TaskCommands;
use super::{confirm, or_dash, require_login};

pub async fn cmd_tasks(app: &App, command: TaskCommands) -> Result<()> {
    match command {
        TaskCommands::List {
            project,
            search,
            status,
            priority,
            assigned,
            sort,
            order,
            group,
            stats,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            app.tasks.load(&project).await?;

            if stats {
                print_stats(&app.tasks.stats());
                return Ok(());
            }

            app.tasks.set_filters(TaskFilters {
                search,
                status,
                priority,
                assigned_to: assigned,
            });
            let mut tasks = app.tasks.filtered();
            if let Some(by) = sort {
                tasks = sort_tasks(&tasks, by, order);
            }

            match group {
                Some(grouping) => {
                    for group in group_tasks(&tasks, grouping) {
                        println!();
                        println!("{} ({})", style(&group.key).bold(), group.tasks.len());
                        print_rows(&group.tasks);
                    }
                    println!();
                }
                None => print_table(&tasks),
            }
        }
        TaskCommands::Show { project, task } => {
            require_login(app, &routes::project_detail(&project))?;
            let task = app.tasks.load_one(&project, &task).await?;
            print_task(&task);
        }
        TaskCommands::Create {
            project,
            title,
            description,
            priority,
            status,
            due,
            assign,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            let data = CreateTaskRequest {
                title,
                description,
                priority,
                status,
                due_date: due.as_deref().map(parse_due).transpose()?,
                assigned_to_id: assign,
            };
            let task = app.tasks.create(&project, &data).await?;
            println!("{} ({})", task.title, style(&task.id).dim());
        }
        TaskCommands::Update {
            project,
            task,
            title,
            description,
            priority,
            status,
            due,
            assign,
        } => {
            require_login(app, &routes::project_detail(&project))?;
            let current = app.tasks.load_one(&project, &task).await?;
            let mut change = current.to_update();
            if let Some(title) = title {
                change.title = title;
            }
            if description.is_some() {
                change.description = description;
            }
            if let Some(priority) = priority {
                change.priority = priority;
            }
            if let Some(status) = status {
                change.status = status;
            }
            if let Some(due) = due {
                change.due_date = Some(parse_due(&due)?);
            }
            if let Some(assign) = assign {
                change.assigned_to_id = (assign != "none").then_some(assign);
            }
            let updated = app.tasks.update(&project, &task, &change).await?;
            print_task(&updated);
        }
        TaskCommands::Delete { project, task, yes } => {
            require_login(app, &routes::project_detail(&project))?;
            if !confirm(&format!("Delete task {task}?"), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            app.tasks.delete(&project, &task).await?;
        }
        TaskCommands::Toggle { project, task } => {
            require_login(app, &routes::project_detail(&project))?;
            let current = app.tasks.load_one(&project, &task).await?;
            let updated = app.tasks.toggle_completed(&current).await?;
            println!("{} is now {}", updated.title, status_label(updated.status, 0));
        }
    }

    Ok(())
}

/// Validate a `YYYY-MM-DD` due date and pass it on as the backend expects.
fn parse_due(raw: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid due date '{raw}'. Expected YYYY-MM-DD"))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

fn status_label(status: TaskStatus, width: usize) -> String {
    let label = format!("{:<width$}", status.as_str());
    match status {
        TaskStatus::Pending => style(label).yellow().to_string(),
        TaskStatus::InProgress => style(label).blue().to_string(),
        TaskStatus::Completed => style(label).green().to_string(),
    }
}

fn priority_label(priority: TaskPriority, width: usize) -> String {
    let label = format!("{:<width$}", priority.as_str());
    match priority {
        TaskPriority::High => style(label).red().bold().to_string(),
        TaskPriority::Medium => style(label).yellow().to_string(),
        TaskPriority::Low => style(label).dim().to_string(),
    }
}

fn due_of(task: &Task) -> &str {
    task.due_date
        .as_deref()
        .map(|due| due.get(..10).unwrap_or(due))
        .unwrap_or("-")
}

fn print_rows(tasks: &[Task]) {
    for task in tasks {
        println!(
            "  {:<24} {:<36} {} {} {:<10}  {}",
            task.id,
            task.title,
            status_label(task.status, 10),
            priority_label(task.priority, 6),
            due_of(task),
            task.assigned_to_name.as_deref().unwrap_or(UNASSIGNED)
        );
    }
}

fn print_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    println!();
    println!(
        "  {:<24} {:<36} {:<10} {:<6} {:<10}  ASSIGNEE",
        "ID", "TITLE", "STATUS", "PRIO", "DUE"
    );
    print_rows(tasks);
    println!();
    println!("{} task(s)", tasks.len());
}

fn print_task(task: &Task) {
    println!();
    println!("{}", style(&task.title).bold());
    println!("  id:          {}", task.id);
    println!("  project:     {}", task.project_id);
    println!("  status:      {}", status_label(task.status, 0));
    println!("  priority:    {}", priority_label(task.priority, 0));
    println!("  due:         {}", due_of(task));
    println!(
        "  assignee:    {}",
        task.assigned_to_name.as_deref().unwrap_or(UNASSIGNED)
    );
    println!("  created by:  {}", or_dash(task.created_by_name.as_deref()));
    println!("  description: {}", or_dash(task.description.as_deref()));
    println!();
}

fn print_stats(stats: &TaskStats) {
    println!();
    println!("Tasks:           {}", stats.total);
    println!("  pending:       {}", stats.pending);
    println!("  in progress:   {}", stats.in_progress);
    println!("  completed:     {}", stats.completed);
    println!("  mine:          {}", stats.mine);
    println!("  unassigned:    {}", stats.unassigned);
    println!("  high priority: {}", stats.high_priority);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_dates_are_validated() {
        assert_eq!(parse_due("2024-05-01").unwrap(), "2024-05-01");
        assert!(parse_due("05/01/2024").is_err());
        assert!(parse_due("2024-02-30").is_err());
    }
}
