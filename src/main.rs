use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use taskdeck::models::{ProjectRole, ProjectStatus, SortOrder, TaskPriority, TaskStatus};
use taskdeck::state::members::MemberSort;
use taskdeck::state::users::UserSort;
use taskdeck::state::{AssignmentFilter, ProjectSort, RoleFilter, TaskGrouping, TaskSort};

mod cmd;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(version, about = "Terminal client for TaskDeck projects and tasks")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL. Overrides taskdeck.toml and TASKDECK_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for the session store and default config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to taskdeck.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session locally
    Login {
        username: Option<String>,
        #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Keep the session flagged as remembered
        #[arg(long)]
        remember: bool,
    },
    /// Create an account (does not sign in)
    Register {
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "TASKDECK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Work with projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Work with the tasks of a project
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage project members
    Members {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Find users, or administer them (Admin only)
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProjectCommands {
    /// List projects
    List {
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<ProjectStatus>,
        /// all, owner or member
        #[arg(long, default_value = "all")]
        role: RoleFilter,
        /// name, date or members
        #[arg(long)]
        sort: Option<ProjectSort>,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        /// Print counts instead of the list
        #[arg(long)]
        stats: bool,
    },
    /// Show one project
    Show { id: String },
    /// Create a project
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, default_value = "in-progress")]
        status: ProjectStatus,
    },
    /// Update a project; unspecified fields keep their value
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<ProjectStatus>,
    },
    /// Delete a project
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum TaskCommands {
    /// List the tasks of a project
    List {
        project: String,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        /// all, me, unassigned or a user id
        #[arg(long, default_value = "all")]
        assigned: AssignmentFilter,
        /// title, priority, due-date or status
        #[arg(long)]
        sort: Option<TaskSort>,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        /// status, priority or assignee
        #[arg(long)]
        group: Option<TaskGrouping>,
        #[arg(long)]
        stats: bool,
    },
    /// Show one task
    Show { project: String, task: String },
    /// Create a task
    Create {
        project: String,
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Assignee user id
        #[arg(long)]
        assign: Option<String>,
    },
    /// Update a task; unspecified fields keep their value
    Update {
        project: String,
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assign: Option<String>,
    },
    /// Delete a task
    Delete {
        project: String,
        task: String,
        #[arg(long)]
        yes: bool,
    },
    /// Toggle a task between completed and in progress
    Toggle { project: String, task: String },
}

#[derive(Subcommand, Clone)]
pub enum MemberCommands {
    /// List the members of a project
    List {
        project: String,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        role: Option<ProjectRole>,
        /// role, name or date
        #[arg(long, default_value = "role")]
        sort: MemberSort,
    },
    /// Add a user to a project
    Add {
        project: String,
        user_id: String,
        #[arg(long, default_value = "member")]
        role: ProjectRole,
    },
    /// Change a member's role
    Role {
        project: String,
        user_id: String,
        role: ProjectRole,
    },
    /// Remove a member from a project
    Remove {
        project: String,
        user_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Leave a project
    Leave {
        project: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change your username or email
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change your password
    Password,
    /// Remove your profile image
    DeleteImage,
}

#[derive(Subcommand, Clone)]
pub enum UserCommands {
    /// Search users by name or email
    Search { query: String },
    /// List all users (Admin)
    List {
        #[arg(short, long)]
        search: Option<String>,
        /// Only users holding this role
        #[arg(long)]
        role: Option<String>,
        /// name, email or date
        #[arg(long)]
        sort: Option<UserSort>,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    /// Show one user (Admin)
    Show { id: String },
    /// Replace a user's roles (Admin)
    Roles {
        id: String,
        #[arg(required = true)]
        roles: Vec<String>,
    },
    /// Delete a user (Admin)
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default taskdeck.toml
    Init,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    match cmd::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Backend failures were already shown as notifications.
            if !cmd::already_notified(&err) {
                eprintln!("Error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
