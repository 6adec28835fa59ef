//! Command-line arguments.
//!
//! Commands are namespaced by screen (`projects`, `bugs`, `profile`) so
//! `--help` mirrors the dashboard's navigation.

use std::path::PathBuf;

use bugdesk_core::bug::{BugKind, BugStatus};
use bugdesk_core::forms::ProfileField;
use bugdesk_core::roles::Role;
use bugdesk_core::types::DbId;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bugdesk")]
#[command(about = "Bug-tracking dashboard for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend base URL. Overrides `API_BASE_URL`.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file. Overrides `BUGDESK_SESSION_FILE`.
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session.
    Logout,

    /// Create an account.
    Signup(SignupArgs),

    /// Show the signed-in user's profile.
    Me,

    /// Edit the signed-in user's profile.
    #[command(subcommand)]
    Profile(ProfileCommand),

    #[command(subcommand)]
    Projects(ProjectsCommand),

    #[command(subcommand)]
    Bugs(BugsCommand),

    /// List developers that can be assigned to bugs.
    Developers,

    /// List all users, grouped into QA and developers.
    Users,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long)]
    pub role: Option<Role>,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Change one field: name, email, phone, or password.
    Set { field: ProfileField, value: String },
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Case-insensitive search text.
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects visible to your role.
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// Create a project and assign its members (managers only).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// QA user id; repeat for several.
        #[arg(long = "qa")]
        qa_ids: Vec<DbId>,
        /// Developer user id; repeat for several.
        #[arg(long = "dev")]
        developer_ids: Vec<DbId>,
    },
}

#[derive(Debug, Subcommand)]
pub enum BugsCommand {
    /// List bugs with their risk classification.
    List {
        /// Only bugs in this project.
        #[arg(long)]
        project: Option<DbId>,
        #[command(flatten)]
        paging: PageArgs,
        /// Rows per page (6 or 12).
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one bug and its assignees.
    Show {
        id: DbId,
        #[arg(long)]
        project: Option<DbId>,
    },

    /// File a bug in a project (QA only).
    Create {
        #[arg(long)]
        project: DbId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Due date, `YYYY-MM-DD`.
        #[arg(long)]
        deadline: String,
        #[arg(long = "type", default_value = "bug")]
        kind: BugKind,
        /// Screenshot to attach; compressed before upload.
        #[arg(long)]
        screenshot: Option<PathBuf>,
        /// Developer id to assign; repeat for several.
        #[arg(long = "dev")]
        developer_ids: Vec<DbId>,
    },

    /// Move a bug to another status (developers only).
    Status {
        id: DbId,
        status: BugStatus,
        #[arg(long)]
        project: Option<DbId>,
    },

    /// Read the text in a bug's screenshot.
    Ocr {
        id: DbId,
        #[arg(long)]
        project: Option<DbId>,
    },
}
