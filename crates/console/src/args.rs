use clap::{Parser, Subcommand, ValueEnum};
use eduhub_core::models::CourseRole;
use eduhub_core::status::{ApprovalStatus, EntityKind, RequestKind};
use eduhub_core::types::DbId;

#[derive(Parser)]
#[command(name = "eduhub-console", about = "EduHub admin console")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session tokens locally
    Login(LoginArgs),
    /// End the session and forget the local tokens
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List pending create or update requests of one entity kind
    Pending(PendingArgs),
    /// Approve a pending request
    Approve(ResolveArgs),
    /// Reject a pending request with a note
    Reject(RejectArgs),
    /// Compare the current and requested values of an update request
    Diff(DiffArgs),
    /// Course administration
    Courses(CoursesArgs),
    /// Course membership
    Members(MembersArgs),
    /// Totals and pending counts across every collection
    Dashboard,
    /// Follow realtime notifications until interrupted
    Listen,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RequestArg {
    Create,
    Update,
}

impl From<RequestArg> for RequestKind {
    fn from(arg: RequestArg) -> Self {
        match arg {
            RequestArg::Create => RequestKind::Create,
            RequestArg::Update => RequestKind::Update,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for ApprovalStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => ApprovalStatus::Pending,
            StatusArg::Approved => ApprovalStatus::Approved,
            StatusArg::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// Roles that can be given through the console. Authors are set when the
/// course is created.
#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Assigned,
    Assistant,
}

impl From<RoleArg> for CourseRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Assigned => CourseRole::Assigned,
            RoleArg::Assistant => CourseRole::Assistant,
        }
    }
}

#[derive(Parser)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    /// Read from EDUHUB_PASSWORD when omitted
    #[arg(long, env = "EDUHUB_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Case-insensitive text filter
    #[arg(long, default_value = "")]
    pub search: String,

    /// 1-based page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long, default_value = "10")]
    pub page_size: usize,
}

#[derive(Parser)]
pub struct PendingArgs {
    /// partner, lecturer, institution, degree or certification
    #[arg(long)]
    pub kind: EntityKind,

    #[arg(long, value_enum, default_value = "create")]
    pub request: RequestArg,

    /// Show the approved collection instead, optionally filtered by status
    #[arg(long)]
    pub canonical: bool,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Parser)]
pub struct ResolveArgs {
    #[arg(long)]
    pub kind: EntityKind,

    /// Entity id for create requests, update request id for updates
    #[arg(long)]
    pub id: DbId,

    #[arg(long, value_enum, default_value = "create")]
    pub request: RequestArg,
}

#[derive(Parser)]
pub struct RejectArgs {
    #[command(flatten)]
    pub target: ResolveArgs,

    /// Admin note sent to the submitter
    #[arg(long, default_value = "")]
    pub reason: String,
}

#[derive(Parser)]
pub struct DiffArgs {
    #[arg(long)]
    pub kind: EntityKind,

    /// Update request id
    #[arg(long)]
    pub id: DbId,

    /// Show unchanged fields too
    #[arg(long)]
    pub all: bool,
}

#[derive(Parser)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub action: Option<CourseAction>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Subcommand)]
pub enum CourseAction {
    /// Make a course visible to learners
    Publish { id: DbId },
    /// Hide a course
    Unpublish { id: DbId },
    /// Delete a course
    Delete { id: DbId },
}

#[derive(Parser)]
pub struct MembersArgs {
    /// Course id
    #[arg(long)]
    pub course: DbId,

    #[command(subcommand)]
    pub action: Option<MemberAction>,
}

#[derive(Subcommand)]
pub enum MemberAction {
    /// Add an approved lecturer
    Add {
        lecturer: DbId,
        #[arg(long, value_enum, default_value = "assigned")]
        role: RoleArg,
    },
    /// Change a member's role
    Role {
        lecturer: DbId,
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    /// Remove a member
    Remove { lecturer: DbId },
    /// Search approved lecturers that are not members yet
    Candidates {
        #[arg(default_value = "")]
        query: String,
    },
}
