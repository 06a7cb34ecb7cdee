use backoffice_domain::{AdminResource, AssignmentTarget, ListQuery, SortDirection};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "backoffice",
    about = "Back-office admin console",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the bearer token.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,

        /// Account password. Prompted for on stdin when neither the flag nor
        /// the environment variable is set.
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored token.
    Logout,

    /// Show the signed-in identity.
    Whoami,

    /// Check whether the signed-in user holds a permission.
    Can {
        /// Exact permission name, e.g. "Delete Users".
        permission: String,
    },

    /// Show the navigation menus.
    Menu,

    /// List rows of an admin resource.
    List(ListArgs),

    /// Edit the permission assignment of a role or user.
    Assign {
        #[command(subcommand)]
        target: AssignTarget,
    },
}

#[derive(Debug, Subcommand)]
pub enum AssignTarget {
    /// Edit a role.
    Role {
        /// Role id.
        id: i64,
    },

    /// Edit a single user.
    User {
        /// User id.
        id: i64,
    },
}

impl From<&AssignTarget> for AssignmentTarget {
    fn from(value: &AssignTarget) -> Self {
        match value {
            AssignTarget::Role { id } => Self::Role(*id),
            AssignTarget::User { id } => Self::User(*id),
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Resource name, e.g. users, roles, choose-us.
    pub resource: AdminResource,

    /// Case-insensitive text search.
    #[arg(long)]
    pub search: Option<String>,

    /// Earliest creation day (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest creation day (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Column to sort by.
    #[arg(long, default_value = "name")]
    pub sort: String,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,

    /// Zero-based page.
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Rows per page.
    #[arg(long, default_value_t = 5)]
    pub per_page: usize,
}

impl ListArgs {
    pub fn query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            created_from: self.from,
            created_to: self.to,
            sort_by: self.sort.clone(),
            direction: if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
            page: self.page,
            rows_per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use backoffice_domain::{AdminResource, AssignmentTarget, ListQuery, SortDirection};
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};

    #[test]
    fn list_defaults_match_list_screens() {
        let cli = Cli::try_parse_from(["backoffice", "list", "users"])
            .unwrap_or_else(|error| panic!("{error}"));

        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.resource, AdminResource::Users);
        assert_eq!(args.query(), ListQuery::default());
    }

    #[test]
    fn list_flags_build_query() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "list",
            "choose-us",
            "--search",
            "warranty",
            "--from",
            "2024-01-01",
            "--sort",
            "created_at",
            "--desc",
            "--page",
            "2",
            "--per-page",
            "10",
        ])
        .unwrap_or_else(|error| panic!("{error}"));

        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        let query = args.query();
        assert_eq!(args.resource, AdminResource::ChooseUs);
        assert_eq!(query.search.as_deref(), Some("warranty"));
        assert!(query.created_from.is_some());
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!((query.page, query.rows_per_page), (2, 10));
    }

    #[test]
    fn unknown_resource_is_rejected() {
        assert!(Cli::try_parse_from(["backoffice", "list", "widgets"]).is_err());
    }

    #[test]
    fn login_password_is_optional_and_read_from_environment() {
        let cli = Cli::try_parse_from(["backoffice", "login", "--email", "a@b.com"])
            .unwrap_or_else(|error| panic!("{error}"));
        let Command::Login { email, .. } = cli.command else {
            panic!("expected login command");
        };
        assert_eq!(email, "a@b.com");

        let command = Cli::command();
        let env = command
            .find_subcommand("login")
            .and_then(|login| {
                login
                    .get_arguments()
                    .find(|argument| argument.get_id() == "password")
            })
            .and_then(|argument| argument.get_env());
        assert_eq!(env.and_then(|name| name.to_str()), Some("BACKOFFICE_PASSWORD"));
    }

    #[test]
    fn assign_targets_parse() {
        let cli = Cli::try_parse_from(["backoffice", "assign", "user", "9"])
            .unwrap_or_else(|error| panic!("{error}"));

        let Command::Assign { target } = cli.command else {
            panic!("expected assign command");
        };
        assert_eq!(AssignmentTarget::from(&target), AssignmentTarget::User(9));
    }
}
