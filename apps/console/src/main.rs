//! Back-office admin console.

#![forbid(unsafe_code)]

mod assign_shell;
mod cli;
mod console_config;

use std::sync::Arc;

use backoffice_application::{AssignmentScreenController, ResourceListService, Session};
use backoffice_core::{AppError, AppResult};
use backoffice_domain::{AssignmentTarget, NavigationMenu, ResourceAction};
use backoffice_infrastructure::{FileTokenStore, HttpBackofficeClient, TracingNoticeSink};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::cli::{Cli, Command, ListArgs};
use crate::console_config::{ConsoleConfig, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    let client = Arc::new(HttpBackofficeClient::new(
        config.api_base_url.as_str(),
        config.http_timeout,
    )?);
    let store = Arc::new(FileTokenStore::new(&config.token_dir));
    let mut session = Session::restore(store).await?;

    match cli.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password().await?,
            };
            let identity = session
                .sign_in(client.as_ref(), email.as_str(), password.as_str())
                .await?;
            println!(
                "signed in as {} ({}), {} permissions",
                identity.email(),
                identity.role(),
                identity.permissions().len()
            );
        }
        Command::Logout => {
            session.sign_out().await?;
            println!("signed out");
        }
        Command::Whoami => print_identity(&session),
        Command::Can { permission } => {
            let granted = session.has_permission(permission.as_str());
            println!("{permission}: {}", if granted { "granted" } else { "denied" });
        }
        Command::Menu => print_menus(&session),
        Command::List(args) => list(&session, client, &args).await?,
        Command::Assign { target } => {
            let target = AssignmentTarget::from(&target);
            let notices = Arc::new(TracingNoticeSink::new());
            let mut controller =
                AssignmentScreenController::new(target, client, notices.clone());
            match assign_shell::run(&mut controller, &session, &notices).await? {
                Some(exit) => info!(route = exit.route, "assignment screen closed"),
                None => println!("input closed, changes discarded"),
            }
        }
    }

    Ok(())
}

async fn prompt_password() -> AppResult<String> {
    eprint!("password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read password: {error}")))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn print_identity(session: &Session) {
    let Some(identity) = session.identity() else {
        println!("not signed in");
        return;
    };

    println!("email:    {}", identity.email());
    println!("role:     {}", identity.role());
    println!("user id:  {}", identity.user_id());
    if let Some(expires_at) = identity.expires_at() {
        println!("expires:  {}", expires_at.to_rfc3339());
    }
    println!("permissions:");
    for permission in identity.permissions() {
        println!("  {permission}");
    }
}

fn print_menus(session: &Session) {
    for menu in NavigationMenu::all() {
        println!("{}", menu.label());
        for entry in menu.entries() {
            let hint = entry
                .resource
                .map(|resource| {
                    let can_create =
                        session.has_permission(&resource.permission_name(ResourceAction::Create));
                    if can_create { " (+)" } else { "" }
                })
                .unwrap_or_default();
            println!("  {:<28}{}{hint}", entry.label, entry.route);
        }
    }
}

async fn list(
    session: &Session,
    client: Arc<HttpBackofficeClient>,
    args: &ListArgs,
) -> AppResult<()> {
    let service = ResourceListService::new(client);
    let listing = service.list(session, args.resource, &args.query()).await?;

    println!(
        "{} ({} matching, page {} of {}){}",
        args.resource.title(),
        listing.total,
        args.page + 1,
        listing.total.div_ceil(args.per_page).max(1),
        if listing.can_create { " [+ add]" } else { "" }
    );
    for gated in &listing.rows {
        let id = gated
            .row
            .id()
            .map_or_else(|| "-".to_owned(), |id| id.to_string());
        let label = gated.row.label().unwrap_or("<unnamed>");
        let created = gated
            .row
            .created_at()
            .map(|value| value.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let mut actions = Vec::new();
        if gated.can_update {
            actions.push("edit");
        }
        if gated.can_delete {
            actions.push("delete");
        }
        println!("{id:>5}  {label:<32} {created:<10}  {}", actions.join(","));
    }

    Ok(())
}
