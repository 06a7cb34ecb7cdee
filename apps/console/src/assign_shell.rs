//! Line-oriented front end for one assignment screen.

use std::str::FromStr;

use backoffice_application::{
    AssignmentScreenController, AssignmentScreenError, ScreenExit, ScreenState, Session,
};
use backoffice_core::{AppError, AppResult};
use backoffice_domain::{PermissionId, SelectAllState, TransferSide};
use backoffice_infrastructure::TracingNoticeSink;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  show                      redraw both panes
  toggle <id> [<id>...]     check or uncheck permissions
  all available|assigned    select-all control of a pane
  >                         move checked available permissions to assigned
  <                         move checked assigned permissions to available
  save                      replace the assignment and leave
  reload                    retry after a failed load
  cancel                    leave without saving
  help                      show this text";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Show,
    Toggle(Vec<PermissionId>),
    All(TransferSide),
    MoveToAssigned,
    MoveToAvailable,
    Save,
    Reload,
    Cancel,
    Help,
}

impl FromStr for ShellCommand {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut words = value.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Show);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "show" | "ls" => Self::Show,
            "toggle" | "t" => {
                let ids = words
                    .by_ref()
                    .map(|word| {
                        word.parse::<i64>().map(PermissionId::new).map_err(|_| {
                            AppError::Validation(format!("'{word}' is not a permission id"))
                        })
                    })
                    .collect::<AppResult<Vec<_>>>()?;
                if ids.is_empty() {
                    return Err(AppError::Validation(
                        "toggle needs at least one permission id".to_owned(),
                    ));
                }
                Self::Toggle(ids)
            }
            "all" => match words.next().map(str::to_ascii_lowercase).as_deref() {
                Some("available" | "left") => Self::All(TransferSide::Available),
                Some("assigned" | "right") => Self::All(TransferSide::Assigned),
                _ => {
                    return Err(AppError::Validation(
                        "usage: all available|assigned".to_owned(),
                    ));
                }
            },
            ">" => Self::MoveToAssigned,
            "<" => Self::MoveToAvailable,
            "save" => Self::Save,
            "reload" => Self::Reload,
            "cancel" | "quit" | "q" => Self::Cancel,
            "help" | "?" => Self::Help,
            other => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}', type 'help'"
                )));
            }
        };

        if let Some(extra) = words.next() {
            return Err(AppError::Validation(format!(
                "unexpected argument '{extra}'"
            )));
        }
        Ok(command)
    }
}

/// Loads the screen and runs the prompt until the user saves or cancels.
///
/// Returns `None` when input ends before either happens.
pub async fn run(
    controller: &mut AssignmentScreenController,
    session: &Session,
    notices: &TracingNoticeSink,
) -> AppResult<Option<ScreenExit>> {
    if controller.load(session).await.is_ok() {
        println!("{}", render(controller));
    } else {
        println!("loading failed; type 'reload' to retry or 'cancel' to leave");
    }
    print_notices(notices);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|error| AppError::Internal(format!("failed to read input: {error}")))?;
        let Some(line) = line else {
            return Ok(None);
        };

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        let outcome = execute(controller, session, command).await;
        print_notices(notices);
        match outcome {
            Ok(Some(exit)) => return Ok(Some(exit)),
            Ok(None) => {}
            Err(AssignmentScreenError::Save(_) | AssignmentScreenError::Load(_)) => {}
            Err(error) => println!("{error}"),
        }
    }
}

async fn execute(
    controller: &mut AssignmentScreenController,
    session: &Session,
    command: ShellCommand,
) -> Result<Option<ScreenExit>, AssignmentScreenError> {
    match command {
        ShellCommand::Show => println!("{}", render(controller)),
        ShellCommand::Toggle(ids) => {
            for id in ids {
                controller.toggle(id)?;
            }
            println!("{}", render(controller));
        }
        ShellCommand::All(side) => {
            controller.toggle_all(side)?;
            println!("{}", render(controller));
        }
        ShellCommand::MoveToAssigned => {
            let moved = controller.move_to_assigned()?;
            println!("moved {moved} to {}", TransferSide::Assigned.title());
            println!("{}", render(controller));
        }
        ShellCommand::MoveToAvailable => {
            let moved = controller.move_to_available()?;
            println!("moved {moved} to {}", TransferSide::Available.title());
            println!("{}", render(controller));
        }
        ShellCommand::Save => return controller.save(session).await.map(Some),
        ShellCommand::Reload => {
            controller.load(session).await?;
            println!("{}", render(controller));
        }
        ShellCommand::Cancel => return controller.cancel().map(Some),
        ShellCommand::Help => println!("{HELP}"),
    }

    Ok(None)
}

fn render(controller: &AssignmentScreenController) -> String {
    let mut lines = vec![format!(
        "Permissions of {} '{}'",
        controller.target(),
        controller.display_name()
    )];
    if controller.state() != ScreenState::Ready {
        lines.push(format!("screen is {}", controller.state()));
        return lines.join("\n");
    }

    let transfer = controller.transfer();
    for side in [TransferSide::Available, TransferSide::Assigned] {
        let selection = transfer.selection(side);
        let marker = match selection.state() {
            SelectAllState::Disabled => "   ",
            SelectAllState::Unchecked => "[ ]",
            SelectAllState::Indeterminate => "[-]",
            SelectAllState::Checked => "[x]",
        };
        lines.push(format!(
            "{marker} {} ({}/{} selected)",
            side.title(),
            selection.checked,
            selection.total
        ));
        lines.extend(transfer.pane(side).iter().map(|record| {
            let mark = if transfer.is_checked(record.id) {
                'x'
            } else {
                ' '
            };
            format!("    [{mark}] {:>4}  {}", record.id, record.display_label())
        }));
    }
    lines.join("\n")
}

fn print_notices(notices: &TracingNoticeSink) {
    for notice in notices.drain() {
        println!("» {}", notice.message);
    }
}
