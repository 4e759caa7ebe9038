use clap::{CommandFactory, Parser};
use std::time::Duration;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};
use web3todo_cli::cli::{Cli, Command, Line};
use web3todo_core::config::{self, Config, Palette};
use web3todo_core::error::AppError;
use web3todo_core::model::{Task, TaskStatus};
use web3todo_core::stake;
use web3todo_core::task_api::{self, BoardState};
use web3todo_core::wallet::{DEFAULT_CONNECT_DELAY, WalletConnector};

const WALLET_HINT: &str = "Connect your wallet to manage your tasks.";

struct Session {
    state: BoardState,
    wallet: WalletConnector,
    config: Config,
    palette: Palette,
    json: bool,
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Completed => "completed",
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Completed")]
    completed: String,
    #[tabled(rename = "Stake")]
    stake: String,
}

impl TaskRow {
    fn from_task(task: &Task, unit: &str) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            status: status_label(task.status),
            created: task.created_date.clone(),
            completed: task.completed_date.clone().unwrap_or_else(|| "-".to_string()),
            stake: stake::format_wei(&task.wei_value, unit),
        }
    }
}

fn print_tasks_plain(session: &Session) {
    let unit = session.config.unit_label();
    let rows: Vec<TaskRow> = session
        .state
        .tasks
        .iter()
        .map(|task| TaskRow::from_task(task, unit))
        .collect();
    println!("{}", Table::new(rows));
}

fn print_tasks_json(session: &Session) -> Result<(), AppError> {
    let payload = serde_json::to_value(task_api::list_tasks(&session.state))
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_plain(session: &Session, task: &Task) {
    let unit = session.config.unit_label();
    println!("{} ({})", session.palette.accentize(&task.name), task.id);
    println!("  {}", task.description);
    println!("  status: {}", status_label(task.status));
    println!("  created: {}", session.palette.mutedize(&task.created_date));
    if let Some(completed_date) = task.completed_date.as_deref() {
        println!("  completed: {}", session.palette.mutedize(completed_date));
    }
    println!("  stake: {}", stake::format_wei(&task.wei_value, unit));
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let payload =
        serde_json::to_value(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_summary(session: &Session) {
    let counts = task_api::summary(&session.state, session.config.unit_label());
    let phase = session.wallet.phase();

    if session.json {
        let payload = serde_json::json!({
            "wallet": phase.label(),
            "total_tasks": counts.total_tasks,
            "completed_tasks": counts.completed_tasks,
            "pending_tasks": counts.pending_tasks,
            "total_stake_wei": counts.total_stake_wei,
            "total_stake_formatted": counts.total_stake_formatted,
        });
        println!("{payload}");
    } else {
        println!("Wallet: {}", session.palette.accentize(phase.label()));
        println!("Total tasks: {}", counts.total_tasks);
        println!("Completed: {}", counts.completed_tasks);
        println!("Pending: {}", counts.pending_tasks);
        println!(
            "Total stake: {}",
            session.palette.accentize(&counts.total_stake_formatted)
        );
    }
}

fn print_notice(session: &Session, notice: &str) {
    if session.json {
        println!("{}", serde_json::json!({ "notice": notice }));
    } else {
        println!("{notice}");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn expand_alias(config: &Config, args: Vec<String>) -> Result<Vec<String>, AppError> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    let Some(expansion) = config.aliases.get(first) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(expansion)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

fn print_help() {
    let mut cmd = Line::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(session: &mut Session, line: Line) -> Result<(), AppError> {
    match line.command {
        Command::Connect => {
            if session.wallet.connect() {
                print_notice(session, "Connecting wallet...");
            } else if session.wallet.is_connected() {
                print_notice(session, "Wallet already connected");
            } else {
                print_notice(session, "Wallet connection already in progress");
            }
        }
        Command::Add {
            name,
            description,
            wei_value,
        } => {
            if !session.wallet.is_connected() {
                print_notice(session, WALLET_HINT);
                return Ok(());
            }

            let name = name.unwrap_or_default();
            let description = description.unwrap_or_default();
            let wei_value = wei_value.unwrap_or_default();
            let task = task_api::create_task(&mut session.state, &name, &description, &wei_value)?;
            if session.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.name, task.id);
            }
        }
        Command::Done { id } => {
            if !session.wallet.is_connected() {
                print_notice(session, WALLET_HINT);
                return Ok(());
            }

            match task_api::complete_task(&mut session.state, &id)? {
                Some(task) => {
                    if session.json {
                        print_task_json(&task)?;
                    } else {
                        println!("Completed task: {} ({})", task.name, task.id);
                    }
                }
                None => print_notice(session, &format!("No such task: {id}")),
            }
        }
        Command::Show { id } => match task_api::get_task(&session.state, &id) {
            Some(task) => {
                if session.json {
                    print_task_json(task)?;
                } else {
                    print_task_plain(session, task);
                }
            }
            None => print_notice(session, &format!("No such task: {id}")),
        },
        Command::List => {
            if session.json {
                print_tasks_json(session)?;
            } else {
                print_tasks_plain(session);
            }
        }
        Command::Summary => print_summary(session),
    }

    Ok(())
}

async fn run_session(cli: Cli) -> Result<(), AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: {err}");
    }
    let overrides = config::parse_overrides(&cli.config_override)?;
    let merged = config::merge_overrides(&loaded.config, &overrides);

    let delay = cli
        .connect_delay_ms
        .or(merged.connect_delay_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_CONNECT_DELAY);

    let mut session = Session {
        state: if cli.demo {
            BoardState::sample()
        } else {
            BoardState::new()
        },
        wallet: WalletConnector::new(delay),
        palette: config::palette_for_theme(merged.theme.as_deref()),
        config: merged,
        json: cli.json,
    };

    if !session.json {
        println!("WEB3 TODO");
        println!("{WALLET_HINT}");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(input) = lines.next_line().await.map_err(AppError::from)? {
        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line).and_then(|args| expand_alias(&session.config, args))
        {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("web3todo".to_string());
        argv.extend(args);

        let parsed = match Line::try_parse_from(argv) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut session, parsed) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_session(cli).await {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
