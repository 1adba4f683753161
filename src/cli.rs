//! CLI definition and dispatch.
//!
//! Every subcommand funnels through the same [`Dispatcher`] the chat
//! transport uses, so quota accounting and report rendering behave the
//! same whether a request arrives from a terminal or a chat message.

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_delivery_adapter::ConsoleDeliveryAdapter;
use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store_adapter::JsonStoreAdapter;
use crate::domain::commands::{self, ChatUser, Dispatcher};
use crate::domain::config_validation::validate_bot_config;
use crate::domain::error::SahambotError;
use crate::domain::quota;
use crate::domain::settings::Settings;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::BarInterval;
use crate::ports::delivery_port::DeliveryPort;
use crate::ports::store_port::UserStorePort;

#[derive(Parser, Debug)]
#[command(name = "sahambot", about = "IDX stock signal scanner and chat bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScanRule {
    /// Fresh MA5/MA20 crossovers with volume confirmation
    Strict,
    /// Early uptrend candidates
    Potential,
    /// Quiet accumulation ranked by volume ratio
    Accumulation,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the universe and print the signal report
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, value_enum, default_value_t = ScanRule::Strict)]
        rule: ScanRule,
        /// Run as this user id for quota purposes (default: the admin)
        #[arg(long)]
        user: Option<String>,
    },
    /// Analyze a single symbol in depth
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        symbol: String,
        /// Use weekly bars over a longer window
        #[arg(long)]
        weekly: bool,
        #[arg(long)]
        user: Option<String>,
    },
    /// Register a user in the store
    Register {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
    },
    /// Read chat lines from stdin and reply on stdout
    Chat {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Scan { config, rule, user } => run_scan(&config, rule, user.as_deref()),
        Command::Analyze {
            config,
            symbol,
            weekly,
            user,
        } => run_analyze(&config, &symbol, weekly, user.as_deref()),
        Command::Register { config, user, name } => run_register(&config, &user, &name),
        Command::Chat { config, user, name } => run_chat(&config, user.as_deref(), name.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SahambotError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Pick the user store backend from `[store] backend` (default `json`).
pub fn build_store(config: &dyn ConfigPort) -> Result<Box<dyn UserStorePort>, SahambotError> {
    let backend = config
        .get_string("store", "backend")
        .unwrap_or_else(|| "json".to_string());

    match backend.as_str() {
        "json" => {
            let path = config
                .get_string("store", "path")
                .unwrap_or_else(|| "users.json".to_string());
            Ok(Box::new(JsonStoreAdapter::new(PathBuf::from(path))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_store_adapter::SqliteStoreAdapter;
            Ok(Box::new(SqliteStoreAdapter::from_config(config)?))
        }
        other => Err(SahambotError::ConfigInvalid {
            section: "store".into(),
            key: "backend".into(),
            reason: format!("unsupported backend: {}", other),
        }),
    }
}

struct Runtime {
    settings: Settings,
    data: CsvDataAdapter,
    store: Box<dyn UserStorePort>,
}

fn bootstrap(config_path: &PathBuf) -> Result<Runtime, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let config = load_config(config_path)?;

    if let Err(e) = validate_bot_config(&config) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }

    let settings = match Settings::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };

    let csv_dir = config
        .get_string("data", "csv_dir")
        .unwrap_or_else(|| "data".to_string());
    let data = CsvDataAdapter::new(PathBuf::from(csv_dir));

    let store = match build_store(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };

    let today = Local::now().date_naive();
    if let Err(e) = quota::bootstrap_admin(
        store.as_ref(),
        &settings.admin_id,
        &settings.admin_name,
        today,
    ) {
        eprintln!("error: {e}");
        return Err((&e).into());
    }

    Ok(Runtime {
        settings,
        data,
        store,
    })
}

/// CLI invocations without `--user` run as the configured administrator.
fn cli_user(user_id: Option<&str>, settings: &Settings) -> ChatUser {
    match user_id {
        Some(id) => ChatUser {
            id: id.to_string(),
            display_name: format!("User {}", id),
        },
        None => ChatUser {
            id: settings.admin_id.clone(),
            display_name: settings.admin_name.clone(),
        },
    }
}

/// Delivery is fire-and-forget: a failed send is logged and dropped.
fn deliver(port: &dyn DeliveryPort, destination: &str, text: &str) {
    if let Err(e) = port.send_report(destination, text, None) {
        eprintln!("Warning: delivery failed ({})", e);
    }
}

fn dispatch_and_deliver(
    runtime: &Runtime,
    user: &ChatUser,
    command: &commands::Command,
) -> ExitCode {
    let dispatcher = Dispatcher {
        data: &runtime.data,
        store: runtime.store.as_ref(),
        settings: &runtime.settings,
    };

    let today = Local::now().date_naive();
    let reply = match dispatcher.dispatch(user, command, today) {
        Ok(reply) => reply,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    deliver(&ConsoleDeliveryAdapter, &user.id, &reply);
    ExitCode::SUCCESS
}

fn run_scan(config_path: &PathBuf, rule: ScanRule, user_id: Option<&str>) -> ExitCode {
    let runtime = match bootstrap(config_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let command = match rule {
        ScanRule::Strict => commands::Command::ScanStrict,
        ScanRule::Potential => commands::Command::ScanPotential,
        ScanRule::Accumulation => commands::Command::ScanAccumulation,
    };

    let user = cli_user(user_id, &runtime.settings);
    dispatch_and_deliver(&runtime, &user, &command)
}

fn run_analyze(
    config_path: &PathBuf,
    symbol: &str,
    weekly: bool,
    user_id: Option<&str>,
) -> ExitCode {
    let runtime = match bootstrap(config_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let interval = if weekly {
        BarInterval::Weekly
    } else {
        BarInterval::Daily
    };
    let command = commands::Command::Analyze {
        symbol: Some(symbol.to_uppercase()),
        interval,
    };

    let user = cli_user(user_id, &runtime.settings);
    dispatch_and_deliver(&runtime, &user, &command)
}

fn run_register(config_path: &PathBuf, user_id: &str, name: &str) -> ExitCode {
    let runtime = match bootstrap(config_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let today = Local::now().date_naive();
    match quota::register_user(runtime.store.as_ref(), user_id, name, today) {
        Ok(record) => {
            eprintln!(
                "Registered {} ({}) as {:?}",
                record.user_id, record.display_name, record.tier
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_chat(config_path: &PathBuf, user_id: Option<&str>, name: Option<&str>) -> ExitCode {
    use std::io::{self, BufRead};

    let runtime = match bootstrap(config_path) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let mut user = cli_user(user_id, &runtime.settings);
    if let Some(name) = name {
        user.display_name = name.to_string();
    }

    let dispatcher = Dispatcher {
        data: &runtime.data,
        store: runtime.store.as_ref(),
        settings: &runtime.settings,
    };
    let delivery = ConsoleDeliveryAdapter;

    eprintln!("Chat session for {} (ctrl-d to quit)", user.display_name);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = commands::parse(&line);
        let today = Local::now().date_naive();
        match dispatcher.dispatch(&user, &command, today) {
            Ok(reply) => deliver(&delivery, &user.id, &reply),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}
