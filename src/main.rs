use std::fmt;
use std::process::ExitCode;
use std::sync::mpsc;

use bus::{Bus, RebrandCommand};
use clap::Parser;
use dom::fixtures::home_assistant_shell;
use engine::{Engine, Session};
use net::{ConfigStore, FetchError, FileConfigStore, HttpConfigStore};
use runtime_rebrand::start_rebrand_runtime;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Apply a branding configuration to a synthetic dashboard and print the
/// resulting tree.
#[derive(Parser, Debug)]
#[command(name = "rebrand", version, about)]
struct Args {
    /// Dashboard base URL (`http://…`) or a path to a `config.json`
    source: String,
    /// Bearer token for the dashboard
    #[arg(long)]
    token: Option<String>,
    /// Start with the environment preferring a dark color scheme
    #[arg(long)]
    dark: bool,
    /// Virtual milliseconds to run after bootstrap
    #[arg(long, default_value_t = 0)]
    advance_ms: u64,
    /// Maximum outline lines to print
    #[arg(long, default_value_t = 200)]
    outline_cap: usize,
}

#[derive(Debug)]
enum CliError {
    Store(FetchError),
    Disconnected,
    RuntimePanicked,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Store(err) => write!(f, "config store: {err}"),
            CliError::Disconnected => write!(f, "runtime stopped before replying"),
            CliError::RuntimePanicked => write!(f, "runtime thread panicked"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        CliError::Store(err)
    }
}

fn open_store(args: &Args) -> Result<Box<dyn ConfigStore>, CliError> {
    if args.source.starts_with("http://") || args.source.starts_with("https://") {
        Ok(Box::new(HttpConfigStore::new(&args.source, args.token.clone())?))
    } else {
        Ok(Box::new(FileConfigStore::new(&args.source)))
    }
}

fn run(args: Args) -> Result<Vec<String>, CliError> {
    let store = open_store(&args)?;
    log::info!("config source: {}", store.describe());

    let (mut dom, _) = home_assistant_shell();
    dom.set_prefers_dark(args.dark);
    let session = Session::new(dom, Engine::with_boxed_store(store));

    let (bus, cmd_rx) = Bus::new();
    let handle = start_rebrand_runtime(session, cmd_rx, bus.evt_tx.clone());

    let (reply_tx, reply_rx) = mpsc::channel();
    let commands = [
        RebrandCommand::Advance { ms: args.advance_ms },
        RebrandCommand::Snapshot {
            cap: args.outline_cap,
            reply: reply_tx,
        },
        RebrandCommand::Shutdown,
    ];
    for cmd in commands {
        bus.cmd_tx.send(cmd).map_err(|_| CliError::Disconnected)?;
    }
    let outline = reply_rx.recv().map_err(|_| CliError::Disconnected)?;
    handle.join().map_err(|_| CliError::RuntimePanicked)?;

    for event in bus.evt_rx.try_iter() {
        log::info!("{event:?}");
    }
    Ok(outline)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(args) {
        Ok(outline) => {
            for line in outline {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
