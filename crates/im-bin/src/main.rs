//! input-math entrypoint: a terminal host for the math input component.
use anyhow::Result;
use clap::Parser;
use core_config::{Config, load_from};
use core_events::{EDIT_NOTICES_SENT, KEYPRESS_TOTAL};
use core_state::{MathInput, MathInputOptions};
use core_surface::{BufferSurface, SurfaceOptions};
use core_terminal::{CrosstermBackend, TerminalBackend};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod host;
mod palette;
mod view;

use host::{Flow, Host};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "input-math", version, about = "Compose a math expression from a symbol palette")]
struct Args {
    /// Optional configuration file path (overrides discovery of `input-math.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Comma-separated symbol groups to show (e.g. `basic,greek,physics`).
    #[arg(long = "symbols")]
    pub symbols: Option<String>,
    /// Initial expression value.
    #[arg(long = "value")]
    pub value: Option<String>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("input-math.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "input-math.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn build_input(config: &Config) -> MathInput<BufferSurface> {
    let surface = BufferSurface::new(SurfaceOptions {
        space_behaves_like_tab: config.file.surface.space_behaves_like_tab,
    });
    MathInput::with_options(
        surface,
        MathInputOptions {
            initial_value: config.file.value.clone(),
            history_capacity: config.file.history.capacity,
            show_symbols: config.file.symbols.show.clone(),
        },
    )
}

fn run(host: &mut Host) -> Result<()> {
    let mut backend = CrosstermBackend::new();
    backend.set_title("input-math")?;
    let mut guard = backend.enter_guard()?;
    loop {
        guard
            .backend()
            .present(&view::compose(&host.input, &host.cursor))?;
        let Some(event) = core_input::next_event(POLL_INTERVAL)? else {
            continue;
        };
        if host.handle(event) == Flow::Quit {
            break;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let mut config = load_from(args.config.clone())?;
    config.apply_overrides(args.symbols.clone(), args.value.clone());
    info!(
        target: "runtime.startup",
        config_override = args.config.is_some(),
        config_source = ?config.source,
        symbols = config.file.symbols.show.as_str(),
        "bootstrap_complete"
    );

    let mut host = Host::new(build_input(&config));
    run(&mut host)?;

    let stats = host.input.stats();
    info!(
        target: "runtime",
        value_changes = stats.value_changes,
        surface_edits = stats.surface_edits,
        undos = stats.undos,
        empty_rollbacks = stats.empty_rollbacks,
        echoes_suppressed = stats.echoes_suppressed,
        edit_notices = EDIT_NOTICES_SENT.load(Ordering::Relaxed),
        keypresses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
        "shutdown"
    );
    println!("{}", host.input.value());
    Ok(())
}
