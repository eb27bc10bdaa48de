use color_eyre::eyre::{eyre, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use tracing::error;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    self, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, Layer,
};

pub static PROJECT_NAME: Lazy<String> =
    Lazy::new(|| env!("CARGO_PKG_NAME").replace('-', "_").to_uppercase());
pub static LOG_ENV: Lazy<String> = Lazy::new(|| format!("{}_LOGLEVEL", *PROJECT_NAME));
pub static LOG_FILE: Lazy<String> = Lazy::new(|| format!("{}.log", env!("CARGO_PKG_NAME")));

pub fn init() -> Result<()> {
    init_panic_handler()?;
    init_logging()?;
    Ok(())
}

fn init_panic_handler() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "This is a bug. Consider reporting it at {}",
            env!("CARGO_PKG_REPOSITORY")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;
    std::panic::set_hook(Box::new(move |panic_info| {
        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, metadata, print_msg};
            let meta = metadata!();
            let file_path = handle_dump(&meta, panic_info);
            if print_msg(file_path, &meta).is_err() {
                eprintln!("human-panic: printing error message to console failed");
            }
            eprintln!("{}", panic_hook.panic_report(panic_info)); // prints color-eyre stack trace to stderr
        }
        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            // Better Panic stacktrace that is only enabled when debugging.
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(1);
    }));
    Ok(())
}

/// Tracing targets of the binary are named after the crate, not the package.
fn default_filter() -> String {
    format!("{}=info,ambient_core=info", env!("CARGO_CRATE_NAME"))
}

fn init_logging() -> Result<()> {
    let data_dir = project_directory()?.data_local_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join(&*LOG_FILE);
    let log_file = std::fs::File::create(log_path)?;

    std::env::set_var(
        "RUST_LOG",
        std::env::var("RUST_LOG")
            .or_else(|_| std::env::var(&*LOG_ENV))
            .unwrap_or_else(|_| default_filter()),
    );
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::EnvFilter::from_default_env());
    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

pub fn project_directory() -> Result<ProjectDirs> {
    if let Some(d) = ProjectDirs::from("cool", "jacoblin", env!("CARGO_PKG_NAME")) {
        Ok(d)
    } else if let Some(d) = std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .and_then(|h| ProjectDirs::from_path(h.join(format!(".{}", env!("CARGO_PKG_NAME")))))
    {
        Ok(d)
    } else {
        Err(eyre!("Could not determine the user's home directory"))
    }
}

/// Where the log file of this run is written.
pub fn log_path() -> Option<PathBuf> {
    project_directory()
        .ok()
        .map(|d| d.data_local_dir().join(&*LOG_FILE))
}
