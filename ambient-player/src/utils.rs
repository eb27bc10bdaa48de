use std::path::PathBuf;

use crate::init::project_directory;

const VERSION_MESSAGE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_BUILD_DATE"),
    ", ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

pub fn version() -> String {
    let author = clap::crate_authors!();

    let current_exe_path = PathBuf::from(clap::crate_name!());
    let current_exe_path = current_exe_path.display();
    let project_dirs = project_directory()
        .map(|d| format!("{d:?}"))
        .unwrap_or_else(|e| e.to_string());

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Executable: {current_exe_path}
Directories: {project_dirs}
"
    )
}

/// Formats a volume in `0.0..=1.0` as a percentage.
pub fn percent(volume: f64) -> String {
    format!("{:.0}%", volume * 100.0)
}
