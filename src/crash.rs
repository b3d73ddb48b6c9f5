//! Last-resort panic reporting to an append-only log file.

use std::any::Any;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Once;

use chrono::{DateTime, Local};
use tracing::error;

/// Width of the rule drawn around each report entry.
const SEPARATOR_WIDTH: usize = 80;

static INSTALL: Once = Once::new();

/// Install a panic hook that appends a timestamped report to `report_path`
/// and then hands off to the previous hook. Installs at most once per
/// process; later calls are ignored.
pub fn install(report_path: impl Into<PathBuf>) {
    let report_path = report_path.into();
    INSTALL.call_once(move || {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let message = payload_message(info.payload());
            let details = match info.location() {
                Some(location) => format!("panicked at {location}: {message}"),
                None => format!("panicked: {message}"),
            };
            report(&report_path, &details);
            previous(info);
        }));
    });
}

/// Best-effort string form of a panic payload.
fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

/// Write one entry and tell the user where it went. Failures are logged,
/// never raised; the process is already going down.
fn report(path: &Path, details: &str) {
    let entry = format_entry(&format_timestamp(Local::now()), details);
    match append_entry(path, &entry) {
        Ok(()) => {
            eprintln!("Oops, something went wrong!");
            eprintln!("A crash report was appended to {}.", path.display());
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "failed to write crash report");
            eprintln!("Oops, something went wrong, and the crash report could not be written: {e}");
        }
    }
}

/// `DD/MM/YY @ HH:MM am/pm`, twelve-hour clock.
fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%d/%m/%y @ %I:%M %p").to_string().to_lowercase()
}

fn format_entry(timestamp: &str, details: &str) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    format!("{timestamp}\n\n{separator}\n{details}\n{separator}\n\n")
}

fn append_entry(path: &Path, entry: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(entry.as_bytes())
}
