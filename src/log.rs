//! Simple file-based logging for DPI diagnostics
//!
//! Nothing is written until [`init`] has been called, so a host that never
//! enables logging pays only for a mutex check per message.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Get the directory where the executable is located
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Start logging to `path`, truncating any previous contents
pub fn init(path: &Path) {
    match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
    {
        Ok(file) => *LOG_FILE.lock() = Some(file),
        Err(_) => return,
    }

    log("=== dpiaware log started ===");
}

/// Stop logging and close the file
pub fn shutdown() {
    *LOG_FILE.lock() = None;
}

/// Whether a log file is currently open
pub fn is_enabled() -> bool {
    LOG_FILE.lock().is_some()
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Log a message to the file
pub fn log(msg: &str) {
    let mut guard = LOG_FILE.lock();
    if let Some(ref mut file) = *guard {
        let _ = writeln!(file, "[{}] {}", timestamp(), msg);
        let _ = file.flush();
    }
}

/// Log a formatted message
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::log::log(&format!($($arg)*))
    };
}
