/// File persistence for log lines
///
/// One log file per process start, named by local start time, inside the
/// logs directory. Write failures are reported once on stderr and otherwise
/// ignored so logging never takes the bot down.
use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static LOG_FILE: Lazy<Mutex<Option<BufWriter<File>>>> = Lazy::new(|| Mutex::new(None));
static WRITE_ERROR_REPORTED: AtomicBool = AtomicBool::new(false);

pub fn init_file_logging() {
    let logs_dir = crate::paths::get_logs_directory();
    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory {}: {}", logs_dir.display(), e);
        return;
    }

    let file_name = format!("holderscan_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = logs_dir.join(file_name);

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            if let Ok(mut guard) = LOG_FILE.lock() {
                *guard = Some(BufWriter::new(file));
            }
        }
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
        }
    }
}

pub fn write_to_file(line: &str) {
    let Ok(mut guard) = LOG_FILE.lock() else {
        return;
    };

    if let Some(writer) = guard.as_mut() {
        if let Err(e) = writeln!(writer, "{}", line) {
            if !WRITE_ERROR_REPORTED.swap(true, Ordering::SeqCst) {
                eprintln!("Failed to write log file: {}", e);
            }
        }
    }
}

pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(writer) = guard.as_mut() {
            let _ = writer.flush();
        }
    }
}
