use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

/// Appends trace events to a JSONL file. A logger without a file drops
/// every event.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    /// Open `path` for appending. An unopenable path is reported once and
    /// leaves tracing off.
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Logger for an optional configured path.
    pub fn from_path(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::new(p),
            None => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(file) = &self.file else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Warning: failed to serialize {} trace event: {}", event.event, e);
                return;
            }
        };

        match file.lock() {
            Ok(mut f) => {
                if let Err(e) = writeln!(f, "{}", line) {
                    eprintln!("Warning: failed to write trace event: {}", e);
                }
            }
            Err(e) => eprintln!("Warning: trace logger lock poisoned: {}", e),
        }
    }
}
