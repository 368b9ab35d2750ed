use std::path::PathBuf;

use admin_form_assist::lookup::{
    annotator::{Completion, LookupRequest},
    error::LookupError,
    lookup_model::LookupResponse,
};

/// Completion carrying a decoded collaborator body.
pub fn reply(request: &LookupRequest, body: &str) -> Completion {
    Completion {
        request: request.clone(),
        result: LookupResponse::parse(&request.query, body),
    }
}

/// Completion carrying an HTTP error.
pub fn failure(request: &LookupRequest, status: u16) -> Completion {
    Completion {
        request: request.clone(),
        result: Err(LookupError::Status {
            url: "stub://failure".into(),
            status,
            message: None,
        }),
    }
}

/// Fresh, empty path in the temp dir for a trace file.
pub fn temp_trace_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "admin-form-assist-{}-{}.jsonl",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}
