use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use admin_form_assist::lookup::{
    error::LookupError,
    lookup_model::{LookupQuery, LookupResponse},
    service::LookupService,
};

enum StubReply {
    Body(String),
    Status(u16, String),
}

/// In-process collaborator keyed by item id.
#[derive(Default)]
pub struct StubLookupService {
    replies: HashMap<String, StubReply>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<LookupQuery>>,
}

impl StubLookupService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, item_id: &str, body: &str) -> Self {
        self.replies
            .insert(item_id.to_string(), StubReply::Body(body.to_string()));
        self
    }

    pub fn with_status(mut self, item_id: &str, status: u16, error: &str) -> Self {
        self.replies
            .insert(item_id.to_string(), StubReply::Status(status, error.to_string()));
        self
    }

    pub fn with_delay(mut self, item_id: &str, delay: Duration) -> Self {
        self.delays.insert(item_id.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<LookupQuery> {
        self.calls.lock().unwrap().clone()
    }
}

impl LookupService for StubLookupService {
    fn fetch(&self, query: &LookupQuery) -> Result<LookupResponse, LookupError> {
        self.calls.lock().unwrap().push(query.clone());

        if let Some(delay) = self.delays.get(query.item_id()) {
            thread::sleep(*delay);
        }

        let url = format!("stub://{}", query.item_id());
        match self.replies.get(query.item_id()) {
            Some(StubReply::Body(body)) => LookupResponse::parse(query, body),
            Some(StubReply::Status(status, error)) => Err(LookupError::Status {
                url,
                status: *status,
                message: Some(error.clone()),
            }),
            None => Err(LookupError::Status {
                url,
                status: 404,
                message: Some("item not found".into()),
            }),
        }
    }
}
