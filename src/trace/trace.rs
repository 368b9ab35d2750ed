use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::form::form_model::VisibilityMap;

/// One line of the JSONL trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    /// "visibility" or "lookup"
    pub component: String,
    pub event: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub visible: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(component: &str, event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            component: component.to_string(),
            event: event.to_string(),
            field: None,
            key: None,
            seq: None,
            visible: vec![],
            hidden: vec![],
            detail: None,
        }
    }

    pub fn with_field(mut self, field_id: &str) -> Self {
        self.field = Some(field_id.to_string());
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_seq(mut self, seq: u64) -> Self {
        self.seq = Some(seq);
        self
    }

    pub fn with_visibility(mut self, map: &VisibilityMap) -> Self {
        for (group, visible) in map {
            if *visible {
                self.visible.push(group.clone());
            } else {
                self.hidden.push(group.clone());
            }
        }
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
