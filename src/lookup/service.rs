use std::time::Duration;

use crate::lookup::{
    error::LookupError,
    lookup_model::{ErrorBody, LookupQuery, LookupResponse},
};

/// Source of stock and booking data. Implementations are shared with the
/// dispatcher's worker threads.
pub trait LookupService: Send + Sync {
    fn fetch(&self, query: &LookupQuery) -> Result<LookupResponse, LookupError>;
}

// ============================================================================
// HTTP Backend
// ============================================================================

pub struct HttpLookupService {
    pub base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpLookupService {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LookupError::Transport {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    /// Full URL for a query, with a trailing slash on the path and the item
    /// id in the query string for stock lookups.
    pub fn url_for(&self, query: &LookupQuery) -> Result<reqwest::Url, LookupError> {
        let invalid = |reason: String| LookupError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid("base URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            for segment in query.path_segments() {
                segments.push(segment);
            }
            segments.push("");
        }

        if let LookupQuery::Stock { item_id } = query {
            url.query_pairs_mut().append_pair("item_id", item_id);
        }

        Ok(url)
    }
}

impl LookupService for HttpLookupService {
    fn fetch(&self, query: &LookupQuery) -> Result<LookupResponse, LookupError> {
        let url = self.url_for(query)?;
        let url_text = url.to_string();

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| LookupError::Transport {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| LookupError::Transport {
            url: url_text.clone(),
            source,
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error);
            return Err(LookupError::Status {
                url: url_text,
                status: status.as_u16(),
                message,
            });
        }

        LookupResponse::parse(query, &body)
    }
}
