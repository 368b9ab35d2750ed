use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lookup::error::LookupError;

/// A read-only query against the collaborator service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupQuery {
    /// `GET /utils/get_item_booking/?item_id=<id>`
    Stock { item_id: String },

    /// `GET /utils/check_item_booking/<id>/<start>/<end>/`, dates already
    /// in `YYYY-MM-DD`.
    Booking {
        item_id: String,
        start_date: String,
        end_date: String,
    },
}

impl LookupQuery {
    pub fn item_id(&self) -> &str {
        match self {
            LookupQuery::Stock { item_id } => item_id,
            LookupQuery::Booking { item_id, .. } => item_id,
        }
    }

    /// Path segments below the collaborator base URL.
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            LookupQuery::Stock { .. } => vec!["utils", "get_item_booking"],
            LookupQuery::Booking {
                item_id,
                start_date,
                end_date,
            } => vec![
                "utils",
                "check_item_booking",
                item_id,
                start_date,
                end_date,
            ],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LookupQuery::Stock { .. } => "stock",
            LookupQuery::Booking { .. } => "booking",
        }
    }
}

/// Stock count as the collaborator sends it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for StockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockValue::Number(n) => write!(f, "{}", n),
            StockValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub stock: StockValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConflict {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConflicts {
    pub bookings: Vec<BookingConflict>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    Stock(StockInfo),
    Bookings(BookingConflicts),
}

/// Error body the collaborator sends with 4xx answers.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl LookupResponse {
    /// Decode a successful response body for `query`.
    pub fn parse(query: &LookupQuery, body: &str) -> Result<Self, LookupError> {
        match query {
            LookupQuery::Stock { item_id } => serde_json::from_str(body)
                .map(LookupResponse::Stock)
                .map_err(|source| LookupError::Decode {
                    context: format!("stock for item {}", item_id),
                    source,
                }),
            LookupQuery::Booking { item_id, .. } => serde_json::from_str(body)
                .map(LookupResponse::Bookings)
                .map_err(|source| LookupError::Decode {
                    context: format!("bookings for item {}", item_id),
                    source,
                }),
        }
    }
}
