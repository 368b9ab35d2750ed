use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    form::{
        field_view::{Annotation, FormSurface},
        form_model::FieldSelector,
    },
    lookup::{
        date::format_date_to_iso,
        error::LookupError,
        lookup_model::{BookingConflicts, LookupQuery, LookupResponse, StockInfo},
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Annotation key used by the stock variant. Every selection replaces the
/// same node.
pub const STOCK_ANNOTATION_KEY: &str = "item-stock-info";

/// How overlapping lookups for the same annotation key are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the most recently issued request for a key may render.
    #[default]
    LatestRequest,
    /// Whatever completes last renders, even if it answers an older request.
    LastResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorVariant {
    Stock,
    Booking {
        start_date: FieldSelector,
        end_date: FieldSelector,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupTicket {
    pub key: String,
    pub seq: u64,
}

/// One outgoing lookup, with the field its annotation is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub ticket: LookupTicket,
    pub anchor: String,
    pub query: LookupQuery,
}

#[derive(Debug)]
pub struct Completion {
    pub request: LookupRequest,
    pub result: Result<LookupResponse, LookupError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    /// A newer request for the same key was issued after this one.
    Stale { latest: u64 },
    /// The lookup failed; the previous annotation was left in place.
    Failed(String),
    /// The anchor field no longer exists.
    Detached,
}

/// Issues lookups when a trigger field changes and renders their results as
/// annotations.
#[derive(Debug, Clone)]
pub struct LookupAnnotator {
    variant: AnnotatorVariant,
    ordering: ResponseOrdering,
    triggers: Vec<String>,
    next_seq: u64,
    latest: HashMap<String, u64>,
}

impl LookupAnnotator {
    /// Stock lookup on every field matching `trigger`.
    pub fn stock(
        trigger: &FieldSelector,
        surface: &dyn FormSurface,
        ordering: ResponseOrdering,
    ) -> Self {
        Self::bind(AnnotatorVariant::Stock, trigger, surface, ordering)
    }

    /// Booking conflict lookup on every field matching `trigger`, using the
    /// two date fields as the range.
    pub fn booking(
        trigger: &FieldSelector,
        start_date: FieldSelector,
        end_date: FieldSelector,
        surface: &dyn FormSurface,
        ordering: ResponseOrdering,
    ) -> Self {
        Self::bind(
            AnnotatorVariant::Booking {
                start_date,
                end_date,
            },
            trigger,
            surface,
            ordering,
        )
    }

    fn bind(
        variant: AnnotatorVariant,
        trigger: &FieldSelector,
        surface: &dyn FormSurface,
        ordering: ResponseOrdering,
    ) -> Self {
        Self {
            variant,
            ordering,
            triggers: trigger.resolve(surface),
            next_seq: 0,
            latest: HashMap::new(),
        }
    }

    pub fn variant(&self) -> &AnnotatorVariant {
        &self.variant
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn watches(&self, field_id: &str) -> bool {
        self.triggers.iter().any(|t| t == field_id)
    }

    /// Whether a request was issued by an annotator of this shape.
    pub fn owns(&self, request: &LookupRequest) -> bool {
        let same_kind = matches!(
            (&self.variant, &request.query),
            (AnnotatorVariant::Stock, LookupQuery::Stock { .. })
                | (AnnotatorVariant::Booking { .. }, LookupQuery::Booking { .. })
        );
        same_kind && self.watches(&request.anchor)
    }

    pub fn latest_seq(&self, key: &str) -> Option<u64> {
        self.latest.get(key).copied()
    }

    /// Build the lookup for a trigger change, or `None` when there is
    /// nothing to look up (unknown trigger, empty selection, missing date field).
    pub fn on_trigger_change(
        &mut self,
        surface: &dyn FormSurface,
        trigger_id: &str,
        tracer: &TraceLogger,
    ) -> Option<LookupRequest> {
        if !self.watches(trigger_id) {
            return None;
        }

        let item_id = match surface.value(trigger_id).filter(|v| !v.is_empty()) {
            Some(v) => v,
            None => {
                tracer.log(
                    &TraceEvent::now("lookup", "skipped")
                        .with_field(trigger_id)
                        .with_detail("empty selection"),
                );
                return None;
            }
        };

        let (key, query) = match &self.variant {
            AnnotatorVariant::Stock => (
                STOCK_ANNOTATION_KEY.to_string(),
                LookupQuery::Stock {
                    item_id: item_id.clone(),
                },
            ),
            AnnotatorVariant::Booking {
                start_date,
                end_date,
            } => {
                let start = read_date(surface, start_date);
                let end = read_date(surface, end_date);
                let (Some(start), Some(end)) = (start, end) else {
                    tracer.log(
                        &TraceEvent::now("lookup", "skipped")
                            .with_field(trigger_id)
                            .with_detail("date field missing"),
                    );
                    return None;
                };
                (
                    booking_annotation_key(&item_id),
                    LookupQuery::Booking {
                        item_id: item_id.clone(),
                        start_date: format_date_to_iso(&start),
                        end_date: format_date_to_iso(&end),
                    },
                )
            }
        };

        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest.insert(key.clone(), seq);

        tracer.log(
            &TraceEvent::now("lookup", "issued")
                .with_field(trigger_id)
                .with_key(&key)
                .with_seq(seq)
                .with_detail(query.kind()),
        );

        Some(LookupRequest {
            ticket: LookupTicket { key, seq },
            anchor: trigger_id.to_string(),
            query,
        })
    }

    /// Render a finished lookup onto the surface.
    pub fn on_complete(
        &mut self,
        surface: &mut dyn FormSurface,
        completion: Completion,
        tracer: &TraceLogger,
    ) -> CompletionOutcome {
        let Completion { request, result } = completion;
        let ticket = &request.ticket;

        if self.ordering == ResponseOrdering::LatestRequest {
            if let Some(latest) = self.latest_seq(&ticket.key) {
                if latest != ticket.seq {
                    tracer.log(
                        &TraceEvent::now("lookup", "stale")
                            .with_key(&ticket.key)
                            .with_seq(ticket.seq)
                            .with_detail(format!("latest={}", latest)),
                    );
                    return CompletionOutcome::Stale { latest };
                }
            }
        }

        let annotation = result.and_then(|response| match (&self.variant, response) {
            (AnnotatorVariant::Stock, LookupResponse::Stock(info)) => Ok(stock_annotation(&info)),
            (AnnotatorVariant::Booking { .. }, LookupResponse::Bookings(conflicts)) => {
                Ok(booking_annotation(&conflicts))
            }
            (_, other) => Err(LookupError::UnexpectedResponse(format!("{:?}", other))),
        });

        let annotation = match annotation {
            Ok(a) => a,
            Err(e) => {
                tracer.log(
                    &TraceEvent::now("lookup", "failed")
                        .with_key(&ticket.key)
                        .with_seq(ticket.seq)
                        .with_detail(e.to_string()),
                );
                return CompletionOutcome::Failed(e.to_string());
            }
        };

        if surface.view_mut(&request.anchor).is_none() {
            return CompletionOutcome::Detached;
        }

        // Keys are page-wide: another row may still hold a node for the same item.
        surface.remove_annotation(&ticket.key);
        let Some(view) = surface.view_mut(&request.anchor) else {
            return CompletionOutcome::Detached;
        };
        view.set_annotation(&ticket.key, annotation);

        tracer.log(
            &TraceEvent::now("lookup", "applied")
                .with_field(&request.anchor)
                .with_key(&ticket.key)
                .with_seq(ticket.seq),
        );

        CompletionOutcome::Applied
    }
}

pub fn booking_annotation_key(item_id: &str) -> String {
    format!("booking-message-{}", item_id)
}

pub fn stock_annotation(info: &StockInfo) -> Annotation {
    Annotation::info(format!("Stock on hand: {}", info.stock))
}

/// One warning line per conflicting booking; no conflicts gives an empty
/// annotation.
pub fn booking_annotation(conflicts: &BookingConflicts) -> Annotation {
    Annotation::warning(
        conflicts
            .bookings
            .iter()
            .map(|b| format!("Item booked from {} to {}", b.start_date, b.end_date))
            .collect(),
    )
}

/// Raw value of a date field. Only a missing field gives `None`; an empty
/// value is passed through unvalidated.
fn read_date(surface: &dyn FormSurface, selector: &FieldSelector) -> Option<String> {
    let id = selector.resolve_first(surface)?;
    Some(surface.value(&id).unwrap_or_default())
}
