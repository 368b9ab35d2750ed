use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    controller::event::FormEvent,
    form::{
        field_view::FormSurface,
        form_model::{FieldSelector, RuleTable, VisibilityMap},
        visibility::{VisibilityRuleEngine, compute_visibility},
    },
    lookup::{
        annotator::{Completion, CompletionOutcome, LookupAnnotator, LookupTicket, ResponseOrdering},
        dispatcher::LookupDispatcher,
        service::LookupService,
    },
    trace::logger::TraceLogger,
};

/// Owns one form and routes its events to the visibility engine and the
/// lookup annotators.
///
/// All surface mutation happens on the thread that calls `dispatch`,
/// `pump` and `settle`; lookups run on dispatcher workers.
pub struct FormController<S: FormSurface> {
    surface: S,
    visibility: Option<VisibilityRuleEngine>,
    annotators: Vec<LookupAnnotator>,
    dispatcher: LookupDispatcher,
    tracer: TraceLogger,
}

impl<S: FormSurface> FormController<S> {
    pub fn new(surface: S, service: Arc<dyn LookupService>, tracer: TraceLogger) -> Self {
        Self {
            surface,
            visibility: None,
            annotators: vec![],
            dispatcher: LookupDispatcher::new(service),
            tracer,
        }
    }

    pub fn with_visibility(mut self, table: RuleTable) -> Self {
        self.visibility = Some(VisibilityRuleEngine::bind(table, &self.surface));
        self
    }

    pub fn with_stock_lookup(mut self, trigger: &FieldSelector, ordering: ResponseOrdering) -> Self {
        let annotator = LookupAnnotator::stock(trigger, &self.surface, ordering);
        self.annotators.push(annotator);
        self
    }

    pub fn with_booking_lookup(
        mut self,
        trigger: &FieldSelector,
        start_date: FieldSelector,
        end_date: FieldSelector,
        ordering: ResponseOrdering,
    ) -> Self {
        let annotator =
            LookupAnnotator::booking(trigger, start_date, end_date, &self.surface, ordering);
        self.annotators.push(annotator);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn visibility(&self) -> Option<&VisibilityRuleEngine> {
        self.visibility.as_ref()
    }

    pub fn annotators(&self) -> &[LookupAnnotator] {
        &self.annotators
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Handle one event. Returns the tickets of the lookups it started.
    pub fn dispatch(&mut self, event: FormEvent) -> Vec<LookupTicket> {
        match event {
            FormEvent::Loaded => {
                if let Some(engine) = &self.visibility {
                    engine.init(&mut self.surface, &self.tracer);
                }
                vec![]
            }
            FormEvent::Changed { field_id, value } => {
                if !self.surface.set_value(&field_id, value) {
                    return vec![];
                }

                if let Some(engine) = &self.visibility {
                    if engine.discriminator() == Some(field_id.as_str()) {
                        engine.handle_change(&mut self.surface, &self.tracer);
                    }
                }

                let mut tickets = vec![];
                for annotator in &mut self.annotators {
                    if let Some(request) =
                        annotator.on_trigger_change(&self.surface, &field_id, &self.tracer)
                    {
                        tickets.push(request.ticket.clone());
                        self.dispatcher.submit(request);
                    }
                }
                tickets
            }
        }
    }

    /// Current visibility decision without touching the surface.
    pub fn current_visibility(&self) -> Option<VisibilityMap> {
        let engine = self.visibility.as_ref()?;
        let discriminator = engine.discriminator()?;
        let value = self.surface.value(discriminator);
        Some(compute_visibility(value.as_deref(), engine.table()))
    }

    /// Apply every lookup that has already finished.
    pub fn pump(&mut self) -> Vec<CompletionOutcome> {
        let mut outcomes = vec![];
        while let Some(completion) = self.dispatcher.try_next() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Wait for outstanding lookups, applying them in completion order.
    /// Gives up on whatever is still running once `timeout` has passed.
    pub fn settle(&mut self, timeout: Duration) -> Vec<CompletionOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = vec![];
        for completion in self.dispatcher.drain_until(deadline) {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    fn apply(&mut self, completion: Completion) -> CompletionOutcome {
        match self
            .annotators
            .iter_mut()
            .find(|a| a.owns(&completion.request))
        {
            Some(annotator) => annotator.on_complete(&mut self.surface, completion, &self.tracer),
            None => CompletionOutcome::Detached,
        }
    }
}
