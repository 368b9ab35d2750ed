use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use crate::lookup::{
    annotator::{Completion, LookupRequest},
    service::LookupService,
};

/// Runs lookups off the page thread.
///
/// Every submitted request gets its own worker thread; completions come back
/// over a channel and are handed out by `try_next`/`next_timeout` on the
/// thread that owns the form. Requests are never cancelled.
pub struct LookupDispatcher {
    service: Arc<dyn LookupService>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: usize,
}

impl LookupDispatcher {
    pub fn new(service: Arc<dyn LookupService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn submit(&mut self, request: LookupRequest) {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        self.in_flight += 1;

        thread::spawn(move || {
            let result = service.fetch(&request.query);
            // Receiver is gone only when the dispatcher was dropped.
            let _ = sender.send(Completion { request, result });
        });
    }

    /// Requests submitted but not yet handed out.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Next finished lookup, without blocking.
    pub fn try_next(&mut self) -> Option<Completion> {
        let completion = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(completion)
    }

    /// Next finished lookup, waiting up to `timeout`.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(completion)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Collect completions until nothing is in flight or `deadline` passes.
    /// Completions arrive in the order the workers finished.
    pub fn drain_until(&mut self, deadline: Instant) -> Vec<Completion> {
        let mut completions = Vec::new();
        while self.in_flight > 0 {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.next_timeout(deadline - now) {
                Some(c) => completions.push(c),
                None => break,
            }
        }
        completions
    }
}
