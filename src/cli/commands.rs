use std::sync::Arc;
use std::time::Duration;

use crate::cli::config::AppConfig;
use crate::controller::controller::FormController;
use crate::controller::event::FormEvent;
use crate::form::admin_page::AdminPage;
use crate::form::field_view::FormSurface;
use crate::form::render::{render_console, render_html};
use crate::lookup::annotator::CompletionOutcome;
use crate::lookup::service::{HttpLookupService, LookupService};
use crate::trace::logger::TraceLogger;

// ============================================================================
// visibility subcommand
// ============================================================================

pub fn cmd_visibility(
    config: &AppConfig,
    value: Option<&str>,
    layout: Option<&str>,
    format: &str,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = match layout {
        Some(path) => AdminPage::load_layout(path)?,
        None => AdminPage::item_stock_request(),
    };
    let service = build_service(config)?;
    let tracer = TraceLogger::from_path(config.trace.path.as_deref());

    let mut controller =
        FormController::new(page, service, tracer).with_visibility(config.visibility.clone());

    let discriminator = controller
        .visibility()
        .and_then(|e| e.discriminator())
        .map(str::to_string);

    controller.dispatch(FormEvent::Loaded);

    match (&discriminator, value) {
        (Some(id), Some(v)) => {
            controller.dispatch(FormEvent::changed(id, v));
        }
        (None, _) => {
            eprintln!("No discriminator field on the form; visibility left untouched");
        }
        _ => {}
    }

    if verbose > 0 {
        if let Some(map) = controller.current_visibility() {
            for (group, visible) in &map {
                eprintln!("  {}: {}", group, if *visible { "visible" } else { "hidden" });
            }
        }
    }

    print!("{}", render_page(controller.surface(), format));
    Ok(())
}

// ============================================================================
// stock subcommand
// ============================================================================

pub fn cmd_stock(
    config: &AppConfig,
    item: &str,
    format: &str,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = AdminPage::item_booking();
    let trigger = config.lookup.stock_trigger.resolve_first(&page);
    let service = build_service(config)?;
    let tracer = TraceLogger::from_path(config.trace.path.as_deref());

    let mut controller = FormController::new(page, service, tracer)
        .with_stock_lookup(&config.lookup.stock_trigger, config.lookup.ordering);

    let Some(trigger) = trigger else {
        return Err("stock trigger field not found on the item booking form".into());
    };

    if verbose > 0 {
        eprintln!("Looking up stock for item {} at {}...", item, config.collaborator.base_url);
    }

    controller.dispatch(FormEvent::changed(&trigger, item));
    let outcomes = controller.settle(settle_timeout(config));
    report_outcomes(&outcomes, controller.in_flight(), verbose);

    print!("{}", render_page(controller.surface(), format));
    Ok(())
}

// ============================================================================
// bookings subcommand
// ============================================================================

pub fn cmd_bookings(
    config: &AppConfig,
    item: &str,
    start: &str,
    end: &str,
    format: &str,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut page = AdminPage::booking_with_items(1);

    // Date fields are not triggers; fill them before any item is picked.
    for (selector, value) in [
        (&config.lookup.start_date_field, start),
        (&config.lookup.end_date_field, end),
    ] {
        match selector.resolve_first(&page) {
            Some(id) => {
                page.set_value(&id, Some(value.to_string()));
            }
            None => eprintln!("Warning: date field {:?} not found on the form", selector),
        }
    }

    let trigger = config.lookup.booking_trigger.resolve_first(&page);
    let service = build_service(config)?;
    let tracer = TraceLogger::from_path(config.trace.path.as_deref());

    let mut controller = FormController::new(page, service, tracer).with_booking_lookup(
        &config.lookup.booking_trigger,
        config.lookup.start_date_field.clone(),
        config.lookup.end_date_field.clone(),
        config.lookup.ordering,
    );

    let Some(trigger) = trigger else {
        return Err("booking trigger field not found on the booking form".into());
    };

    if verbose > 0 {
        eprintln!("Checking bookings for item {} ({} - {})...", item, start, end);
    }

    controller.dispatch(FormEvent::changed(&trigger, item));
    let outcomes = controller.settle(settle_timeout(config));
    report_outcomes(&outcomes, controller.in_flight(), verbose);

    print!("{}", render_page(controller.surface(), format));
    Ok(())
}

// ============================================================================
// rules subcommand
// ============================================================================

pub fn cmd_rules(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let yaml = serde_yaml::to_string(&config.visibility)?;
    print!("{}", yaml);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn build_service(config: &AppConfig) -> Result<Arc<dyn LookupService>, Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.collaborator.timeout_secs);
    let service = HttpLookupService::new(&config.collaborator.base_url, Some(timeout))?;
    Ok(Arc::new(service))
}

/// The HTTP client gives up after `timeout_secs`; wait a little longer so
/// its error still reaches the form.
fn settle_timeout(config: &AppConfig) -> Duration {
    Duration::from_secs(config.collaborator.timeout_secs + 5)
}

pub fn render_page(page: &AdminPage, format: &str) -> String {
    match format {
        "html" => render_html(page),
        _ => render_console(page),
    }
}

fn report_outcomes(outcomes: &[CompletionOutcome], still_running: usize, verbose: u8) {
    for outcome in outcomes {
        match outcome {
            CompletionOutcome::Failed(msg) => eprintln!("Lookup failed: {}", msg),
            other if verbose > 1 => eprintln!("  lookup: {:?}", other),
            _ => {}
        }
    }
    if still_running > 0 {
        eprintln!("{} lookup(s) still running; annotation may be stale", still_running);
    }
}
