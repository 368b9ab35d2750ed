use crate::{
    form::{
        field_view::FormSurface,
        form_model::{Reveal, RuleTable, VisibilityMap},
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Decide which field-groups are visible for a discriminator value.
///
/// An absent or empty value hides every conditional group. Groups marked
/// `Always` are visible whatever the value. A group name listed by several
/// rules is visible when any of them reveals it.
pub fn compute_visibility(value: Option<&str>, table: &RuleTable) -> VisibilityMap {
    let value = value.filter(|v| !v.is_empty());
    let mut map = VisibilityMap::new();

    for group in &table.groups {
        let visible = match &group.reveal {
            Reveal::Always => true,
            Reveal::When(tags) => value.is_some_and(|v| tags.iter().any(|t| t == v)),
        };
        *map.entry(group.name.clone()).or_insert(false) |= visible;
    }

    map
}

/// Binds a rule table to the fields of one form.
///
/// Selectors are resolved once, when the engine is bound, the same way the
/// admin script captured its elements on page load. Fields that do not exist
/// are skipped.
#[derive(Debug, Clone)]
pub struct VisibilityRuleEngine {
    table: RuleTable,
    discriminator: Option<String>,
    bound: Vec<(String, Vec<String>)>,
}

impl VisibilityRuleEngine {
    pub fn bind(table: RuleTable, surface: &dyn FormSurface) -> Self {
        let discriminator = table.discriminator.resolve_first(surface);
        let bound = table
            .groups
            .iter()
            .map(|g| (g.name.clone(), g.fields.resolve(surface)))
            .collect();

        Self {
            table,
            discriminator,
            bound,
        }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Id of the discriminator field, if the form has one.
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    /// Field ids bound to a group at bind time.
    pub fn bound_fields(&self, group: &str) -> Vec<&str> {
        self.bound
            .iter()
            .filter(|(name, _)| name == group)
            .flat_map(|(_, ids)| ids.iter().map(String::as_str))
            .collect()
    }

    /// Apply visibility for the discriminator's current value. Without a
    /// discriminator field nothing is touched.
    pub fn init(
        &self,
        surface: &mut dyn FormSurface,
        tracer: &TraceLogger,
    ) -> Option<VisibilityMap> {
        self.handle_change(surface, tracer)
    }

    /// Re-apply visibility after the discriminator changed.
    pub fn handle_change(
        &self,
        surface: &mut dyn FormSurface,
        tracer: &TraceLogger,
    ) -> Option<VisibilityMap> {
        let discriminator = self.discriminator.as_deref()?;
        let value = surface.value(discriminator);
        Some(self.apply(surface, value.as_deref(), tracer))
    }

    /// Compute and apply visibility for an explicit value.
    pub fn apply(
        &self,
        surface: &mut dyn FormSurface,
        value: Option<&str>,
        tracer: &TraceLogger,
    ) -> VisibilityMap {
        let map = compute_visibility(value, &self.table);

        // A field claimed by several groups is shown if any of them is.
        let mut decisions: Vec<(&str, bool)> = Vec::new();
        for (group, field_ids) in &self.bound {
            let visible = map.get(group).copied().unwrap_or(false);
            for id in field_ids {
                match decisions.iter_mut().find(|(d, _)| *d == id.as_str()) {
                    Some((_, v)) => *v |= visible,
                    None => decisions.push((id.as_str(), visible)),
                }
            }
        }

        for (id, visible) in decisions {
            if let Some(view) = surface.view_mut(id) {
                view.set_visible(visible);
            }
        }

        let mut event = TraceEvent::now("visibility", "applied").with_visibility(&map);
        if let Some(id) = &self.discriminator {
            event = event.with_field(id);
        }
        if let Some(v) = value {
            event = event.with_detail(format!("value={}", v));
        }
        tracer.log(&event);

        map
    }
}
