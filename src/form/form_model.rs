use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::form::field_view::{FieldHandle, FormSurface};

/// Locates one field (or a family of fields) on an admin form.
///
/// The variants mirror the selectors the admin scripts rely on:
/// `#id_count`, `[id^="id_new_item_"]`, `input[name="start_date"]` and
/// `select[name$="-item"]` for inline formset rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelector {
    Id(String),
    IdPrefix(String),
    Name(String),
    NameSuffix(String),
}

impl FieldSelector {
    pub fn id(id: &str) -> Self {
        FieldSelector::Id(id.to_string())
    }

    pub fn id_prefix(prefix: &str) -> Self {
        FieldSelector::IdPrefix(prefix.to_string())
    }

    pub fn name(name: &str) -> Self {
        FieldSelector::Name(name.to_string())
    }

    pub fn name_suffix(suffix: &str) -> Self {
        FieldSelector::NameSuffix(suffix.to_string())
    }

    pub fn matches(&self, field: &FieldHandle) -> bool {
        match self {
            FieldSelector::Id(id) => field.id == *id,
            FieldSelector::IdPrefix(prefix) => field.id.starts_with(prefix.as_str()),
            FieldSelector::Name(name) => field.name.as_deref() == Some(name.as_str()),
            FieldSelector::NameSuffix(suffix) => field
                .name
                .as_deref()
                .is_some_and(|n| n.ends_with(suffix.as_str())),
        }
    }

    /// Ids of every matching field, in document order.
    pub fn resolve(&self, surface: &dyn FormSurface) -> Vec<String> {
        surface
            .fields()
            .into_iter()
            .filter(|f| self.matches(f))
            .map(|f| f.id)
            .collect()
    }

    /// Id of the first matching field, like `querySelector`.
    pub fn resolve_first(&self, surface: &dyn FormSurface) -> Option<String> {
        surface
            .fields()
            .into_iter()
            .find(|f| self.matches(f))
            .map(|f| f.id)
    }
}

/// When a field-group is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reveal {
    /// Shown regardless of the discriminator value.
    Always,
    /// Shown only while the discriminator holds one of these tags.
    When(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRule {
    pub name: String,
    pub fields: FieldSelector,
    pub reveal: Reveal,
}

impl GroupRule {
    pub fn always(name: &str, fields: FieldSelector) -> Self {
        Self {
            name: name.to_string(),
            fields,
            reveal: Reveal::Always,
        }
    }

    pub fn when(name: &str, fields: FieldSelector, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            fields,
            reveal: Reveal::When(tags.iter().map(|t| t.to_string()).collect()),
        }
    }
}

/// Discriminator field plus the groups it controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    pub discriminator: FieldSelector,
    pub groups: Vec<GroupRule>,
}

impl RuleTable {
    /// The closed set of tags that reveal at least one group.
    pub fn tags(&self) -> BTreeSet<String> {
        self.groups
            .iter()
            .filter_map(|g| match &g.reveal {
                Reveal::When(tags) => Some(tags.iter().cloned()),
                Reveal::Always => None,
            })
            .flatten()
            .collect()
    }

    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for group in &self.groups {
            if !names.contains(&group.name) {
                names.push(group.name.clone());
            }
        }
        names
    }

    /// Rule table of the item stock request form: `new` reveals the
    /// new-item fields, `existing` reveals the existing-item picker, count
    /// and approval are always shown.
    pub fn item_stock_request() -> Self {
        Self {
            discriminator: FieldSelector::id("id_request_type"),
            groups: vec![
                GroupRule::when("new_item", FieldSelector::id_prefix("id_new_item_"), &["new"]),
                GroupRule::when(
                    "existing_item",
                    FieldSelector::id("id_existing_item"),
                    &["existing"],
                ),
                GroupRule::always("count", FieldSelector::id("id_count")),
                GroupRule::always("approval", FieldSelector::id("id_is_approved")),
            ],
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::item_stock_request()
    }
}

/// Field-group name -> visible.
pub type VisibilityMap = BTreeMap<String, bool>;
