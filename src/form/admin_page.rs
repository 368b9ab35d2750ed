use serde::{Deserialize, Serialize};

use crate::form::field_view::{Annotation, FieldHandle, FieldView, FormSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Input,
    Select,
    Checkbox,
    Textarea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub value: Option<String>,
}

impl FormField {
    pub fn new(id: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            label: None,
            kind,
            value: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn labelled(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowDisplay {
    #[default]
    Shown,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationNode {
    pub key: String,
    pub annotation: Annotation,
}

/// A `.form-row` wrapper: the field, its display style and the annotation
/// nodes inserted after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    pub field: FormField,
    pub display: RowDisplay,
    pub annotations: Vec<AnnotationNode>,
}

impl FormRow {
    pub fn new(field: FormField) -> Self {
        Self {
            field,
            display: RowDisplay::Shown,
            annotations: vec![],
        }
    }

    pub fn is_visible(&self) -> bool {
        self.display == RowDisplay::Shown
    }

    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|n| n.key == key)
            .map(|n| &n.annotation)
    }
}

impl FieldView for FormRow {
    fn set_visible(&mut self, visible: bool) {
        self.display = if visible {
            RowDisplay::Shown
        } else {
            RowDisplay::Hidden
        };
    }

    fn set_annotation(&mut self, key: &str, annotation: Annotation) {
        self.annotations.retain(|n| n.key != key);
        self.annotations.push(AnnotationNode {
            key: key.to_string(),
            annotation,
        });
    }
}

/// YAML description of a form, used by `visibility --layout`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub title: String,
    pub fields: Vec<FormField>,
}

/// In-memory admin change form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminPage {
    pub title: String,
    pub rows: Vec<FormRow>,
}

impl AdminPage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: vec![],
        }
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.rows.push(FormRow::new(field));
        self
    }

    pub fn from_layout(layout: PageLayout) -> Self {
        Self {
            title: layout.title,
            rows: layout.fields.into_iter().map(FormRow::new).collect(),
        }
    }

    pub fn load_layout(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let layout: PageLayout = serde_yaml::from_str(&content)?;
        Ok(Self::from_layout(layout))
    }

    pub fn row(&self, field_id: &str) -> Option<&FormRow> {
        self.rows.iter().find(|r| r.field.id == field_id)
    }

    pub fn row_mut(&mut self, field_id: &str) -> Option<&mut FormRow> {
        self.rows.iter_mut().find(|r| r.field.id == field_id)
    }

    pub fn is_visible(&self, field_id: &str) -> Option<bool> {
        self.row(field_id).map(FormRow::is_visible)
    }

    /// Annotation stored under `key`, wherever it is anchored.
    pub fn annotation(&self, key: &str) -> Option<&Annotation> {
        self.rows.iter().find_map(|r| r.annotation(key))
    }

    pub fn annotation_text(&self, key: &str) -> Option<String> {
        self.annotation(key).map(Annotation::text)
    }

    /// Item stock request form (`ItemStock` admin).
    pub fn item_stock_request() -> Self {
        AdminPage::new("Item stock request")
            .with_field(
                FormField::new("id_request_type", FieldKind::Select)
                    .named("request_type")
                    .labelled("Request type"),
            )
            .with_field(
                FormField::new("id_existing_item", FieldKind::Select)
                    .named("existing_item")
                    .labelled("Existing item"),
            )
            .with_field(
                FormField::new("id_count", FieldKind::Input)
                    .named("count")
                    .labelled("Count"),
            )
            .with_field(
                FormField::new("id_new_item_name", FieldKind::Input)
                    .named("new_item_name")
                    .labelled("New item name"),
            )
            .with_field(
                FormField::new("id_new_item_description", FieldKind::Textarea)
                    .named("new_item_description")
                    .labelled("New item description"),
            )
            .with_field(
                FormField::new("id_new_item_category", FieldKind::Select)
                    .named("new_item_category")
                    .labelled("New item category"),
            )
            .with_field(
                FormField::new("id_new_item_storage", FieldKind::Select)
                    .named("new_item_storage")
                    .labelled("New item storage"),
            )
            .with_field(
                FormField::new("id_is_approved", FieldKind::Checkbox)
                    .named("is_approved")
                    .labelled("Approved"),
            )
    }

    /// Single item booking form, where picking `id_item` shows the stock.
    pub fn item_booking() -> Self {
        AdminPage::new("Item booking")
            .with_field(
                FormField::new("id_item", FieldKind::Select)
                    .named("item")
                    .labelled("Item"),
            )
            .with_field(
                FormField::new("id_count", FieldKind::Input)
                    .named("count")
                    .labelled("Count"),
            )
    }

    /// Booking form with a date range and `rows` inline item rows
    /// (`items-0-item`, `items-1-item`, ...).
    pub fn booking_with_items(rows: usize) -> Self {
        let mut page = AdminPage::new("Booking")
            .with_field(
                FormField::new("id_start_date", FieldKind::Input)
                    .named("start_date")
                    .labelled("Start date"),
            )
            .with_field(
                FormField::new("id_end_date", FieldKind::Input)
                    .named("end_date")
                    .labelled("End date"),
            );

        for i in 0..rows {
            page = page
                .with_field(
                    FormField::new(&format!("id_items-{}-item", i), FieldKind::Select)
                        .named(&format!("items-{}-item", i))
                        .labelled("Item"),
                )
                .with_field(
                    FormField::new(&format!("id_items-{}-count", i), FieldKind::Input)
                        .named(&format!("items-{}-count", i))
                        .labelled("Count"),
                );
        }

        page
    }
}

impl FormSurface for AdminPage {
    fn fields(&self) -> Vec<FieldHandle> {
        self.rows
            .iter()
            .map(|r| FieldHandle {
                id: r.field.id.clone(),
                name: r.field.name.clone(),
            })
            .collect()
    }

    fn value(&self, field_id: &str) -> Option<String> {
        self.row(field_id).and_then(|r| r.field.value.clone())
    }

    fn set_value(&mut self, field_id: &str, value: Option<String>) -> bool {
        match self.row_mut(field_id) {
            Some(row) => {
                row.field.value = value;
                true
            }
            None => false,
        }
    }

    fn view_mut(&mut self, field_id: &str) -> Option<&mut dyn FieldView> {
        self.row_mut(field_id).map(|r| r as &mut dyn FieldView)
    }

    fn remove_annotation(&mut self, key: &str) -> usize {
        let mut removed = 0;
        for row in &mut self.rows {
            let before = row.annotations.len();
            row.annotations.retain(|n| n.key != key);
            removed += before - row.annotations.len();
        }
        removed
    }
}
