use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationTone {
    Info,
    Warning,
}

/// Text rendered next to a trigger field. An annotation with no lines is an
/// empty node, not an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub lines: Vec<String>,
    pub tone: AnnotationTone,
}

impl Annotation {
    pub fn info(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            tone: AnnotationTone::Info,
        }
    }

    pub fn warning(lines: Vec<String>) -> Self {
        Self {
            lines,
            tone: AnnotationTone::Warning,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// What the form logic is allowed to do to a single field.
pub trait FieldView {
    /// Show or hide the row that contains the field.
    fn set_visible(&mut self, visible: bool);

    /// Insert the annotation for `key` next to the field, removing any
    /// annotation previously stored under the same key.
    fn set_annotation(&mut self, key: &str, annotation: Annotation);
}

/// Lightweight description of a field used for selector matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    pub id: String,
    pub name: Option<String>,
}

/// A rendered form the engine and annotators act on.
pub trait FormSurface {
    /// Every field in document order.
    fn fields(&self) -> Vec<FieldHandle>;

    fn value(&self, field_id: &str) -> Option<String>;

    /// Returns false when the field does not exist.
    fn set_value(&mut self, field_id: &str, value: Option<String>) -> bool;

    fn view_mut(&mut self, field_id: &str) -> Option<&mut dyn FieldView>;

    /// Drop every annotation stored under `key`, whichever field it sits
    /// next to. Returns how many were removed.
    fn remove_annotation(&mut self, key: &str) -> usize;
}
