/// Something the user (or the page) did to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// The page finished loading.
    Loaded,

    /// A field took a new value (`None` clears it).
    Changed {
        field_id: String,
        value: Option<String>,
    },
}

impl FormEvent {
    pub fn changed(field_id: &str, value: &str) -> Self {
        FormEvent::Changed {
            field_id: field_id.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn cleared(field_id: &str) -> Self {
        FormEvent::Changed {
            field_id: field_id.to_string(),
            value: None,
        }
    }
}
