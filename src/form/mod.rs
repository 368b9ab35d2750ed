pub mod admin_page;
pub mod field_view;
pub mod form_model;
pub mod render;
pub mod visibility;
