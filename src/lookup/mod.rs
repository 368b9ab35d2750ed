pub mod annotator;
pub mod date;
pub mod dispatcher;
pub mod error;
pub mod lookup_model;
pub mod service;
