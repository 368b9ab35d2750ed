pub mod stub_service;
pub mod utils;
