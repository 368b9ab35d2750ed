//! Admin form helpers: show or hide dependent fields from a discriminator
//! select, and annotate item pickers with stock and booking-conflict lookups.

pub mod cli;
pub mod controller;
pub mod form;
pub mod lookup;
pub mod trace;
