//! # Route Modules

pub mod licenses;
