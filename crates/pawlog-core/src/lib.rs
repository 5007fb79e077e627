//! Core types and operations for pawlog, a cat weight log.
//!
//! No HTTP or database code lives here. Storage backends implement
//! [`store::WeightStore`]; the API and server crates call the operations in
//! [`service`].

pub mod entry;
pub mod error;
pub mod filter;
pub mod series;
pub mod service;
pub mod store;

pub use error::{Error, Result, ValidationError};
