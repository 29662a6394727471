//! Document Model
//!
//! An ordered, JSON-transportable field map used both for locally stored
//! records and for everything that travels between members.
//!
//! ## Core Concepts
//! - **Field order**: fields keep their insertion position; replacing a value never moves it.
//! - **Typed values**: every value carries a type (`binary`, `array`, ...) that callers can check
//!   before trusting its payload.
//! - **Copy-on-replace**: `Document::with_field_replaced` builds a new document instead of
//!   mutating a shared one.

pub mod types;
