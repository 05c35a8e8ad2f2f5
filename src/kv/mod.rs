//! Key/value draft model for head metadata
//!
//! Rows are addressed by a stable [`RowId`] rather than by their key text, so
//! a row keeps its position while its key is being retyped.

mod model;

pub use model::{KeyValueModel, Row, RowId};
