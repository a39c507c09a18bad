//! End-to-end operations built from the zone, resolver and registrar pieces.
pub mod copy;
pub mod delete;

pub use copy::{CopyOutcome, CopyRequest, copy_zone};
pub use delete::{DeleteOutcome, DeleteRequest, delete_zone};
