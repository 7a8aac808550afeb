//! Per-record and per-corpus validators. Every validator returns [`Diagnostic`]s; none of them
//! aborts the run.
//!
//! [`Diagnostic`]: crate::codec::Diagnostic

pub mod cardinality;
pub mod identity;
pub mod references;

pub use cardinality::check_cardinality;
pub use identity::{check_duplicate_ids, IdentityValidator};
pub use references::ReferenceValidator;
