//! Core data model for the logbook.
//!
//! Every record is a [`Log`]: a shared base shape plus a [`LogKind`]
//! carrying the variant-specific fields.

mod kind;
mod log;

pub use kind::{CollectionType, LogKind, LogType, Priority};
pub use log::{Log, LogPatch, NewLog};
