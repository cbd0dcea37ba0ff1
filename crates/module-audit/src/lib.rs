//! # module-audit
//!
//! Larkboard module that records member registrations and message
//! activity into an in-memory audit trail. Exercises the factory listener
//! variant: the registration recorder performs its effect during
//! construction and is never invoked.

pub mod listeners;
pub mod module;
pub mod trail;

pub use module::AuditModule;
pub use trail::{AuditRecord, AuditTrail};
