//! Module registration for the audit trail.

use std::sync::Arc;

use larkboard_extension::{points, HookRegistration, ListenerSpec, Module, ModuleInfo};

use crate::listeners::{RegistrationRecorder, SaveCheckpoint, SaveSeal};
use crate::trail::AuditTrail;

/// The audit module.
///
/// Holds the shared [`AuditTrail`] its listeners append to; the host keeps
/// a clone of the `Arc` to read the trail after dispatch.
#[derive(Debug)]
pub struct AuditModule {
    /// The trail all audit listeners write to.
    trail: Arc<AuditTrail>,
}

impl AuditModule {
    /// Creates the module with a fresh trail.
    pub fn new() -> Self {
        Self {
            trail: Arc::new(AuditTrail::new()),
        }
    }

    /// Returns the shared trail.
    pub fn trail(&self) -> Arc<AuditTrail> {
        Arc::clone(&self.trail)
    }
}

impl Default for AuditModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for AuditModule {
    fn info(&self) -> ModuleInfo {
        ModuleInfo {
            id: "audit".to_string(),
            name: "Audit Trail".to_string(),
            version: "1.0.3".to_string(),
            description: "Records member registrations and message activity".to_string(),
        }
    }

    fn hooks(&self) -> Vec<HookRegistration> {
        vec![
            // Construct-for-side-effect: the record is taken while the
            // listener is built, nothing is invoked.
            HookRegistration::new(
                points::MEMBER_REGISTER,
                "audit_registration",
                ListenerSpec::factory(Arc::new(RegistrationRecorder::new(self.trail()))),
            )
            .with_dependencies(["member", "member_name"]),
            HookRegistration::new(
                points::MESSAGE_SAVE,
                "audit_checkpoint",
                ListenerSpec::instance(Arc::new(SaveCheckpoint::new(self.trail()))),
            )
            .at_begin(Some(500)),
            HookRegistration::new(
                points::MESSAGE_SAVE,
                "audit_seal",
                ListenerSpec::instance(Arc::new(SaveSeal::new(self.trail()))),
            )
            .at_end(Some(10_500)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larkboard_extension::{EventContext, HookDispatcher};

    #[test]
    fn test_registration_is_audited_without_invocation() {
        let module = AuditModule::new();
        let trail = module.trail();
        let modules: [Arc<dyn Module>; 1] = [Arc::new(module)];
        let mut dispatcher = HookDispatcher::new(&modules).expect("dispatcher");

        let mut ctx = EventContext::new().with_str("member_name", "grace");
        dispatcher
            .trigger(points::MEMBER_REGISTER, &mut ctx)
            .expect("trigger");

        assert_eq!(trail.len(), 1);
        assert_eq!(trail.records()[0].detail, "member 'grace' registered");
    }

    #[test]
    fn test_checkpoint_runs_before_seal() {
        let module = AuditModule::new();
        let trail = module.trail();
        let modules: [Arc<dyn Module>; 1] = [Arc::new(module)];
        let mut dispatcher = HookDispatcher::new(&modules).expect("dispatcher");

        let mut ctx = EventContext::new().with_str("message", "hello board");
        dispatcher
            .trigger(points::MESSAGE_SAVE, &mut ctx)
            .expect("trigger");

        let records = trail.records();
        assert_eq!(records.len(), 2);
        assert!(records[0].detail.starts_with("incoming message"));
        assert!(records[1].detail.starts_with("message sealed"));
    }
}
