//! Hook listeners for the audit module.

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use larkboard_core::types::id::MemberId;
use larkboard_core::AppResult;
use larkboard_extension::{points, DependencyBag, Listener, ListenerFactory};

use crate::trail::AuditTrail;

/// Factory listener recording member registrations.
///
/// The record is taken while the listener is constructed; `construct`
/// returns `None`, so nothing is invoked afterwards. Construction is the
/// entire effect.
pub struct RegistrationRecorder {
    /// The shared trail records land in.
    trail: Arc<AuditTrail>,
}

impl RegistrationRecorder {
    /// Creates the factory around a shared trail.
    pub fn new(trail: Arc<AuditTrail>) -> Self {
        Self { trail }
    }
}

impl ListenerFactory for RegistrationRecorder {
    fn construct(&self, bag: &mut DependencyBag<'_>) -> AppResult<Option<Box<dyn Listener>>> {
        let member = bag
            .get_str("member")
            .and_then(|raw| MemberId::from_str(raw).ok());
        let name = bag.get_str("member_name").unwrap_or("unknown");

        self.trail.record(
            points::MEMBER_REGISTER,
            member,
            format!("member '{name}' registered"),
        );
        debug!(member = %name, "registration recorded");
        Ok(None)
    }
}

/// Snapshot listener running before every other message-save listener.
pub struct SaveCheckpoint {
    /// The shared trail.
    trail: Arc<AuditTrail>,
}

impl SaveCheckpoint {
    /// Creates the checkpoint listener.
    pub fn new(trail: Arc<AuditTrail>) -> Self {
        Self { trail }
    }
}

impl Listener for SaveCheckpoint {
    fn invoke(&self, bag: &mut DependencyBag<'_>) -> AppResult<()> {
        let length = bag.get_str("message").map(|m| m.len()).unwrap_or(0);
        self.trail.record(
            points::MESSAGE_SAVE,
            None,
            format!("incoming message, {length} bytes"),
        );
        Ok(())
    }
}

/// Seal listener running after every other message-save listener.
///
/// Records what the earlier listeners produced, e.g. the mention names
/// the mentions module wrote into the context.
pub struct SaveSeal {
    /// The shared trail.
    trail: Arc<AuditTrail>,
}

impl SaveSeal {
    /// Creates the seal listener.
    pub fn new(trail: Arc<AuditTrail>) -> Self {
        Self { trail }
    }
}

impl Listener for SaveSeal {
    fn invoke(&self, bag: &mut DependencyBag<'_>) -> AppResult<()> {
        let mentions = bag
            .get("mentions")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0);
        self.trail.record(
            points::MESSAGE_SAVE,
            None,
            format!("message sealed, {mentions} mention(s)"),
        );
        Ok(())
    }
}
