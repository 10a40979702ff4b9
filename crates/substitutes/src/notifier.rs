use std::sync::Mutex;

use async_trait::async_trait;
use capability::{DeliveryId, NotificationMessage, Notifier, ProviderFault, Recipient};

use crate::call_log::{lock, CallLog, FaultPlan};

/// [`Notifier`] that keeps every message instead of delivering it.
///
/// `calls()` holds every send attempt; `delivered()` only the ones that were
/// accepted (i.e. not made to fail).
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<(DeliveryId, NotificationMessage)>>,
    faults: FaultPlan<Recipient>,
    calls: CallLog<NotificationMessage>,
}

impl RecordingNotifier {
    /// Creates a notifier with nothing recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every send fail with `fault`.
    pub fn fail_with(&self, fault: ProviderFault) {
        self.faults.fail_always(fault);
    }

    /// Makes sends to `recipient` fail with `fault`.
    pub fn fail_for(&self, recipient: Recipient, fault: ProviderFault) {
        self.faults.fail_for(recipient, fault);
    }

    /// Removes every programmed failure.
    pub fn clear_failures(&self) {
        self.faults.clear();
    }

    /// Every message passed to `send`, in order.
    pub fn calls(&self) -> Vec<NotificationMessage> {
        self.calls.snapshot()
    }

    /// Messages that were accepted, with the id each was accepted under.
    pub fn delivered(&self) -> Vec<(DeliveryId, NotificationMessage)> {
        lock(&self.delivered).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryId, ProviderFault> {
        self.calls.record(message.clone());

        if let Some(fault) = self.faults.fault_for(Some(&message.recipient)) {
            tracing::trace!(recipient = %message.recipient, "substitute notifier returning programmed fault");
            return Err(fault);
        }

        let id = DeliveryId::new_random();
        lock(&self.delivered).push((id, message.clone()));
        Ok(id)
    }
}
