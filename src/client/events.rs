//! New-SMS detection across status polls.

use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::domain::{Message, SmsId};

/// Callback invoked once per newly arrived message.
///
/// An `Err` or a panic is logged and does not stop delivery to other
/// listeners.
pub type SmsListener =
    Box<dyn Fn(&Message) -> Result<(), Box<dyn StdError + Send + Sync>> + Send + Sync>;

/// Tracks the highest message id seen so far and notifies listeners about
/// messages above it.
///
/// The first inbox that contains messages only sets the baseline; nothing
/// is delivered for it.
#[derive(Default)]
pub struct SmsWatcher {
    max_sms_id: Option<SmsId>,
    listeners: Vec<SmsListener>,
}

impl SmsWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in registration order.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: Fn(&Message) -> Result<(), Box<dyn StdError + Send + Sync>> + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Highest id seen in any inbox so far.
    pub fn max_sms_id(&self) -> Option<SmsId> {
        self.max_sms_id
    }

    /// Feed the inbox of a new snapshot; returns how many messages were new.
    pub fn observe(&mut self, inbox: &[Message]) -> usize {
        let previous = self.max_sms_id;
        if let Some(max) = inbox.iter().map(|sms| sms.id).max() {
            self.max_sms_id = Some(previous.map_or(max, |current| current.max(max)));
        }

        let Some(watermark) = previous else {
            return 0;
        };

        let mut fresh = inbox
            .iter()
            .filter(|sms| sms.id > watermark)
            .collect::<Vec<_>>();
        fresh.sort_by_key(|sms| sms.id);

        for sms in &fresh {
            self.deliver(sms);
        }
        fresh.len()
    }

    fn deliver(&self, sms: &Message) {
        for (index, listener) in self.listeners.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(sms))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(sms_id = %sms.id, listener = index, "sms listener failed: {err}");
                }
                Err(_) => {
                    warn!(sms_id = %sms.id, listener = index, "sms listener panicked");
                }
            }
        }
    }
}

impl fmt::Debug for SmsWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmsWatcher")
            .field("max_sms_id", &self.max_sms_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
