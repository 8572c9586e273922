use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

use crate::domain::value::SmsId;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An inbox message.
pub struct Message {
    pub id: SmsId,
    /// `None` when the device reported a time the parser did not understand.
    pub timestamp: Option<NaiveDateTime>,
    pub unread: bool,
    pub sender: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
/// A scalar leaf of the status document.
pub enum ItemValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl ItemValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(value) => value.as_i64(),
            _ => None,
        }
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Modem state read from one status poll.
///
/// `items` holds every scalar of the status document under its dotted,
/// lowercased path (`wwan.connection`, `general.imei`, ...) minus the
/// credentials the device echoes back.
pub struct Snapshot {
    pub serial_number: String,
    /// Bytes transferred in the current billing cycle.
    pub usage: u64,
    /// Active backhaul, on models with wired failover.
    pub upstream: Option<String>,
    pub wire_connected: Option<bool>,
    pub mobile_connected: bool,
    pub connection_text: String,
    pub connection_type: String,
    pub current_nw_service_type: String,
    pub current_ps_service_type: String,
    pub register_network_display: String,
    pub roaming: bool,
    pub radio_quality: i64,
    pub rx_level: i64,
    pub tx_level: i64,
    pub current_band: String,
    pub cell_id: i64,
    /// Inbox, sorted by id ascending.
    pub sms: Vec<Message>,
    pub items: BTreeMap<String, ItemValue>,
}

impl Snapshot {
    /// Look up a flattened status item by its dotted key.
    pub fn item(&self, key: &str) -> Option<&ItemValue> {
        self.items.get(&key.to_lowercase())
    }

    /// Highest message id in the inbox.
    pub fn max_sms_id(&self) -> Option<SmsId> {
        self.sms.iter().map(|sms| sms.id).max()
    }
}
