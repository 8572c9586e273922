use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::number::TransportInt;
use crate::domain::{DateOrder, ItemValue, Message, Snapshot, SmsId};

pub const STATUS_PATH: &str = "model.json";

/// Flattened keys that hold credentials and never leave the decoder.
pub const SENSITIVE_KEYS: &[&str] = &[
    "webd.adminpassword",
    "session.sectoken",
    "wifi.guest.passphrase",
    "wifi.passphrase",
];

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("status document is missing {section}")]
    MissingSection { section: &'static str },
}

#[derive(Debug, Deserialize)]
struct StatusJsonResponse {
    general: GeneralJson,
    wwan: WwanJson,
    wwanadv: WwanAdvJson,
}

#[derive(Debug, Deserialize)]
struct GeneralJson {
    #[serde(rename = "FSN")]
    fsn: String,
}

#[derive(Debug, Deserialize)]
struct WwanJson {
    #[serde(rename = "dataUsage")]
    data_usage: DataUsageJson,
    connection: String,
    #[serde(rename = "connectionText")]
    connection_text: String,
    #[serde(rename = "connectionType")]
    connection_type: String,
    #[serde(rename = "currentNWserviceType")]
    current_nw_service_type: String,
    #[serde(rename = "currentPSserviceType")]
    current_ps_service_type: String,
    #[serde(rename = "registerNetworkDisplay")]
    register_network_display: String,
    roaming: bool,
}

#[derive(Debug, Deserialize)]
struct DataUsageJson {
    generic: GenericUsageJson,
}

#[derive(Debug, Deserialize)]
struct GenericUsageJson {
    #[serde(rename = "dataTransferred")]
    data_transferred: TransportInt,
}

#[derive(Debug, Deserialize)]
struct WwanAdvJson {
    #[serde(rename = "radioQuality")]
    radio_quality: TransportInt,
    #[serde(rename = "rxLevel")]
    rx_level: TransportInt,
    #[serde(rename = "txLevel")]
    tx_level: TransportInt,
    #[serde(rename = "curBand")]
    cur_band: String,
    #[serde(rename = "cellId")]
    cell_id: TransportInt,
}

// {"id": "6", "rxTime": "11/03/18 08:18:11 PM", "text": "hi", "sender": "555-1", "read": false}
#[derive(Debug, Deserialize)]
struct MessageJson {
    id: TransportInt,
    #[serde(rename = "rxTime", default)]
    rx_time: Option<Value>,
    text: String,
    sender: String,
    read: bool,
}

/// Build a [`Snapshot`] from the body of `model.json`.
///
/// `date_order` overrides the order otherwise picked from `general.model`.
pub fn decode_status_json_response(
    json: &str,
    date_order: Option<DateOrder>,
) -> Result<Snapshot, TransportError> {
    let document: Value = serde_json::from_str(json)?;
    let parsed = StatusJsonResponse::deserialize(&document)?;
    let sms = decode_messages(&document, date_order)?;

    let failover = document.get("failover");
    let upstream = failover
        .and_then(|it| it.get("backhaul"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let wire_connected = failover
        .and_then(|it| it.get("wanConnected"))
        .and_then(Value::as_bool);

    Ok(Snapshot {
        serial_number: parsed.general.fsn,
        usage: parsed.wwan.data_usage.generic.data_transferred.unsigned(),
        upstream,
        wire_connected,
        mobile_connected: parsed.wwan.connection == "Connected",
        connection_text: parsed.wwan.connection_text,
        connection_type: parsed.wwan.connection_type,
        current_nw_service_type: parsed.wwan.current_nw_service_type,
        current_ps_service_type: parsed.wwan.current_ps_service_type,
        register_network_display: parsed.wwan.register_network_display,
        roaming: parsed.wwan.roaming,
        radio_quality: parsed.wwanadv.radio_quality.value(),
        rx_level: parsed.wwanadv.rx_level.value(),
        tx_level: parsed.wwanadv.tx_level.value(),
        current_band: parsed.wwanadv.cur_band,
        cell_id: parsed.wwanadv.cell_id.value(),
        sms,
        items: status_items(&document),
    })
}

/// Read the inbox (`sms.msgs`) of a status document, sorted by id.
///
/// Entries without a `text` field (or with `"text": null`) are placeholders
/// and are skipped. A timestamp that is not a parseable string is stored as
/// `None`; it does not fail the decode.
pub fn decode_messages(
    document: &Value,
    date_order: Option<DateOrder>,
) -> Result<Vec<Message>, TransportError> {
    let entries = document
        .get("sms")
        .and_then(|sms| sms.get("msgs"))
        .and_then(Value::as_array)
        .ok_or(TransportError::MissingSection {
            section: "sms.msgs",
        })?;

    let order = date_order.unwrap_or_else(|| {
        DateOrder::for_model(
            document
                .get("general")
                .and_then(|general| general.get("model"))
                .and_then(Value::as_str),
        )
    });

    let mut messages = entries
        .iter()
        .filter(|entry| entry.get("text").is_some_and(|text| !text.is_null()))
        .map(|entry| -> Result<Message, TransportError> {
            let parsed = MessageJson::deserialize(entry)?;
            Ok(Message {
                id: SmsId::new(parsed.id.unsigned()),
                timestamp: parsed
                    .rx_time
                    .as_ref()
                    .and_then(|raw| timestamp_value(raw, order)),
                unread: !parsed.read,
                sender: parsed.sender,
                message: parsed.text,
            })
        })
        .collect::<Result<Vec<_>, TransportError>>()?;

    messages.sort_by_key(|message| message.id);
    Ok(messages)
}

fn timestamp_value(raw: &Value, order: DateOrder) -> Option<NaiveDateTime> {
    match raw {
        Value::String(text) => parse_timestamp(text, order),
        Value::Null => None,
        other => {
            debug!("non-string message time {other} ignored");
            None
        }
    }
}

fn parse_timestamp(raw: &str, order: DateOrder) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw.trim(), order.format()) {
        Ok(timestamp) => Some(timestamp),
        Err(err) => {
            debug!("unparseable message time {raw:?} ({order:?}): {err}");
            None
        }
    }
}

/// Flatten the whole document and drop [`SENSITIVE_KEYS`].
pub fn status_items(document: &Value) -> BTreeMap<String, ItemValue> {
    let mut items = flatten(document);
    items.retain(|key, _| !SENSITIVE_KEYS.contains(&key.as_str()));
    items
}

/// Flatten nested objects into dotted lowercase keys.
///
/// Only scalar leaves survive; arrays, nulls and empty objects vanish.
pub fn flatten(document: &Value) -> BTreeMap<String, ItemValue> {
    let mut items = BTreeMap::new();
    flatten_into(document, "", &mut items);
    items
}

fn flatten_into(value: &Value, path: &str, items: &mut BTreeMap<String, ItemValue>) {
    let leaf = match value {
        Value::Object(map) => {
            for (key, item) in map {
                let key = key.to_lowercase();
                let child = if path.is_empty() {
                    key
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(item, &child, items);
            }
            return;
        }
        Value::String(text) => ItemValue::String(text.clone()),
        Value::Number(number) => ItemValue::Number(number.clone()),
        Value::Bool(flag) => ItemValue::Bool(*flag),
        Value::Null | Value::Array(_) => return,
    };

    if !path.is_empty() {
        items.insert(path.to_owned(), leaf);
    }
}
