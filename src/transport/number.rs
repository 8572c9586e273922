use serde::Deserialize;
use serde::de::Error as DeError;

/// Integer reported by the modem as either a JSON number or a numeric string.
///
/// Firmware revisions disagree on `rxLevel`, `cellId` and friends: some send
/// `-75`, some `"-75"`. Fractional numbers are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportInt(i64);

impl TransportInt {
    pub fn value(self) -> i64 {
        self.0
    }

    /// Negative counters are clamped to zero.
    pub fn unsigned(self) -> u64 {
        u64::try_from(self.0).unwrap_or(0)
    }
}

impl<'de> Deserialize<'de> for TransportInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        match value {
            serde_json::Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_u64().map(|it| i64::try_from(it).unwrap_or(i64::MAX)))
                .or_else(|| number.as_f64().map(|it| it.trunc() as i64))
                .map(Self)
                .ok_or_else(|| D::Error::custom("integer field out of range")),
            serde_json::Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(Self)
                .map_err(|_| D::Error::custom(format!("expected integer, got {text:?}"))),
            _ => Err(D::Error::custom(
                "expected integer field to be JSON string or number",
            )),
        }
    }
}
