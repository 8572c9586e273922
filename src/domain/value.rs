use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Modem admin password (`session.password`).
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
/// The `Debug` output never shows the value.
pub struct Password(String);

impl Password {
    /// Form field name used by the modem (`session.password`).
    pub const FIELD: &'static str = "session.password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS receiver (`sms.sendMsg.receiver`).
///
/// Invariant: non-empty after trimming. The modem accepts free-form numbers,
/// so no further normalization is done.
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Form field name used by the modem (`sms.sendMsg.receiver`).
    pub const FIELD: &'static str = "sms.sendMsg.receiver";

    /// Create a validated [`PhoneNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`sms.sendMsg.text`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by the modem (`sms.sendMsg.text`).
    pub const FIELD: &'static str = "sms.sendMsg.text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Inbox message id as numbered by the device.
pub struct SmsId(u64);

impl SmsId {
    /// Form field name used to delete a message (`sms.deleteId`).
    pub const FIELD: &'static str = "sms.deleteId";

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SmsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which upstream the router prefers (`failover.mode`).
pub enum FailoverMode {
    /// Wired WAN with LTE fallback.
    Auto,
    /// Wired WAN only.
    Wire,
    /// LTE only.
    Mobile,
}

impl FailoverMode {
    pub const FIELD: &'static str = "failover.mode";

    /// Value the device expects in the config form.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Wire => "WAN",
            Self::Mobile => "LTE",
        }
    }
}

impl FromStr for FailoverMode {
    type Err = ValidationError;

    /// Parse `auto`, `wire` or `mobile`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(Self::Auto),
            "wire" => Ok(Self::Wire),
            "mobile" => Ok(Self::Mobile),
            other => Err(ValidationError::InvalidMode {
                field: Self::FIELD,
                input: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// When the modem dials LTE on its own (`wwan.autoconnect`).
pub enum AutoconnectMode {
    Never,
    /// Only while on the home network (no roaming).
    Home,
    Always,
}

impl AutoconnectMode {
    pub const FIELD: &'static str = "wwan.autoconnect";

    /// Value the device expects in the config form.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Home => "HomeNetwork",
            Self::Always => "Always",
        }
    }
}

impl FromStr for AutoconnectMode {
    type Err = ValidationError;

    /// Parse `never`, `home` or `always`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "never" => Ok(Self::Never),
            "home" => Ok(Self::Home),
            "always" => Ok(Self::Always),
            other => Err(ValidationError::InvalidMode {
                field: Self::FIELD,
                input: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Field order of the date part in `rxTime` timestamps.
pub enum DateOrder {
    /// `dd/mm/yy`, used by most firmware.
    #[default]
    DayFirst,
    /// `mm/dd/yy`, used by the MR1100.
    MonthFirst,
}

impl DateOrder {
    const MONTH_FIRST_MODELS: &'static [&'static str] = &["MR1100"];

    /// Pick the order for a declared model identifier.
    pub fn for_model(model: Option<&str>) -> Self {
        match model {
            Some(model) if Self::MONTH_FIRST_MODELS.contains(&model) => Self::MonthFirst,
            _ => Self::DayFirst,
        }
    }

    /// `chrono` format string for a full `rxTime` value.
    pub fn format(self) -> &'static str {
        match self {
            Self::DayFirst => "%d/%m/%y %I:%M:%S %p",
            Self::MonthFirst => "%m/%d/%y %I:%M:%S %p",
        }
    }
}
