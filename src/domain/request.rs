use crate::domain::value::{AutoconnectMode, FailoverMode, MessageText, PhoneNumber, SmsId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A device-mutating operation.
///
/// Every action is a single form post. [`DeviceAction::SendSms`] goes to the
/// SMS endpoint; everything else is a generic config call carrying one
/// key/value pair.
pub enum DeviceAction {
    SendSms {
        phone: PhoneNumber,
        text: MessageText,
    },
    DeleteSms(SmsId),
    SetFailoverMode(FailoverMode),
    SetAutoconnectMode(AutoconnectMode),
    ConnectLte,
    DisconnectLte,
    RouterRestart,
    FactoryReset,
}

impl DeviceAction {
    /// Short operation name, used in logs and aggregated errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SendSms { .. } => "send_sms",
            Self::DeleteSms(_) => "delete_sms",
            Self::SetFailoverMode(_) => "set_failover_mode",
            Self::SetAutoconnectMode(_) => "set_autoconnect_mode",
            Self::ConnectLte => "connect_lte",
            Self::DisconnectLte => "disconnect_lte",
            Self::RouterRestart => "router_restart",
            Self::FactoryReset => "factory_reset",
        }
    }

    /// The config key/value pair for generic config calls, `None` for SMS sending.
    pub fn config_pair(&self) -> Option<(&'static str, String)> {
        let pair = match self {
            Self::SendSms { .. } => return None,
            Self::DeleteSms(id) => (SmsId::FIELD, id.to_string()),
            Self::SetFailoverMode(mode) => (FailoverMode::FIELD, mode.as_wire().to_owned()),
            Self::SetAutoconnectMode(mode) => {
                (AutoconnectMode::FIELD, mode.as_wire().to_owned())
            }
            Self::ConnectLte => ("wwan.connect", "DefaultProfile".to_owned()),
            Self::DisconnectLte => ("wwan.connect", "Disconnect".to_owned()),
            Self::RouterRestart => ("general.shutdown", "restart".to_owned()),
            Self::FactoryReset => ("general.factoryReset", "1".to_owned()),
        };
        Some(pair)
    }
}
