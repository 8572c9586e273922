//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod snapshot;
mod validation;
mod value;

pub use request::DeviceAction;
pub use snapshot::{ItemValue, Message, Snapshot};
pub use validation::ValidationError;
pub use value::{
    AutoconnectMode, DateOrder, FailoverMode, MessageText, Password, PhoneNumber, SmsId,
};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn password_rejects_empty() {
        assert!(matches!(
            Password::new(""),
            Err(ValidationError::Empty {
                field: Password::FIELD
            })
        ));
        assert!(Password::new(" ").is_ok());
    }

    #[test]
    fn password_debug_is_redacted() {
        let password = Password::new("hunter2").unwrap();
        assert_eq!(format!("{password:?}"), "Password(***)");
    }

    #[test]
    fn phone_number_trims_and_rejects_empty() {
        assert_eq!(PhoneNumber::new(" 555-1 ").unwrap().as_str(), "555-1");
        assert!(PhoneNumber::new("   ").is_err());
    }

    #[test]
    fn message_text_preserves_whitespace() {
        assert_eq!(MessageText::new(" hi ").unwrap().as_str(), " hi ");
        assert!(MessageText::new("\n").is_err());
    }

    #[test]
    fn failover_mode_parses_known_names() {
        assert_eq!("auto".parse::<FailoverMode>().unwrap(), FailoverMode::Auto);
        assert_eq!("wire".parse::<FailoverMode>().unwrap().as_wire(), "WAN");
        assert_eq!("mobile".parse::<FailoverMode>().unwrap().as_wire(), "LTE");
        assert!(matches!(
            "lte".parse::<FailoverMode>(),
            Err(ValidationError::InvalidMode { .. })
        ));
    }

    #[test]
    fn autoconnect_mode_parses_known_names() {
        assert_eq!(
            "home".parse::<AutoconnectMode>().unwrap().as_wire(),
            "HomeNetwork"
        );
        assert_eq!(
            "never".parse::<AutoconnectMode>().unwrap(),
            AutoconnectMode::Never
        );
        assert!("sometimes".parse::<AutoconnectMode>().is_err());
    }

    #[test]
    fn date_order_is_month_first_only_for_mr1100() {
        assert_eq!(DateOrder::for_model(Some("MR1100")), DateOrder::MonthFirst);
        assert_eq!(DateOrder::for_model(Some("LB2120")), DateOrder::DayFirst);
        assert_eq!(DateOrder::for_model(None), DateOrder::DayFirst);
    }

    #[test]
    fn config_pairs_match_device_fields() {
        assert_eq!(
            DeviceAction::DeleteSms(SmsId::new(7)).config_pair(),
            Some(("sms.deleteId", "7".to_owned()))
        );
        assert_eq!(
            DeviceAction::FactoryReset.config_pair(),
            Some(("general.factoryReset", "1".to_owned()))
        );
        assert_eq!(
            DeviceAction::DisconnectLte.config_pair(),
            Some(("wwan.connect", "Disconnect".to_owned()))
        );

        let send = DeviceAction::SendSms {
            phone: PhoneNumber::new("555-1").unwrap(),
            text: MessageText::new("hi").unwrap(),
        };
        assert_eq!(send.config_pair(), None);
        assert_eq!(send.name(), "send_sms");
    }

    #[test]
    fn snapshot_item_lookup_is_case_insensitive() {
        let mut items = BTreeMap::new();
        items.insert(
            "general.imei".to_owned(),
            ItemValue::String("123".to_owned()),
        );
        let snapshot = Snapshot {
            serial_number: "FSN".to_owned(),
            usage: 0,
            upstream: None,
            wire_connected: None,
            mobile_connected: false,
            connection_text: String::new(),
            connection_type: String::new(),
            current_nw_service_type: String::new(),
            current_ps_service_type: String::new(),
            register_network_display: String::new(),
            roaming: false,
            radio_quality: 0,
            rx_level: 0,
            tx_level: 0,
            current_band: String::new(),
            cell_id: 0,
            sms: Vec::new(),
            items,
        };

        assert_eq!(
            snapshot.item("General.IMEI").and_then(ItemValue::as_str),
            Some("123")
        );
        assert_eq!(snapshot.max_sms_id(), None);
    }
}
