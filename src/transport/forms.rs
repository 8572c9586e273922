use crate::domain::{DeviceAction, MessageText, PhoneNumber};

pub const CONFIG_PATH: &str = "Forms/config";
pub const SEND_SMS_PATH: &str = "Forms/smsSendMsg";

const CLIENT_ID: &str = "netgear_lte";

/// Endpoint path and form fields for one action.
pub fn encode_action_form(
    action: &DeviceAction,
    token: &str,
) -> (&'static str, Vec<(String, String)>) {
    match action {
        DeviceAction::SendSms { phone, text } => {
            (SEND_SMS_PATH, encode_send_sms_form(phone, text, token))
        }
        other => {
            let mut params = Vec::<(String, String)>::new();
            if let Some((key, value)) = other.config_pair() {
                params.push((key.to_owned(), value));
            }
            push_config_tail(&mut params, token);
            (CONFIG_PATH, params)
        }
    }
}

fn encode_send_sms_form(
    phone: &PhoneNumber,
    text: &MessageText,
    token: &str,
) -> Vec<(String, String)> {
    vec![
        (PhoneNumber::FIELD.to_owned(), phone.as_str().to_owned()),
        (MessageText::FIELD.to_owned(), text.as_str().to_owned()),
        ("sms.sendMsg.clientId".to_owned(), CLIENT_ID.to_owned()),
        ("action".to_owned(), "send".to_owned()),
        ("token".to_owned(), token.to_owned()),
    ]
}

fn push_config_tail(params: &mut Vec<(String, String)>, token: &str) {
    params.push(("err_redirect".to_owned(), "/error.json".to_owned()));
    params.push(("ok_redirect".to_owned(), "/success.json".to_owned()));
    params.push(("token".to_owned(), token.to_owned()));
}
