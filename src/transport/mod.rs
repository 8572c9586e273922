//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod forms;
mod login;
mod number;
mod status;

pub use forms::{CONFIG_PATH, encode_action_form};
pub use login::{encode_login_form, extract_token};
pub use status::{SENSITIVE_KEYS, STATUS_PATH, decode_status_json_response};
