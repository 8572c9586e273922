//! Typed Rust client for the Netgear LTE modem web interface (LB1120, LB2120,
//! MR1100 and relatives).
//!
//! The crate has a domain layer of strong types, a transport layer for the
//! device's form and JSON quirks, and a small client layer that owns the
//! session and retries an operation once after logging in again.
//!
//! ```rust,no_run
//! use netgear_lte::{MessageText, ModemClient, Password, PhoneNumber};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netgear_lte::ModemError> {
//!     let modem = ModemClient::new("192.168.5.1")?;
//!     modem.login(Some(Password::new("...")?)).await?;
//!
//!     modem
//!         .send_sms(PhoneNumber::new("+4512345678")?, MessageText::new("hello")?)
//!         .await?;
//!
//!     if let Some(info) = modem.information().await? {
//!         println!("{} unread", info.sms.iter().filter(|sms| sms.unread).count());
//!     }
//!     modem.logout().await;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    DEFAULT_TIMEOUT, LoginPage, ModemClient, ModemClientBuilder, ModemError, SmsListener,
    SmsWatcher,
};
pub use domain::{
    AutoconnectMode, DateOrder, DeviceAction, FailoverMode, ItemValue, Message, MessageText,
    Password, PhoneNumber, SmsId, Snapshot, ValidationError,
};
pub use transport::SENSITIVE_KEYS;
