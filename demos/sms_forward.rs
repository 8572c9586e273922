//! Forward every new SMS to one phone; messages from that phone shaped like
//! `<number>: <text>` are sent on to `<number>`.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use netgear_lte::{MessageText, ModemClient, Password, PhoneNumber};

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = required("MODEM_HOST")?;
    let password = required("MODEM_PASSWORD")?;
    let owner = required("MODEM_PHONE")?;

    let modem = Arc::new(ModemClient::new(host)?);
    modem.login(Some(Password::new(password)?)).await?;

    let forwarder = modem.clone();
    let runtime = tokio::runtime::Handle::current();
    modem
        .add_sms_listener(move |sms| {
            let (to, text) = if sms.sender == owner {
                match sms.message.split_once(": ") {
                    Some((to, text)) => (to.to_owned(), text.to_owned()),
                    None => return Err("expected `<number>: <text>`".into()),
                }
            } else {
                (owner.clone(), format!("{}: {}", sms.sender, sms.message))
            };

            let phone = PhoneNumber::new(to)?;
            let text = MessageText::new(text)?;
            // The client is locked while listeners run; send from a task.
            let modem = forwarder.clone();
            runtime.spawn(async move {
                if let Err(err) = modem.send_sms(phone, text).await {
                    eprintln!("forwarding failed: {err}");
                }
            });
            Ok(())
        })
        .await;

    loop {
        modem.information().await?;
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}
