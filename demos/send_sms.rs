use std::io;

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
    let phone = required("MODEM_PHONE")?;
    let message = std::env::var("MODEM_MESSAGE")
        .unwrap_or_else(|_| "Hello from the netgear-lte demo.".to_owned());

    let modem = ModemClient::new(host)?;
    modem.login(Some(Password::new(password)?)).await?;

    let status = modem
        .send_sms(PhoneNumber::new(phone)?, MessageText::new(message)?)
        .await?;
    println!("status: {status:?}");

    modem.logout().await;
    Ok(())
}
