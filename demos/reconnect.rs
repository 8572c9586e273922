use std::io;
use std::time::Duration;

use netgear_lte::{ModemClient, Password};

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

    let modem = ModemClient::new(host)?;
    modem.login(Some(Password::new(password)?)).await?;

    println!("Disconnecting");
    modem.disconnect_lte().await?;
    tokio::time::sleep(Duration::from_secs(5)).await;

    println!("Connecting");
    modem.connect_lte().await?;
    tokio::time::sleep(Duration::from_secs(5)).await;

    modem.logout().await;
    Ok(())
}
