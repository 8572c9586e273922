use std::io;

use netgear_lte::{FailoverMode, ModemClient, Password};

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
    let Some(mode) = std::env::args().nth(1) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "usage: failover <auto|wire|mobile>",
        )
        .into());
    };
    let mode: FailoverMode = mode.parse()?;

    let modem = ModemClient::new(host)?;
    modem.login(Some(Password::new(password)?)).await?;
    modem.set_failover_mode(mode).await?;
    println!("failover mode set to {mode:?}");

    modem.logout().await;
    Ok(())
}
