use std::io;

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
    // Print a single flattened item instead, e.g. `general.imei`.
    let key = std::env::args().nth(1);

    let modem = ModemClient::new(host)?;
    modem.login(Some(Password::new(password)?)).await?;

    if let Some(info) = modem.information().await? {
        match key {
            Some(key) => println!("{key}: {:?}", info.item(&key)),
            None => {
                println!("serial_number: {}", info.serial_number);
                println!("usage: {}", info.usage);
                println!("upstream: {:?}", info.upstream);
                println!("wire_connected: {:?}", info.wire_connected);
                println!("mobile_connected: {}", info.mobile_connected);
                println!("connection_text: {}", info.connection_text);
                println!("connection_type: {}", info.connection_type);
                println!("current_nw_service_type: {}", info.current_nw_service_type);
                println!("current_ps_service_type: {}", info.current_ps_service_type);
                println!("register_network_display: {}", info.register_network_display);
                println!("roaming: {}", info.roaming);
                println!("radio_quality: {}", info.radio_quality);
                println!("rx_level: {}", info.rx_level);
                println!("tx_level: {}", info.tx_level);
                println!("current_band: {}", info.current_band);
                println!("cell_id: {}", info.cell_id);
                for sms in &info.sms {
                    println!(
                        "sms {} from {} at {:?} (unread: {}): {}",
                        sms.id, sms.sender, sms.timestamp, sms.unread, sms.message
                    );
                }
            }
        }
    }

    modem.logout().await;
    Ok(())
}
