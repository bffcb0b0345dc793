/// Example showing a custom client configuration.
///
/// A longer command timeout helps on slow embedded targets, and a larger
/// cache keeps more access points around in dense environments.
use std::time::Duration;
use wpars::{Supplicant, SupplicantConfig};

#[tokio::main]
async fn main() -> wpars::Result<()> {
    let config = SupplicantConfig::new()
        .with_interface("wlan0")
        .with_command_timeout(Duration::from_secs(30))
        .with_cache_capacity(64);

    println!("Client configuration:");
    println!("  Control directory: {}", config.ctrl_dir.display());
    println!("  Command timeout:   {:?}", config.command_timeout);
    println!("  Cache capacity:    {}", config.cache_capacity);

    let supplicant = Supplicant::with_config(config).await?;

    println!("\nInterface: {}", supplicant.interface().unwrap_or("-"));
    println!("State:     {}", supplicant.state().await);

    let status = supplicant.status().await?;
    if let Some(ssid) = status.ssid {
        println!("SSID:      {ssid}");
    }

    Ok(())
}
