use wpars::{Notification, Supplicant};

#[tokio::main]
async fn main() -> wpars::Result<()> {
    let supplicant = Supplicant::new().await?;
    let mut notifications = supplicant.subscribe();

    println!("Scanning for WiFi networks...");
    supplicant.scan().await?;

    while let Ok(n) = notifications.recv().await {
        match n {
            Notification::Discovery => break,
            Notification::Error(fault) => {
                eprintln!("{fault}");
                return Ok(());
            }
            Notification::StateChanged(_) => {}
        }
    }

    for net in supplicant.scan_results().await.unwrap_or_default() {
        println!(
            "{:30} {:>5} dBm  {}",
            net.ssid(),
            net.signal_level(),
            net.key_management().unwrap_or("open")
        );
    }

    Ok(())
}
