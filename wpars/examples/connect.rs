/// Scans, picks the access point named by `WIFI_SSID` and associates with it.
use wpars::{ConnectionState, Notification, Supplicant};

#[tokio::main]
async fn main() -> wpars::Result<()> {
    let ssid = std::env::var("WIFI_SSID").unwrap_or_else(|_| "MyNetwork".to_string());
    let password = std::env::var("WIFI_PASSWORD").ok();

    let supplicant = Supplicant::new().await?;
    let mut notifications = supplicant.subscribe();

    supplicant.scan().await?;
    while let Ok(n) = notifications.recv().await {
        if n == Notification::Discovery {
            break;
        }
    }

    let Some(mut network) = supplicant
        .scan_results()
        .await
        .unwrap_or_default()
        .into_iter()
        .find(|net| net.ssid() == ssid)
    else {
        eprintln!("{ssid} not found");
        return Ok(());
    };

    if let Some(psk) = password {
        network.set_preshared_key(psk);
    }

    let id = supplicant.connect(&network).await?;
    println!("Configured {network} as network {id}, waiting for association...");

    while let Ok(n) = notifications.recv().await {
        match n {
            Notification::StateChanged(ConnectionState::Completed) => {
                println!("Connected successfully!");
                break;
            }
            Notification::Error(fault) => {
                eprintln!("{fault}");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}
