use devicepulse_client::TelemetryClient;
use devicepulse_core::{NewBatteryLog, SensorAdapter};

/// Observe the battery and push one log per emitted reading: the initial
/// snapshot immediately, then one per level/charging change.
pub fn run(server: &str, count: usize) -> i32 {
    let rt = match super::runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    rt.block_on(async move {
        let adapter = SensorAdapter::detect();
        let client = TelemetryClient::new(server);
        let mut battery = adapter.observe_battery();

        let mut sent = 0;
        while sent < count {
            let Some(reading) = battery.recv().await else {
                break;
            };
            let input = NewBatteryLog {
                level: format!("{:.0}", reading.level),
                is_charging: reading.charging,
                timestamp: None,
            };
            match client.create_battery_log(&input).await {
                Ok(record) => {
                    println!(
                        "logged battery {}%{} (id {})",
                        record.level,
                        if record.is_charging { ", charging" } else { "" },
                        record.id
                    );
                    sent += 1;
                }
                Err(err) => {
                    eprintln!("failed to log battery sample: {err}");
                    return 1;
                }
            }
        }
        0
    })
}
