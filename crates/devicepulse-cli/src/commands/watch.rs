use std::time::Duration;

use devicepulse_core::SensorAdapter;

pub fn run(seconds: u64, json: bool) -> i32 {
    let rt = match super::runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    rt.block_on(async move {
        let adapter = SensorAdapter::detect();
        let caps = adapter.capabilities();
        if !json {
            println!(
                "watching sensors for {seconds}s (motion={}, orientation={}, network={})",
                caps.motion, caps.orientation, caps.network
            );
        }

        let mut accel = adapter.observe_acceleration();
        let mut orient = adapter.observe_orientation();
        let mut network = adapter.observe_network_status();

        let deadline = tokio::time::sleep(Duration::from_secs(seconds));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                Some(r) = accel.recv() => {
                    if json {
                        println!("{}", serde_json::json!({"sensor": "acceleration", "x": r.x, "y": r.y, "z": r.z}));
                    } else {
                        println!("accel   x={:+7.2} y={:+7.2} z={:+7.2}", r.x, r.y, r.z);
                    }
                }
                Some(r) = orient.recv() => {
                    if json {
                        println!("{}", serde_json::json!({"sensor": "orientation", "alpha": r.alpha, "beta": r.beta, "gamma": r.gamma}));
                    } else {
                        println!("orient  α={:7.2} β={:+7.2} γ={:+7.2}", r.alpha, r.beta, r.gamma);
                    }
                }
                Some(s) = network.recv() => {
                    if json {
                        println!("{}", serde_json::to_string(&s).unwrap_or_default());
                    } else {
                        println!(
                            "network online={} downlink={} Mbps rtt={} ms type={}",
                            s.online, s.downlink, s.rtt, s.link_type
                        );
                    }
                }
            }
        }
    });
    0
}
