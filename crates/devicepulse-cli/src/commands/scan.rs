use devicepulse_core::{CapabilityProbe, SysfsProbe, detect_device_info};

pub fn run() -> i32 {
    let info = detect_device_info();
    println!("Device: {} ({}, {} cores, {:.1} GiB)", info.chip, info.arch, info.cores, info.memory_gb);
    println!("OS:     {}", info.os);
    println!();

    let caps = SysfsProbe::new().probe();
    let classes = [
        ("motion", caps.motion),
        ("orientation", caps.orientation),
        ("network", caps.network),
        ("battery", caps.battery),
    ];

    println!("Sensor capabilities:");
    for (name, cap) in classes {
        let how = if cap.is_native() {
            "native source"
        } else {
            "mock fallback"
        };
        println!("  {name:<12} {how}");
    }
    0
}
