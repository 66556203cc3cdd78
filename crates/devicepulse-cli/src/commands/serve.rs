use std::path::Path;

use devicepulse_core::TelemetryStore;

pub fn run(host: &str, port: u16, data_dir: Option<&Path>) -> i32 {
    let store = match data_dir {
        Some(dir) => match TelemetryStore::open(dir) {
            Ok(store) => store,
            Err(err) => {
                eprintln!("failed to open telemetry store: {err}");
                return 1;
            }
        },
        None => TelemetryStore::in_memory(),
    };

    let base = format!("http://{host}:{port}");
    println!("devicepulse server v{}", devicepulse_core::VERSION);
    println!("   {base}");
    match data_dir {
        Some(dir) => println!("   journaling to {}", dir.display()),
        None => println!("   in-memory store (records are lost on exit)"),
    }
    println!();
    println!("   Endpoints:");
    println!("     GET  /api/diagnostics     List diagnostic results");
    println!("     POST /api/diagnostics     Record a diagnostic result");
    println!("     GET  /api/battery-logs    List battery samples");
    println!("     POST /api/battery-logs    Record a battery sample");
    println!("     GET  /health              Table counts");
    println!();
    println!("   Examples:");
    println!("     curl {base}/api/diagnostics");
    println!("     curl -X POST {base}/api/diagnostics \\");
    println!("          -H 'content-type: application/json' \\");
    println!("          -d '{{\"toolName\": \"Speaker Test\", \"status\": \"pass\"}}'");
    println!();

    let rt = match super::runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };
    match rt.block_on(devicepulse_server::run_server(store, host, port)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server failed: {err}");
            1
        }
    }
}
