use devicepulse_client::{ClientError, TelemetryClient};
use devicepulse_core::{DiagStatus, NewDiagnostic};

pub fn run(server: &str, tool: String, status: &str, details: Option<String>) -> i32 {
    // The argument parser restricts status to the valid set already.
    let status: DiagStatus = match status.parse() {
        Ok(status) => status,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let rt = match super::runtime() {
        Ok(rt) => rt,
        Err(code) => return code,
    };

    rt.block_on(async move {
        let client = TelemetryClient::new(server);
        let input = NewDiagnostic {
            tool_name: tool,
            status,
            details,
            created_at: None,
        };
        match client.create_diagnostic(&input).await {
            Ok(record) => {
                println!(
                    "recorded {} = {} (id {}, at {})",
                    record.tool_name, record.status, record.id, record.created_at
                );
                0
            }
            Err(ClientError::Rejected(fault)) => {
                eprintln!("server rejected the result: {fault}");
                1
            }
            Err(err) => {
                eprintln!("failed to record result: {err}");
                1
            }
        }
    })
}
