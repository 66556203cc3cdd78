//! CLI for devicepulse — live device telemetry, logged and served.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "devicepulse")]
#[command(about = "devicepulse — live device telemetry, logged and served")]
#[command(version = devicepulse_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP log API server
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Journal records under this directory (in-memory when omitted)
        #[arg(long)]
        data_dir: Option<std::path::PathBuf>,
    },

    /// Probe sensor capabilities and show device info
    Scan,

    /// Stream live sensor readings to the terminal
    Watch {
        /// Stop after this many seconds
        #[arg(long, default_value_t = 10)]
        seconds: u64,

        /// Print readings as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Observe the battery and push each reading to a log API server
    Battery {
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server: String,

        /// Stop after this many logged samples
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Record a diagnostic test result on a log API server
    Diag {
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        server: String,

        /// Tool name, e.g. "Speaker Test"
        #[arg(long)]
        tool: String,

        #[arg(long, value_parser = ["pass", "fail", "pending"])]
        status: String,

        /// Optional free-text details
        #[arg(long)]
        details: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => commands::serve::run(&host, port, data_dir.as_deref()),
        Commands::Scan => commands::scan::run(),
        Commands::Watch { seconds, json } => commands::watch::run(seconds, json),
        Commands::Battery { server, count } => commands::battery::run(&server, count),
        Commands::Diag {
            server,
            tool,
            status,
            details,
        } => commands::diag::run(&server, tool, &status, details),
    };
    std::process::exit(code);
}
