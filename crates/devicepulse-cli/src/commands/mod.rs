pub mod battery;
pub mod diag;
pub mod scan;
pub mod serve;
pub mod watch;

/// Build the runtime every async command shares, reporting failure as an
/// exit code instead of panicking.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, i32> {
    tokio::runtime::Runtime::new().map_err(|err| {
        eprintln!("failed to start async runtime: {err}");
        1
    })
}
