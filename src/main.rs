use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use armory::cli;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ARMORY_LOG").unwrap_or_else(|_| EnvFilter::new("armory=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    let code = cli::run_with_args(&args);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
