use clap::Parser;
use log::error;
use proxmox_cli::{app, cli::Args, logging};
use std::io::{self, Write};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let _log_guard = logging::init(args.debug);

    let mut stdout = io::stdout();
    let result = app::run(&args, |key| std::env::var(key).ok(), &mut stdout).await;
    let _ = stdout.flush();

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}
