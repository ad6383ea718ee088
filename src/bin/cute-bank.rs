use std::{fs::File, sync::Arc};

use anyhow::{Context, Result};
use cute_bank::{
    bin_utils::{LineError, Service},
    config::Config,
    processor::TransactionProcessError,
    random::ThreadRandom,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected an operations file name as the first argument")?;
    let config = match args.next() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        config,
        random: Arc::new(ThreadRandom),
        error_printer: Box::new(|line, err| match err {
            LineError::Parse(err) => eprintln!("Error at line {line}: {err}"),
            LineError::Process(TransactionProcessError::CommandErr(err)) => {
                eprintln!("Error at line {line}: {err}")
            }
            LineError::Process(TransactionProcessError::AccountErr(err)) => {
                // business rejections, not technical errors
                tracing::debug!(line, %err, "operation rejected")
            }
        }),
    };
    service.run().await
}
