use clap::{CommandFactory, Parser};
use json_stats::cli::Cli;
use json_stats::consumer::{EngineConfig, RunSummary, StatsConsumer};
use std::io::Write;
use std::process::ExitCode;
use tracing::error;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    json_stats::init_tracing();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n", e);
            eprintln!("{}", Cli::command().render_help());
            return Ok(ExitCode::FAILURE);
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(config));
    // stdin is read on a blocking thread that cannot be interrupted; do not
    // wait for it after an interrupt
    runtime.shutdown_background();

    result?;
    Ok(ExitCode::SUCCESS)
}

async fn run(config: EngineConfig) -> anyhow::Result<RunSummary> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout().lock();
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let mut consumer = StatsConsumer::new(config);
    let summary = consumer.run_until(stdin, &mut stdout, shutdown).await?;
    stdout.flush()?;
    Ok(summary)
}
