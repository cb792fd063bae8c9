use anyhow::Context;
use bing_images::{
    cli::{self, Args},
    settings::{LogFormat, Settings},
};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut settings);

    init_tracing(&settings);

    if args.show_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    cli::run(args, settings, &mut stdout).await
}

fn init_tracing(settings: &Settings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339());

    match settings.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
