use anyhow::Result;
use clap::Parser;
use deconz_exporter::app::ApplicationBuilder;
use deconz_exporter::config::Cli;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    tracing::info!("Starting deconz exporter {}", &**version::VERSION);

    let app = ApplicationBuilder::new(cli).build().await?;
    app.run().await
}
