use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = gmcli::cli::Cli::parse();
    gmcli::logging::init(cli.verbose);

    if let Err(err) = gmcli::run(cli).await {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
