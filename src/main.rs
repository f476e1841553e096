use clap::Parser;
use moviestats::{cli::Cli, config::Config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviestats=debug,sqlx=warn".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let out = moviestats::cli::run(cli.command, &config, db).await?;
    print!("{out}");

    Ok(())
}
