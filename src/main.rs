use clap::Parser as _;
use restorectl::{Config, PsqlRestorer, logging, pipeline};

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::parse();
    let restorer = PsqlRestorer::new(&config.psql_bin);

    let response = pipeline::run(&config, &restorer).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
