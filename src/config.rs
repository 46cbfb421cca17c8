use std::path::PathBuf;

use url::Url;

/// Runtime configuration for the restore pipeline.
///
/// Built once at startup and passed by reference into every stage; no stage
/// reads the process environment directly.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "restorectl")]
#[command(version)]
#[command(about = "Restores the backup_restore challenge dump and submits the surviving SSNs")]
pub struct Config {
    /// Base URL of the challenge service
    ///
    /// Can also be set via the BASE_URL environment variable
    #[arg(long, env = "BASE_URL", value_parser = clap::value_parser!(Url))]
    pub base_url: Url,

    /// Access token sent as a query parameter on every service request
    ///
    /// Can also be set via the ACCESS_TOKEN environment variable
    #[arg(long, env = "ACCESS_TOKEN")]
    pub access_token: String,

    /// PostgreSQL connection URL used for both the restore and the query
    ///
    /// Format: postgresql://[user]:[password]@[host]:[port]/[database]
    /// Can also be set via the DATABASE_URL environment variable
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Path to the psql binary used to execute the restored dump
    ///
    /// Can also be set via the PSQL_BIN environment variable
    #[arg(long, env = "PSQL_BIN", default_value = "psql")]
    pub psql_bin: PathBuf,
}
