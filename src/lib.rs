//! Pipeline for the `backup_restore` challenge: fetch a compressed database
//! dump, restore it through `psql`, query the surviving records, and submit
//! the answer back to the challenge service.

pub mod client;
pub mod config;
pub mod dump;
pub mod logging;
pub mod pipeline;
pub mod records;
pub mod restore;

pub use self::{
    client::ChallengeClient,
    config::Config,
    pipeline::Error,
    restore::{PsqlRestorer, SqlRestorer},
};
