//! biblink CLI: apply one change event to the catalog
//!
//! Reads a change-event JSON document, resolves the affected catalog records
//! and applies the derived links. Collaborator endpoints come from the
//! BIBLINK_* environment variables; without a real dead-letter queue wired
//! in, abandoned payloads are logged for manual replay.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use biblink_sync::{
    ApiRecordStore, ChangeEventHandler, LinkBuilder, LoggingDeadLetter, RecordSyncer,
    ReferenceResolver, RunOutcome, RunStatus, SruSearch, SyncConfig,
};

#[derive(Parser)]
#[command(name = "biblink", about = "Apply a content change event to the library catalog")]
struct Args {
    /// Path to the change-event JSON document
    #[arg(long)]
    event: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = SyncConfig::from_env()?;
    let event_body = std::fs::read_to_string(&args.event)?;

    let handler = ChangeEventHandler::new(
        ReferenceResolver::new(SruSearch::new(&config)),
        RecordSyncer::new(ApiRecordStore::new(&config)),
        LinkBuilder::new(&config),
        LoggingDeadLetter,
    );

    match handler.handle(&event_body).await? {
        RunOutcome::NothingToDo => {
            println!("event carries no linkable content");
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::NoReferenceFound => {
            println!("no catalog record found for the event's isbn; payload escalated");
            Ok(ExitCode::FAILURE)
        }
        RunOutcome::Completed(summary) => {
            println!("{}", summary.describe());
            match summary.status() {
                RunStatus::AllFailed => Ok(ExitCode::FAILURE),
                _ => Ok(ExitCode::SUCCESS),
            }
        }
    }
}
