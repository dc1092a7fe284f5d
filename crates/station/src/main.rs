//! Station entry point.

use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use stocktake_events::InMemoryEventBus;
use stocktake_infra::{DurableStore, InMemoryStore, ReconciliationEngine, SqliteStore, source_from_location};
use stocktake_inventory::InventorySnapshot;
use stocktake_station::station::run;
use stocktake_station::{Notice, Output, Station, StationConfig, StoreChoice, console, decoder};

const QUEUE_CAPACITY: usize = 256;

fn emit(output: &Output) {
    match output {
        Output::Notice(notice) => println!("{notice}"),
        Output::Text(text) => println!("{}", text.trim_end()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StationConfig::parse();
    stocktake_observability::init(config.log_format);

    let store: Arc<dyn DurableStore> = match config.store_choice()? {
        StoreChoice::Memory => {
            tracing::info!("using in-memory store");
            Arc::new(InMemoryStore::new())
        }
        StoreChoice::Sqlite(path) => {
            tracing::info!(path = %path.display(), "using sqlite store");
            Arc::new(SqliteStore::new(path))
        }
    };
    let bus = Arc::new(InMemoryEventBus::<InventorySnapshot>::new());
    let engine = ReconciliationEngine::new(store, bus);

    let baseline = match config.baseline.as_deref().map(source_from_location).transpose() {
        Ok(source) => source,
        Err(err) => {
            emit(&Output::Notice(Notice::warning(format!("baseline unavailable: {err}"))));
            None
        }
    };

    // Readers start before the import so input arriving meanwhile is queued.
    let (tx, mut rx) = mpsc::channel(QUEUE_CAPACITY);
    let _console = console::spawn_reader(std::io::BufReader::new(std::io::stdin()), tx.clone());
    if let Some(path) = &config.decoder_feed {
        let _decoder = decoder::open_feed(path, tx.clone());
    }
    drop(tx);

    let mut station = Station::new(engine, baseline, config.export_path.clone());
    station.start().await.output.iter().for_each(emit);
    emit(&Output::Text("type :help for commands".to_string()));

    run(&mut station, &mut rx, emit).await;
    tracing::info!("station stopped");
    Ok(())
}
