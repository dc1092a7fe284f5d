//! The station event loop: one consumer, one engine.

use std::path::PathBuf;

use tokio::sync::mpsc;

use stocktake_core::CodeSource;
use stocktake_events::{EventBus, Subscription};
use stocktake_infra::{BaselineSource, DurableStore, ReconciliationEngine};
use stocktake_inventory::InventorySnapshot;

use crate::console::{HELP, StationCommand};
use crate::decoder::DecodeEvent;
use crate::notice::Notice;
use crate::render::{render_summary, render_table};

/// Everything the station reacts to, serialized onto one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationEvent {
    Decoded(DecodeEvent),
    /// One console line.
    Input(String),
    InputClosed,
    DecoderClosed,
    /// The decoder feed could not be opened.
    DecoderUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Notice(Notice),
    Text(String),
}

/// What handling one event produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub output: Vec<Output>,
    pub quit: bool,
}

impl Reply {
    fn notice(notice: Notice) -> Self {
        Self {
            output: vec![Output::Notice(notice)],
            quit: false,
        }
    }

    fn text(text: impl Into<String>) -> Self {
        Self {
            output: vec![Output::Text(text.into())],
            quit: false,
        }
    }

    fn quit(notice: Notice) -> Self {
        Self {
            output: vec![Output::Notice(notice)],
            quit: true,
        }
    }
}

pub struct Station<S, B> {
    engine: ReconciliationEngine<S, B>,
    baseline: Option<Box<dyn BaselineSource>>,
    export_path: PathBuf,
    snapshots: Subscription<InventorySnapshot>,
}

impl<S, B> Station<S, B>
where
    S: DurableStore,
    B: EventBus<InventorySnapshot>,
{
    pub fn new(
        engine: ReconciliationEngine<S, B>,
        baseline: Option<Box<dyn BaselineSource>>,
        export_path: impl Into<PathBuf>,
    ) -> Self {
        let snapshots = engine.bus().subscribe();
        Self {
            engine,
            baseline,
            export_path: export_path.into(),
            snapshots,
        }
    }

    pub fn engine(&self) -> &ReconciliationEngine<S, B> {
        &self.engine
    }

    /// Restore or import the inventory. Must complete before events are consumed.
    pub async fn start(&mut self) -> Reply {
        let report = self.engine.start(self.baseline.as_deref()).await;
        let mut reply = Reply::notice(Notice::for_startup(&report));
        self.push_status(&mut reply);
        reply
    }

    pub async fn handle(&mut self, event: StationEvent) -> Reply {
        let mut reply = match event {
            StationEvent::Decoded(read) => self.record(&read.decoded_text, CodeSource::Decoder).await,
            StationEvent::Input(line) => self.command(StationCommand::parse(&line)).await,
            StationEvent::InputClosed => Reply::quit(Notice::info("console closed")),
            StationEvent::DecoderClosed => {
                Reply::notice(Notice::warning("decoder feed ended; manual entry only"))
            }
            StationEvent::DecoderUnavailable(reason) => {
                Reply::notice(Notice::warning(format!("decoder unavailable ({reason}); manual entry only")))
            }
        };
        self.push_status(&mut reply);
        reply
    }

    async fn command(&mut self, command: StationCommand) -> Reply {
        match command {
            StationCommand::Manual(raw) => self.record(&raw, CodeSource::Manual).await,
            StationCommand::Scan(raw) => self.record(&raw, CodeSource::Decoder).await,
            StationCommand::List => Reply::text(render_table(&self.engine.snapshot())),
            StationCommand::Summary => Reply::text(render_summary(&self.engine.snapshot().summary())),
            StationCommand::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                match self.engine.export_file(&path) {
                    Ok(rows) => Reply::notice(Notice::success(format!("exported {rows} rows to {}", path.display()))),
                    Err(err) => Reply::notice(Notice::for_error(&err)),
                }
            }
            StationCommand::Reset { confirmed: false } => Reply::notice(Notice::warning(
                "reset discards all progress; type ':reset yes' to confirm",
            )),
            StationCommand::Reset { confirmed: true } => match self.engine.reset(self.baseline.as_deref()).await {
                Ok(report) => Reply::notice(Notice::for_baseline(&report.baseline)),
                Err(err) => Reply::notice(Notice::for_error(&err)),
            },
            StationCommand::Help => Reply::text(HELP),
            StationCommand::Quit => Reply::quit(Notice::info("bye")),
            StationCommand::Unknown(line) => Reply::notice(Notice::error(format!("unknown command '{line}'; try :help"))),
        }
    }

    async fn record(&mut self, raw: &str, source: CodeSource) -> Reply {
        match self.engine.process_code(raw, source).await {
            Ok(Some(outcome)) => Reply::notice(Notice::for_outcome(&outcome)),
            Ok(None) => Reply::default(),
            Err(err) => Reply::notice(Notice::for_error(&err)),
        }
    }

    /// Append the running counts when the inventory changed.
    fn push_status(&self, reply: &mut Reply) {
        if let Some(snapshot) = self.snapshots.drain_latest() {
            reply.output.push(Output::Text(render_summary(&snapshot.summary())));
        }
    }
}

/// Consume events until the queue closes or a reply asks to quit.
pub async fn run<S, B, F>(station: &mut Station<S, B>, rx: &mut mpsc::Receiver<StationEvent>, mut emit: F)
where
    S: DurableStore,
    B: EventBus<InventorySnapshot>,
    F: FnMut(&Output),
{
    while let Some(event) = rx.recv().await {
        let reply = station.handle(event).await;
        reply.output.iter().for_each(&mut emit);
        if reply.quit {
            break;
        }
    }
}
