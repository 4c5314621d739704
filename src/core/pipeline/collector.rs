//! The single consumer of the result channel.
//!
//! The collector thread is the only code that ever mutates the
//! [`DuplicateIndex`]. Workers send it [`FileOutcome`]s; it folds them in
//! arrival order and hands the finished index back through its join handle.

use std::thread;

use crossbeam_channel::Receiver;
use tracing::info;

use crate::core::index::DuplicateIndex;
use crate::core::scanner::{FileOutcome, SkipSummary};
use crate::events::{CollectEvent, CollectProgress, Event, EventSender};

/// Everything the collector owned, returned once the result channel closes
#[derive(Debug, Default)]
pub struct CollectorOutput {
    pub index: DuplicateIndex,
    pub skipped: SkipSummary,
    pub files_processed: usize,
}

/// Folds outcomes into the index and emits periodic progress.
pub struct Collector {
    output: CollectorOutput,
    progress_interval: usize,
    events: EventSender,
}

impl Collector {
    /// `progress_interval == 0` disables progress notifications.
    pub fn new(progress_interval: usize, events: EventSender) -> Self {
        Self {
            output: CollectorOutput::default(),
            progress_interval,
            events,
        }
    }

    pub fn accept(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Hashed(record) => {
                self.output.index.insert(record);
                self.output.files_processed += 1;

                if self.progress_interval > 0
                    && self.output.files_processed % self.progress_interval == 0
                {
                    let unique = self.output.index.len();
                    info!("Processed approximately {} unique hashes", unique);
                    self.events
                        .send(Event::Collect(CollectEvent::Progress(CollectProgress {
                            files_processed: self.output.files_processed,
                            unique_fingerprints: unique,
                        })));
                }
            }
            FileOutcome::Skipped(skipped) => self.output.skipped.record(skipped),
        }
    }

    /// Emit the completion notification and give up ownership of the index.
    pub fn finish(self) -> CollectorOutput {
        info!("Processed {} files", self.output.files_processed);
        self.events.send(Event::Collect(CollectEvent::Completed {
            files_processed: self.output.files_processed,
        }));
        self.output
    }

    /// Drain `rx` until every sender is gone.
    pub fn run(mut self, rx: Receiver<FileOutcome>) -> CollectorOutput {
        for outcome in rx {
            self.accept(outcome);
        }
        self.finish()
    }
}

/// Run a [`Collector`] on its own thread.
///
/// Joining the handle is the completion signal: it returns only after the
/// result channel has closed and been drained.
pub fn spawn_collector(
    rx: Receiver<FileOutcome>,
    progress_interval: usize,
    events: EventSender,
) -> thread::JoinHandle<CollectorOutput> {
    thread::spawn(move || Collector::new(progress_interval, events).run(rx))
}
