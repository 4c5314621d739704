//! # Events Module
//!
//! Progress notifications emitted by the pipeline.
//!
//! ## Design
//! The core library emits events through channels, so the CLI (or any other
//! front end) can subscribe and display progress without the core knowing
//! how it is rendered.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Collect(CollectEvent::Progress(p)) = event {
//!             println!("Processed approximately {} unique hashes", p.unique_fingerprints);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
