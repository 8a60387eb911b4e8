//! # Events Module
//!
//! Progress reporting over channels, so any consumer (CLI, GUI, tests) can
//! follow a running scan without the engine knowing who listens.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Match(MatchEvent::DuplicateFound { duplicate, .. }) = event {
//!             println!("duplicate: {}", duplicate.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
