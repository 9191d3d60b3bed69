//! # Events Module
//!
//! Event-driven progress reporting.
//!
//! ## Design
//! The core library emits events through channels, so any front end
//! (CLI, GUI, device-sync daemon) can subscribe and display progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Hash(HashEvent::Progress(p)) => println!("Hashed {}/{}", p.completed, p.total),
//!             Event::Dedup(DedupEvent::DuplicateRemoved { path, .. }) => println!("Removed {}", path.display()),
//!             _ => {}
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(files, &sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
