//! # Events Module
//!
//! Progress reporting for the organize and deduplicate batches.
//!
//! ## Design
//! Batch operations report through a [`ProgressSink`]. The simplest sink is
//! a closure that receives one human-readable line per call. UIs that run
//! the batch on a worker thread use an [`EventChannel`] and receive typed
//! [`Event`]s instead.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         println!("{}", event);
//!     }
//! });
//!
//! let mut sender = sender;
//! organizer.run(root, &mut sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, ProgressSink};
pub use types::*;
