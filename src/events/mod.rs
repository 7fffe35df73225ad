//! Game events, sound cues, and observers.
//!
//! The engine announces what happens; it never renders or plays anything.
//! Hosts subscribe with a [`GameObserver`] or drain the controller's
//! [`EventLog`], and map each event's [`SoundCue`] to real audio.

mod event;
mod observer;

pub use event::{GameEvent, SoundCue};
pub use observer::{EventLog, GameObserver};
