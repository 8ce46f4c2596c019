//! Soul Player - Playlist Control
//!
//! Sequential playlist controller for Soul Player.
//!
//! This crate provides:
//! - An ordered playlist of items identified by a source locator
//! - Play, pause, stop, next, previous, seek and volume control
//! - Automatic advance when a track ends (continuous mode)
//! - Typed notifications for every mutation and transport change
//!
//! # Architecture
//!
//! `soul-playlist` never decodes or renders audio. The platform supplies an
//! [`AudioResource`] per track through a [`ResourceFactory`]; the controller
//! keeps at most one of them alive, bound to the current item, and tears it
//! down whenever the target changes or the resource fails.
//!
//! Resources report errors and end-of-track asynchronously. Those signals are
//! queued and handled when the host calls
//! [`PlaylistController::process_events`], so a signal from a released
//! resource can never affect the next track.
//!
//! # Example
//!
//! ```rust
//! use soul_playlist::{
//!     AudioResource, ControllerConfig, EventKind, PlaylistController, PlaylistItem,
//!     ResourceEventKind, ResourceListener, SubscriptionId,
//! };
//! use std::time::Duration;
//!
//! // Platform resource (an output stream, a media element...)
//! struct Silence {
//!     volume: f32,
//!     position: Duration,
//! }
//!
//! impl AudioResource for Silence {
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn volume(&self) -> f32 { self.volume }
//!     fn set_volume(&mut self, volume: f32) { self.volume = volume; }
//!     fn position(&self) -> Duration { self.position }
//!     fn set_position(&mut self, position: Duration) { self.position = position; }
//!     fn duration(&self) -> Duration { Duration::from_secs(180) }
//!     fn is_errored(&self) -> bool { false }
//!     fn subscribe(&mut self, _kind: ResourceEventKind, _listener: ResourceListener) -> SubscriptionId {
//!         SubscriptionId(0)
//!     }
//!     fn unsubscribe(&mut self, _kind: ResourceEventKind, _id: SubscriptionId) {}
//! }
//!
//! let mut controller = PlaylistController::new(ControllerConfig::default(), |_source: &str| {
//!     Box::new(Silence { volume: 1.0, position: Duration::ZERO }) as Box<dyn AudioResource>
//! });
//!
//! controller.events_mut().on(EventKind::Play, |event| {
//!     println!("now playing {:?}", event.item());
//! });
//!
//! controller.add(PlaylistItem::new("/music/a.mp3")).unwrap();
//! controller.add_and_play(PlaylistItem::new("/music/b.mp3")).unwrap();
//! assert_eq!(controller.current_index(), Some(1));
//!
//! controller.set_volume(0.5);
//! controller.seek(0.5);
//! controller.pause();
//!
//! // From the host's event loop
//! controller.process_events();
//! ```

mod config;
mod controller;
mod error;
pub mod events;
mod resource;
pub mod types;

// Public exports
pub use config::ENV_PREFIX;
pub use controller::PlaylistController;
pub use error::{PlaylistError, Result};
pub use events::{EventEmitter, EventKind, ListenerId, PlaylistEvent};
pub use resource::{
    AudioResource, ResourceEventKind, ResourceFactory, ResourceListener, SubscriptionId,
};
pub use types::{ControllerConfig, PlaylistItem};
