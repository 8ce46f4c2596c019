//! Platform-agnostic audio resource trait
//!
//! Abstracts the engine that actually renders a track (an HTML media element,
//! a CPAL output stream, a remote renderer...). The controller only sequences
//! and commands resources; it never decodes audio itself.

use std::time::Duration;

/// Asynchronous signals an audio resource can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceEventKind {
    /// Loading or rendering failed; the resource is now unusable
    Error,
    /// Playback reached the end of the track
    Ended,
}

/// Handle returned by [`AudioResource::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked by a resource when it raises an event
pub type ResourceListener = Box<dyn FnMut() + Send>;

/// A single playable audio resource bound to one source locator
///
/// Implementors own the real playback engine. All commands are
/// fire-and-forget: `play` must not block until audio is audible.
/// Errors and end-of-track are reported later through subscribed listeners.
pub trait AudioResource: Send {
    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Current volume (0.0-1.0)
    fn volume(&self) -> f32;

    /// Set volume (0.0-1.0)
    fn set_volume(&mut self, volume: f32);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Move the playback position
    fn set_position(&mut self, position: Duration);

    /// Total track duration (zero while unknown)
    fn duration(&self) -> Duration;

    /// Whether the resource is in an error state
    fn is_errored(&self) -> bool;

    /// Register a listener for one kind of event
    fn subscribe(&mut self, kind: ResourceEventKind, listener: ResourceListener)
        -> SubscriptionId;

    /// Remove a listener registered with [`subscribe`](Self::subscribe)
    ///
    /// Once this returns, the listener must never be invoked again.
    fn unsubscribe(&mut self, kind: ResourceEventKind, id: SubscriptionId);
}

/// Creates audio resources for source locators
///
/// Any `FnMut(&str) -> Box<dyn AudioResource> + Send` closure is a factory.
pub trait ResourceFactory: Send {
    /// Build a resource bound to `source`
    ///
    /// Construction failures are reported through the resource's
    /// error state and `Error` event, not here.
    fn create(&mut self, source: &str) -> Box<dyn AudioResource>;
}

impl<F> ResourceFactory for F
where
    F: FnMut(&str) -> Box<dyn AudioResource> + Send,
{
    fn create(&mut self, source: &str) -> Box<dyn AudioResource> {
        self(source)
    }
}
