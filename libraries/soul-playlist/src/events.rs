//! Playlist Events
//!
//! Notifications fired by the controller for every mutation and transport
//! change. Observers register callbacks on an [`EventEmitter`], either for a
//! single [`EventKind`] or for all of them. Delivery is synchronous and
//! follows emission order.

use crate::types::PlaylistItem;
use serde::{Deserialize, Serialize};

/// Events emitted by the playlist controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaylistEvent {
    /// Item appended to the playlist
    Add(PlaylistItem),

    /// Item removed from the playlist
    Remove(PlaylistItem),

    /// Audio resource rebuilt for a new target
    Change,

    /// Playback started or resumed
    Play(PlaylistItem),

    /// Playback paused
    Pause(Option<PlaylistItem>),

    /// Playback stopped and rewound
    Stop(Option<PlaylistItem>),

    /// Moving forward; carries the item at the target position, if any
    Next(Option<PlaylistItem>),

    /// Moving backward; carries the item at the target position, if any
    Previous(Option<PlaylistItem>),

    /// Volume changed
    Volume {
        /// Current item
        item: Option<PlaylistItem>,
        /// New volume level (0.0-1.0)
        volume: f32,
    },

    /// The audio resource reported an error
    Error(Option<PlaylistItem>),

    /// The audio resource reached the end of its track
    Ended(Option<PlaylistItem>),
}

/// Names of the playlist events, used to register listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Add,
    Remove,
    Change,
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    Volume,
    Error,
    Ended,
}

impl PlaylistEvent {
    /// Kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            PlaylistEvent::Add(_) => EventKind::Add,
            PlaylistEvent::Remove(_) => EventKind::Remove,
            PlaylistEvent::Change => EventKind::Change,
            PlaylistEvent::Play(_) => EventKind::Play,
            PlaylistEvent::Pause(_) => EventKind::Pause,
            PlaylistEvent::Stop(_) => EventKind::Stop,
            PlaylistEvent::Next(_) => EventKind::Next,
            PlaylistEvent::Previous(_) => EventKind::Previous,
            PlaylistEvent::Volume { .. } => EventKind::Volume,
            PlaylistEvent::Error(_) => EventKind::Error,
            PlaylistEvent::Ended(_) => EventKind::Ended,
        }
    }

    /// Item carried by the event, if any
    pub fn item(&self) -> Option<&PlaylistItem> {
        match self {
            PlaylistEvent::Add(item) | PlaylistEvent::Remove(item) | PlaylistEvent::Play(item) => {
                Some(item)
            }
            PlaylistEvent::Pause(item)
            | PlaylistEvent::Stop(item)
            | PlaylistEvent::Next(item)
            | PlaylistEvent::Previous(item)
            | PlaylistEvent::Error(item)
            | PlaylistEvent::Ended(item)
            | PlaylistEvent::Volume { item, .. } => item.as_ref(),
            PlaylistEvent::Change => None,
        }
    }
}

/// Handle returned by [`EventEmitter::on`], used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(&PlaylistEvent) + Send>;

struct Listener {
    id: ListenerId,
    /// `None` listens to every kind
    kind: Option<EventKind>,
    handler: Handler,
}

impl Listener {
    fn accepts(&self, kind: EventKind) -> bool {
        match self.kind {
            Some(k) => k == kind,
            None => true,
        }
    }
}

/// Typed event emitter
///
/// Any number of listeners per kind. Listeners run in registration order.
#[derive(Default)]
pub struct EventEmitter {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl EventEmitter {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one kind of event
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> ListenerId
    where
        F: FnMut(&PlaylistEvent) + Send + 'static,
    {
        self.register(Some(kind), Box::new(handler))
    }

    /// Register a listener for every event
    pub fn on_all<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&PlaylistEvent) + Send + 'static,
    {
        self.register(None, Box::new(handler))
    }

    /// Unregister a listener
    ///
    /// Returns false if the id was unknown (already removed).
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    /// Number of listeners that would receive an event of this kind
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.accepts(kind))
            .count()
    }

    /// Deliver an event to every matching listener
    pub fn emit(&mut self, event: &PlaylistEvent) {
        let kind = event.kind();
        for listener in &mut self.listeners {
            if listener.accepts(kind) {
                (listener.handler)(event);
            }
        }
    }

    fn register(&mut self, kind: Option<EventKind>, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, kind, handler });
        id
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
