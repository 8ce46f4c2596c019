//! Playlist controller - core state machine
//!
//! Owns the ordered playlist, the current index and the single live audio
//! resource. Every mutation and transport command runs to completion
//! synchronously; the only asynchrony is the error/ended signals raised by
//! the resource, which are queued and dispatched by [`PlaylistController::process_events`].

use crate::{
    error::{PlaylistError, Result},
    events::{EventEmitter, PlaylistEvent},
    resource::{AudioResource, ResourceEventKind, ResourceFactory, SubscriptionId},
    types::{clamp_unit, ControllerConfig, PlaylistItem},
};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Signal posted by a resource listener, tagged with the resource generation
#[derive(Debug, Clone, Copy)]
struct ResourceSignal {
    generation: u64,
    kind: ResourceEventKind,
}

/// The live audio resource together with the listeners attached to it
struct ActiveResource {
    resource: Box<dyn AudioResource>,
    source: String,
    generation: u64,
    subscriptions: Vec<(ResourceEventKind, SubscriptionId)>,
}

/// Sequential playlist controller
///
/// Drives at most one [`AudioResource`] at a time through play, pause, stop,
/// seek and volume, and advances automatically when a track ends (in
/// continuous mode). Observers are notified through [`EventEmitter`].
///
/// Resource listeners never touch controller state directly. They post a
/// signal to an internal channel; the host calls [`process_events`](Self::process_events)
/// on its own thread to react. Signals from a resource that has since been
/// torn down are discarded.
pub struct PlaylistController {
    // Playlist
    items: Vec<PlaylistItem>,
    current: Option<usize>,

    // Settings
    continuous: bool,
    volume: f32,

    // Audio resource
    factory: Box<dyn ResourceFactory>,
    active: Option<ActiveResource>,
    generation: u64,
    signal_tx: Sender<ResourceSignal>,
    signal_rx: Receiver<ResourceSignal>,

    // Observers
    events: EventEmitter,
}

impl PlaylistController {
    /// Create a controller with an empty playlist
    pub fn new(config: ControllerConfig, factory: impl ResourceFactory + 'static) -> Self {
        let config = config.normalized();
        let (signal_tx, signal_rx) = mpsc::channel();

        Self {
            items: Vec::new(),
            current: None,
            continuous: config.continuous,
            volume: config.volume,
            factory: Box::new(factory),
            active: None,
            generation: 0,
            signal_tx,
            signal_rx,
            events: EventEmitter::new(),
        }
    }

    // ===== Playlist Management =====

    /// Append an item to the playlist
    ///
    /// Returns the new item's index. Items without a source are rejected and
    /// leave the playlist untouched.
    pub fn add(&mut self, item: PlaylistItem) -> Result<usize> {
        if !item.is_playable() {
            trace!("Rejected playlist item without source");
            return Err(PlaylistError::InvalidItem(
                "source must be a non-empty string".to_string(),
            ));
        }

        self.items.push(item.clone());
        let index = self.items.len() - 1;
        self.emit(PlaylistEvent::Add(item));
        Ok(index)
    }

    /// Append an item and immediately play it
    pub fn add_and_play(&mut self, item: PlaylistItem) -> Result<usize> {
        let index = self.add(item)?;
        self.play_index(index);
        Ok(index)
    }

    /// Remove the first item equal to `item`
    ///
    /// Removing the current item tears down its audio resource first. The
    /// current index keeps pointing at the same logical item when an earlier
    /// item is removed. Removing the current item when it is the last one
    /// selects the new last item, so a following `previous()` steps back
    /// from there.
    pub fn remove(&mut self, item: &PlaylistItem) -> Option<PlaylistItem> {
        let position = self.items.iter().position(|candidate| candidate == item)?;

        if self.current == Some(position) {
            self.kill();
        }

        let removed = self.items.remove(position);

        self.current = match self.current {
            _ if self.items.is_empty() => None,
            Some(current) if current > position => Some(current - 1),
            // The removed item was the last one and was current
            Some(current) if current >= self.items.len() => Some(self.items.len() - 1),
            other => other,
        };

        self.emit(PlaylistEvent::Remove(removed.clone()));
        Some(removed)
    }

    /// Remove every item, front to back, and reset the selection
    pub fn clear(&mut self) {
        while let Some(first) = self.items.first().cloned() {
            self.remove(&first);
        }
        self.current = None;
    }

    // ===== Index Resolution =====

    /// Resolve a requested index
    ///
    /// `None` means the current index. An unselected controller with a
    /// non-empty playlist resolves to the first item. The result is not
    /// bounds-checked.
    pub fn resolve_index(&self, requested: Option<usize>) -> Option<usize> {
        match requested.or(self.current) {
            Some(index) => Some(index),
            None if !self.items.is_empty() => Some(0),
            None => None,
        }
    }

    /// Item at the resolved index
    pub fn get_item(&self, requested: Option<usize>) -> Option<&PlaylistItem> {
        self.resolve_index(requested)
            .and_then(|index| self.items.get(index))
    }

    /// Item at the current (resolved) index
    pub fn current_item(&self) -> Option<&PlaylistItem> {
        self.get_item(None)
    }

    // ===== Playback Control =====

    /// Play or resume the current item
    ///
    /// Returns false when there is nothing to play.
    pub fn play(&mut self) -> bool {
        let target = self.resolve_index(None);
        self.play_resolved(target)
    }

    /// Play the item at `index`
    ///
    /// Returns false (and changes nothing) when `index` is out of range.
    pub fn play_index(&mut self, index: usize) -> bool {
        let target = self.resolve_index(Some(index));
        self.play_resolved(target)
    }

    fn play_resolved(&mut self, target: Option<usize>) -> bool {
        let Some(index) = target else {
            trace!("Nothing to play: no target");
            return false;
        };
        let Some(item) = self.items.get(index).filter(|item| item.is_playable()) else {
            trace!(index, "Nothing to play at index");
            return false;
        };
        let item = item.clone();

        // An errored resource is never resumed, even before its signal is processed
        let reusable = matches!(
            &self.active,
            Some(active) if active.source == item.source && !active.resource.is_errored()
        );
        let changed = self.current != Some(index) || !reusable;

        if changed {
            self.current = Some(index);
            self.release_audio();
            let active = self.create_audio(&item.source);
            self.active = Some(active);
            self.emit(PlaylistEvent::Change);
        }

        if let Some(active) = self.active.as_mut() {
            active.resource.play();
        }
        debug!(index, source = %item.source, changed, "Playing");
        self.emit(PlaylistEvent::Play(item));
        true
    }

    /// Pause playback
    pub fn pause(&mut self) {
        let Some(resource) = self.live_resource() else {
            trace!("Pause ignored: no playable resource");
            return;
        };
        resource.pause();

        let item = self.current_item().cloned();
        self.emit(PlaylistEvent::Pause(item));
    }

    /// Stop playback and rewind to the start of the track
    pub fn stop(&mut self) {
        let Some(resource) = self.live_resource() else {
            trace!("Stop ignored: no playable resource");
            return;
        };
        resource.set_position(Duration::ZERO);
        resource.pause();

        let item = self.current_item().cloned();
        self.emit(PlaylistEvent::Stop(item));
    }

    /// Skip to the next item
    ///
    /// Emits `Next` with the target item before attempting playback. Past the
    /// end of the playlist nothing plays and the current index stays put.
    /// Returns whether playback started.
    pub fn next(&mut self) -> bool {
        let target = self.current.map_or(0, |index| index + 1);

        self.stop();
        let item = self.get_item(Some(target)).cloned();
        self.emit(PlaylistEvent::Next(item));

        self.play_index(target)
    }

    /// Go back to the previous item
    ///
    /// From the first item the target is the unselected position, which
    /// resolves to the first item again. Returns whether playback started.
    pub fn previous(&mut self) -> bool {
        let target = match self.current {
            Some(0) => (!self.items.is_empty()).then_some(0),
            Some(index) => Some(index - 1),
            None => None,
        };

        self.stop();
        let item = target.and_then(|index| self.items.get(index)).cloned();
        self.emit(PlaylistEvent::Previous(item));

        self.play_resolved(target)
    }

    /// Tear down the active resource
    ///
    /// Stops it (emitting `Stop` unless it errored), detaches its listeners
    /// and releases it. No-op without an active resource.
    pub fn kill(&mut self) {
        if self.active.is_none() {
            return;
        }

        self.stop();

        if let Some(mut active) = self.active.take() {
            Self::destroy_audio(&mut active);
            debug!(source = %active.source, "Killed audio resource");
        }
    }

    // ===== Seek =====

    /// Seek to a fraction of the track (clamped to 0.0-1.0)
    pub fn seek(&mut self, percent: f32) {
        let Some(percent) = clamp_unit(percent) else {
            return;
        };
        let Some(resource) = self.live_resource() else {
            trace!("Seek ignored: no playable resource");
            return;
        };

        let position = resource.duration().mul_f32(percent);
        resource.set_position(position);
    }

    // ===== Volume =====

    /// Set volume (clamped to 0.0-1.0)
    ///
    /// Emits `Volume` only when the level actually changes, but always
    /// re-applies it to the active resource. Returns the resulting volume.
    pub fn set_volume(&mut self, value: f32) -> f32 {
        if let Some(volume) = clamp_unit(value) {
            if volume != self.volume {
                self.volume = volume;
                let item = self.current_item().cloned();
                self.emit(PlaylistEvent::Volume { item, volume });
            }
        }

        if let Some(active) = self.active.as_mut() {
            active.resource.set_volume(self.volume);
        }

        self.volume
    }

    /// Get current volume (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.volume
    }

    // ===== Continuous Mode =====

    /// Enable or disable auto-advance on track end
    pub fn set_continuous(&mut self, continuous: bool) {
        self.continuous = continuous;
    }

    /// Whether the controller auto-advances on track end
    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    // ===== Resource Events =====

    /// Dispatch the signals raised by the active resource since the last call
    ///
    /// Returns how many signals were acted upon. Signals from a resource that
    /// has already been torn down are dropped.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            if self.handle_signal(signal) {
                handled += 1;
            }
        }
        handled
    }

    fn handle_signal(&mut self, signal: ResourceSignal) -> bool {
        let live = self.active.as_ref().map(|active| active.generation);
        if live != Some(signal.generation) {
            trace!(
                generation = signal.generation,
                kind = ?signal.kind,
                "Dropping signal from released resource"
            );
            return false;
        }

        match signal.kind {
            ResourceEventKind::Error => self.on_audio_error(),
            ResourceEventKind::Ended => self.on_audio_ended(),
        }
        true
    }

    fn on_audio_error(&mut self) {
        if let Some(active) = self.active.as_ref() {
            warn!(source = %active.source, "Audio resource failed");
        }

        let item = self.current_item().cloned();
        self.emit(PlaylistEvent::Error(item));
        self.kill();
    }

    fn on_audio_ended(&mut self) {
        let item = self.current_item().cloned();
        self.emit(PlaylistEvent::Ended(item));

        if self.continuous {
            self.next();
        }
    }

    // ===== Resource Lifecycle =====

    fn create_audio(&mut self, source: &str) -> ActiveResource {
        self.generation += 1;
        let generation = self.generation;

        let mut resource = self.factory.create(source);
        resource.set_volume(self.volume);

        let subscriptions = [ResourceEventKind::Error, ResourceEventKind::Ended]
            .into_iter()
            .map(|kind| {
                let tx = self.signal_tx.clone();
                let id = resource.subscribe(
                    kind,
                    Box::new(move || {
                        // Receiver only disappears with the controller
                        let _ = tx.send(ResourceSignal { generation, kind });
                    }),
                );
                (kind, id)
            })
            .collect();

        debug!(source, generation, "Created audio resource");

        ActiveResource {
            resource,
            source: source.to_string(),
            generation,
            subscriptions,
        }
    }

    /// Detach every listener the controller attached to `active`
    fn destroy_audio(active: &mut ActiveResource) {
        for (kind, id) in active.subscriptions.drain(..) {
            active.resource.unsubscribe(kind, id);
        }
    }

    /// Drop the active resource without notifying observers
    fn release_audio(&mut self) {
        if let Some(mut active) = self.active.take() {
            if !active.resource.is_errored() {
                active.resource.pause();
            }
            Self::destroy_audio(&mut active);
            trace!(source = %active.source, "Released audio resource");
        }
    }

    /// Active resource, unless it is absent or errored
    fn live_resource(&mut self) -> Option<&mut dyn AudioResource> {
        let active = self.active.as_mut()?;
        if active.resource.is_errored() {
            return None;
        }
        let resource: &mut dyn AudioResource = active.resource.as_mut();
        Some(resource)
    }

    // ===== State Queries =====

    /// All items, in playlist order
    pub fn items(&self) -> &[PlaylistItem] {
        &self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current index (`None` until something is selected)
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Whether an audio resource is live
    pub fn has_active_resource(&self) -> bool {
        self.active.is_some()
    }

    /// Source the live audio resource is bound to
    pub fn active_source(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.source.as_str())
    }

    /// Snapshot of the current settings
    pub fn config(&self) -> ControllerConfig {
        ControllerConfig {
            continuous: self.continuous,
            volume: self.volume,
        }
    }

    // ===== Observers =====

    /// Event emitter
    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Event emitter, for registering listeners
    pub fn events_mut(&mut self) -> &mut EventEmitter {
        &mut self.events
    }

    fn emit(&mut self, event: PlaylistEvent) {
        self.events.emit(&event);
    }
}

impl Drop for PlaylistController {
    fn drop(&mut self) {
        self.release_audio();
    }
}

impl std::fmt::Debug for PlaylistController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistController")
            .field("items", &self.items)
            .field("current", &self.current)
            .field("continuous", &self.continuous)
            .field("volume", &self.volume)
            .field("active_source", &self.active_source())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
