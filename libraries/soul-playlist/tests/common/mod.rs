//! Shared test helpers: a recording fake audio resource and a controller harness

#![allow(dead_code)]

use soul_playlist::{
    AudioResource, ControllerConfig, EventKind, PlaylistController, PlaylistEvent, PlaylistItem,
    ResourceEventKind, ResourceListener, SubscriptionId,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Commands received by a fake resource, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    SetVolume(f32),
    SetPosition(Duration),
}

struct FakeState {
    source: String,
    calls: Vec<Call>,
    volume: f32,
    position: Duration,
    duration: Duration,
    errored: bool,
    dropped: bool,
    listeners: Vec<(ResourceEventKind, SubscriptionId, ResourceListener)>,
    next_id: u64,
}

/// Resource handed to the controller
struct FakeResource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeResource {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

impl AudioResource for FakeResource {
    fn play(&mut self) {
        self.state().calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.state().calls.push(Call::Pause);
    }

    fn volume(&self) -> f32 {
        self.state().volume
    }

    fn set_volume(&mut self, volume: f32) {
        let mut state = self.state();
        state.volume = volume;
        state.calls.push(Call::SetVolume(volume));
    }

    fn position(&self) -> Duration {
        self.state().position
    }

    fn set_position(&mut self, position: Duration) {
        let mut state = self.state();
        state.position = position;
        state.calls.push(Call::SetPosition(position));
    }

    fn duration(&self) -> Duration {
        self.state().duration
    }

    fn is_errored(&self) -> bool {
        self.state().errored
    }

    fn subscribe(&mut self, kind: ResourceEventKind, listener: ResourceListener) -> SubscriptionId {
        let mut state = self.state();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((kind, id, listener));
        id
    }

    fn unsubscribe(&mut self, kind: ResourceEventKind, id: SubscriptionId) {
        self.state()
            .listeners
            .retain(|(k, existing, _)| !(*k == kind && *existing == id));
    }
}

impl Drop for FakeResource {
    fn drop(&mut self) {
        self.state().dropped = true;
    }
}

/// Test-side view of a resource the controller created
#[derive(Clone)]
pub struct ResourceHandle {
    state: Arc<Mutex<FakeState>>,
}

impl ResourceHandle {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn source(&self) -> String {
        self.state().source.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state().calls.iter().filter(|c| *c == call).count()
    }

    pub fn volume(&self) -> f32 {
        self.state().volume
    }

    pub fn position(&self) -> Duration {
        self.state().position
    }

    pub fn is_dropped(&self) -> bool {
        self.state().dropped
    }

    pub fn listener_count(&self) -> usize {
        self.state().listeners.len()
    }

    /// Raise an event the way the platform engine would
    pub fn fire(&self, kind: ResourceEventKind) {
        let mut state = self.state();
        for (k, _, listener) in state.listeners.iter_mut() {
            if *k == kind {
                listener();
            }
        }
    }

    /// Put the resource in its error state and raise `Error`
    pub fn fail(&self) {
        self.state().errored = true;
        self.fire(ResourceEventKind::Error);
    }
}

/// Track duration reported by every fake resource
pub const TRACK_DURATION: Duration = Duration::from_secs(200);

/// Controller wired to fake resources, recording every notification
pub struct Harness {
    pub controller: PlaylistController,
    resources: Arc<Mutex<Vec<ResourceHandle>>>,
    events: Arc<Mutex<Vec<PlaylistEvent>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        init_tracing();

        let resources = Arc::new(Mutex::new(Vec::new()));
        let created = Arc::clone(&resources);

        let factory = move |source: &str| -> Box<dyn AudioResource> {
            let state = Arc::new(Mutex::new(FakeState {
                source: source.to_string(),
                calls: Vec::new(),
                volume: 1.0,
                position: Duration::ZERO,
                duration: TRACK_DURATION,
                errored: false,
                dropped: false,
                listeners: Vec::new(),
                next_id: 0,
            }));
            created.lock().unwrap().push(ResourceHandle {
                state: Arc::clone(&state),
            });
            Box::new(FakeResource { state })
        };

        let mut controller = PlaylistController::new(config, factory);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        controller
            .events_mut()
            .on_all(move |event| sink.lock().unwrap().push(event.clone()));

        Self {
            controller,
            resources,
            events,
        }
    }

    /// Harness with items `a.mp3`, `b.mp3`, ... already added (events cleared)
    pub fn with_tracks(count: usize) -> Self {
        let mut harness = Self::new();
        for i in 0..count {
            harness.controller.add(track(i)).unwrap();
        }
        harness.take_events();
        harness
    }

    pub fn take_events(&self) -> Vec<PlaylistEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn take_kinds(&self) -> Vec<EventKind> {
        self.take_events().iter().map(PlaylistEvent::kind).collect()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.lock().unwrap().len()
    }

    pub fn resource(&self, n: usize) -> ResourceHandle {
        self.resources.lock().unwrap()[n].clone()
    }

    pub fn last_resource(&self) -> ResourceHandle {
        self.resources
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no resource created")
    }

    /// Resources created and not yet released
    pub fn live_resources(&self) -> usize {
        self.resources
            .lock()
            .unwrap()
            .iter()
            .filter(|handle| !handle.is_dropped())
            .count()
    }
}

/// Route controller logs to the test output (`RUST_LOG=soul_playlist=trace`)
fn init_tracing() {
    // Fails once a subscriber is installed, which is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Item `n`: `a.mp3`, `b.mp3`, ...
pub fn track(n: usize) -> PlaylistItem {
    let letter = char::from(b'a' + (n % 26) as u8);
    PlaylistItem::new(format!("{letter}.mp3")).with_metadata("title", format!("Track {n}"))
}
