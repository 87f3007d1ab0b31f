use crate::backoff::Backoff;
use crate::mru::RecencyList;
use crate::pause::{PauseSignal, PAUSE_MAX_AGE};
use crate::state_store::StateStore;
use crate::tree::TreeNode;
use anyhow::{Context, Result};
use futures_lite::stream::StreamExt;
use std::time::Duration;
use swayipc_async::{Connection, Error as SwayError, Event, EventType, WindowChange};
use tracing::{debug, info, warn};

/// The parts of a Sway event the tracker acts on
#[derive(Debug, Clone, PartialEq)]
pub enum TrackedEvent {
    /// A container received focus
    Focus(TreeNode),
    /// Sway is exiting
    Shutdown,
    /// Anything else delivered on the subscription
    Other,
}

impl From<Event> for TrackedEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Window(e) if e.change == WindowChange::Focus => {
                TrackedEvent::Focus(TreeNode::from(&e.container))
            }
            Event::Shutdown(_) => TrackedEvent::Shutdown,
            _ => TrackedEvent::Other,
        }
    }
}

/// Whether the event loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Shutdown,
}

/// Applies focus events to the recency list and persists it.
pub struct Tracker {
    mru: RecencyList,
    store: StateStore,
    pause: PauseSignal,
    pause_max_age: Duration,
}

impl Tracker {
    /// Create a tracker seeded from whatever `store` currently holds
    pub fn new(store: StateStore, pause: PauseSignal) -> Self {
        let mru = store.load();
        info!(
            entries = mru.len(),
            path = %store.path().display(),
            "Loaded recency list"
        );

        Tracker {
            mru,
            store,
            pause,
            pause_max_age: PAUSE_MAX_AGE,
        }
    }

    pub fn mru(&self) -> &RecencyList {
        &self.mru
    }

    pub fn handle(&mut self, event: TrackedEvent) -> Flow {
        match event {
            TrackedEvent::Shutdown => {
                info!("Sway is shutting down");
                Flow::Shutdown
            }
            TrackedEvent::Focus(container) => {
                self.on_focus(&container);
                Flow::Continue
            }
            TrackedEvent::Other => Flow::Continue,
        }
    }

    fn on_focus(&mut self, container: &TreeNode) {
        if self.pause.is_active(self.pause_max_age) {
            debug!(id = container.id, "Cycle in progress, ignoring focus");
            return;
        }

        if !container.is_eligible() {
            debug!(id = container.id, "Focused container is not a window");
            return;
        }

        if !self.mru.focus(container.id) {
            return;
        }
        debug!(id = container.id, entries = self.mru.len(), "Window moved to front");

        if let Err(e) = self.store.save(&self.mru) {
            warn!(error = %e, "Failed to persist recency list");
        }
    }
}

/// What to do with one item read from the event subscription
#[derive(Debug)]
enum Step {
    Handle(TrackedEvent),
    /// A record that could not be decoded; the stream itself is fine
    Skip,
    /// The connection is broken
    Reconnect(SwayError),
}

fn classify(item: Result<Event, SwayError>) -> Step {
    match item {
        Ok(event) => Step::Handle(TrackedEvent::from(event)),
        Err(SwayError::SerdeJson(e)) => {
            debug!(error = %e, "Skipping malformed event");
            Step::Skip
        }
        Err(SwayError::UnimplementedEvent(event_type, _)) => {
            debug!(event_type, "Skipping unknown event type");
            Step::Skip
        }
        Err(e) => Step::Reconnect(e),
    }
}

/// How a single subscription ended without an error
enum StreamEnd {
    Shutdown,
    Closed,
}

/// Long-running focus tracker with reconnect.
pub struct Daemon {
    tracker: Tracker,
}

impl Daemon {
    pub fn new(store: StateStore, pause: PauseSignal) -> Self {
        Daemon {
            tracker: Tracker::new(store, pause),
        }
    }

    /// Main event loop; returns once Sway announces shutdown
    pub async fn run(mut self) -> Result<()> {
        info!("Starting daemon event loop");
        let mut backoff = Backoff::new();

        loop {
            match self.stream_events().await {
                Ok(StreamEnd::Shutdown) => return Ok(()),
                Ok(StreamEnd::Closed) => warn!("Sway event stream closed"),
                Err(e) => warn!(error = %e, "Sway event stream failed"),
            }

            let delay = backoff.next_delay();
            info!(delay_ms = delay.as_millis() as u64, "Reconnecting to Sway");
            tokio::time::sleep(delay).await;
        }
    }

    /// Subscribe and feed events to the tracker until the stream ends.
    ///
    /// The subscription connection is dropped on every return path.
    async fn stream_events(&mut self) -> Result<StreamEnd> {
        let subs = [EventType::Window, EventType::Shutdown];
        let mut events = Connection::new()
            .await
            .context("Failed to connect to Sway IPC socket")?
            .subscribe(&subs)
            .await
            .context("Failed to subscribe to Sway events")?;

        info!("Subscribed to Sway window and shutdown events");

        while let Some(item) = events.next().await {
            match classify(item) {
                Step::Handle(event) => {
                    if self.tracker.handle(event) == Flow::Shutdown {
                        return Ok(StreamEnd::Shutdown);
                    }
                }
                Step::Skip => continue,
                Step::Reconnect(e) => return Err(e).context("Failed to read Sway event"),
            }
        }

        Ok(StreamEnd::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mru::MAX_ENTRIES;
    use crate::tree::fixtures::{split, window};
    use serde_json::json;
    use std::fs;
    use std::io;
    use std::time::SystemTime;
    use swayipc_async::WindowEvent;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        tracker: Tracker,
        store_path: std::path::PathBuf,
        pause_path: std::path::PathBuf,
    }

    fn fixture_with(initial: Option<&str>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("sway_mru.json");
        let pause_path = dir.path().join("sway_mru_pause");
        if let Some(contents) = initial {
            fs::write(&store_path, contents).unwrap();
        }
        let tracker = Tracker::new(
            StateStore::new(&store_path),
            PauseSignal::new(&pause_path),
        );
        Fixture {
            _dir: dir,
            tracker,
            store_path,
            pause_path,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(None)
    }

    fn focus(fx: &mut Fixture, id: i64) -> Flow {
        fx.tracker.handle(TrackedEvent::Focus(window(id)))
    }

    fn stored(fx: &Fixture) -> RecencyList {
        StateStore::new(&fx.store_path).load()
    }

    fn age_pause_marker(fx: &Fixture, age: Duration) {
        let file = fs::File::options().write(true).open(&fx.pause_path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_focus_events_build_mru_order() {
        let mut fx = fixture();
        for id in [1, 2, 3, 2] {
            assert_eq!(focus(&mut fx, id), Flow::Continue);
        }

        assert_eq!(fx.tracker.mru().ids(), &[2, 3, 1]);
        assert_eq!(stored(&fx).ids(), &[2, 3, 1]);
    }

    #[test]
    fn test_loads_existing_state() {
        let mut fx = fixture_with(Some("[7,8]"));
        assert_eq!(fx.tracker.mru().ids(), &[7, 8]);

        focus(&mut fx, 8);
        assert_eq!(stored(&fx).ids(), &[8, 7]);
    }

    #[test]
    fn test_corrupt_state_starts_empty() {
        let mut fx = fixture_with(Some("[[[oops"));
        assert!(fx.tracker.mru().is_empty());

        focus(&mut fx, 4);
        assert_eq!(stored(&fx).ids(), &[4]);
    }

    #[test]
    fn test_repeated_focus_is_idempotent() {
        let mut fx = fixture();
        focus(&mut fx, 1);
        focus(&mut fx, 5);
        let once = fx.tracker.mru().clone();

        for _ in 0..5 {
            focus(&mut fx, 5);
        }
        assert_eq!(fx.tracker.mru(), &once);
    }

    #[test]
    fn test_list_is_bounded() {
        let mut fx = fixture();
        for id in 0..(MAX_ENTRIES as i64 + 3) {
            focus(&mut fx, id);
        }
        assert_eq!(fx.tracker.mru().len(), MAX_ENTRIES);
        assert_eq!(stored(&fx).len(), MAX_ENTRIES);
    }

    #[test]
    fn test_containers_are_ignored() {
        let mut fx = fixture();
        fx.tracker
            .handle(TrackedEvent::Focus(split(12, vec![window(13)])));
        assert!(fx.tracker.mru().is_empty());
        assert!(!fx.store_path.exists());
    }

    #[test]
    fn test_other_events_are_ignored() {
        let mut fx = fixture();
        assert_eq!(fx.tracker.handle(TrackedEvent::Other), Flow::Continue);
        assert!(fx.tracker.mru().is_empty());
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let mut fx = fixture();
        assert_eq!(fx.tracker.handle(TrackedEvent::Shutdown), Flow::Shutdown);
    }

    #[test]
    fn test_pause_suppresses_then_expires() {
        let mut fx = fixture();
        focus(&mut fx, 1);

        PauseSignal::new(&fx.pause_path).raise();
        focus(&mut fx, 2);
        focus(&mut fx, 3);
        assert_eq!(fx.tracker.mru().ids(), &[1]);
        assert_eq!(stored(&fx).ids(), &[1]);

        age_pause_marker(&fx, Duration::from_secs(3));
        focus(&mut fx, 3);
        assert_eq!(fx.tracker.mru().ids(), &[3, 1]);
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let mut tracker = Tracker::new(
            StateStore::new(dir.path().join("missing").join("sway_mru.json")),
            PauseSignal::new(dir.path().join("sway_mru_pause")),
        );

        tracker.handle(TrackedEvent::Focus(window(1)));
        tracker.handle(TrackedEvent::Focus(window(2)));

        assert_eq!(tracker.mru().ids(), &[2, 1]);
    }

    fn rect() -> serde_json::Value {
        json!({ "x": 0, "y": 0, "width": 800, "height": 600 })
    }

    fn container_json(id: i64, app_id: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "name": "term",
            "type": "con",
            "border": "pixel",
            "current_border_width": 2,
            "layout": "none",
            "percent": 1.0,
            "rect": rect(),
            "window_rect": rect(),
            "deco_rect": rect(),
            "geometry": rect(),
            "urgent": false,
            "focused": true,
            "focus": [],
            "nodes": [],
            "floating_nodes": [],
            "sticky": false,
            "app_id": app_id,
        })
    }

    fn window_event(change: &str, id: i64, app_id: Option<&str>) -> Event {
        let event: WindowEvent = serde_json::from_value(json!({
            "change": change,
            "container": container_json(id, app_id),
        }))
        .unwrap();
        Event::Window(Box::new(event))
    }

    #[test]
    fn test_window_focus_event_is_tracked() {
        match TrackedEvent::from(window_event("focus", 42, Some("foot"))) {
            TrackedEvent::Focus(container) => {
                assert_eq!(container.id, 42);
                assert!(container.is_eligible());
            }
            other => panic!("expected focus, got {:?}", other),
        }
    }

    #[test]
    fn test_other_window_changes_are_not_focus() {
        for change in ["title", "new", "close", "move"] {
            assert_eq!(
                TrackedEvent::from(window_event(change, 42, Some("foot"))),
                TrackedEvent::Other,
                "change {:?}",
                change
            );
        }
    }

    #[test]
    fn test_title_event_leaves_list_unchanged() {
        let mut fx = fixture();
        focus(&mut fx, 1);

        let event = TrackedEvent::from(window_event("title", 2, Some("foot")));
        fx.tracker.handle(event);

        assert_eq!(fx.tracker.mru().ids(), &[1]);
    }

    #[test]
    fn test_focus_event_without_window_handle_is_ignored() {
        let mut fx = fixture();
        focus(&mut fx, 1);

        let event = TrackedEvent::from(window_event("focus", 12, None));
        assert!(matches!(event, TrackedEvent::Focus(_)));
        fx.tracker.handle(event);

        assert_eq!(fx.tracker.mru().ids(), &[1]);
    }

    #[test]
    fn test_classify_passes_events_through() {
        let step = classify(Ok(window_event("focus", 7, Some("foot"))));
        assert!(matches!(step, Step::Handle(TrackedEvent::Focus(ref c)) if c.id == 7));
    }

    #[test]
    fn test_classify_skips_malformed_records() {
        let bad_json = serde_json::from_str::<WindowEvent>("{not json").unwrap_err();
        assert!(matches!(classify(Err(SwayError::SerdeJson(bad_json))), Step::Skip));

        let unknown = SwayError::UnimplementedEvent(0x8000_00ff, b"{}".to_vec());
        assert!(matches!(classify(Err(unknown)), Step::Skip));
    }

    #[test]
    fn test_classify_reconnects_on_transport_errors() {
        let eof = SwayError::Io(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(classify(Err(eof)), Step::Reconnect(_)));

        let magic = SwayError::InvalidMagic(*b"garbag");
        assert!(matches!(classify(Err(magic)), Step::Reconnect(_)));
    }
}
