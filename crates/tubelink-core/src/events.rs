//! Host-facing playback lifecycle events.
//!
//! The adapter publishes these on a broadcast channel. Delivery is
//! fire-and-forget: a subscriber attached after an event misses it, and
//! emitting with no subscribers at all is not an error.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Playback lifecycle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Underlying player accepted its first command
    Ready,

    /// Playback started or resumed
    Play,

    /// Playback reached the end of the media
    Ended,

    /// Optimistic buffering signal issued alongside play
    BufferFull,

    /// Periodic buffered-range report
    Progress {
        start: f64,
        buffered: f64,
        total: f64,
    },

    /// Periodic playhead report
    TimeUpdate {
        current: f64,
        total: f64,
    },

    /// Reported quality tier changed
    HighDefinitionUpdate,

    /// Host chrome should accept pointer input again
    MediaControlEnable,

    /// Host chrome should let pointer input fall through
    MediaControlDisable,
}

impl PlaybackEvent {
    /// Snake-case event name, as used on the wire and in log lines
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackEvent::Ready => "ready",
            PlaybackEvent::Play => "play",
            PlaybackEvent::Ended => "ended",
            PlaybackEvent::BufferFull => "buffer_full",
            PlaybackEvent::Progress { .. } => "progress",
            PlaybackEvent::TimeUpdate { .. } => "time_update",
            PlaybackEvent::HighDefinitionUpdate => "high_definition_update",
            PlaybackEvent::MediaControlEnable => "media_control_enable",
            PlaybackEvent::MediaControlDisable => "media_control_disable",
        }
    }
}

/// Broadcast wrapper the adapter emits through
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: broadcast::Sender<PlaybackEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to events emitted from this point on
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers
    pub fn emit(&self, event: PlaybackEvent) {
        trace!(event = event.name(), "emit");
        // send only fails when there are no subscribers
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_emitted_events() {
        let emitter = EventEmitter::default();
        let mut rx = emitter.subscribe();

        emitter.emit(PlaybackEvent::Ready);
        emitter.emit(PlaybackEvent::Play);

        assert_eq!(rx.recv().await.unwrap(), PlaybackEvent::Ready);
        assert_eq!(rx.recv().await.unwrap(), PlaybackEvent::Play);
    }

    #[tokio::test]
    async fn test_emitting_without_subscribers_is_a_no_op() {
        let emitter = EventEmitter::default();
        emitter.emit(PlaybackEvent::Ended);
        assert_eq!(emitter.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscribers_miss_earlier_events() {
        let emitter = EventEmitter::default();
        emitter.emit(PlaybackEvent::Ready);

        let mut rx = emitter.subscribe();
        emitter.emit(PlaybackEvent::Play);

        assert_eq!(rx.recv().await.unwrap(), PlaybackEvent::Play);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_events_serialize_with_event_tag() {
        let json = serde_json::to_value(PlaybackEvent::TimeUpdate {
            current: 1.5,
            total: 240.0,
        })
        .unwrap();
        assert_eq!(json["event"], "time_update");
        assert_eq!(json["current"], 1.5);

        let json = serde_json::to_value(PlaybackEvent::HighDefinitionUpdate).unwrap();
        assert_eq!(json["event"], "high_definition_update");
    }

    #[test]
    fn test_names_match_serialized_tags() {
        let events = [
            PlaybackEvent::Ready,
            PlaybackEvent::Ended,
            PlaybackEvent::BufferFull,
            PlaybackEvent::MediaControlEnable,
            PlaybackEvent::MediaControlDisable,
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }
}
