//! Scripted in-process SDK for tests, examples and headless runs.
//!
//! [`SimulatedSdk`] implements the [`EmbedSdk`] seam against the tokio
//! clock: script loading takes a configurable delay, constructed players
//! report ready after another delay, the buffered fraction ramps linearly
//! and the playhead advances while the player is in the playing state.
//! With `announce_state_changes` set, players push state notices the way
//! a real SDK binding would; the explicit drivers
//! ([`SimulatedPlayer::complete`], [`SimulatedPlayer::set_quality`]) let
//! tests steer a session directly.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::sdk::{EmbedSdk, SdkEvent, SdkEventSender, SdkPlayer};
use crate::types::{ContainerHandle, PlayerSpec, QualityLevel, SdkPlayerState};

const SCRIPT_URL: &str = "https://www.youtube.com/iframe_api";
const END_WATCH_PERIOD: Duration = Duration::from_millis(25);

/// Behavior of the simulated SDK
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Entry point is live before anyone loads the script
    pub preloaded: bool,
    /// Script load fails after the load delay
    pub fail_load: bool,
    /// Time the bootstrap script takes to load
    pub load_delay_ms: u64,
    /// Time player construction takes inside the SDK
    pub create_delay_ms: u64,
    /// Time between player construction and its ready callback
    pub ready_delay_ms: u64,
    /// Reported media duration in seconds
    pub video_duration: f64,
    /// Time until the buffered fraction reaches 1.0
    pub buffer_ramp_ms: u64,
    /// Quality label players start with
    pub initial_quality: String,
    /// Push state notices on play/pause/end like a real binding
    pub announce_state_changes: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            preloaded: false,
            fail_load: false,
            load_delay_ms: 25,
            create_delay_ms: 0,
            ready_delay_ms: 10,
            video_duration: 240.0,
            buffer_ramp_ms: 2000,
            initial_quality: "hd720".to_string(),
            announce_state_changes: true,
        }
    }
}

/// In-process [`EmbedSdk`] implementation
pub struct SimulatedSdk {
    config: SimConfig,
    available: AtomicBool,
    load_calls: AtomicU32,
    players: Mutex<Vec<Arc<SimulatedPlayer>>>,
}

impl SimulatedSdk {
    pub fn new(config: SimConfig) -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(config.preloaded),
            load_calls: AtomicU32::new(0),
            players: Mutex::new(Vec::new()),
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of times the bootstrap script was loaded
    pub fn load_calls(&self) -> u32 {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Number of players constructed so far
    pub fn player_count(&self) -> usize {
        self.players.lock().map(|players| players.len()).unwrap_or(0)
    }

    /// Most recently constructed player
    pub fn last_player(&self) -> Option<Arc<SimulatedPlayer>> {
        self.players
            .lock()
            .ok()
            .and_then(|players| players.last().cloned())
    }

    /// All players in construction order
    pub fn players(&self) -> Vec<Arc<SimulatedPlayer>> {
        self.players
            .lock()
            .map(|players| players.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmbedSdk for SimulatedSdk {
    fn script_url(&self) -> Url {
        Url::parse(SCRIPT_URL).expect("script url is valid")
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn load(&self) -> Result<()> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(self.config.load_delay_ms)).await;
        if self.config.fail_load {
            return Err(Error::ScriptInjection(
                "simulated network failure".to_string(),
            ));
        }
        self.available.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_player(
        &self,
        container: &ContainerHandle,
        spec: &PlayerSpec,
        events: SdkEventSender,
    ) -> Result<Arc<dyn SdkPlayer>> {
        if !self.is_available() {
            return Err(Error::SdkUnavailable);
        }
        tokio::time::sleep(Duration::from_millis(self.config.create_delay_ms)).await;

        let dimensions = container.dimensions();
        let player = Arc::new(SimulatedPlayer {
            element_id: container.element_id().to_string(),
            spec: spec.clone(),
            duration: self.config.video_duration,
            buffer_ramp_ms: self.config.buffer_ramp_ms,
            constructed_at: Instant::now(),
            announce: self.config.announce_state_changes,
            notices: events,
            play_calls: AtomicU32::new(0),
            pause_calls: AtomicU32::new(0),
            volume: AtomicU8::new(100),
            playhead: Mutex::new(Playhead {
                state: SdkPlayerState::Unstarted,
                base: 0.0,
                running_since: None,
                quality: QualityLevel::from(self.config.initial_quality.as_str()),
                last_seek: None,
                width: dimensions.width,
                height: dimensions.height,
            }),
        });

        if let Ok(mut players) = self.players.lock() {
            players.push(Arc::clone(&player));
        }

        player.spawn_ready_task(Duration::from_millis(self.config.ready_delay_ms));
        if self.config.announce_state_changes {
            player.spawn_end_watcher();
        }

        debug!(element = %player.element_id, "simulated player constructed");
        Ok(player)
    }
}

struct Playhead {
    state: SdkPlayerState,
    base: f64,
    running_since: Option<Instant>,
    quality: QualityLevel,
    last_seek: Option<f64>,
    width: u32,
    height: u32,
}

impl Playhead {
    fn position(&self, duration: f64) -> f64 {
        let elapsed = self
            .running_since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (self.base + elapsed).min(duration)
    }
}

/// One simulated player instance
pub struct SimulatedPlayer {
    element_id: String,
    spec: PlayerSpec,
    duration: f64,
    buffer_ramp_ms: u64,
    constructed_at: Instant,
    announce: bool,
    notices: SdkEventSender,
    play_calls: AtomicU32,
    pause_calls: AtomicU32,
    volume: AtomicU8,
    playhead: Mutex<Playhead>,
}

impl SimulatedPlayer {
    /// Element id this player was mounted into
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    /// Construction spec the adapter handed over
    pub fn spec(&self) -> &PlayerSpec {
        &self.spec
    }

    pub fn play_calls(&self) -> u32 {
        self.play_calls.load(Ordering::SeqCst)
    }

    pub fn pause_calls(&self) -> u32 {
        self.pause_calls.load(Ordering::SeqCst)
    }

    pub fn volume(&self) -> u8 {
        self.volume.load(Ordering::SeqCst)
    }

    /// Last absolute seek position handed to the player
    pub fn last_seek(&self) -> Option<f64> {
        self.playhead.lock().map(|p| p.last_seek).unwrap_or(None)
    }

    pub fn size(&self) -> (u32, u32) {
        self.playhead
            .lock()
            .map(|p| (p.width, p.height))
            .unwrap_or((0, 0))
    }

    /// Jump the playhead to the end of the media and announce it
    pub fn complete(&self) {
        if let Ok(mut playhead) = self.playhead.lock() {
            playhead.base = self.duration;
            playhead.running_since = None;
            playhead.state = SdkPlayerState::Ended;
        }
        let _ = self
            .notices
            .send(SdkEvent::StateChange(SdkPlayerState::Ended));
    }

    /// Switch the reported quality tier and announce it
    pub fn set_quality(&self, label: &str) {
        let quality = QualityLevel::from(label);
        if let Ok(mut playhead) = self.playhead.lock() {
            playhead.quality = quality.clone();
        }
        let _ = self.notices.send(SdkEvent::QualityChange(quality));
    }

    fn spawn_ready_task(&self, delay: Duration) {
        let notices = self.notices.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = notices.send(SdkEvent::Ready);
        });
    }

    fn spawn_end_watcher(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(END_WATCH_PERIOD);
            loop {
                ticker.tick().await;
                let Some(player) = weak.upgrade() else {
                    break;
                };
                if player.roll_to_end()
                    && player
                        .notices
                        .send(SdkEvent::StateChange(SdkPlayerState::Ended))
                        .is_err()
                {
                    break;
                }
            }
        });
    }

    /// Flip playing to ended once the playhead reaches the duration
    fn roll_to_end(&self) -> bool {
        if let Ok(mut playhead) = self.playhead.lock() {
            if playhead.state == SdkPlayerState::Playing
                && playhead.position(self.duration) >= self.duration
            {
                playhead.base = self.duration;
                playhead.running_since = None;
                playhead.state = SdkPlayerState::Ended;
                return true;
            }
        }
        false
    }

    fn announce_state(&self, state: SdkPlayerState) {
        if self.announce {
            let _ = self.notices.send(SdkEvent::StateChange(state));
        }
    }
}

impl SdkPlayer for SimulatedPlayer {
    fn play_video(&self) {
        self.play_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut playhead) = self.playhead.lock() {
            if playhead.state != SdkPlayerState::Playing {
                playhead.base = playhead.position(self.duration);
                playhead.running_since = Some(Instant::now());
                playhead.state = SdkPlayerState::Playing;
            }
        }
        self.announce_state(SdkPlayerState::Playing);
    }

    fn pause_video(&self) {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut playhead) = self.playhead.lock() {
            playhead.base = playhead.position(self.duration);
            playhead.running_since = None;
            playhead.state = SdkPlayerState::Paused;
        }
        self.announce_state(SdkPlayerState::Paused);
    }

    fn seek_to(&self, seconds: f64) {
        if let Ok(mut playhead) = self.playhead.lock() {
            playhead.last_seek = Some(seconds);
            playhead.base = seconds.clamp(0.0, self.duration);
            if playhead.running_since.is_some() {
                playhead.running_since = Some(Instant::now());
            }
        }
    }

    fn set_volume(&self, volume: u8) {
        self.volume.store(volume.min(100), Ordering::SeqCst);
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn video_loaded_fraction(&self) -> f64 {
        if self.buffer_ramp_ms == 0 {
            return 1.0;
        }
        let elapsed_ms = self.constructed_at.elapsed().as_millis() as f64;
        (elapsed_ms / self.buffer_ramp_ms as f64).min(1.0)
    }

    fn current_time(&self) -> f64 {
        self.playhead
            .lock()
            .map(|p| p.position(self.duration))
            .unwrap_or(0.0)
    }

    fn player_state(&self) -> SdkPlayerState {
        self.playhead
            .lock()
            .map(|p| p.state)
            .unwrap_or(SdkPlayerState::Unstarted)
    }

    fn playback_quality(&self) -> QualityLevel {
        self.playhead
            .lock()
            .map(|p| p.quality.clone())
            .unwrap_or_else(|_| QualityLevel::from("default"))
    }

    fn set_size(&self, width: u32, height: u32) {
        if let Ok(mut playhead) = self.playhead.lock() {
            playhead.width = width;
            playhead.height = height;
        }
    }
}
