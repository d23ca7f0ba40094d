//! The playback adapter: one embedded-player session per instance.
//!
//! Bridges the host's playback contract (play/pause/seek/volume plus
//! lifecycle events) to an SDK player that is constructed asynchronously
//! behind the shared [`SdkBootstrap`] gate. Commands issued before the
//! player is ready degrade per operation: `play` is deferred and replayed
//! once on readiness, everything else is a silent no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::bootstrap::SdkBootstrap;
use crate::error::Result;
use crate::events::{EventEmitter, PlaybackEvent};
use crate::sdk::{SdkEvent, SdkEventReceiver, SdkPlayer};
use crate::source::{self, MediaSource};
use crate::types::{
    AdapterId, AdapterOptions, ContainerHandle, ControlsLayout, PlayerSpec, SdkPlayerState,
};

/// Bridges host playback commands to an embedded SDK player
pub struct PlaybackAdapter {
    id: AdapterId,
    options: AdapterOptions,
    source: Option<MediaSource>,
    container: ContainerHandle,
    bootstrap: Arc<SdkBootstrap>,
    events: EventEmitter,
    /// Assigned once, when the SDK finishes constructing the player
    player: RwLock<Option<Arc<dyn SdkPlayer>>>,
    ready: AtomicBool,
    /// Play requested before readiness; consulted and cleared once on ready
    pending_play: AtomicBool,
    media_control_enabled: AtomicBool,
    destroyed: AtomicBool,
    progress_poller: Mutex<Option<JoinHandle<()>>>,
    timeupdate_poller: Mutex<Option<JoinHandle<()>>>,
    notice_pump: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackAdapter {
    /// Backend name a host registry can label this adapter with
    pub const NAME: &'static str = "youtube_playback";

    /// True when [`attach`](Self::attach) would yield a playable adapter
    pub fn can_play(source: &str) -> bool {
        source::can_play(source)
    }

    /// Create an adapter for `options.source` and register it with the gate.
    ///
    /// A source that does not resolve still yields an adapter, but an inert
    /// one: it never touches the SDK and every command is a no-op.
    #[instrument(skip_all, fields(source = %options.source))]
    pub async fn attach(
        options: AdapterOptions,
        container: ContainerHandle,
        bootstrap: Arc<SdkBootstrap>,
    ) -> Arc<Self> {
        let source = source::resolve(&options.source);
        let adapter = Arc::new(Self {
            id: AdapterId::new(),
            source,
            container,
            bootstrap: Arc::clone(&bootstrap),
            events: EventEmitter::default(),
            player: RwLock::new(None),
            ready: AtomicBool::new(false),
            pending_play: AtomicBool::new(false),
            media_control_enabled: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            progress_poller: Mutex::new(None),
            timeupdate_poller: Mutex::new(None),
            notice_pump: Mutex::new(None),
            options,
        });

        match &adapter.source {
            Some(resolved) => {
                info!(adapter = %adapter.id, resolved = %resolved, "attaching");
                bootstrap.register(&adapter).await;
            }
            None => {
                warn!(adapter = %adapter.id, "source did not resolve, adapter is inert");
            }
        }

        adapter
    }

    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    /// The classified source, if it resolved
    pub fn source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    pub fn container(&self) -> &ContainerHandle {
        &self.container
    }

    /// Controls the host chrome should render for this backend
    pub fn controls_layout(&self) -> ControlsLayout {
        ControlsLayout::default()
    }

    /// Subscribe to lifecycle events emitted from this point on
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// True once the underlying player has reported ready
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Last media-control state pushed to the host chrome
    pub fn media_control_enabled(&self) -> bool {
        self.media_control_enabled.load(Ordering::SeqCst)
    }

    /// Construct the SDK player for this adapter. Driven by the gate, either
    /// immediately at registration or when the ready signal drains the
    /// pending list.
    #[instrument(skip(self), fields(adapter = %self.id))]
    pub(crate) async fn instantiate_player(self: &Arc<Self>) -> Result<()> {
        let Some(resolved) = &self.source else {
            return Ok(());
        };
        if self.destroyed.load(Ordering::SeqCst) || self.player.read().await.is_some() {
            return Ok(());
        }

        let spec = PlayerSpec::for_source(resolved);
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let player = self
            .bootstrap
            .sdk()
            .create_player(&self.container, &spec, notice_tx)
            .await?;

        {
            // destroy may have landed while create_player was in flight
            let mut slot = self.player.write().await;
            if self.destroyed.load(Ordering::SeqCst) || slot.is_some() {
                return Ok(());
            }
            *slot = Some(player);
        }

        self.spawn_notice_pump(notice_rx).await;
        debug!(adapter = %self.id, "player constructed");
        Ok(())
    }

    /// Start or resume playback.
    ///
    /// Before readiness this records a one-time deferred play instead of
    /// blocking; the host sees playback become active eventually.
    #[instrument(skip(self), fields(adapter = %self.id))]
    pub async fn play(self: &Arc<Self>) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        let player = self.player.read().await.clone();
        match player {
            Some(player) if self.ready.load(Ordering::SeqCst) => {
                self.start_pollers(&player).await;
                player.play_video();
                self.events.emit(PlaybackEvent::Play);
                self.events.emit(PlaybackEvent::BufferFull);
            }
            _ => {
                if self.source.is_some() {
                    debug!(adapter = %self.id, "play before ready, deferring");
                    self.pending_play.store(true, Ordering::SeqCst);
                }
            }
        }
    }

    /// Pause playback. Stops the time-update poller; the progress poller
    /// keeps running until destroy.
    #[instrument(skip(self), fields(adapter = %self.id))]
    pub async fn pause(&self) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        self.stop_task(&self.timeupdate_poller).await;
        if let Some(player) = self.player.read().await.as_ref() {
            player.pause_video();
        }
    }

    /// Seek to a percentage (0-100) of the total duration
    pub async fn seek(&self, percentage: f64) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        if let Some(player) = self.player.read().await.as_ref() {
            let seconds = player.duration() * percentage / 100.0;
            debug!(adapter = %self.id, percentage, seconds, "seek");
            player.seek_to(seconds);
        }
    }

    /// Set volume in percent (0-100)
    pub async fn set_volume(&self, volume: u8) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        if let Some(player) = self.player.read().await.as_ref() {
            player.set_volume(volume.min(100));
        }
    }

    /// Media duration in seconds; 0 until the player exists and knows it
    pub async fn duration(&self) -> f64 {
        match self.player.read().await.as_ref() {
            Some(player) => player.duration(),
            None => 0.0,
        }
    }

    /// True while a player exists, the time-update poller is running and
    /// the SDK reports the playing state
    pub async fn is_playing(&self) -> bool {
        let player = self.player.read().await.clone();
        let Some(player) = player else {
            return false;
        };
        let polling = self.timeupdate_poller.lock().await.is_some();
        polling && player.player_state() == SdkPlayerState::Playing
    }

    /// True when the reported quality label is a high-definition tier
    pub async fn is_high_definition_in_use(&self) -> bool {
        match self.player.read().await.as_ref() {
            Some(player) => player.playback_quality().is_high_definition(),
            None => false,
        }
    }

    /// Push the container's current dimensions to the player surface
    pub async fn resize(&self) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        if let Some(player) = self.player.read().await.as_ref() {
            let dimensions = self.container.dimensions();
            debug!(adapter = %self.id, %dimensions, "resize");
            player.set_size(dimensions.width, dimensions.height);
        }
    }

    /// Tear the adapter down: stop both pollers and the notice pump.
    /// Further commands are no-ops.
    #[instrument(skip(self), fields(adapter = %self.id))]
    pub async fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        debug!(adapter = %self.id, "destroying");
        self.stop_task(&self.progress_poller).await;
        self.stop_task(&self.timeupdate_poller).await;
        self.stop_task(&self.notice_pump).await;
    }

    async fn spawn_notice_pump(self: &Arc<Self>, mut notices: SdkEventReceiver) {
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            while let Some(notice) = notices.recv().await {
                let Some(adapter) = weak.upgrade() else {
                    break;
                };
                adapter.handle_notice(notice).await;
            }
        });
        let mut slot = self.notice_pump.lock().await;
        if self.destroyed.load(Ordering::SeqCst) {
            // destroy has already emptied the slot
            handle.abort();
        } else {
            *slot = Some(handle);
        }
    }

    async fn handle_notice(self: &Arc<Self>, notice: SdkEvent) {
        match notice {
            SdkEvent::Ready => self.handle_ready().await,
            SdkEvent::StateChange(state) => self.handle_state_change(state),
            SdkEvent::QualityChange(quality) => {
                debug!(adapter = %self.id, %quality, "quality changed");
                self.events.emit(PlaybackEvent::HighDefinitionUpdate);
            }
        }
    }

    async fn handle_ready(self: &Arc<Self>) {
        if self.ready.swap(true, Ordering::SeqCst) {
            return;
        }

        debug!(adapter = %self.id, "player ready");
        self.events.emit(PlaybackEvent::Ready);
        if self.pending_play.swap(false, Ordering::SeqCst) {
            debug!(adapter = %self.id, "replaying deferred play");
            self.play().await;
        }
    }

    fn handle_state_change(&self, state: SdkPlayerState) {
        debug!(adapter = %self.id, %state, "state change");
        match state {
            SdkPlayerState::Playing => {
                self.enable_media_control();
                self.events.emit(PlaybackEvent::Play);
            }
            SdkPlayerState::Ended => {
                if self.options.show_related_on_end {
                    self.disable_media_control();
                } else {
                    self.events.emit(PlaybackEvent::Ended);
                }
            }
            _ => {}
        }
    }

    fn enable_media_control(&self) {
        self.container.set_input_passthrough(false);
        self.media_control_enabled.store(true, Ordering::SeqCst);
        self.events.emit(PlaybackEvent::MediaControlEnable);
    }

    fn disable_media_control(&self) {
        self.container.set_input_passthrough(true);
        self.media_control_enabled.store(false, Ordering::SeqCst);
        self.events.emit(PlaybackEvent::MediaControlDisable);
    }

    async fn start_pollers(&self, player: &Arc<dyn SdkPlayer>) {
        // tokio intervals reject a zero period
        let period = Duration::from_millis(self.options.poll_interval_ms.max(1));
        {
            let mut slot = self.progress_poller.lock().await;
            if slot.is_none() {
                *slot = Some(self.spawn_progress_poller(player, period));
            }
        }
        {
            let mut slot = self.timeupdate_poller.lock().await;
            if slot.is_none() {
                *slot = Some(self.spawn_timeupdate_poller(player, period));
            }
        }
    }

    fn spawn_progress_poller(
        &self,
        player: &Arc<dyn SdkPlayer>,
        period: Duration,
    ) -> JoinHandle<()> {
        let player = Arc::clone(player);
        let events = self.events.clone();
        tokio::spawn(async move {
            // first tick one full period after start
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let total = player.duration();
                let buffered = total * player.video_loaded_fraction();
                events.emit(PlaybackEvent::Progress {
                    start: 0.0,
                    buffered,
                    total,
                });
            }
        })
    }

    fn spawn_timeupdate_poller(
        &self,
        player: &Arc<dyn SdkPlayer>,
        period: Duration,
    ) -> JoinHandle<()> {
        let player = Arc::clone(player);
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                ticker.tick().await;
                events.emit(PlaybackEvent::TimeUpdate {
                    current: player.current_time(),
                    total: player.duration(),
                });
            }
        })
    }

    async fn stop_task(&self, slot: &Mutex<Option<JoinHandle<()>>>) {
        if let Some(handle) = slot.lock().await.take() {
            handle.abort();
        }
    }

    fn abort_tasks(&self) {
        for slot in [
            &self.progress_poller,
            &self.timeupdate_poller,
            &self.notice_pump,
        ] {
            if let Ok(mut guard) = slot.try_lock() {
                if let Some(handle) = guard.take() {
                    handle.abort();
                }
            }
        }
    }
}

impl Drop for PlaybackAdapter {
    // backstop for adapters dropped without an explicit destroy
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
