//! The seam to the embedded-player service.
//!
//! [`EmbedSdk`] covers the service as a whole (script bootstrap, player
//! construction); [`SdkPlayer`] is one constructed player object. The real
//! service lives out of process, so commands are fire-and-forget and queries
//! return the SDK's last reported values. Callbacks flow back to the adapter
//! over an unbounded channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::error::Result;
use crate::types::{ContainerHandle, PlayerSpec, QualityLevel, SdkPlayerState};

/// Callbacks the SDK delivers back to an adapter
#[derive(Debug, Clone, PartialEq)]
pub enum SdkEvent {
    /// Player finished constructing and accepts commands
    Ready,
    /// Player moved to a new state
    StateChange(SdkPlayerState),
    /// Playback quality tier changed
    QualityChange(QualityLevel),
}

/// Sending half of a player's callback channel
pub type SdkEventSender = mpsc::UnboundedSender<SdkEvent>;

/// Receiving half of a player's callback channel
pub type SdkEventReceiver = mpsc::UnboundedReceiver<SdkEvent>;

/// Trait for the embedded-player service
#[async_trait]
pub trait EmbedSdk: Send + Sync {
    /// Location of the SDK's bootstrap script
    fn script_url(&self) -> Url;

    /// True when the SDK's global entry point is live in this process
    fn is_available(&self) -> bool;

    /// Inject and load the bootstrap script; resolves when the global
    /// entry point is live
    async fn load(&self) -> Result<()>;

    /// Construct a player bound to `container`, delivering callbacks
    /// on `events`
    async fn create_player(
        &self,
        container: &ContainerHandle,
        spec: &PlayerSpec,
        events: SdkEventSender,
    ) -> Result<Arc<dyn SdkPlayer>>;
}

/// Trait for one constructed player object
pub trait SdkPlayer: Send + Sync {
    fn play_video(&self);

    fn pause_video(&self);

    /// Seek to an absolute position in seconds
    fn seek_to(&self, seconds: f64);

    /// Set volume in percent (0-100)
    fn set_volume(&self, volume: u8);

    /// Media duration in seconds; 0 until known
    fn duration(&self) -> f64;

    /// Fraction of the media the SDK has buffered (0.0-1.0)
    fn video_loaded_fraction(&self) -> f64;

    /// Current playhead position in seconds
    fn current_time(&self) -> f64;

    fn player_state(&self) -> SdkPlayerState;

    fn playback_quality(&self) -> QualityLevel;

    /// Resize the player surface to the given pixel dimensions
    fn set_size(&self, width: u32, height: u32);
}
