//! Core types for Tubelink

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use uuid::Uuid;

/// Unique identifier for a playback adapter instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdapterId(pub Uuid);

impl AdapterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AdapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AdapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width and height of the embedding container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Handle to the host-provided element the SDK player is mounted into.
///
/// The host owns layout; the adapter only reads the current dimensions when
/// forwarding a resize and flips input pass-through when media control is
/// disabled. Cloning is cheap and all clones observe the same state.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    inner: Arc<ContainerInner>,
}

#[derive(Debug)]
struct ContainerInner {
    element_id: String,
    width: AtomicU32,
    height: AtomicU32,
    input_passthrough: AtomicBool,
}

impl ContainerHandle {
    pub fn new(element_id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                element_id: element_id.into(),
                width: AtomicU32::new(width),
                height: AtomicU32::new(height),
                input_passthrough: AtomicBool::new(false),
            }),
        }
    }

    /// Element id the SDK player is bound to
    pub fn element_id(&self) -> &str {
        &self.inner.element_id
    }

    /// Current container dimensions
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.inner.width.load(Ordering::Relaxed),
            height: self.inner.height.load(Ordering::Relaxed),
        }
    }

    /// Record a host-side layout change
    pub fn set_dimensions(&self, dimensions: Dimensions) {
        self.inner.width.store(dimensions.width, Ordering::Relaxed);
        self.inner.height.store(dimensions.height, Ordering::Relaxed);
    }

    /// True when pointer input falls through to the embedded player
    pub fn input_passthrough(&self) -> bool {
        self.inner.input_passthrough.load(Ordering::Relaxed)
    }

    pub fn set_input_passthrough(&self, passthrough: bool) {
        self.inner
            .input_passthrough
            .store(passthrough, Ordering::Relaxed);
    }
}

/// Wire configuration handed to the SDK at player construction.
///
/// The defaults disable every piece of native chrome so the host draws its
/// own controls: no native control bar, no autoplay, no keyboard capture,
/// no annotations, no branding badge, no info bar, HTML5 rendering, script
/// API enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVars {
    pub autoplay: u8,
    pub controls: u8,
    pub disablekb: u8,
    pub enablejsapi: u8,
    pub iv_load_policy: u8,
    pub modestbranding: u8,
    pub showinfo: u8,
    pub html5: u8,
    /// Set to "playlist" when binding a playlist source
    #[serde(rename = "listType", skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
    /// Playlist identifier when binding a playlist source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

impl PlayerVars {
    /// Chrome-disabling configuration for a single video
    pub fn chromeless() -> Self {
        Self {
            autoplay: 0,
            controls: 0,
            disablekb: 1,
            enablejsapi: 1,
            iv_load_policy: 3,
            modestbranding: 1,
            showinfo: 0,
            html5: 1,
            list_type: None,
            list: None,
        }
    }

    /// Chrome-disabling configuration bound to a playlist
    pub fn playlist(list: impl Into<String>) -> Self {
        Self {
            list_type: Some("playlist".to_string()),
            list: Some(list.into()),
            ..Self::chromeless()
        }
    }
}

impl Default for PlayerVars {
    fn default() -> Self {
        Self::chromeless()
    }
}

/// Everything the SDK needs to construct one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Video identifier; absent for playlist binding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub player_vars: PlayerVars,
}

impl PlayerSpec {
    /// Build the construction parameters for a resolved source
    pub fn for_source(source: &crate::source::MediaSource) -> Self {
        match source {
            crate::source::MediaSource::Video(id) => Self {
                video_id: Some(id.clone()),
                player_vars: PlayerVars::chromeless(),
            },
            crate::source::MediaSource::Playlist(id) => Self {
                video_id: None,
                player_vars: PlayerVars::playlist(id.clone()),
            },
        }
    }
}

/// Player states reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SdkPlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl SdkPlayerState {
    /// Returns the SDK wire code for this state
    pub fn code(&self) -> i8 {
        match self {
            SdkPlayerState::Unstarted => -1,
            SdkPlayerState::Ended => 0,
            SdkPlayerState::Playing => 1,
            SdkPlayerState::Paused => 2,
            SdkPlayerState::Buffering => 3,
            SdkPlayerState::Cued => 5,
        }
    }

    /// Decode an SDK wire code
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(SdkPlayerState::Unstarted),
            0 => Some(SdkPlayerState::Ended),
            1 => Some(SdkPlayerState::Playing),
            2 => Some(SdkPlayerState::Paused),
            3 => Some(SdkPlayerState::Buffering),
            5 => Some(SdkPlayerState::Cued),
            _ => None,
        }
    }
}

impl std::fmt::Display for SdkPlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkPlayerState::Unstarted => write!(f, "unstarted"),
            SdkPlayerState::Ended => write!(f, "ended"),
            SdkPlayerState::Playing => write!(f, "playing"),
            SdkPlayerState::Paused => write!(f, "paused"),
            SdkPlayerState::Buffering => write!(f, "buffering"),
            SdkPlayerState::Cued => write!(f, "cued"),
        }
    }
}

static HD_QUALITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^hd\d+").expect("hd quality pattern is valid"));

/// Quality label reported by the SDK (e.g. "small", "large", "hd720")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityLevel(String);

impl QualityLevel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for high-definition tiers (labels of the form `hd<height>`)
    pub fn is_high_definition(&self) -> bool {
        HD_QUALITY_PATTERN.is_match(&self.0)
    }
}

impl From<&str> for QualityLevel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterOptions {
    /// Source string handed over by the host, resolved at attach time
    pub source: String,
    /// Leave the SDK's related-content screen up when playback ends
    pub show_related_on_end: bool,
    /// Period of the progress and time-update pollers in milliseconds;
    /// zero is treated as one
    pub poll_interval_ms: u64,
}

impl AdapterOptions {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            show_related_on_end: false,
            poll_interval_ms: 100,
        }
    }

    pub fn with_show_related_on_end(mut self, show: bool) -> Self {
        self.show_related_on_end = show;
        self
    }

    pub fn with_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }
}

// =============================================================================
// Media Control Layout Types
// =============================================================================

/// Control-bar element the host chrome can render for this backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlElement {
    PlayPause,
    Position,
    Duration,
    SeekBar,
    Fullscreen,
    Volume,
    #[serde(rename = "hd-indicator")]
    HdIndicator,
}

impl std::fmt::Display for ControlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlElement::PlayPause => write!(f, "playpause"),
            ControlElement::Position => write!(f, "position"),
            ControlElement::Duration => write!(f, "duration"),
            ControlElement::SeekBar => write!(f, "seekbar"),
            ControlElement::Fullscreen => write!(f, "fullscreen"),
            ControlElement::Volume => write!(f, "volume"),
            ControlElement::HdIndicator => write!(f, "hd-indicator"),
        }
    }
}

/// Which controls the host chrome should render, slot by slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlsLayout {
    pub seek_enabled: bool,
    pub left: Vec<ControlElement>,
    pub default: Vec<ControlElement>,
    pub right: Vec<ControlElement>,
}

impl Default for ControlsLayout {
    fn default() -> Self {
        Self {
            seek_enabled: true,
            left: vec![
                ControlElement::PlayPause,
                ControlElement::Position,
                ControlElement::Duration,
            ],
            default: vec![ControlElement::SeekBar],
            right: vec![
                ControlElement::Fullscreen,
                ControlElement::Volume,
                ControlElement::HdIndicator,
            ],
        }
    }
}
