//! Tubelink Core - Embedded-Player Adapter Library
//!
//! This crate bridges a host application's playback contract to a
//! third-party embedded video SDK:
//! - Source string classification (video / playlist identifiers)
//! - Shared SDK bootstrap with a one-shot readiness gate
//! - Player instantiation and SDK state translation
//! - Command forwarding with deferred play before readiness
//! - Timer-driven progress and time-update reporting
//! - A scripted SDK simulation for tests and headless runs
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        Tubelink Core                           │
//! ├────────────────────────────────────────────────────────────────┤
//! │                                                                │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐        │
//! │  │    Source    │   │     SDK      │   │    Event     │        │
//! │  │   Resolver   │   │  Bootstrap   │   │   Emitter    │        │
//! │  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘        │
//! │         │                  │                  │                │
//! │         └──────────────────┼──────────────────┘                │
//! │                            │                                   │
//! │                     ┌──────┴──────┐                            │
//! │                     │  Playback   │                            │
//! │                     │   Adapter   │                            │
//! │                     └──────┬──────┘                            │
//! │                            │                                   │
//! │           ┌────────────────┴───────────────┐                   │
//! │    ┌──────┴───────┐                 ┌──────┴───────┐           │
//! │    │   EmbedSdk   │                 │  SdkPlayer   │           │
//! │    │    (seam)    │                 │    (seam)    │           │
//! │    └──────────────┘                 └──────────────┘           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod source;
pub mod events;
pub mod sdk;
pub mod bootstrap;
pub mod adapter;
pub mod sim;

pub use error::{Error, Result};
pub use types::*;
pub use source::{can_play, resolve, MediaSource};
pub use events::{EventEmitter, PlaybackEvent};
pub use sdk::{EmbedSdk, SdkEvent, SdkEventReceiver, SdkEventSender, SdkPlayer};
pub use bootstrap::SdkBootstrap;
pub use adapter::PlaybackAdapter;
pub use sim::{SimConfig, SimulatedPlayer, SimulatedSdk};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the adapter library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Tubelink Core initialized");
}
