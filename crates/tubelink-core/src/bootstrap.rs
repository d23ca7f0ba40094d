//! Process-wide SDK bootstrap and readiness gate.
//!
//! All adapters in a process share one [`SdkBootstrap`]. The first adapter
//! to register while the SDK is absent triggers a single script injection;
//! everyone registering before the SDK comes up parks in a pending list and
//! is instantiated, in registration order, when the ready signal fires.
//! Registrations after that point take the immediate path.

use std::sync::{Arc, Weak};

use tokio::sync::{watch, Mutex};
use tracing::{debug, instrument, warn};

use crate::adapter::PlaybackAdapter;
use crate::sdk::EmbedSdk;

enum RegisterPath {
    /// SDK already live, instantiate now
    Immediate,
    /// Parked; this registration triggers the one-time script injection
    Inject,
    /// Parked behind an injection already in flight
    Parked,
}

#[derive(Default)]
struct Registry {
    script_injected: bool,
    pending: Vec<Weak<PlaybackAdapter>>,
}

/// Shared readiness gate between all adapters and the SDK
pub struct SdkBootstrap {
    sdk: Arc<dyn EmbedSdk>,
    registry: Mutex<Registry>,
    ready_tx: watch::Sender<bool>,
}

impl SdkBootstrap {
    pub fn new(sdk: Arc<dyn EmbedSdk>) -> Arc<Self> {
        let (ready_tx, _) = watch::channel(false);
        Arc::new(Self {
            sdk,
            registry: Mutex::new(Registry::default()),
            ready_tx,
        })
    }

    /// The SDK this gate fronts
    pub fn sdk(&self) -> &Arc<dyn EmbedSdk> {
        &self.sdk
    }

    /// True once the SDK's entry point has come up
    pub fn is_ready(&self) -> bool {
        *self.ready_tx.borrow()
    }

    /// Number of adapters parked behind the ready signal
    pub async fn pending_count(&self) -> usize {
        self.registry.lock().await.pending.len()
    }

    /// Watch the ready flag; late subscribers see it already set
    pub fn subscribe_ready(&self) -> watch::Receiver<bool> {
        self.ready_tx.subscribe()
    }

    /// Resolves once the ready signal has fired. Never resolves if script
    /// injection failed; hosts wanting a deadline race this against their
    /// own timer.
    pub async fn wait_until_ready(&self) {
        let mut rx = self.ready_tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Register an adapter with the gate.
    ///
    /// Instantiates the adapter's player immediately when the SDK is live,
    /// otherwise parks it and (once per gate) kicks off script injection.
    #[instrument(skip(self, adapter), fields(adapter = %adapter.id()))]
    pub async fn register(self: &Arc<Self>, adapter: &Arc<PlaybackAdapter>) {
        let path = {
            let mut registry = self.registry.lock().await;
            if *self.ready_tx.borrow() {
                RegisterPath::Immediate
            } else if self.sdk.is_available() {
                // entry point came up without us loading it (preloaded SDK)
                self.ready_tx.send_replace(true);
                RegisterPath::Immediate
            } else {
                registry.pending.push(Arc::downgrade(adapter));
                if registry.script_injected {
                    RegisterPath::Parked
                } else {
                    registry.script_injected = true;
                    RegisterPath::Inject
                }
            }
        };

        match path {
            RegisterPath::Immediate => {
                debug!("sdk live, instantiating immediately");
                if let Err(e) = adapter.instantiate_player().await {
                    warn!(code = e.error_code(), error = %e, "player construction failed");
                }
            }
            RegisterPath::Inject => {
                debug!("first registration, injecting sdk script");
                self.spawn_loader();
            }
            RegisterPath::Parked => {
                debug!("parked behind in-flight sdk load");
            }
        }
    }

    /// Mark the SDK live and instantiate everything parked, in registration
    /// order. Normally driven by the loader task; a host bridging a real
    /// SDK's global ready callback may call it directly. Idempotent.
    pub async fn notify_ready(self: &Arc<Self>) {
        let pending = {
            let mut registry = self.registry.lock().await;
            if *self.ready_tx.borrow() {
                return;
            }
            self.ready_tx.send_replace(true);
            std::mem::take(&mut registry.pending)
        };

        debug!(adapters = pending.len(), "sdk ready, draining pending adapters");
        for parked in pending {
            // skip adapters dropped while waiting
            let Some(adapter) = parked.upgrade() else {
                continue;
            };
            if let Err(e) = adapter.instantiate_player().await {
                warn!(code = e.error_code(), error = %e, "player construction failed");
            }
        }
    }

    fn spawn_loader(self: &Arc<Self>) {
        let bootstrap = Arc::clone(self);
        tokio::spawn(async move {
            debug!(url = %bootstrap.sdk.script_url(), "loading sdk script");
            match bootstrap.sdk.load().await {
                Ok(()) => bootstrap.notify_ready().await,
                Err(e) => {
                    // adapters stay parked; the gate never becomes ready
                    warn!(code = e.error_code(), error = %e, "sdk script injection failed");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimConfig, SimulatedSdk};
    use crate::types::{AdapterOptions, ContainerHandle};

    fn container() -> ContainerHandle {
        ContainerHandle::new("player-test", 1280, 720)
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_loads_once_for_many_registrations() {
        let sdk = SimulatedSdk::new(SimConfig::default());
        let bootstrap = SdkBootstrap::new(sdk.clone());

        let a = PlaybackAdapter::attach(
            AdapterOptions::new("https://youtu.be/dQw4w9WgXcQ"),
            container(),
            Arc::clone(&bootstrap),
        )
        .await;
        let b = PlaybackAdapter::attach(
            AdapterOptions::new("https://youtu.be/aaaaaaaaaaa"),
            container(),
            Arc::clone(&bootstrap),
        )
        .await;

        assert!(!bootstrap.is_ready());
        assert_eq!(bootstrap.pending_count().await, 2);

        bootstrap.wait_until_ready().await;
        assert_eq!(sdk.load_calls(), 1);
        assert_eq!(bootstrap.pending_count().await, 0);

        drop(a);
        drop(b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preloaded_sdk_skips_injection() {
        let sdk = SimulatedSdk::new(SimConfig {
            preloaded: true,
            ..SimConfig::default()
        });
        let bootstrap = SdkBootstrap::new(sdk.clone());

        let adapter = PlaybackAdapter::attach(
            AdapterOptions::new("https://youtu.be/dQw4w9WgXcQ"),
            container(),
            Arc::clone(&bootstrap),
        )
        .await;

        assert!(bootstrap.is_ready());
        assert_eq!(bootstrap.pending_count().await, 0);
        assert_eq!(sdk.load_calls(), 0);

        drop(adapter);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_injection_leaves_adapters_parked() {
        let sdk = SimulatedSdk::new(SimConfig {
            fail_load: true,
            ..SimConfig::default()
        });
        let bootstrap = SdkBootstrap::new(sdk.clone());

        let adapter = PlaybackAdapter::attach(
            AdapterOptions::new("https://youtu.be/dQw4w9WgXcQ"),
            container(),
            Arc::clone(&bootstrap),
        )
        .await;

        // let the loader task run and fail
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        assert!(!bootstrap.is_ready());
        assert_eq!(bootstrap.pending_count().await, 1);
        assert_eq!(sdk.load_calls(), 1);

        drop(adapter);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_adapter_is_skipped_at_drain() {
        let sdk = SimulatedSdk::new(SimConfig::default());
        let bootstrap = SdkBootstrap::new(sdk.clone());

        let adapter = PlaybackAdapter::attach(
            AdapterOptions::new("https://youtu.be/dQw4w9WgXcQ"),
            container(),
            Arc::clone(&bootstrap),
        )
        .await;
        drop(adapter);

        bootstrap.wait_until_ready().await;
        assert_eq!(sdk.player_count(), 0);
    }
}
