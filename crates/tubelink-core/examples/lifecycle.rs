//! Playback lifecycle example
//!
//! Walks a simulated embedded player through the full adapter lifecycle:
//! source resolution, SDK bootstrap, deferred play, polling, and teardown.
//!
//! Run with: cargo run -p tubelink-core --example lifecycle

use std::time::{Duration, Instant};

use tubelink_core::{
    can_play, resolve, AdapterOptions, ContainerHandle, PlaybackAdapter, PlaybackEvent,
    SdkBootstrap, SimConfig, SimulatedSdk,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("Tubelink Core - Playback Lifecycle Example");
    println!("===========================================\n");

    // Source resolution
    println!("Source resolution:");
    let candidates = [
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123",
        "https://example.com/video.mp4",
    ];
    for candidate in candidates {
        if can_play(candidate) {
            let source = resolve(candidate).expect("playable source resolves");
            println!("  ✓ {candidate}\n      -> {source}");
        } else {
            println!("  ✗ {candidate}");
        }
    }
    println!();

    // Bootstrap a simulated SDK and attach an adapter
    let sdk = SimulatedSdk::new(SimConfig {
        video_duration: 42.0,
        buffer_ramp_ms: 800,
        ..SimConfig::default()
    });
    let bootstrap = SdkBootstrap::new(sdk.clone());
    let adapter = PlaybackAdapter::attach(
        AdapterOptions::new("https://youtu.be/dQw4w9WgXcQ"),
        ContainerHandle::new("demo-shell", 1280, 720),
        bootstrap,
    )
    .await;

    // Print every playback event with its offset from attach
    let started = Instant::now();
    let mut rx = adapter.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            let elapsed = started.elapsed().as_millis();
            match event {
                PlaybackEvent::Progress { buffered, .. } => {
                    println!("  [{elapsed:>5}ms] progress      buffered {buffered:.1}s")
                }
                PlaybackEvent::TimeUpdate { current, total } => {
                    println!("  [{elapsed:>5}ms] time_update   {current:.1}s / {total:.1}s")
                }
                other => println!("  [{elapsed:>5}ms] {}", other.name()),
            }
        }
    });

    println!("Event timeline:");

    // Play is requested before the SDK has produced a player, so the
    // adapter defers it and replays it on ready.
    adapter.play().await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    adapter.seek(25.0).await;
    adapter.set_volume(80).await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    // Pausing stops the playhead reports, while buffer reports continue.
    adapter.pause().await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    adapter.play().await;

    let player = sdk.last_player().expect("player was constructed");
    player.set_quality("hd1080");
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Roll the simulated video to its end.
    player.complete();
    tokio::time::sleep(Duration::from_millis(150)).await;

    adapter.destroy().await;
    printer.abort();
    println!();

    // Session summary
    println!("Session summary:");
    println!("  - SDK script loads:   {}", sdk.load_calls());
    println!("  - play_video calls:   {}", player.play_calls());
    println!("  - pause_video calls:  {}", player.pause_calls());
    println!("  - last seek target:   {:?}", player.last_seek());
    println!("  - volume:             {}", player.volume());
    println!(
        "  - high definition:    {}",
        adapter.is_high_definition_in_use().await
    );
    println!();

    // The media-control layout the adapter advertises to its host
    let layout = serde_json::to_string_pretty(&adapter.controls_layout())
        .expect("layout serializes");
    println!("Advertised controls layout:\n{layout}");

    println!("\nExample complete!");
}
