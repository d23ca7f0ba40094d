//! CLI command implementations

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::bail;
use console::style;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::broadcast::error::RecvError;

use tubelink_core::{
    AdapterOptions, ContainerHandle, ControlsLayout, PlaybackAdapter, PlaybackEvent, PlayerSpec,
    SdkBootstrap, SimConfig, SimulatedSdk,
};

use crate::output::{self, OutputFormat};

#[derive(Tabled, Serialize)]
struct ResolveRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Playable")]
    playable: bool,
}

/// Resolve sources into playable media identifiers
pub fn resolve(sources: &[String], format: &str) -> anyhow::Result<()> {
    if sources.is_empty() {
        bail!("no sources given");
    }

    let rows: Vec<ResolveRow> = sources
        .iter()
        .map(|source| match tubelink_core::resolve(source) {
            Some(media) => {
                let kind = if media.is_playlist() { "playlist" } else { "video" };
                ResolveRow {
                    source: source.clone(),
                    kind: kind.to_string(),
                    id: media.id().to_string(),
                    playable: true,
                }
            }
            None => ResolveRow {
                source: source.clone(),
                kind: "-".to_string(),
                id: "-".to_string(),
                playable: false,
            },
        })
        .collect();

    let playable = rows.iter().filter(|row| row.playable).count();
    let rejected = rows.len() - playable;

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", output::to_json(&rows)),
        OutputFormat::Table => {
            println!("{}", output::to_table(rows.iter()));
            println!("\nResults: {} playable, {} rejected", playable, rejected);
        }
        OutputFormat::Text => {
            for row in &rows {
                if row.playable {
                    println!("  {} {} -> {}:{}", style("✓").green(), row.source, row.kind, row.id);
                } else {
                    println!("  {} {}", style("✗").red(), row.source);
                }
            }
            println!("\nResults: {} playable, {} rejected", playable, rejected);
        }
    }

    if rejected > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Show the embed spec built for a source
pub fn spec(source: &str, format: &str) -> anyhow::Result<()> {
    let Some(media) = tubelink_core::resolve(source) else {
        eprintln!("Source does not resolve to playable media: {}", source);
        std::process::exit(1);
    };

    let spec = PlayerSpec::for_source(&media);

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", output::to_json(&spec)),
        _ => {
            println!("Resolved: {}", media);
            println!("  Plugin name: {}", PlaybackAdapter::NAME);
            println!("\nEmbed spec:");
            println!("{}", output::to_json(&spec));
        }
    }

    Ok(())
}

/// Print the media-control layout advertised to hosts
pub fn layout(format: &str) {
    let layout = ControlsLayout::default();

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", output::to_json(&layout)),
        _ => {
            let join = |elements: &[tubelink_core::ControlElement]| {
                elements
                    .iter()
                    .map(|element| element.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            println!("Media-control layout:");
            println!("  Seek enabled: {}", layout.seek_enabled);
            println!("  Left panel:   {}", join(&layout.left));
            println!("  Center panel: {}", join(&layout.default));
            println!("  Right panel:  {}", join(&layout.right));
        }
    }
}

/// Knobs for a scripted playback session
pub struct SimulateScript {
    pub watch_secs: u64,
    pub video_duration: f64,
    pub pause_after_ms: Option<u64>,
    pub show_related: bool,
    pub preloaded: bool,
    pub poll_interval_ms: u64,
}

#[derive(Serialize)]
struct TimelineEntry {
    at_ms: u64,
    #[serde(flatten)]
    event: PlaybackEvent,
}

#[derive(Serialize)]
struct SessionReport {
    source: String,
    resolved: Option<String>,
    ready: bool,
    sdk_loads: u32,
    play_calls: u32,
    pause_calls: u32,
    volume: u8,
    high_definition: bool,
    events: Vec<TimelineEntry>,
}

/// Run a scripted playback session against the simulated SDK
pub async fn simulate(source: &str, script: SimulateScript, format: &str) -> anyhow::Result<()> {
    if tubelink_core::resolve(source).is_none() {
        eprintln!("Source does not resolve to playable media: {}", source);
        std::process::exit(1);
    }

    tracing::debug!(source, watch_secs = script.watch_secs, "starting simulated session");

    let out = OutputFormat::from(format);
    let text_mode = out != OutputFormat::Json;

    if text_mode {
        println!("Simulating: {}", source);
        println!("  Watch window: {}s", script.watch_secs);
        println!("  Video length: {}s", script.video_duration);
        if let Some(pause_after) = script.pause_after_ms {
            println!("  Pause after:  {}ms", pause_after);
        }
        println!("\nEvent timeline:");
    }

    let sdk = SimulatedSdk::new(SimConfig {
        preloaded: script.preloaded,
        video_duration: script.video_duration,
        ..SimConfig::default()
    });
    let bootstrap = SdkBootstrap::new(sdk.clone());
    let options = AdapterOptions::new(source)
        .with_show_related_on_end(script.show_related)
        .with_poll_interval_ms(script.poll_interval_ms);
    let adapter = PlaybackAdapter::attach(
        options,
        ContainerHandle::new("tubelink-cli", 1280, 720),
        bootstrap,
    )
    .await;

    let mut rx = adapter.subscribe();
    let started = Instant::now();

    if let Some(pause_after) = script.pause_after_ms {
        let scripted = Arc::clone(&adapter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(pause_after)).await;
            scripted.pause().await;
        });
    }

    adapter.play().await;

    let mut timeline = Vec::new();
    let deadline = tokio::time::sleep(Duration::from_secs(script.watch_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = rx.recv() => match event {
                Ok(event) => {
                    let at_ms = started.elapsed().as_millis() as u64;
                    if text_mode {
                        println!("  {}", event_line(at_ms, &event));
                    }
                    timeline.push(TimelineEntry { at_ms, event });
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
        }
    }

    let player = sdk.last_player();
    let report = SessionReport {
        source: source.to_string(),
        resolved: adapter.source().map(|media| media.to_string()),
        ready: adapter.is_ready(),
        sdk_loads: sdk.load_calls(),
        play_calls: player.as_ref().map(|p| p.play_calls()).unwrap_or(0),
        pause_calls: player.as_ref().map(|p| p.pause_calls()).unwrap_or(0),
        volume: player.as_ref().map(|p| p.volume()).unwrap_or(0),
        high_definition: adapter.is_high_definition_in_use().await,
        events: timeline,
    };

    adapter.destroy().await;

    match out {
        OutputFormat::Json => println!("{}", output::to_json(&report)),
        _ => {
            println!("\nSession summary:");
            println!("  Resolved:         {}", report.resolved.as_deref().unwrap_or("-"));
            println!("  Reached ready:    {}", report.ready);
            println!("  SDK script loads: {}", report.sdk_loads);
            println!("  play_video calls: {}", report.play_calls);
            println!("  pause_video calls: {}", report.pause_calls);
            println!("  High definition:  {}", report.high_definition);
        }
    }

    Ok(())
}

fn event_line(at_ms: u64, event: &PlaybackEvent) -> String {
    let stamp = style(format!("[{:>5}ms]", at_ms)).dim();
    let body = match event {
        PlaybackEvent::Ready => style("ready").green().bold().to_string(),
        PlaybackEvent::Play => style("play").green().to_string(),
        PlaybackEvent::Ended => style("ended").red().to_string(),
        PlaybackEvent::Progress {
            buffered, total, ..
        } => format!("progress      buffered {:.1}s of {:.1}s", buffered, total),
        PlaybackEvent::TimeUpdate { current, total } => {
            format!("time_update   {:.1}s / {:.1}s", current, total)
        }
        other => other.name().to_string(),
    };
    format!("{} {}", stamp, body)
}
