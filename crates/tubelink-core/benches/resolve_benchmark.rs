//! Benchmark tests for tubelink-core operations
//!
//! Run with: cargo bench -p tubelink-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tubelink_core::types::{PlayerSpec, QualityLevel, SdkPlayerState};
use tubelink_core::{can_play, resolve, ControlsLayout, MediaSource, PlaybackEvent};

// ============================================================================
// Helpers
// ============================================================================

const VIDEO_SHAPES: &[(&str, &str)] = &[
    ("short_link", "https://youtu.be/dQw4w9WgXcQ"),
    ("watch", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
    ("embed", "https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0"),
    ("legacy_v", "https://www.youtube.com/v/dQw4w9WgXcQ"),
    ("channel_path", "https://www.youtube.com/u/1/dQw4w9WgXcQ"),
    (
        "trailing_v_param",
        "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
    ),
];

/// Build a watch URL padded with `param_count` junk query parameters ahead of
/// the video id, forcing the matcher to scan a long prefix.
fn generate_padded_watch_url(param_count: usize) -> String {
    let mut url = String::from("https://www.youtube.com/watch?");
    for i in 0..param_count {
        url.push_str(&format!("p{i}=value{i}&"));
    }
    url.push_str("v=dQw4w9WgXcQ");
    url
}

// ============================================================================
// Source Resolution Benchmarks
// ============================================================================

fn bench_resolve_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Source Resolution");

    for (label, url) in VIDEO_SHAPES {
        group.bench_with_input(BenchmarkId::new("resolve", label), url, |b, url| {
            b.iter(|| black_box(resolve(black_box(url))));
        });
    }

    group.bench_function("resolve/playlist", |b| {
        let url = "https://www.youtube.com/playlist?list=PLabcdef012345";
        b.iter(|| black_box(resolve(black_box(url))));
    });

    group.bench_function("resolve/playlist_over_video", |b| {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123";
        b.iter(|| black_box(resolve(black_box(url))));
    });

    group.bench_function("resolve/miss", |b| {
        let url = "https://example.com/media/feature-film.mp4";
        b.iter(|| black_box(resolve(black_box(url))));
    });

    group.finish();
}

fn bench_resolve_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Source Resolution Scaling");

    for &param_count in &[0, 5, 25, 100] {
        let url = generate_padded_watch_url(param_count);
        group.bench_with_input(
            BenchmarkId::new("resolve_padded", format!("{}_params", param_count)),
            &url,
            |b, url| {
                b.iter(|| black_box(resolve(black_box(url))));
            },
        );
    }

    group.finish();
}

fn bench_can_play(c: &mut Criterion) {
    let mut group = c.benchmark_group("Playability Check");

    group.bench_function("can_play/hit", |b| {
        b.iter(|| black_box(can_play(black_box("https://youtu.be/dQw4w9WgXcQ"))));
    });

    group.bench_function("can_play/miss", |b| {
        b.iter(|| black_box(can_play(black_box("https://example.com/video.mp4"))));
    });

    group.finish();
}

// ============================================================================
// Spec Construction Benchmarks
// ============================================================================

fn bench_spec_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Spec Construction");

    let video = MediaSource::Video("dQw4w9WgXcQ".to_string());
    let playlist = MediaSource::Playlist("PL123".to_string());

    group.bench_function("for_source/video", |b| {
        b.iter(|| black_box(PlayerSpec::for_source(black_box(&video))));
    });

    group.bench_function("for_source/playlist", |b| {
        b.iter(|| black_box(PlayerSpec::for_source(black_box(&playlist))));
    });

    group.bench_function("serialize_spec", |b| {
        let spec = PlayerSpec::for_source(&video);
        b.iter(|| black_box(serde_json::to_string(black_box(&spec)).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Wire Serialization Benchmarks
// ============================================================================

fn bench_wire_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("Wire Serialization");

    group.bench_function("serialize_progress_event", |b| {
        let event = PlaybackEvent::Progress {
            start: 0.0,
            buffered: 132.5,
            total: 240.0,
        };
        b.iter(|| black_box(serde_json::to_string(black_box(&event)).unwrap()));
    });

    group.bench_function("serialize_timeupdate_event", |b| {
        let event = PlaybackEvent::TimeUpdate {
            current: 61.2,
            total: 240.0,
        };
        b.iter(|| black_box(serde_json::to_string(black_box(&event)).unwrap()));
    });

    group.bench_function("serialize_controls_layout", |b| {
        let layout = ControlsLayout::default();
        b.iter(|| black_box(serde_json::to_string(black_box(&layout)).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Quality / State Benchmarks
// ============================================================================

fn bench_quality_and_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("Quality and State");

    group.bench_function("is_high_definition", |b| {
        let labels = [
            QualityLevel::from("tiny"),
            QualityLevel::from("small"),
            QualityLevel::from("medium"),
            QualityLevel::from("large"),
            QualityLevel::from("hd720"),
            QualityLevel::from("hd1080"),
            QualityLevel::from("hd2160"),
        ];
        b.iter(|| {
            let mut hd_count = 0u32;
            for label in &labels {
                if label.is_high_definition() {
                    hd_count += 1;
                }
            }
            black_box(hd_count)
        });
    });

    group.bench_function("state_from_code", |b| {
        let codes = [-1i8, 0, 1, 2, 3, 4, 5];
        b.iter(|| {
            let mut decoded = 0u32;
            for &code in &codes {
                if SdkPlayerState::from_code(code).is_some() {
                    decoded += 1;
                }
            }
            black_box(decoded)
        });
    });

    group.finish();
}

// ============================================================================
// Group Registration
// ============================================================================

criterion_group!(
    resolve_benches,
    bench_resolve_shapes,
    bench_resolve_scaling,
    bench_can_play,
);

criterion_group!(
    spec_benches,
    bench_spec_construction,
);

criterion_group!(
    wire_benches,
    bench_wire_serialization,
);

criterion_group!(
    quality_benches,
    bench_quality_and_state,
);

criterion_main!(
    resolve_benches,
    spec_benches,
    wire_benches,
    quality_benches,
);
