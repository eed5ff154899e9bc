//! End-to-end pipeline tests.
//!
//! Tests that decode video require the fixture from
//! `tests/fixtures/generate_fixtures.sh` and return early when it is
//! missing.

use std::{collections::BTreeSet, fs, path::Path};

use frameprep::{
    FrameError, SampleOptions, FrameStore, VideoSource, ordered_frames, prepare_frames,
    prepare_frames_with_progress,
};

fn sample_video_path() -> &'static str {
    // 10 seconds, 30 fps, 400x200.
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn identity_failure_attempts_no_work() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FrameStore::new(root.path());

    let result = prepare_frames(
        &store,
        "https://example.com/no-identity-here",
        "does_not_matter.mp4",
        None,
        &SampleOptions::new(1000),
    );
    assert!(matches!(result, Err(FrameError::VideoIdentity { .. })));

    // Nothing was created under the store root.
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn cache_hit_never_opens_the_video() {
    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FrameStore::new(root.path());

    // Seed the directory the request maps to; the video path is bogus, so
    // any attempt to decode would fail loudly.
    let seeded = root.path().join("images/abc123_1000");
    fs::create_dir_all(&seeded).expect("Failed to seed directory");

    let directory = prepare_frames(
        &store,
        "https://example.com/watch?v=abc123",
        "this_file_does_not_exist.mp4",
        None,
        &SampleOptions::new(1000),
    )
    .expect("Cache hit should not touch the video file");

    assert_eq!(directory, seeded);
}

#[test]
fn open_nonexistent_video_fails() {
    let result = VideoSource::open("this_file_does_not_exist.mp4");
    assert!(result.is_err());

    let message = result.err().unwrap().to_string();
    assert!(
        message.contains("Failed to open video file"),
        "Error should mention the open failure: {message}",
    );
}

#[test]
fn open_invalid_video_fails() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid = directory.path().join("invalid.mp4");
    fs::write(&invalid, b"this is not a video file").expect("Failed to write file");

    assert!(VideoSource::open(&invalid).is_err());
}

#[test]
fn prepared_directory_contains_the_scheduled_offsets() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FrameStore::new(root.path());
    let options = SampleOptions::new(1000).with_skip_count(1).with_max_frames(5);

    let directory = prepare_frames(
        &store,
        "https://example.com/watch?v=sample",
        path,
        None,
        &options,
    )
    .expect("Failed to prepare frames");

    let names: BTreeSet<String> = fs::read_dir(&directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let expected: BTreeSet<String> = ["1000.jpg", "2000.jpg", "3000.jpg", "4000.jpg", "5000.jpg"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, expected);

    // Every frame is a 256x256, 3-channel image.
    for frame in ordered_frames(&directory).expect("Failed to list directory") {
        let image = image::open(&frame).expect("Failed to read frame back");
        assert_eq!((image.width(), image.height()), (256, 256));
        assert_eq!(image.color().channel_count(), 3);
    }
}

#[test]
fn progress_reports_every_produced_frame() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let root = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FrameStore::new(root.path());
    let options = SampleOptions::new(2000).with_skip_count(0).with_max_frames(3);

    let mut reports = Vec::new();
    prepare_frames_with_progress(
        &store,
        "x?v=progress",
        path,
        None,
        &options,
        |produced, planned| reports.push((produced, planned)),
    )
    .expect("Failed to prepare frames");

    assert_eq!(reports, vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn probe_reports_stream_properties() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let info = VideoSource::probe(path).expect("Failed to probe fixture");
    assert_eq!((info.width, info.height), (400, 200));
    assert!((info.frames_per_second - 30.0).abs() < 0.5);
    assert!(info.frame_count >= 290, "10s at 30 fps: {}", info.frame_count);
}

#[test]
fn sub_frame_interval_fails_before_decoding() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).expect("Failed to open fixture");
    // 10 ms between frames at 30 fps strides zero frames.
    let result = source.sample(&SampleOptions::new(10));
    assert!(matches!(
        result.err(),
        Some(FrameError::IntervalTooSmall { .. })
    ));
}

#[test]
fn sampled_frames_are_letterboxed_on_the_fly() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).expect("Failed to open fixture");
    let options = SampleOptions::new(1000).with_skip_count(1).with_max_frames(1);
    let samples = source.sample(&options).expect("Failed to start sampling");

    let mut count = 0;
    for sample in samples {
        let (offset_ms, frame) = sample.expect("Failed to decode sample");
        assert_eq!(offset_ms, 1000);
        assert_eq!((frame.width(), frame.height()), (256, 256));
        count += 1;
    }
    assert_eq!(count, 1);
}
