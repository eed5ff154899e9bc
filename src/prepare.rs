//! The end-to-end preparation pipeline.
//!
//! Composes identity parsing, the frame store's cache check, sampling, and
//! JPEG encoding: on a cache miss the video is opened, evenly time-spaced
//! frames are decoded and letterboxed, and each is written to the frame
//! directory as `<offset_ms>.jpg`.

use std::path::{Path, PathBuf};

use crate::{
    error::FrameError,
    sampler::SampleOptions,
    source::VideoSource,
    store::{FrameStore, VideoId},
};

/// Prepare letterboxed frames for a video, reusing an existing frame
/// directory when one exists.
///
/// The video identity is parsed from `url`, and the frame directory for
/// (identity, `options.interval_ms`, `category`) is looked up in `store`.
/// When the directory exists it is returned immediately without touching
/// `video_path`. Otherwise the video is opened, sampled per `options`, and
/// each frame is saved as `<offset_ms>.jpg` before the directory path is
/// returned.
///
/// # Errors
///
/// - [`FrameError::VideoIdentity`] if `url` has no `v=<token>` component
///   (no work is attempted).
/// - Any error from opening or sampling the video, or from writing JPEGs.
///   A failure partway leaves the directory partially populated; a later
///   call will treat it as a cache hit.
///
/// # Example
///
/// ```no_run
/// use frameprep::{FrameStore, SampleOptions, prepare_frames};
///
/// let store = FrameStore::new("data");
/// let directory = prepare_frames(
///     &store,
///     "https://example.com/watch?v=abc123",
///     "downloads/abc123.mp4",
///     None,
///     &SampleOptions::new(1000).with_max_frames(50),
/// )?;
/// println!("Frames in {}", directory.display());
/// # Ok::<(), frameprep::FrameError>(())
/// ```
pub fn prepare_frames<P: AsRef<Path>>(
    store: &FrameStore,
    url: &str,
    video_path: P,
    category: Option<&str>,
    options: &SampleOptions,
) -> Result<PathBuf, FrameError> {
    prepare_frames_with_progress(store, url, video_path, category, options, |_, _| {})
}

/// [`prepare_frames`] with a per-frame progress callback.
///
/// `on_frame(produced, planned)` is invoked after each frame is written,
/// where `planned` is the scheduled frame count. The callback is never
/// invoked on a cache hit.
pub fn prepare_frames_with_progress<P, F>(
    store: &FrameStore,
    url: &str,
    video_path: P,
    category: Option<&str>,
    options: &SampleOptions,
    mut on_frame: F,
) -> Result<PathBuf, FrameError>
where
    P: AsRef<Path>,
    F: FnMut(usize, usize),
{
    let video_id = VideoId::from_url(url)?;

    store.get_or_build(&video_id, options.interval_ms, category, |directory| {
        let mut source = VideoSource::open(video_path.as_ref())?;
        let samples = source.sample(options)?;
        let planned = samples.planned();

        let mut produced = 0;
        for sample in samples {
            let (offset_ms, frame) = sample?;
            frame.save(directory.join(format!("{offset_ms}.jpg")))?;
            produced += 1;
            on_frame(produced, planned);
        }

        log::info!(
            "Prepared {produced}/{planned} frames for video {video_id} at {} ms intervals",
            options.interval_ms,
        );
        Ok(())
    })
}
