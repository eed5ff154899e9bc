//! Opening video files and reading stream properties.
//!
//! [`VideoSource`] is the entry point for sampling. It opens a video file,
//! locates the best video stream, and caches [`VideoInfo`] so callers can
//! inspect frame rate and frame count without any decoding. The demuxer is
//! released when the `VideoSource` is dropped, on success and error paths
//! alike.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    codec::context::Context as CodecContext, format::context::Input, media::Type,
    util::log::Level,
};

use crate::error::FrameError;

/// Properties of a video stream, read once at open time.
///
/// `frame_count` is taken from the container when it records one, and is
/// otherwise estimated from the duration and frame rate (approximate for
/// variable-frame-rate content).
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frames_per_second: f64,
    /// Total number of frames in the stream.
    pub frame_count: u64,
    /// Total duration of the file.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
}

/// An opened video file ready for frame sampling.
///
/// Created via [`VideoSource::open`]. Holds the demuxer context and the
/// cached [`VideoInfo`]. Use [`sample`](VideoSource::sample) to obtain a
/// lazy iterator over evenly time-spaced, letterboxed frames.
///
/// # Example
///
/// ```no_run
/// use frameprep::{SampleOptions, VideoSource};
///
/// let mut source = VideoSource::open("clip.mp4")?;
/// println!("{:.2} fps", source.info().frames_per_second);
/// for sample in source.sample(&SampleOptions::new(1000))? {
///     let (offset_ms, frame) = sample?;
///     frame.save(format!("{offset_ms}.jpg"))?;
/// }
/// # Ok::<(), frameprep::FrameError>(())
/// ```
pub struct VideoSource {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached stream properties extracted at open time.
    pub(crate) info: VideoInfo,
    /// Index of the best video stream.
    pub(crate) video_stream_index: usize,
    /// Path to the opened file (kept for error messages).
    pub(crate) file_path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("info", &self.info)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file for sampling.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its properties.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::FileOpen`] if the file cannot be opened, or
    /// [`FrameError::NoVideoStream`] if it contains no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| FrameError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FrameError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(FrameError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                FrameError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| FrameError::FileOpen {
                path: file_path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();
        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            // Fallback: the stream's real base frame rate.
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        // Prefer the frame count recorded in the container; estimate from
        // duration otherwise.
        let recorded_frames = stream.frames();
        let frame_count = if recorded_frames > 0 {
            recorded_frames as u64
        } else if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let info = VideoInfo {
            width,
            height,
            frames_per_second,
            frame_count,
            duration,
            codec,
        };

        log::debug!(
            "Opened {}: {}x{} @ {:.2} fps, ~{} frames, codec={}",
            file_path.display(),
            info.width,
            info.height,
            info.frames_per_second,
            info.frame_count,
            info.codec,
        );

        Ok(Self {
            input_context,
            info,
            video_stream_index,
            file_path,
        })
    }

    /// Probe a video file and return its properties without keeping the
    /// demuxer open.
    ///
    /// # Errors
    ///
    /// Same as [`open`](VideoSource::open).
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<VideoInfo, FrameError> {
        Ok(Self::open(path)?.info)
    }

    /// Get a reference to the cached stream properties.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Verbosity of FFmpeg's own stderr output.
///
/// FFmpeg logs through its internal system, separate from the Rust
/// [`log`](https://crates.io/crates/log) facade used by this crate. By
/// default it prints warnings and errors to stderr, which is noisy in
/// library usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoderLogLevel {
    /// Print nothing at all.
    Quiet,
    /// Unrecoverable errors only.
    Error,
    /// Warnings and above (FFmpeg's default).
    Warning,
    /// Informational messages and above.
    Info,
    /// Debugging output.
    Debug,
}

/// Set the verbosity of FFmpeg's own stderr output.
///
/// This controls what the FFmpeg libraries print, not the messages this
/// crate emits via the `log` facade.
pub fn set_decoder_log_level(level: DecoderLogLevel) {
    let ffmpeg_level = match level {
        DecoderLogLevel::Quiet => Level::Quiet,
        DecoderLogLevel::Error => Level::Error,
        DecoderLogLevel::Warning => Level::Warning,
        DecoderLogLevel::Info => Level::Info,
        DecoderLogLevel::Debug => Level::Debug,
    };
    ffmpeg_next::util::log::set_level(ffmpeg_level);
}
