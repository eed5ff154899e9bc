//! Error types for the `frameprep` crate.
//!
//! This module defines [`FrameError`], the unified error type returned by all
//! fallible operations in the crate. Variants carry enough context (file
//! paths, intervals, frame rates) to diagnose a failure without additional
//! logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `frameprep` operations.
///
/// Every public method that can fail returns `Result<T, FrameError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    DecodeError(String),

    /// A sampling interval of zero milliseconds was provided.
    #[error("Sampling interval must be greater than zero")]
    InvalidInterval,

    /// The sampling interval is shorter than one source frame, so the
    /// computed stride rounds down to zero frames.
    #[error(
        "Interval of {interval_ms} ms is too small for a {frames_per_second:.2} fps source (stride would be zero)"
    )]
    IntervalTooSmall {
        /// The requested milliseconds between captured frames.
        interval_ms: u64,
        /// The source's frame rate.
        frames_per_second: f64,
    },

    /// A video identity token could not be extracted from the locator string.
    #[error("Could not extract a video identity from {url:?} (expected a `v=<token>` component)")]
    VideoIdentity {
        /// The locator string that failed to parse.
        url: String,
    },

    /// A file in a frame directory has a name whose stem is not an integer
    /// millisecond offset.
    #[error("Frame filename {path} does not have an integer millisecond stem")]
    FrameFilename {
        /// The offending path.
        path: PathBuf,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding or decoding a frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for FrameError {
    fn from(error: FfmpegError) -> Self {
        FrameError::Ffmpeg(error.to_string())
    }
}
