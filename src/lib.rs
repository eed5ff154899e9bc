//! # frameprep
//!
//! Prepare evenly time-spaced, letterboxed video frames for downstream
//! vision pipelines.
//!
//! `frameprep` extracts frames from a video at a fixed millisecond
//! interval, normalizes each one onto a square black-padded canvas, and
//! persists them as ordered, timestamp-named JPEG files, with a directory
//! cache keyed by video identity and sampling interval. Decoding is
//! powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; pixel work
//! happens on [`image`] types.
//!
//! ## Quick Start
//!
//! ```no_run
//! use frameprep::{FrameStore, SampleOptions, ordered_frames, prepare_frames};
//!
//! let store = FrameStore::new("data");
//! let options = SampleOptions::new(1000).with_max_frames(50);
//!
//! // Builds data/images/abc123_1000/ on the first call; every later call
//! // with the same identity and interval returns it without decoding.
//! let directory = prepare_frames(
//!     &store,
//!     "https://example.com/watch?v=abc123",
//!     "downloads/abc123.mp4",
//!     None,
//!     &options,
//! )?;
//!
//! // 1000.jpg, 2000.jpg, ... in numeric order.
//! for frame in ordered_frames(&directory)? {
//!     println!("{}", frame.display());
//! }
//! # Ok::<(), frameprep::FrameError>(())
//! ```
//!
//! ## Pieces
//!
//! - [`VideoSource`] — opens a video file and exposes its properties.
//! - [`SampleOptions`] / [`FrameSamples`] — lazy sampling at a fixed
//!   stride, with the first capture slots skipped.
//! - [`letterbox`] — pure aspect-preserving resize onto a black canvas.
//! - [`FrameStore`] — directory-as-cache keyed by
//!   `(video identity, interval, optional category)`.
//! - [`ordered_frames`] — numeric-aware directory listing.
//!
//! ## Cache semantics
//!
//! Directory existence **is** the cache entry. A directory left behind by
//! an interrupted build is served as a hit on the next call; delete stale
//! directories out of band. Concurrent builders of the same key race
//! (last writer wins per frame file) — coordination is out of scope.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod canvas;
pub mod display;
pub mod error;
pub mod listing;
pub mod prepare;
pub mod sampler;
pub mod source;
pub mod store;

pub use canvas::{letterbox, reorder_channels};
pub use display::FrameSurface;
pub use error::FrameError;
pub use listing::ordered_frames;
pub use prepare::{prepare_frames, prepare_frames_with_progress};
pub use sampler::{FrameSamples, SampleOptions};
pub use source::{DecoderLogLevel, VideoInfo, VideoSource, set_decoder_log_level};
pub use store::{FrameStore, VideoId};
