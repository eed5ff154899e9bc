//! Evenly time-spaced frame sampling.
//!
//! [`SampleOptions`] describes a sampling run; [`FrameSamples`] is the lazy,
//! pull-based iterator returned by [`VideoSource::sample`] — each call to
//! [`next()`](Iterator::next) reads and decodes just enough packets to
//! produce the next scheduled frame, already letterboxed onto the square
//! canvas. The iterator borrows the [`VideoSource`] mutably and is not
//! restartable; open the source again to sample a second time.
//!
//! # Example
//!
//! ```no_run
//! use frameprep::{SampleOptions, VideoSource};
//!
//! let options = SampleOptions::new(1000).with_skip_count(1).with_max_frames(5);
//! let mut source = VideoSource::open("clip.mp4")?;
//! for sample in source.sample(&options)? {
//!     let (offset_ms, frame) = sample?;
//!     frame.save(format!("{offset_ms}.jpg"))?;
//! }
//! # Ok::<(), frameprep::FrameError>(())
//! ```

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{canvas::letterbox, error::FrameError, source::VideoSource};

/// Configuration for one sampling run.
///
/// Replaces process-wide tuning constants with an explicit value passed to
/// [`VideoSource::sample`], so behaviour is reproducible without shared
/// state.
///
/// Defaults: skip the first capture slot (opening frames are usually blank
/// or a title card), produce at most 100 frames, letterbox onto a 256×256
/// canvas.
#[derive(Debug, Clone)]
#[must_use]
pub struct SampleOptions {
    /// Milliseconds between captured frames. Must be greater than zero.
    pub interval_ms: u64,
    /// Number of initial capture slots to skip.
    pub skip_count: u64,
    /// Maximum number of frames to produce (counted after the skip).
    pub max_frames: u64,
    /// Side length of the square output canvas in pixels.
    pub canvas_size: u32,
}

impl SampleOptions {
    /// Create options for capturing one frame every `interval_ms`
    /// milliseconds.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            skip_count: 1,
            max_frames: 100,
            canvas_size: 256,
        }
    }

    /// Set how many initial capture slots are skipped.
    pub fn with_skip_count(mut self, skip_count: u64) -> Self {
        self.skip_count = skip_count;
        self
    }

    /// Set the maximum number of frames to produce.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Set the side length of the square output canvas.
    pub fn with_canvas_size(mut self, canvas_size: u32) -> Self {
        self.canvas_size = canvas_size;
        self
    }
}

/// One scheduled capture: a source frame index and the millisecond offset
/// it will be named by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SamplePoint {
    pub(crate) frame_index: u64,
    pub(crate) offset_ms: u64,
}

/// Number of source frames to advance between captures.
///
/// # Errors
///
/// [`FrameError::InvalidInterval`] for a zero interval, and
/// [`FrameError::IntervalTooSmall`] when the interval is shorter than one
/// source frame (the stride would round down to zero and every frame would
/// be captured instead).
pub(crate) fn stride_for(interval_ms: u64, frames_per_second: f64) -> Result<u64, FrameError> {
    if interval_ms == 0 {
        return Err(FrameError::InvalidInterval);
    }
    let stride = (interval_ms as f64 / 1000.0 * frames_per_second).floor() as u64;
    if stride == 0 {
        return Err(FrameError::IntervalTooSmall {
            interval_ms,
            frames_per_second,
        });
    }
    Ok(stride)
}

/// Compute the capture schedule for a source with the given frame count and
/// frame rate.
///
/// Offsets form an arithmetic sequence with common difference
/// `interval_ms`, starting at `skip_count * interval_ms`. Indices past the
/// end of the stream are clipped; an unknown frame count (zero) leaves the
/// schedule unclipped and decoding stops at end of stream instead.
pub(crate) fn sample_plan(
    frame_count: u64,
    frames_per_second: f64,
    options: &SampleOptions,
) -> Result<Vec<SamplePoint>, FrameError> {
    let stride = stride_for(options.interval_ms, frames_per_second)?;

    let mut points = Vec::with_capacity(options.max_frames as usize);
    for slot in options.skip_count..options.skip_count + options.max_frames {
        let frame_index = slot * stride;
        if frame_count > 0 && frame_index >= frame_count {
            break;
        }
        points.push(SamplePoint {
            frame_index,
            offset_ms: slot * options.interval_ms,
        });
    }
    Ok(points)
}

impl VideoSource {
    /// Sample evenly time-spaced frames from this source.
    ///
    /// Computes the capture schedule from `options` and the stream's frame
    /// rate, seeks to the first scheduled frame, and returns a lazy
    /// iterator yielding `(offset_ms, frame)` pairs. Each frame has already
    /// been letterboxed onto the square canvas.
    ///
    /// # Errors
    ///
    /// - [`FrameError::InvalidInterval`] for a zero interval.
    /// - [`FrameError::IntervalTooSmall`] when the computed stride is zero.
    /// - [`FrameError::Ffmpeg`] if the decoder cannot be set up.
    pub fn sample(&mut self, options: &SampleOptions) -> Result<FrameSamples<'_>, FrameError> {
        let points = sample_plan(
            self.info.frame_count,
            self.info.frames_per_second,
            options,
        )?;

        log::debug!(
            "Sampling {}: {} scheduled frames, every {} ms (skip {})",
            self.file_path.display(),
            points.len(),
            options.interval_ms,
            options.skip_count,
        );

        FrameSamples::new(self, points, options.canvas_size)
    }
}

/// A lazy iterator over scheduled, letterboxed frames.
///
/// Yields `Result<(u64, DynamicImage)>` where the `u64` is the millisecond
/// offset the frame was captured at. A frame that fails to decode is
/// logged and skipped; sampling continues with the next scheduled offset.
///
/// Created via [`VideoSource::sample`].
pub struct FrameSamples<'a> {
    source: &'a mut VideoSource,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    /// Capture schedule, ascending by frame index.
    points: Vec<SamplePoint>,
    /// Index into `points` of the next frame to yield.
    point_index: usize,
    time_base: Rational,
    frames_per_second: f64,
    canvas_size: u32,
    native_width: u32,
    native_height: u32,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl<'a> FrameSamples<'a> {
    fn new(
        source: &'a mut VideoSource,
        points: Vec<SamplePoint>,
        canvas_size: u32,
    ) -> Result<Self, FrameError> {
        let video_stream_index = source.video_stream_index;
        let frames_per_second = source.info.frames_per_second;

        let stream = source
            .input_context
            .stream(video_stream_index)
            .ok_or(FrameError::NoVideoStream)?;
        let time_base = stream.time_base();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video()?;

        let native_width = decoder.width();
        let native_height = decoder.height();

        // Pixel-format conversion only; the letterbox resize happens on the
        // image-crate side.
        let scaler = ScalingContext::get(
            decoder.format(),
            native_width,
            native_height,
            Pixel::RGB24,
            native_width,
            native_height,
            ScalingFlags::BILINEAR,
        )?;

        // Seek to the first scheduled frame.
        if let Some(first) = points.first() {
            let timestamp =
                frame_index_to_timestamp(first.frame_index, frames_per_second, time_base);
            let _ = source.input_context.seek(timestamp, ..timestamp);
        }

        Ok(Self {
            source,
            decoder,
            scaler,
            points,
            point_index: 0,
            time_base,
            frames_per_second,
            canvas_size,
            native_width,
            native_height,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
        })
    }

    /// Number of frames in the capture schedule.
    ///
    /// The iterator may yield fewer if the stream ends early or individual
    /// frames fail to decode.
    pub fn planned(&self) -> usize {
        self.points.len()
    }

    /// Convert the current decoded frame to a letterboxed image.
    fn convert_current_frame(&mut self) -> Result<DynamicImage, FrameError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        let buffer = frame_to_rgb_buffer(&self.rgb_frame, self.native_width, self.native_height);
        let native = RgbImage::from_raw(self.native_width, self.native_height, buffer)
            .ok_or_else(|| {
                FrameError::DecodeError(
                    "Failed to construct RGB image from decoded frame data".to_string(),
                )
            })?;
        Ok(letterbox(
            &DynamicImage::ImageRgb8(native),
            (self.canvas_size, self.canvas_size),
        ))
    }
}

impl Iterator for FrameSamples<'_> {
    type Item = Result<(u64, DynamicImage), FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.point_index >= self.points.len() {
            return None;
        }

        loop {
            // Drain frames the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                let pts = self.decoded_frame.pts().unwrap_or(0);
                let current_index =
                    pts_to_frame_index(pts, self.time_base, self.frames_per_second);

                // Drop scheduled frames the seek landed past.
                while self.point_index < self.points.len()
                    && self.points[self.point_index].frame_index < current_index
                {
                    log::warn!(
                        "Skipping offset {} ms: decode position is already past frame {}",
                        self.points[self.point_index].offset_ms,
                        self.points[self.point_index].frame_index,
                    );
                    self.point_index += 1;
                }

                if self.point_index >= self.points.len() {
                    self.done = true;
                    return None;
                }

                let point = self.points[self.point_index];
                if current_index == point.frame_index {
                    self.point_index += 1;
                    match self.convert_current_frame() {
                        Ok(image) => return Some(Ok((point.offset_ms, image))),
                        Err(error) => {
                            // Per-frame failures are recoverable: skip this
                            // offset and keep sampling.
                            log::warn!(
                                "Skipping offset {} ms: {error}",
                                point.offset_ms,
                            );
                            continue;
                        }
                    }
                }

                // Not a scheduled frame; keep draining.
                continue;
            }

            // Decoder is empty. Feed it more packets.
            if self.eof_sent {
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.source.input_context) {
                Ok(()) => {
                    if packet.stream() == self.source.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            // A corrupt packet loses at most the frames it
                            // carried; the next packet may still decode.
                            log::warn!("Dropping undecodable packet: {error}");
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.done = true;
                        return Some(Err(FrameError::from(error)));
                    }
                    self.eof_sent = true;
                }
                Err(_) => {
                    // Non-fatal read error; try the next packet.
                }
            }
        }
    }
}

/// Copy pixel data from an FFmpeg RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3);
/// this strips it so the result can go straight into
/// [`image::RgbImage::from_raw`].
fn frame_to_rgb_buffer(frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let start = row * stride;
            buffer.extend_from_slice(&data[start..start + row_bytes]);
        }
        buffer
    }
}

/// Convert a frame index to a timestamp in the stream's time base.
fn frame_index_to_timestamp(frame_index: u64, frames_per_second: f64, time_base: Rational) -> i64 {
    let seconds = frame_index as f64 / frames_per_second;
    (seconds * time_base.denominator() as f64 / time_base.numerator() as f64) as i64
}

/// Map a PTS value back to a frame index.
fn pts_to_frame_index(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    (seconds * frames_per_second).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_floors_to_whole_frames() {
        assert_eq!(stride_for(1000, 30.0).unwrap(), 30);
        assert_eq!(stride_for(500, 25.0).unwrap(), 12);
        assert_eq!(stride_for(1500, 29.97).unwrap(), 44);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            stride_for(0, 30.0),
            Err(FrameError::InvalidInterval)
        ));
    }

    #[test]
    fn sub_frame_interval_is_rejected() {
        // 10 ms between captures at 24 fps is less than one frame.
        let error = stride_for(10, 24.0).unwrap_err();
        assert!(matches!(
            error,
            FrameError::IntervalTooSmall { interval_ms: 10, .. }
        ));
    }

    #[test]
    fn plan_offsets_form_arithmetic_sequence() {
        let options = SampleOptions::new(1000).with_skip_count(1).with_max_frames(5);
        let points = sample_plan(300, 30.0, &options).unwrap();

        let offsets: Vec<u64> = points.iter().map(|p| p.offset_ms).collect();
        assert_eq!(offsets, vec![1000, 2000, 3000, 4000, 5000]);

        let indices: Vec<u64> = points.iter().map(|p| p.frame_index).collect();
        assert_eq!(indices, vec![30, 60, 90, 120, 150]);
    }

    #[test]
    fn plan_starts_at_skip_times_interval() {
        let options = SampleOptions::new(500).with_skip_count(3).with_max_frames(2);
        let points = sample_plan(10_000, 24.0, &options).unwrap();
        assert_eq!(points[0].offset_ms, 1500);
        assert_eq!(points[1].offset_ms, 2000);
    }

    #[test]
    fn plan_is_clipped_to_frame_count() {
        let options = SampleOptions::new(1000).with_skip_count(0).with_max_frames(100);
        // 90 frames at 30 fps is a 3-second clip: offsets 0, 1000, 2000.
        let points = sample_plan(90, 30.0, &options).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points.last().unwrap().offset_ms, 2000);
    }

    #[test]
    fn plan_never_exceeds_max_frames() {
        let options = SampleOptions::new(100).with_skip_count(0).with_max_frames(7);
        let points = sample_plan(1_000_000, 60.0, &options).unwrap();
        assert_eq!(points.len(), 7);
    }

    #[test]
    fn unknown_frame_count_leaves_plan_unclipped() {
        let options = SampleOptions::new(1000).with_skip_count(0).with_max_frames(4);
        let points = sample_plan(0, 30.0, &options).unwrap();
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn options_builder_defaults() {
        let options = SampleOptions::new(2000);
        assert_eq!(options.interval_ms, 2000);
        assert_eq!(options.skip_count, 1);
        assert_eq!(options.max_frames, 100);
        assert_eq!(options.canvas_size, 256);
    }
}
