//! Aspect-preserving letterboxing onto a fixed canvas.
//!
//! [`letterbox`] is a pure function with no side effects: it scales a frame
//! uniformly so it fits entirely within the target canvas and fills the
//! leftover area with black. [`reorder_channels`] is its channel-order
//! companion; the letterbox itself never assumes RGB versus BGR, it moves
//! all three channels identically.

use image::{DynamicImage, Rgb, RgbImage, imageops, imageops::FilterType};

/// Scale `image` to fit within `target` and center it on a black canvas.
///
/// The scale factor is chosen from the tighter dimension: with
/// `dw = target_w / source_w` and `dh = target_h / source_h`, the image is
/// scaled by `min(dw, dh)` so the scaled image touches the target bounds on
/// the axis that would otherwise overflow. Scaled dimensions are truncated
/// to whole pixels.
///
/// Centering offsets use integer floor division, so when the leftover
/// padding is odd the extra pixel lands on the bottom or right edge.
///
/// Applying the function twice at the same target size is a no-op: an
/// image already at the target size is pasted back unscaled.
///
/// # Example
///
/// ```
/// use image::DynamicImage;
/// use frameprep::letterbox;
///
/// let wide = DynamicImage::new_rgb8(400, 200);
/// let framed = letterbox(&wide, (256, 256));
/// assert_eq!((framed.width(), framed.height()), (256, 256));
/// ```
pub fn letterbox(image: &DynamicImage, target: (u32, u32)) -> DynamicImage {
    let (target_width, target_height) = target;
    let mut canvas = RgbImage::from_pixel(target_width, target_height, Rgb([0, 0, 0]));

    let (source_width, source_height) = (image.width(), image.height());
    if source_width == 0 || source_height == 0 || target_width == 0 || target_height == 0 {
        return DynamicImage::ImageRgb8(canvas);
    }

    let dw = target_width as f64 / source_width as f64;
    let dh = target_height as f64 / source_height as f64;
    let ratio = if dw < dh { dw } else { dh };

    let scaled_width = ((source_width as f64 * ratio) as u32).clamp(1, target_width);
    let scaled_height = ((source_height as f64 * ratio) as u32).clamp(1, target_height);

    let scaled = if scaled_width == source_width && scaled_height == source_height {
        image.to_rgb8()
    } else {
        imageops::resize(
            &image.to_rgb8(),
            scaled_width,
            scaled_height,
            FilterType::Triangle,
        )
    };

    let x = (target_width - scaled_width) / 2;
    let y = (target_height - scaled_height) / 2;
    imageops::replace(&mut canvas, &scaled, i64::from(x), i64::from(y));

    DynamicImage::ImageRgb8(canvas)
}

/// Rearrange the channels of an RGB raster.
///
/// `order[i]` names the source channel written to output channel `i`, so
/// `[2, 1, 0]` swaps a BGR-encoded raster into RGB (and vice versa). A pure
/// function; dimensions are unchanged.
///
/// # Example
///
/// ```
/// use image::{Rgb, RgbImage};
/// use frameprep::reorder_channels;
///
/// let bgr = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
/// let rgb = reorder_channels(&bgr, [2, 1, 0]);
/// assert_eq!(rgb.get_pixel(0, 0), &Rgb([30, 20, 10]));
/// ```
pub fn reorder_channels(image: &RgbImage, order: [usize; 3]) -> RgbImage {
    let mut output = RgbImage::new(image.width(), image.height());
    for (source, target) in image.pixels().zip(output.pixels_mut()) {
        *target = Rgb([
            source.0[order[0]],
            source.0[order[1]],
            source.0[order[2]],
        ]);
    }
    output
}
