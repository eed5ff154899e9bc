//! The visualization seam.
//!
//! The crate produces frames; it does not render them. [`FrameSurface`] is
//! the single-method seam a caller plugs a visualization backend into —
//! a plotting window, a terminal renderer, a test recorder. Closures
//! implement it directly.

use image::DynamicImage;

/// An external surface that frames can be handed to for display.
///
/// No return value and no contract beyond rendering the given raster.
///
/// # Example
///
/// ```
/// use frameprep::FrameSurface;
/// use image::DynamicImage;
///
/// let mut rendered = 0;
/// let mut surface = |_frame: &DynamicImage| rendered += 1;
/// surface.render(&DynamicImage::new_rgb8(4, 4));
/// assert_eq!(rendered, 1);
/// ```
pub trait FrameSurface {
    /// Render one frame.
    fn render(&mut self, frame: &DynamicImage);
}

impl<F: FnMut(&DynamicImage)> FrameSurface for F {
    fn render(&mut self, frame: &DynamicImage) {
        self(frame)
    }
}
