use crate::color::Color;
use crate::point::Point2D;

/// Receives the drawing commands of a frame.
///
/// Implementors own rasterization and the background texture; the frame loop
/// only supplies geometry.
pub trait DrawSink {
    /// Covers the whole screen with the background texture.
    fn background(&mut self);

    /// Fills a closed polygon with the background texture.
    ///
    /// `tex_coords` holds one normalized sampling coordinate per vertex.
    /// `tint` is mixed over the sampled texels so the region stays visible.
    fn fill_polygon(&mut self, vertices: &[Point2D], tex_coords: &[Point2D],
        tint: Color);

    fn line(&mut self, from: Point2D, to: Point2D, thickness: f64, color: Color);

    /// Fills an axis-aligned square of side `size` centered on `center`.
    fn square(&mut self, center: Point2D, size: f64, color: Color);
}
