use std::io;
use std::io::Write;
use std::fs::File;
use std::path::Path;

use crate::color::Color;
use crate::pattern::Pattern;
use crate::point::Point2D;
use crate::sink::DrawSink;

/// A canvas for drawing pixels.
///
/// Once a frame has been drawn, the `Canvas` can be saved to an image file.
/// For now, only PPM images are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = io::BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes the canvas as a plain PPM image.
    ///
    /// Lines are clamped to 70 columns. If a value would cross the 70 column
    /// mark, it is moved to the next line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        let mut col = 0;
        for pixel in self.pixels.iter() {
            for channel in pixel.to_bytes().iter() {
                let value = channel.to_string();

                if col == 0 {
                    write!(out, "{}", value)?;
                    col = value.len();
                } else if col + 1 + value.len() > 70 {
                    write!(out, "\n{}", value)?;
                    col = value.len();
                } else {
                    write!(out, " {}", value)?;
                    col += 1 + value.len();
                }
            }
        }

        // Terminate the PPM file with a newline
        writeln!(out)
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `y` is the row of the pixel, and `x`
    /// is the column. Rows and columns are zero-indexed.
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`, or `None` if the
    /// location is out-of-bounds.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// The range of pixel indices covering `[lo, hi]` along an axis of
    /// length `len`.
    fn span(lo: f64, hi: f64, len: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0).min(len as f64) as usize;
        let end = (hi.ceil() + 1.0).max(0.0).min(len as f64) as usize;
        start..end
    }
}

/// A software `DrawSink` that rasterizes into a `Canvas`, sampling a
/// procedural background texture.
pub struct Rasterizer<P: Pattern> {
    pub canvas: Canvas,
    pub texture: P,

    /// How strongly polygon tints cover the sampled texture.
    pub tint_alpha: f64,
}

impl<P: Pattern> Rasterizer<P> {
    pub fn new(width: usize, height: usize, texture: P) -> Rasterizer<P> {
        Rasterizer { canvas: Canvas::new(width, height), texture, tint_alpha: 0.5 }
    }

    fn uv_at(&self, x: usize, y: usize) -> Point2D {
        Point2D::new(
            (x as f64 + 0.5) / self.canvas.width as f64,
            (y as f64 + 0.5) / self.canvas.height as f64,
        )
    }

    fn fill_triangle(&mut self, tri: [Point2D; 3], uv: [Point2D; 3], tint: Color) {
        let area = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
        if area == 0.0 {
            return;
        }

        let min_x = tri[0].x.min(tri[1].x).min(tri[2].x);
        let max_x = tri[0].x.max(tri[1].x).max(tri[2].x);
        let min_y = tri[0].y.min(tri[1].y).min(tri[2].y);
        let max_y = tri[0].y.max(tri[1].y).max(tri[2].y);

        for y in Canvas::span(min_y, max_y, self.canvas.height) {
            for x in Canvas::span(min_x, max_x, self.canvas.width) {
                let p = Point2D::new(x as f64 + 0.5, y as f64 + 0.5);

                // Barycentric weights, signed by the triangle's winding.
                let w0 = (tri[2] - tri[1]).cross(&(p - tri[1])) / area;
                let w1 = (tri[0] - tri[2]).cross(&(p - tri[2])) / area;
                let w2 = 1.0 - w0 - w1;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let sample = uv[0] * w0 + uv[1] * w1 + uv[2] * w2;
                let color = self.texture.pattern_at(sample)
                    .blend(&tint, self.tint_alpha);
                self.canvas.write_pixel(x, y, &color);
            }
        }
    }
}

impl<P: Pattern> DrawSink for Rasterizer<P> {
    fn background(&mut self) {
        for y in 0..self.canvas.height {
            for x in 0..self.canvas.width {
                let color = self.texture.pattern_at(self.uv_at(x, y));
                self.canvas.write_pixel(x, y, &color);
            }
        }
    }

    /// Fills the polygon as a fan of triangles around its first vertex.
    fn fill_polygon(&mut self, vertices: &[Point2D], tex_coords: &[Point2D],
        tint: Color) {
        if vertices.len() < 3 || vertices.len() != tex_coords.len() {
            return;
        }

        for i in 1..vertices.len() - 1 {
            self.fill_triangle(
                [vertices[0], vertices[i], vertices[i + 1]],
                [tex_coords[0], tex_coords[i], tex_coords[i + 1]],
                tint,
            );
        }
    }

    fn line(&mut self, from: Point2D, to: Point2D, thickness: f64, color: Color) {
        let half = (thickness * 0.5).max(0.5);
        let d = to - from;
        let len2 = d.dot(&d);

        let xs = Canvas::span(from.x.min(to.x) - half, from.x.max(to.x) + half,
            self.canvas.width);
        let ys = Canvas::span(from.y.min(to.y) - half, from.y.max(to.y) + half,
            self.canvas.height);

        for y in ys {
            for x in xs.clone() {
                let p = Point2D::new(x as f64 + 0.5, y as f64 + 0.5);
                let t = if len2 == 0.0 {
                    0.0
                } else {
                    ((p - from).dot(&d) / len2).clamp(0.0, 1.0)
                };

                if p.distance_squared(&(from + d * t)) <= half * half {
                    self.canvas.write_pixel(x, y, &color);
                }
            }
        }
    }

    fn square(&mut self, center: Point2D, size: f64, color: Color) {
        let half = size * 0.5;
        let (lo, hi) = (center.x - half, center.x + half);
        let ys = Canvas::span(center.y - half, center.y + half, self.canvas.height);

        for y in ys {
            let py = y as f64 + 0.5;
            if (py - center.y).abs() > half {
                continue;
            }
            for x in Canvas::span(lo, hi, self.canvas.width) {
                let px = x as f64 + 0.5;
                if px >= lo && px <= hi {
                    self.canvas.write_pixel(x, y, &color);
                }
            }
        }
    }
}

#[test]
fn write_and_read_pixels() {
    let purple = Color::rgb(1.0, 0.0, 1.0);
    let mut canvas = Canvas::new(8, 8);
    canvas.write_pixel(4, 2, &purple);

    assert_eq!(canvas.read_pixel(4, 2), Some(purple));
    assert_eq!(canvas.read_pixel(8, 2), None);
}

#[test]
fn ppm_header_and_line_length() {
    let mut canvas = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            canvas.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut out = Vec::new();
    canvas.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "P3");
    assert_eq!(lines[1], "10 2");
    assert_eq!(lines[2], "255");
    assert!(lines[3..].iter().all(|l| l.len() <= 70));
    assert!(text.ends_with('\n'));
    assert_eq!(text.split_whitespace().count(), 4 + 10 * 2 * 3);
}

#[cfg(test)]
struct Flat(Color);

#[cfg(test)]
impl Pattern for Flat {
    fn pattern_at(&self, _uv: Point2D) -> Color {
        self.0
    }
}

#[test]
fn fill_polygon_covers_inside_only() {
    let mut r = Rasterizer::new(10, 10, Flat(Color::white()));
    r.tint_alpha = 1.0;

    let square = [
        Point2D::new(2.0, 2.0), Point2D::new(6.0, 2.0),
        Point2D::new(6.0, 6.0), Point2D::new(2.0, 6.0),
    ];
    r.fill_polygon(&square, &square, Color::red());

    assert_eq!(r.canvas.read_pixel(3, 3), Some(Color::red()));
    assert_eq!(r.canvas.read_pixel(5, 5), Some(Color::red()));
    assert_eq!(r.canvas.read_pixel(7, 7), Some(Color::black()));
    assert_eq!(r.canvas.read_pixel(0, 0), Some(Color::black()));
}

#[test]
fn mismatched_tex_coords_are_ignored() {
    let mut r = Rasterizer::new(4, 4, Flat(Color::white()));
    let tri = [Point2D::new(0.0, 0.0), Point2D::new(4.0, 0.0), Point2D::new(0.0, 4.0)];
    r.fill_polygon(&tri, &tri[..2], Color::red());

    assert_eq!(r.canvas.read_pixel(0, 0), Some(Color::black()));
}

#[test]
fn background_covers_the_canvas() {
    let mut r = Rasterizer::new(3, 3, Flat(Color::green()));
    r.background();

    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(r.canvas.read_pixel(x, y), Some(Color::green()));
        }
    }
}

#[test]
fn lines_are_clipped_to_the_canvas() {
    let mut r = Rasterizer::new(10, 10, Flat(Color::white()));
    r.line(Point2D::new(-100.0, 5.0), Point2D::new(1000.0, 5.0), 1.0, Color::blue());

    assert_eq!(r.canvas.read_pixel(0, 4), Some(Color::blue()));
    assert_eq!(r.canvas.read_pixel(9, 4), Some(Color::blue()));
    assert_eq!(r.canvas.read_pixel(5, 0), Some(Color::black()));
}

#[test]
fn square_is_centered() {
    let mut r = Rasterizer::new(10, 10, Flat(Color::white()));
    r.square(Point2D::new(5.0, 5.0), 4.0, Color::green());

    assert_eq!(r.canvas.read_pixel(3, 3), Some(Color::green()));
    assert_eq!(r.canvas.read_pixel(6, 6), Some(Color::green()));
    assert_eq!(r.canvas.read_pixel(2, 5), Some(Color::black()));
    assert_eq!(r.canvas.read_pixel(7, 5), Some(Color::black()));
}
