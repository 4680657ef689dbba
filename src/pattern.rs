use crate::color::Color;
use crate::point::Point2D;

/// A texture addressed with normalized coordinates.
pub trait Pattern {
    fn pattern_at(&self, uv: Point2D) -> Color;
}

/// A checkerboard with `cells` squares along each axis.
///
/// For a coordinate `(u, v)`, if `floor(u * cells) + floor(v * cells)` is
/// even, the `primary` color is used; otherwise the `secondary` one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CheckerPattern {
    primary: Color,
    secondary: Color,
    cells: f64,
}

impl Default for CheckerPattern {
    fn default() -> CheckerPattern {
        CheckerPattern::new(Color::from_hex(0xe0e0e0), Color::from_hex(0x707070), 16.0)
    }
}

impl CheckerPattern {
    pub fn new(primary: Color, secondary: Color, cells: f64) -> CheckerPattern {
        CheckerPattern { primary, secondary, cells }
    }

    pub fn checker_at(&self, uv: Point2D) -> Color {
        let u = (uv.x * self.cells).floor();
        let v = (uv.y * self.cells).floor();

        if (u + v).rem_euclid(2.0) == 0.0 {
            self.primary
        } else {
            self.secondary
        }
    }
}

impl Pattern for CheckerPattern {
    fn pattern_at(&self, uv: Point2D) -> Color {
        self.checker_at(uv)
    }
}

#[test]
fn checker_alternates_along_u() {
    let pattern = CheckerPattern::new(Color::white(), Color::black(), 4.0);

    assert_eq!(pattern.checker_at(Point2D::new(0.0, 0.0)), Color::white());
    assert_eq!(pattern.checker_at(Point2D::new(0.24, 0.0)), Color::white());
    assert_eq!(pattern.checker_at(Point2D::new(0.25, 0.0)), Color::black());
    assert_eq!(pattern.checker_at(Point2D::new(0.5, 0.0)), Color::white());
    assert_eq!(pattern.checker_at(Point2D::new(-0.1, 0.0)), Color::black());
}

#[test]
fn checker_alternates_along_v() {
    let pattern = CheckerPattern::new(Color::white(), Color::black(), 4.0);

    assert_eq!(pattern.checker_at(Point2D::new(0.1, 0.3)), Color::black());
    assert_eq!(pattern.checker_at(Point2D::new(0.3, 0.3)), Color::white());
}
