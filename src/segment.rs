//! Segments of the SVG path and evaluation along them
use crate::{
    check_param, Arc, ArcSegment, BBox, Cubic, Curve, Degenerate, Line, Point, Quad,
    QuadratureBudget, Result, Scalar, Transform, EPSILON,
};
use std::fmt;

/// Single element of the path
///
/// Every drawable segment starts where the previous one ends. `Close` always ends at the
/// start point of its subpath.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    MoveTo(Point),
    Line(Line),
    Quad(Quad),
    Cubic(Cubic),
    Arc(Arc),
    Close(Line),
}

/// Derivative of the segment with respect to its local parameter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Derivative {
    pub vector: Point,
    /// Set if the derivative vanishes, `vector` is zero in this case
    pub note: Option<Degenerate>,
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::MoveTo(point) => write!(f, "MoveTo {:?}", point),
            Segment::Line(line) => fmt::Debug::fmt(line, f),
            Segment::Quad(quad) => fmt::Debug::fmt(quad, f),
            Segment::Cubic(cubic) => fmt::Debug::fmt(cubic, f),
            Segment::Arc(arc) => fmt::Debug::fmt(arc, f),
            Segment::Close(line) => write!(f, "Close {:?} {:?}", line.start(), line.end()),
        }
    }
}

impl Segment {
    /// Point at which segment starts
    pub fn start(&self) -> Point {
        match self {
            Segment::MoveTo(point) => *point,
            Segment::Line(line) | Segment::Close(line) => line.start(),
            Segment::Quad(quad) => quad.start(),
            Segment::Cubic(cubic) => cubic.start(),
            Segment::Arc(arc) => arc.start(),
        }
    }

    /// Point at which segment ends
    pub fn end(&self) -> Point {
        match self {
            Segment::MoveTo(point) => *point,
            Segment::Line(line) | Segment::Close(line) => line.end(),
            Segment::Quad(quad) => quad.end(),
            Segment::Cubic(cubic) => cubic.end(),
            Segment::Arc(arc) => arc.end(),
        }
    }

    /// Every segment except `MoveTo` draws something
    pub fn is_drawable(&self) -> bool {
        !matches!(self, Segment::MoveTo(_))
    }

    /// Evaluate segment at parameter `t` in `0.0..=1.0`
    pub fn point_at(&self, t: Scalar) -> Result<Point> {
        let t = check_param(t)?;
        let point = match self {
            Segment::MoveTo(point) => *point,
            Segment::Line(line) | Segment::Close(line) => line.at(t),
            Segment::Quad(quad) => quad.at(t),
            Segment::Cubic(cubic) => cubic.at(t),
            Segment::Arc(arc) => arc.at(t),
        };
        Ok(point)
    }

    /// Derivative at parameter `t` in `0.0..=1.0`
    ///
    /// Vanishing derivative (empty segment, coinciding control points, move) is reported
    /// as zero vector with `Degenerate::ZeroLength` note.
    pub fn derivative_at(&self, t: Scalar) -> Result<Derivative> {
        let t = check_param(t)?;
        let vector = match self {
            Segment::MoveTo(_) => Point::default(),
            Segment::Line(line) | Segment::Close(line) => line.deriv_at(t),
            Segment::Quad(quad) => quad.deriv_at(t),
            Segment::Cubic(cubic) => cubic.deriv_at(t),
            Segment::Arc(arc) => arc.deriv_at(t),
        };
        if vector.length() < EPSILON || !vector.is_finite() {
            tracing::debug!(segment = ?self, t, "degenerate derivative");
            return Ok(Derivative {
                vector: Point::default(),
                note: Some(Degenerate::ZeroLength),
            });
        }
        Ok(Derivative { vector, note: None })
    }

    /// Unit tangent vector at `t`, `None` if derivative vanishes
    pub fn tangent_at(&self, t: Scalar) -> Result<Option<Point>> {
        let deriv = self.derivative_at(t)?;
        Ok(deriv.note.map_or_else(|| deriv.vector.normalize(), |_| None))
    }

    /// Tight bounding box of the segment, `MoveTo` does not have one
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            Segment::MoveTo(_) => None,
            Segment::Line(line) | Segment::Close(line) => Some(line.bbox(None)),
            Segment::Quad(quad) => Some(quad.bbox(None)),
            Segment::Cubic(cubic) => Some(cubic.bbox(None)),
            Segment::Arc(arc) => Some(arc.bbox(None)),
        }
    }

    /// Length of the segment with default quadrature settings
    pub fn length(&self) -> Scalar {
        self.length_with(QuadratureBudget::default())
    }

    /// Length of the segment, curves are integrated within provided budget
    pub fn length_with(&self, budget: QuadratureBudget) -> Scalar {
        match self {
            Segment::MoveTo(_) => 0.0,
            Segment::Line(line) | Segment::Close(line) => line.length(budget),
            Segment::Quad(quad) => quad.length(budget),
            Segment::Cubic(cubic) => cubic.length(budget),
            Segment::Arc(arc) => arc.length(budget),
        }
    }

    /// Split segment at parameter `t`
    ///
    /// First half of a `Close` is an ordinary line, the second half still closes the subpath.
    pub fn split_at(&self, t: Scalar) -> Result<(Segment, Segment)> {
        let t = check_param(t)?;
        let halves = match self {
            Segment::MoveTo(point) => (Segment::MoveTo(*point), Segment::MoveTo(*point)),
            Segment::Line(line) => {
                let (l0, l1) = line.split_at(t);
                (l0.into(), l1.into())
            }
            Segment::Close(line) => {
                let (l0, l1) = line.split_at(t);
                (l0.into(), Segment::Close(l1))
            }
            Segment::Quad(quad) => {
                let (q0, q1) = quad.split_at(t);
                (q0.into(), q1.into())
            }
            Segment::Cubic(cubic) => {
                let (c0, c1) = cubic.split_at(t);
                (c0.into(), c1.into())
            }
            Segment::Arc(arc) => {
                let (a0, a1) = arc.split_at(t);
                (a0.into(), a1.into())
            }
        };
        Ok(halves)
    }

    /// Sub-segment covering parameter range between `a` and `b`
    ///
    /// If `a > b` resulting segment is directed backwards.
    pub fn cut(&self, a: Scalar, b: Scalar) -> Result<Segment> {
        let a = check_param(a)?;
        let b = check_param(b)?;
        if a > b {
            return Ok(self.cut(b, a)?.reverse());
        }
        let segment = match self {
            Segment::MoveTo(point) => Segment::MoveTo(*point),
            Segment::Line(line) => line.cut(a, b).into(),
            Segment::Close(line) if b == 1.0 => Segment::Close(line.cut(a, b)),
            Segment::Close(line) => line.cut(a, b).into(),
            Segment::Quad(quad) => quad.cut(a, b).into(),
            Segment::Cubic(cubic) => cubic.cut(a, b).into(),
            Segment::Arc(arc) => arc.cut(a, b).into(),
        };
        Ok(segment)
    }

    /// Apply affine transformation to the segment
    pub fn transform(&self, tr: Transform) -> Segment {
        self.transform_with_note(tr).0
    }

    /// Apply affine transformation, reporting arcs collapsed into lines
    pub fn transform_with_note(&self, tr: Transform) -> (Segment, Option<Degenerate>) {
        match self {
            Segment::MoveTo(point) => (Segment::MoveTo(tr.apply(*point)), None),
            Segment::Line(line) => (line.transform(tr).into(), None),
            Segment::Close(line) => (Segment::Close(line.transform(tr)), None),
            Segment::Quad(quad) => (quad.transform(tr).into(), None),
            Segment::Cubic(cubic) => (cubic.transform(tr).into(), None),
            Segment::Arc(arc) => {
                let result = arc.transform(tr);
                (result.into(), result.note())
            }
        }
    }

    /// Same geometry traversed from end to start
    ///
    /// Reversed `Close` is no longer closing anything and becomes a line.
    pub fn reverse(&self) -> Segment {
        match self {
            Segment::MoveTo(point) => Segment::MoveTo(*point),
            Segment::Line(line) | Segment::Close(line) => line.reverse().into(),
            Segment::Quad(quad) => quad.reverse().into(),
            Segment::Cubic(cubic) => cubic.reverse().into(),
            Segment::Arc(arc) => arc.reverse().into(),
        }
    }

    /// Same segment with `Close` replaced by a line
    pub(crate) fn unclosed(self) -> Segment {
        match self {
            Segment::Close(line) => Segment::Line(line),
            segment => segment,
        }
    }
}

impl From<Line> for Segment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Quad> for Segment {
    fn from(quad: Quad) -> Self {
        Self::Quad(quad)
    }
}

impl From<Cubic> for Segment {
    fn from(cubic: Cubic) -> Self {
        Self::Cubic(cubic)
    }
}

impl From<Arc> for Segment {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

impl From<ArcSegment> for Segment {
    fn from(arc: ArcSegment) -> Self {
        match arc {
            ArcSegment::Arc(arc) => Self::Arc(arc),
            ArcSegment::Line(line, _) => Self::Line(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq, Error, PI};

    fn arc() -> Segment {
        Arc::new((50.0, 20.0), (150.0, 20.0), 50.0, 50.0, 0.0, false, true).into()
    }

    #[test]
    fn test_point_at() -> Result<()> {
        let line: Segment = Line::new((0.0, 0.0), (10.0, 20.0)).into();
        assert_eq!(line.point_at(0.5)?, Point::new(5.0, 10.0));
        assert_eq!(line.point_at(1.0)?, Point::new(10.0, 20.0));

        let quad: Segment = Quad::new((0.0, 0.0), (1.0, 2.0), (2.0, 0.0)).into();
        assert_eq!(quad.point_at(0.5)?, Point::new(1.0, 1.0));

        let arc = arc();
        assert_eq!(arc.point_at(0.0)?, Point::new(50.0, 20.0));
        assert_eq!(arc.point_at(1.0)?, Point::new(150.0, 20.0));
        assert!(arc.point_at(0.5)?.is_close(Point::new(100.0, -30.0), 1e-9));

        let move_to = Segment::MoveTo(Point::new(3.0, 4.0));
        assert_eq!(move_to.point_at(0.7)?, Point::new(3.0, 4.0));
        Ok(())
    }

    #[test]
    fn test_invalid_parameter() {
        let line: Segment = Line::new((0.0, 0.0), (10.0, 20.0)).into();
        assert_eq!(line.point_at(1.5), Err(Error::InvalidParameter(1.5)));
        assert_eq!(line.derivative_at(-0.1), Err(Error::InvalidParameter(-0.1)));
        assert!(line.split_at(Scalar::NAN).is_err());
        assert!(line.cut(0.0, 2.0).is_err());
    }

    #[test]
    fn test_derivative() -> Result<()> {
        let line: Segment = Line::new((0.0, 0.0), (10.0, 20.0)).into();
        let deriv = line.derivative_at(0.3)?;
        assert_eq!(deriv.vector, Point::new(10.0, 20.0));
        assert_eq!(deriv.note, None);

        let empty: Segment = Line::new((1.0, 1.0), (1.0, 1.0)).into();
        let deriv = empty.derivative_at(0.5)?;
        assert_eq!(deriv.vector, Point::new(0.0, 0.0));
        assert_eq!(deriv.note, Some(Degenerate::ZeroLength));
        assert_eq!(empty.tangent_at(0.5)?, None);

        let move_to = Segment::MoveTo(Point::new(3.0, 4.0));
        assert_eq!(move_to.derivative_at(0.0)?.note, Some(Degenerate::ZeroLength));

        // half circle of radius 50 passed in unit of time
        let deriv = arc().derivative_at(0.5)?;
        assert!(deriv.vector.is_close(Point::new(50.0 * PI, 0.0), 1e-9));
        let tangent = arc().tangent_at(0.0)?.expect("tangent");
        assert!(tangent.is_close(Point::new(0.0, -1.0), 1e-12));
        Ok(())
    }

    #[test]
    fn test_bbox() {
        assert_eq!(Segment::MoveTo(Point::new(1.0, 1.0)).bbox(), None);
        let bbox = arc().bbox().expect("bbox");
        assert_approx_eq!(bbox.min_y(), -30.0, 1e-9);
        assert_approx_eq!(bbox.max_y(), 20.0, 1e-9);
        assert_approx_eq!(bbox.width(), 100.0, 1e-9);
    }

    #[test]
    fn test_length() {
        let line: Segment = Line::new((0.0, 0.0), (0.0, 10.0)).into();
        assert_eq!(line.length(), 10.0);
        assert_approx_eq!(arc().length(), 50.0 * PI, 1e-9);
        assert_eq!(Segment::MoveTo(Point::new(1.0, 1.0)).length(), 0.0);

        let cubic: Segment = Cubic::new((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)).into();
        let budget = QuadratureBudget {
            tolerance: 1e-10,
            max_evaluations: 16,
        };
        // budget only allows a single estimate
        assert_approx_eq!(cubic.length_with(budget), 20.0, 1e-2);
    }

    #[test]
    fn test_split() -> Result<()> {
        let close = Segment::Close(Line::new((10.0, 0.0), (0.0, 0.0)));
        let (s0, s1) = close.split_at(0.5)?;
        assert_eq!(s0, Segment::Line(Line::new((10.0, 0.0), (5.0, 0.0))));
        assert_eq!(s1, Segment::Close(Line::new((5.0, 0.0), (0.0, 0.0))));

        let move_to = Segment::MoveTo(Point::new(3.0, 4.0));
        assert_eq!(move_to.split_at(0.5)?, (move_to, move_to));

        let arc = arc();
        let (a0, a1) = arc.split_at(0.5)?;
        assert_eq!(a0.start(), arc.start());
        assert_eq!(a0.end(), a1.start());
        assert_eq!(a1.end(), arc.end());
        assert!(a0.length() > 0.0);
        assert_approx_eq!(a0.length() + a1.length(), arc.length(), 1e-9);
        Ok(())
    }

    #[test]
    fn test_cut() -> Result<()> {
        let cubic: Segment = Cubic::new((3.0, 7.0), (2.0, 8.0), (0.0, 3.0), (6.0, 5.0)).into();
        let mid = cubic.cut(0.2, 0.6)?;
        assert!(mid.start().is_close(cubic.point_at(0.2)?, 1e-12));
        assert!(mid.end().is_close(cubic.point_at(0.6)?, 1e-12));

        let back = cubic.cut(0.6, 0.2)?;
        assert!(back.start().is_close(cubic.point_at(0.6)?, 1e-12));
        assert!(back.end().is_close(cubic.point_at(0.2)?, 1e-12));

        let close = Segment::Close(Line::new((10.0, 0.0), (0.0, 0.0)));
        assert!(matches!(close.cut(0.5, 1.0)?, Segment::Close(_)));
        assert!(matches!(close.cut(0.0, 0.5)?, Segment::Line(_)));
        Ok(())
    }

    #[test]
    fn test_transform() {
        let tr = Transform::new_translate(100.0, 0.0);
        let line: Segment = Line::new((0.0, 0.0), (10.0, 0.0)).into();
        assert_eq!(
            line.transform(tr),
            Segment::Line(Line::new((100.0, 0.0), (110.0, 0.0)))
        );

        let (segment, note) = arc().transform_with_note(Transform::new_scale(1.0, 0.0));
        assert!(matches!(segment, Segment::Line(_)));
        assert_eq!(note, Some(Degenerate::SingularArcTransform));

        let close = Segment::Close(Line::new((10.0, 0.0), (0.0, 0.0)));
        assert!(matches!(close.transform(tr), Segment::Close(_)));
    }

    #[test]
    fn test_reverse() {
        let close = Segment::Close(Line::new((10.0, 0.0), (0.0, 0.0)));
        assert_eq!(close.reverse(), Segment::Line(Line::new((0.0, 0.0), (10.0, 0.0))));
        let arc = arc();
        let reversed = arc.reverse();
        assert_eq!(reversed.start(), arc.end());
        assert_eq!(reversed.end(), arc.start());
    }
}
