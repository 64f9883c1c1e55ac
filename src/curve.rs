//! All the things you need to handle bezier curves

use crate::{
    integrate, quadratic_solve, ArrayIter, BBox, Point, QuadratureBudget, Scalar, Transform,
    EPSILON,
};
use std::fmt;

pub type CurveExtremities = ArrayIter<[Option<Scalar>; 4]>;

/// Set of operations common to all bezier curves.
///
/// Parameter values passed to these methods are expected to be in `0.0..=1.0`,
/// validation happens at the `Segment` level.
pub trait Curve: Sized + Copy {
    /// Apply affine transformation to the curve
    fn transform(&self, tr: Transform) -> Self;

    /// Point at which curve starts
    fn start(&self) -> Point;

    /// Point at which curve ends
    fn end(&self) -> Point;

    /// Evaluate curve at parameter value `t` in (0.0..=1.0)
    fn at(&self, t: Scalar) -> Point;

    /// Derivative with respect to t, `deriv_at(t) = [curve'(t)_x, curve'(t)_y]`
    fn deriv_at(&self, t: Scalar) -> Point;

    /// Split the curve at prameter value `t`
    fn split_at(&self, t: Scalar) -> (Self, Self);

    /// Create subcurve specified starting at parameter value `a` and ending at value `b`
    fn cut(&self, a: Scalar, b: Scalar) -> Self {
        let tail = if a > 0.0 { self.split_at(a).1 } else { *self };
        if a >= 1.0 {
            return tail;
        }
        let t = (b - a) / (1.0 - a);
        if t >= 1.0 { tail } else { tail.split_at(t).0 }
    }

    /// Extend provided `init` bounding box with the bounding box of the curve
    fn bbox(&self, init: Option<BBox>) -> BBox;

    /// Identical curve but directed from end to start, instead of start to end.
    fn reverse(&self) -> Self;

    /// Find all extermities of the curve `curve'(t)_x = 0 || curve'(t)_y = 0`
    fn extremities(&self) -> CurveExtremities;

    /// Length of the curve, integral of `|curve'(t)|` over `0.0..=1.0`
    fn length(&self, budget: QuadratureBudget) -> Scalar {
        integrate_length(|t| self.deriv_at(t), budget)
    }
}

/// Integrate length of the curve given its derivative
pub(crate) fn integrate_length(deriv: impl Fn(Scalar) -> Point, budget: QuadratureBudget) -> Scalar {
    let result = integrate(|t| deriv(t).length(), 0.0, 1.0, budget);
    if result.exhausted {
        tracing::debug!(
            evaluations = result.evaluations,
            estimate = result.value,
            "length quadrature exhausted its budget"
        );
    }
    result.value
}

// -----------------------------------------------------------------------------
// Line
// -----------------------------------------------------------------------------

/// Line segment curve
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    /// Start and end points of the line
    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    /// Direction vector associated with the line segment
    pub fn direction(&self) -> Point {
        self.end() - self.start()
    }
}

impl Curve for Line {
    fn transform(&self, tr: Transform) -> Self {
        let Line([p0, p1]) = self;
        Self([tr.apply(*p0), tr.apply(*p1)])
    }

    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[1]
    }

    fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1]) = self;
        if t == 1.0 {
            return *p1;
        }
        (1.0 - t) * *p0 + t * *p1
    }

    fn deriv_at(&self, _t: Scalar) -> Point {
        self.direction()
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        let Self([p0, p1]) = self;
        let mid = self.at(t);
        (Self([*p0, mid]), Self([mid, *p1]))
    }

    fn cut(&self, a: Scalar, b: Scalar) -> Self {
        Self([self.at(a), self.at(b)])
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1]) = *self;
        BBox::new(p0, p1).union_opt(init)
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1]) = *self;
        Self([p1, p0])
    }

    fn extremities(&self) -> CurveExtremities {
        CurveExtremities::new()
    }

    /// Lines are measured in closed form
    fn length(&self, _budget: QuadratureBudget) -> Scalar {
        let Self([p0, p1]) = self;
        p0.dist(*p1)
    }
}

// -----------------------------------------------------------------------------
// Quadratic bezier curve
// -----------------------------------------------------------------------------

/// Quadratic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 2 * p0 + 2 * (1 - t) * t * p1 + t ^ 2 * p2`
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quad(pub [Point; 3]);

impl fmt::Debug for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Quad([p0, p1, p2]) = self;
        write!(f, "Quad {:?} {:?} {:?}", p0, p1, p2)
    }
}

impl Quad {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into(), p2.into()])
    }

    pub fn points(&self) -> [Point; 3] {
        self.0
    }

    /// Find smooth point used by SVG parser
    pub fn smooth(&self) -> Point {
        let Quad([_p0, p1, p2]) = self;
        p2.reflect(*p1)
    }

    /// Hodograph of the curve, line whose points are derivatives of the curve
    pub fn deriv(&self) -> Line {
        let Self([p0, p1, p2]) = *self;
        Line::new(2.0 * (p1 - p0), 2.0 * (p2 - p1))
    }
}

impl Curve for Quad {
    fn transform(&self, tr: Transform) -> Self {
        let Quad([p0, p1, p2]) = self;
        Self([tr.apply(*p0), tr.apply(*p1), tr.apply(*p2)])
    }

    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[2]
    }

    fn at(&self, t: Scalar) -> Point {
        // at(t) =
        //   (1 - t) ^ 2 * p0 +
        //   2 * (1 - t) * t * p1 +
        //   t ^ 2 * p2
        let Self([p0, p1, p2]) = *self;
        if t == 1.0 {
            return p2;
        }
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        t_2 * p0 + 2.0 * t1 * t_1 * p1 + t2 * p2
    }

    fn deriv_at(&self, t: Scalar) -> Point {
        self.deriv().at(t)
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        // https://pomax.github.io/bezierinfo/#matrixsplit
        let Self([p0, p1, p2]) = *self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let mid = t_2 * p0 + 2.0 * t1 * t_1 * p1 + t2 * p2;
        (
            Self([p0, t_1 * p0 + t * p1, mid]),
            Self([mid, t_1 * p1 + t * p2, p2]),
        )
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1, p2]) = self;
        let bbox = BBox::new(*p0, *p2).union_opt(init);
        if bbox.contains(*p1) {
            return bbox;
        }
        self.extremities()
            .fold(bbox, |bbox, t| bbox.extend(self.at(t)))
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2]) = *self;
        Self([p2, p1, p0])
    }

    fn extremities(&self) -> CurveExtremities {
        let mut result = CurveExtremities::new();
        let Self([p0, p1, p2]) = self;
        let Point([a0, a1]) = *p2 - 2.0 * *p1 + *p0;
        let Point([b0, b1]) = *p1 - *p0;
        // curve'(t)_x = 0
        if a0.abs() > EPSILON {
            let t0 = -b0 / a0;
            if (0.0..=1.0).contains(&t0) {
                result.push(t0)
            }
        }
        // curve'(t)_y = 0
        if a1.abs() > EPSILON {
            let t1 = -b1 / a1;
            if (0.0..=1.0).contains(&t1) {
                result.push(t1)
            }
        }
        result
    }
}

// -----------------------------------------------------------------------------
// Cubic bezier curve
// -----------------------------------------------------------------------------

/// Cubic bezier curve
///
/// Polynimial form:
/// `(1 - t) ^ 3 * p0 + 3 * (1 - t) ^ 2 * t * p1 + 3 * (1 - t) * t ^ 2 * p2 + t ^ 3 * p3`
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cubic(pub [Point; 4]);

impl fmt::Debug for Cubic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cubic([p0, p1, p2, p3]) = self;
        write!(f, "Cubic {:?} {:?} {:?} {:?}", p0, p1, p2, p3)
    }
}

impl Cubic {
    pub fn new(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self([p0.into(), p1.into(), p2.into(), p3.into()])
    }

    pub fn points(&self) -> [Point; 4] {
        self.0
    }

    /// Find smooth point used by SVG parser
    pub fn smooth(&self) -> Point {
        let Cubic([_p0, _p1, p2, p3]) = self;
        p3.reflect(*p2)
    }

    /// Hodograph of the curve, quadratic curve whose points are derivatives of the curve
    pub fn deriv(&self) -> Quad {
        let Self([p0, p1, p2, p3]) = *self;
        Quad::new(3.0 * (p1 - p0), 3.0 * (p2 - p1), 3.0 * (p3 - p2))
    }
}

impl Curve for Cubic {
    fn transform(&self, tr: Transform) -> Self {
        let Cubic([p0, p1, p2, p3]) = self;
        Self([tr.apply(*p0), tr.apply(*p1), tr.apply(*p2), tr.apply(*p3)])
    }

    fn start(&self) -> Point {
        self.0[0]
    }

    fn end(&self) -> Point {
        self.0[3]
    }

    fn at(&self, t: Scalar) -> Point {
        // at(t) =
        //   (1 - t) ^ 3 * p0 +
        //   3 * (1 - t) ^ 2 * t * p1 +
        //   3 * (1 - t) * t ^ 2 * p2 +
        //   t ^ 3 * p3
        let Self([p0, p1, p2, p3]) = *self;
        if t == 1.0 {
            return p3;
        }
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let (t3, t_3) = (t2 * t1, t_2 * t_1);
        t_3 * p0 + 3.0 * t1 * t_2 * p1 + 3.0 * t2 * t_1 * p2 + t3 * p3
    }

    fn deriv_at(&self, t: Scalar) -> Point {
        self.deriv().at(t)
    }

    fn split_at(&self, t: Scalar) -> (Self, Self) {
        // https://pomax.github.io/bezierinfo/#matrixsplit
        let Self([p0, p1, p2, p3]) = *self;
        let (t1, t_1) = (t, 1.0 - t);
        let (t2, t_2) = (t1 * t1, t_1 * t_1);
        let (t3, t_3) = (t2 * t1, t_2 * t_1);
        let mid = t_3 * p0 + 3.0 * t1 * t_2 * p1 + 3.0 * t2 * t_1 * p2 + t3 * p3;
        let c0 = Self([
            p0,
            t_1 * p0 + t * p1,
            t_2 * p0 + 2.0 * t * t_1 * p1 + t2 * p2,
            mid,
        ]);
        let c1 = Self([
            mid,
            t_2 * p1 + 2.0 * t * t_1 * p2 + t2 * p3,
            t_1 * p2 + t * p3,
            p3,
        ]);
        (c0, c1)
    }

    fn bbox(&self, init: Option<BBox>) -> BBox {
        let Self([p0, p1, p2, p3]) = self;
        let bbox = BBox::new(*p0, *p3).union_opt(init);
        if bbox.contains(*p1) && bbox.contains(*p2) {
            return bbox;
        }
        self.extremities()
            .fold(bbox, |bbox, t| bbox.extend(self.at(t)))
    }

    fn reverse(&self) -> Self {
        let Self([p0, p1, p2, p3]) = *self;
        Self([p3, p2, p1, p0])
    }

    fn extremities(&self) -> CurveExtremities {
        let Self([p0, p1, p2, p3]) = *self;
        let Point([a0, a1]) = -1.0 * p0 + 3.0 * p1 - 3.0 * p2 + 1.0 * p3;
        let Point([b0, b1]) = 2.0 * p0 - 4.0 * p1 + 2.0 * p2;
        let Point([c0, c1]) = -1.0 * p0 + p1;

        // Solve for `curve'(t)_x = 0 || curve'(t)_y = 0`
        quadratic_solve(a0, b0, c0)
            .chain(quadratic_solve(a1, b1, c1))
            .filter(|t| *t >= 0.0 && *t <= 1.0)
            .collect::<CurveExtremities>()
    }
}
