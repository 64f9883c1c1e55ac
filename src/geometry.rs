use crate::Error;
use lexical_core::FormattedSize;
use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;
pub const EPSILON_SQRT: f64 = 1.490_116_119_384_765_6e-8;
pub const PI: f64 = std::f64::consts::PI;
/// Tolerance used when comparing geometry produced by different computations
/// (round-trips, crop concatenation, continuity of transformed paths).
pub const GEOMETRY_TOLERANCE: f64 = 1e-9;

/// Format float with the shortest representation which parses back to the same value
///
/// Integral values are written without fractional part and negative zero is written
/// as `0`, so the output is stable across runs and platforms.
pub fn scalar_fmt(f: &mut impl fmt::Write, value: Scalar) -> fmt::Result {
    if value == 0.0 {
        return f.write_char('0');
    }
    let mut buffer = [0u8; f64::FORMATTED_SIZE_DECIMAL];
    let bytes = lexical_core::write(value, &mut buffer);
    // lexical only emits ascii
    let text = std::str::from_utf8(bytes).map_err(|_| fmt::Error)?;
    match text.split_once(".0e") {
        Some((mantissa, exponent)) => write!(f, "{mantissa}e{exponent}"),
        None => f.write_str(text.strip_suffix(".0").unwrap_or(text)),
    }
}

/// Value representing a 2D point or vector.
#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point(pub [Scalar; 2]);

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)?;
        Ok(())
    }
}

impl Point {
    #[inline]
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` compenent of the point
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Both components are finite
    pub fn is_finite(self) -> bool {
        self.0[0].is_finite() && self.0[1].is_finite()
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Dot product between two vectors
    pub fn dot(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * x1 + y0 * y1
    }

    /// Cross product between two vectors
    pub fn cross(self, other: Self) -> Scalar {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        x0 * y1 - y0 * x1
    }

    /// Convert vector to a unit size vector, if length is not zero
    pub fn normalize(self) -> Option<Point> {
        let Self([x, y]) = self;
        let length = self.length();
        if length < EPSILON {
            None
        } else {
            Some(Self([x / length, y / length]))
        }
    }

    /// Calculate angle (from self to the other) between two vectors
    pub fn angle_between(self, other: Self) -> Option<Scalar> {
        if self.length() * other.length() < EPSILON {
            return None;
        }
        Some(self.cross(other).atan2(self.dot(other)))
    }

    /// Reflection of the `other` point about self
    pub fn reflect(self, other: Self) -> Self {
        2.0 * self - other
    }

    /// Determine if self is close to the other within the provided tolerance
    pub fn is_close(self, other: Point, tolerance: Scalar) -> bool {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        (x0 - x1).abs() <= tolerance && (y0 - y1).abs() <= tolerance
    }
}

impl From<(Scalar, Scalar)> for Point {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl From<[Scalar; 2]> for Point {
    #[inline]
    fn from(xy: [Scalar; 2]) -> Self {
        Self(xy)
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Self::Output {
        let Point([x, y]) = other;
        Point([self * x, self * y])
    }
}

impl Div<Scalar> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: Scalar) -> Self::Output {
        let Point([x, y]) = self;
        Point([x / rhs, y / rhs])
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 + x1, y0 + y1])
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 - x1, y0 - y1])
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Self::Output {
        let Point([x, y]) = self;
        Point([-x, -y])
    }
}

/// 2D affine transformation
///
/// Stored as an array [m00, m01, m02, m10, m11, m12] but semantically corresponds to
/// a matrix:
/// ┌             ┐
/// │ m00 m01 m02 │
/// │ m10 m11 m12 │
/// │   0   0   1 │
/// └             ┘
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform([Scalar; 6]);

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        write!(f, "matrix(")?;
        for (index, value) in [m00, m10, m01, m11, m02, m12].into_iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            scalar_fmt(f, *value)?;
        }
        write!(f, ")")
    }
}

impl Transform {
    pub const fn new(
        m00: Scalar,
        m01: Scalar,
        m02: Scalar,
        m10: Scalar,
        m11: Scalar,
        m12: Scalar,
    ) -> Self {
        Self([m00, m01, m02, m10, m11, m12])
    }

    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    pub fn new_translate(tx: Scalar, ty: Scalar) -> Self {
        Self([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    pub fn new_scale(sx: Scalar, sy: Scalar) -> Self {
        Self([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Rotation by angle `a` in radians
    pub fn new_rotate(a: Scalar) -> Self {
        let (sin, cos) = a.sin_cos();
        Self([cos, -sin, 0.0, sin, cos, 0.0])
    }

    /// Rotation by angle `a` in degrees, multiples of 90 degrees are exact
    pub fn new_rotate_deg(a: Scalar) -> Self {
        let a = a.rem_euclid(360.0);
        let (sin, cos) = if a == 0.0 {
            (0.0, 1.0)
        } else if a == 90.0 {
            (1.0, 0.0)
        } else if a == 180.0 {
            (0.0, -1.0)
        } else if a == 270.0 {
            (-1.0, 0.0)
        } else {
            (a * PI / 180.0).sin_cos()
        };
        Self([cos, -sin, 0.0, sin, cos, 0.0])
    }

    pub fn new_skew(ax: Scalar, ay: Scalar) -> Self {
        Self([1.0, ax.tan(), 0.0, ay.tan(), 1.0, 0.0])
    }

    /// Matrix coefficients `[m00, m01, m02, m10, m11, m12]`
    pub fn coefficients(&self) -> [Scalar; 6] {
        self.0
    }

    /// Apply this transformation to a point
    pub fn apply(&self, point: Point) -> Point {
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let Point([x, y]) = point;
        Point([x * m00 + y * m01 + m02, x * m10 + y * m11 + m12])
    }

    /// Apply only linear part of the transformation (no translation) to a vector
    pub fn apply_vector(&self, vector: Point) -> Point {
        let Self([m00, m01, _, m10, m11, _]) = self;
        let Point([x, y]) = vector;
        Point([x * m00 + y * m01, x * m10 + y * m11])
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> Scalar {
        let Self([m00, m01, _, m10, m11, _]) = self;
        m00 * m11 - m10 * m01
    }

    /// Find the inverse transformation
    pub fn invert(&self) -> Result<Self, Error> {
        // inv([[M, v], [0, 1]]) = [[inv(M), - inv(M) * v], [0, 1]]
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let det = self.determinant();
        if det.abs() <= EPSILON {
            return Err(Error::TransformSingularity);
        }
        let o00 = m11 / det;
        let o01 = -m01 / det;
        let o10 = -m10 / det;
        let o11 = m00 / det;
        let o02 = -o00 * m02 - o01 * m12;
        let o12 = -o10 * m02 - o11 * m12;
        Ok(Self([o00, o01, o02, o10, o11, o12]))
    }

    /// Apply translation by `[tx, ty]` before self
    pub fn translate(&self, tx: Scalar, ty: Scalar) -> Self {
        self.matmul(Self::new_translate(tx, ty))
    }

    /// Apply scale transformatoin by `[sx, sy]` before self
    pub fn scale(&self, sx: Scalar, sy: Scalar) -> Self {
        self.matmul(Self::new_scale(sx, sy))
    }

    /// Apply rotation by `a` angle (radians) around the origin before self
    pub fn rotate(&self, a: Scalar) -> Self {
        self.matmul(Self::new_rotate(a))
    }

    /// Apply rotation around point `p` by angle `deg` (degrees) before self
    pub fn rotate_around(&self, deg: Scalar, p: impl Into<Point>) -> Self {
        let p = p.into();
        self.translate(p.x(), p.y())
            .matmul(Self::new_rotate_deg(deg))
            .translate(-p.x(), -p.y())
    }

    /// Apply scew transformation by `[ax, ay]` before self
    pub fn skew(&self, ax: Scalar, ay: Scalar) -> Self {
        self.matmul(Self::new_skew(ax, ay))
    }

    /// Multiply transformations in matrix form
    pub fn matmul(&self, other: Transform) -> Self {
        let Self([s00, s01, s02, s10, s11, s12]) = self;
        let Self([o00, o01, o02, o10, o11, o12]) = other;

        // s00, s01, s02 | o00, o01, o02
        // s10, s11, s12 | o10, o11, o12
        // 0  , 0  , 1   | 0  , 0  , 1
        Self([
            s00 * o00 + s01 * o10,
            s00 * o01 + s01 * o11,
            s00 * o02 + s01 * o12 + s02,
            s10 * o00 + s11 * o10,
            s10 * o01 + s11 * o11,
            s10 * o02 + s11 * o12 + s12,
        ])
    }

    /// Compare all coefficients within the tolerance
    pub fn is_close(&self, other: Transform, tolerance: Scalar) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, other: Transform) -> Self::Output {
        self.matmul(other)
    }
}

/// Bounding box with sides directed along the axes
#[derive(Clone, Copy, PartialEq)]
pub struct BBox {
    /// Point with minimal x and y values
    min: Point,
    /// Point with maximum x and y values
    max: Point,
}

impl BBox {
    /// Construct bounding box which includes points `p0` and `p1`
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        let Point([x0, y0]) = p0.into();
        let Point([x1, y1]) = p1.into();
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min: Point([x0, y0]),
            max: Point([x1, y1]),
        }
    }

    /// Point with minmum values of x and y coordianetes
    #[inline]
    pub fn min(&self) -> Point {
        self.min
    }

    /// Point with maximum values of x and y coordianetes
    #[inline]
    pub fn max(&self) -> Point {
        self.max
    }

    #[inline]
    pub fn min_x(&self) -> Scalar {
        self.min.x()
    }

    #[inline]
    pub fn min_y(&self) -> Scalar {
        self.min.y()
    }

    #[inline]
    pub fn max_x(&self) -> Scalar {
        self.max.x()
    }

    #[inline]
    pub fn max_y(&self) -> Scalar {
        self.max.y()
    }

    /// Width of the bounding box
    #[inline]
    pub fn width(&self) -> Scalar {
        self.max.x() - self.min.x()
    }

    /// Hight of the bounding box
    #[inline]
    pub fn height(&self) -> Scalar {
        self.max.y() - self.min.y()
    }

    #[inline]
    pub fn top(&self) -> Scalar {
        self.min.y()
    }

    #[inline]
    pub fn left(&self) -> Scalar {
        self.min.x()
    }

    #[inline]
    pub fn bottom(&self) -> Scalar {
        self.max.y()
    }

    #[inline]
    pub fn right(&self) -> Scalar {
        self.max.x()
    }

    #[inline]
    pub fn center_x(&self) -> Scalar {
        (self.min.x() + self.max.x()) / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> Scalar {
        (self.min.y() + self.max.y()) / 2.0
    }

    /// Determine if the point is inside of the bounding box
    pub fn contains(&self, point: Point) -> bool {
        let Point([x, y]) = point;
        self.min.x() <= x && x <= self.max.x() && self.min.y() <= y && y <= self.max.y()
    }

    /// Extend bounding box so it would contains provided point
    pub fn extend(&self, point: Point) -> Self {
        let Point([x, y]) = point;
        let Point([x0, y0]) = self.min;
        let Point([x1, y1]) = self.max;
        Self {
            min: Point([x0.min(x), y0.min(y)]),
            max: Point([x1.max(x), y1.max(y)]),
        }
    }

    /// Create bounding box the spans both bbox-es
    pub fn union(&self, other: BBox) -> Self {
        self.extend(other.min).extend(other.max)
    }

    pub fn union_opt(&self, other: Option<BBox>) -> Self {
        match other {
            Some(other) => self.union(other),
            None => *self,
        }
    }

    /// Bounding box of this box after transformation
    pub fn transform(&self, tr: Transform) -> Self {
        let Point([x0, y0]) = self.min;
        let Point([x1, y1]) = self.max;
        BBox::new(tr.apply(self.min), tr.apply(self.max))
            .extend(tr.apply(Point::new(x0, y1)))
            .extend(tr.apply(Point::new(x1, y0)))
    }
}

impl fmt::Debug for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox x=")?;
        scalar_fmt(f, self.min_x())?;
        write!(f, ", y=")?;
        scalar_fmt(f, self.min_y())?;
        write!(f, ", w=")?;
        scalar_fmt(f, self.width())?;
        write!(f, ", h=")?;
        scalar_fmt(f, self.height())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut bbox = serializer.serialize_struct("BBox", 12)?;
        bbox.serialize_field("minX", &self.min_x())?;
        bbox.serialize_field("minY", &self.min_y())?;
        bbox.serialize_field("maxX", &self.max_x())?;
        bbox.serialize_field("maxY", &self.max_y())?;
        bbox.serialize_field("width", &self.width())?;
        bbox.serialize_field("height", &self.height())?;
        bbox.serialize_field("top", &self.top())?;
        bbox.serialize_field("left", &self.left())?;
        bbox.serialize_field("bottom", &self.bottom())?;
        bbox.serialize_field("right", &self.right())?;
        bbox.serialize_field("centerX", &self.center_x())?;
        bbox.serialize_field("centerY", &self.center_y())?;
        bbox.end()
    }
}
