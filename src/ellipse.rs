use crate::{
    curve::integrate_length, BBox, Curve, Degenerate, Line, Point, QuadratureBudget, Scalar,
    Transform, GEOMETRY_TOLERANCE, PI,
};
use std::fmt;

/// Radii fitting the endpoints exactly give center solution `sqrt(radicand)` with
/// `radicand` dominated by rounding errors, values below this one are treated as zero.
const RADII_FIT_TOLERANCE: Scalar = 1e-12;

/// Elliptical Arc in center parametrization
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EllipArc {
    /// center of the ellipse
    center: Point,
    /// radius along x-axis before the rotation
    rx: Scalar,
    /// radius along y-axis before the rotation
    ry: Scalar,
    /// rotation in radians
    phi: Scalar,
    /// angular start
    eta: Scalar,
    /// angular size
    eta_delta: Scalar,
}

impl fmt::Debug for EllipArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EllipArc center:{:?} radius:{:?} phi:{:.3?} eta:{:.3?} eta_delta:{:.3?}",
            self.center,
            Point([self.rx, self.ry]),
            self.phi,
            self.eta,
            self.eta_delta
        )
    }
}

impl EllipArc {
    /// Convert arc from SVG arguments to parametric curve
    ///
    /// This code mostly comes from arc implementation notes from svg sepc
    /// (Arc to Parametric)[https://www.w3.org/TR/SVG/implnote.html#ArcImplementationNotes]
    ///
    /// Radii are expected to be non-zero and `src != dst`, otherwise `None` is returned.
    pub fn new_param(
        src: Point,
        dst: Point,
        rx: Scalar,
        ry: Scalar,
        x_axis_rot: Scalar,
        large_flag: bool,
        sweep_flag: bool,
    ) -> Option<Self> {
        let rx = rx.abs();
        let ry = ry.abs();
        if rx == 0.0 || ry == 0.0 {
            return None;
        }
        let phi = x_axis_rot.rem_euclid(360.0) * PI / 180.0;

        // Eq 5.1
        let Point([x1, y1]) = Transform::new_rotate(-phi).apply(0.5 * (src - dst));
        // scale/normalize radii (Eq 6.2-6.3)
        let s = (x1 / rx).powi(2) + (y1 / ry).powi(2);
        let (rx, ry) = if s > 1.0 {
            let s = s.sqrt();
            (rx * s, ry * s)
        } else {
            (rx, ry)
        };
        // Eq 5.2, radii which were scaled to fit the endpoints (or are within rounding
        // error of it) put the center in the middle of the chord
        let radicand = (rx * ry).powi(2) / ((rx * y1).powi(2) + (ry * x1).powi(2)) - 1.0;
        let sq = if s > 1.0 || radicand < RADII_FIT_TOLERANCE {
            0.0
        } else {
            radicand.sqrt()
        };
        let sq = if large_flag == sweep_flag { -sq } else { sq };
        let center = sq * Point([rx * y1 / ry, -ry * x1 / rx]);
        let Point([cx, cy]) = center;
        // Eq 5.3 convert center to initail coordinates
        let center = Transform::new_rotate(phi).apply(center) + 0.5 * (dst + src);
        // Eq 5.5-6
        let v0 = Point([1.0, 0.0]);
        let v1 = Point([(x1 - cx) / rx, (y1 - cy) / ry]);
        let v2 = Point([(-x1 - cx) / rx, (-y1 - cy) / ry]);
        // initial angle
        let eta = v0.angle_between(v1)?;
        //delta angle to be covered when t changes from 0..1
        let eta_delta = v1.angle_between(v2)?.rem_euclid(2.0 * PI);
        let eta_delta = if !sweep_flag && eta_delta > 0.0 {
            eta_delta - 2.0 * PI
        } else if sweep_flag && eta_delta < 0.0 {
            eta_delta + 2.0 * PI
        } else {
            eta_delta
        };
        if !center.is_finite() || !eta.is_finite() || !eta_delta.is_finite() {
            return None;
        }

        Some(Self {
            center,
            rx,
            ry,
            phi,
            eta,
            eta_delta,
        })
    }

    /// Construct arc from its center parametrization
    ///
    /// Angles `theta` and `delta` are in radians, positive `delta` corresponds
    /// to the positive-angle direction (sweep flag set).
    pub fn from_center(
        center: impl Into<Point>,
        rx: Scalar,
        ry: Scalar,
        rotation: Scalar,
        theta: Scalar,
        delta: Scalar,
    ) -> Self {
        Self {
            center: center.into(),
            rx: rx.abs(),
            ry: ry.abs(),
            phi: rotation.rem_euclid(360.0) * PI / 180.0,
            eta: theta,
            eta_delta: delta,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radii(&self) -> (Scalar, Scalar) {
        (self.rx, self.ry)
    }

    /// Rotation of the x-axis in degrees
    pub fn rotation(&self) -> Scalar {
        self.phi * 180.0 / PI
    }

    /// Angle at which arc starts (radians)
    pub fn theta(&self) -> Scalar {
        self.eta
    }

    /// Angular size of the arc (radians)
    pub fn delta(&self) -> Scalar {
        self.eta_delta
    }

    pub fn large_arc(&self) -> bool {
        self.eta_delta.abs() > PI
    }

    pub fn sweep(&self) -> bool {
        self.eta_delta > 0.0
    }

    pub fn at(&self, t: Scalar) -> Point {
        let (angle_sin, angle_cos) = (self.eta + t * self.eta_delta).sin_cos();
        let point = Point([self.rx * angle_cos, self.ry * angle_sin]);
        Transform::new_rotate(self.phi).apply(point) + self.center
    }

    pub fn deriv_at(&self, t: Scalar) -> Point {
        let (angle_sin, angle_cos) = (self.eta + t * self.eta_delta).sin_cos();
        let deriv = Point([-self.rx * angle_sin, self.ry * angle_cos]);
        self.eta_delta * Transform::new_rotate(self.phi).apply_vector(deriv)
    }

    pub fn start(&self) -> Point {
        self.at(0.0)
    }

    pub fn end(&self) -> Point {
        self.at(1.0)
    }

    /// Sub-arc covering parameter range `a..=b`
    pub fn cut(&self, a: Scalar, b: Scalar) -> Self {
        Self {
            eta: self.eta + a * self.eta_delta,
            eta_delta: (b - a) * self.eta_delta,
            ..*self
        }
    }

    /// Parameter values at which the arc reaches its extreme x or y coordinate
    fn extremities(&self) -> impl Iterator<Item = Scalar> + '_ {
        let (sin, cos) = self.phi.sin_cos();
        let theta_x = (-self.ry * sin).atan2(self.rx * cos);
        let theta_y = (self.ry * cos).atan2(self.rx * sin);
        [theta_x, theta_x + PI, theta_y, theta_y + PI]
            .into_iter()
            .flat_map(move |angle| {
                (-2..=2).map(move |k| (angle + k as Scalar * 2.0 * PI - self.eta) / self.eta_delta)
            })
            .filter(|t| (0.0..=1.0).contains(t))
    }

    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        let bbox = BBox::new(self.start(), self.end()).union_opt(init);
        if self.eta_delta == 0.0 {
            return bbox;
        }
        self.extremities()
            .fold(bbox, |bbox, t| bbox.extend(self.at(t)))
    }

    pub fn reverse(&self) -> Self {
        Self {
            center: self.center,
            rx: self.rx,
            ry: self.ry,
            phi: self.phi,
            eta: self.eta + self.eta_delta,
            eta_delta: -self.eta_delta,
        }
    }
}

/// Result of arc construction, degenerate arcs are replaced with lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcSegment {
    Arc(Arc),
    Line(Line, Degenerate),
}

/// SVG elliptical arc in the endpoint parametrization
///
/// Radii are stored after the out-of-range correction and rotation is normalized to `[0, 360)`,
/// so serializing an arc and parsing it back produces the same geometry.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    start: Point,
    end: Point,
    rx: Scalar,
    ry: Scalar,
    rotation: Scalar,
    large_arc: bool,
    sweep: bool,
    ellip: EllipArc,
}

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arc {:?} {:?} radius:{:?} rotation:{:?} large:{} sweep:{}",
            self.start,
            self.end,
            Point([self.rx, self.ry]),
            self.rotation,
            self.large_arc as u8,
            self.sweep as u8,
        )
    }
}

impl Arc {
    /// Construct arc from SVG endpoint arguments
    ///
    /// Arcs with a zero radius, or with coinciding start and end, are replaced by a line.
    pub fn new(
        start: impl Into<Point>,
        end: impl Into<Point>,
        rx: Scalar,
        ry: Scalar,
        rotation: Scalar,
        large_arc: bool,
        sweep: bool,
    ) -> ArcSegment {
        let start = start.into();
        let end = end.into();
        let line = Line::new(start, end);
        if rx == 0.0 || ry == 0.0 {
            tracing::debug!(?start, ?end, rx, ry, "zero radius arc replaced with a line");
            return ArcSegment::Line(line, Degenerate::ZeroRadiusArc);
        }
        if start == end {
            tracing::debug!(?start, "arc with coinciding endpoints replaced with an empty line");
            return ArcSegment::Line(line, Degenerate::ZeroLength);
        }
        match EllipArc::new_param(start, end, rx, ry, rotation, large_arc, sweep) {
            Some(ellip) => ArcSegment::Arc(Self {
                start,
                end,
                rx: ellip.rx,
                ry: ellip.ry,
                rotation: rotation.rem_euclid(360.0),
                large_arc,
                sweep,
                ellip,
            }),
            None => {
                tracing::debug!(?start, ?end, rx, ry, "arc can not be parametrized");
                ArcSegment::Line(line, Degenerate::ZeroLength)
            }
        }
    }

    /// Construct arc from center parametrization, flags are derived from `delta` (radians)
    pub fn from_center(
        center: impl Into<Point>,
        rx: Scalar,
        ry: Scalar,
        rotation: Scalar,
        theta: Scalar,
        delta: Scalar,
    ) -> ArcSegment {
        let ellip = EllipArc::from_center(center, rx, ry, rotation, theta, delta);
        Self::from_ellip(ellip.start(), ellip.end(), ellip, ellip.sweep())
    }

    /// Arc with exact endpoints following an already parametrized ellipse
    fn from_ellip(start: Point, end: Point, ellip: EllipArc, sweep: bool) -> ArcSegment {
        let line = Line::new(start, end);
        if ellip.rx == 0.0 || ellip.ry == 0.0 {
            tracing::debug!(?start, ?end, "zero radius arc replaced with a line");
            return ArcSegment::Line(line, Degenerate::ZeroRadiusArc);
        }
        if start == end && ellip.eta_delta.abs() >= 2.0 * PI {
            tracing::debug!(?start, "full ellipse can not be expressed as a single arc");
            return ArcSegment::Line(line, Degenerate::ZeroLength);
        }
        ArcSegment::Arc(Self {
            start,
            end,
            rx: ellip.rx,
            ry: ellip.ry,
            rotation: ellip.rotation(),
            large_arc: ellip.large_arc(),
            sweep,
            ellip,
        })
    }

    /// Center parametrization of the arc
    pub fn ellip(&self) -> EllipArc {
        self.ellip
    }

    pub fn center(&self) -> Point {
        self.ellip.center
    }

    /// Radii after the out-of-range correction
    pub fn radii(&self) -> (Scalar, Scalar) {
        (self.rx, self.ry)
    }

    /// Rotation of the x-axis in degrees, inside of `[0, 360)`
    pub fn rotation(&self) -> Scalar {
        self.rotation
    }

    /// Start angle in radians
    pub fn theta(&self) -> Scalar {
        self.ellip.eta
    }

    /// Angular size in radians, positive when `sweep` is set
    pub fn delta(&self) -> Scalar {
        self.ellip.eta_delta
    }

    pub fn large_arc(&self) -> bool {
        self.large_arc
    }

    pub fn sweep(&self) -> bool {
        self.sweep
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Evaluate arc at `t`, stored endpoints are returned for `0` and `1`
    pub fn at(&self, t: Scalar) -> Point {
        if t == 0.0 {
            self.start
        } else if t == 1.0 {
            self.end
        } else {
            self.ellip.at(t)
        }
    }

    pub fn deriv_at(&self, t: Scalar) -> Point {
        self.ellip.deriv_at(t)
    }

    /// Split arc at `t`, large arc flag is recomputed for each half
    pub fn split_at(&self, t: Scalar) -> (Self, Self) {
        let mid = self.at(t);
        let first = self.ellip.cut(0.0, t);
        let second = self.ellip.cut(t, 1.0);
        (
            Self {
                end: mid,
                large_arc: first.large_arc(),
                ellip: first,
                ..*self
            },
            Self {
                start: mid,
                large_arc: second.large_arc(),
                ellip: second,
                ..*self
            },
        )
    }

    /// Sub-arc covering parameter range `a..=b`
    pub fn cut(&self, a: Scalar, b: Scalar) -> Self {
        let ellip = self.ellip.cut(a, b);
        Self {
            start: self.at(a),
            end: self.at(b),
            large_arc: ellip.large_arc(),
            ellip,
            ..*self
        }
    }

    pub fn bbox(&self, init: Option<BBox>) -> BBox {
        let bbox = BBox::new(self.start, self.end).union_opt(init);
        if self.ellip.eta_delta == 0.0 {
            return bbox;
        }
        self.ellip
            .extremities()
            .fold(bbox, |bbox, t| bbox.extend(self.at(t)))
    }

    pub fn length(&self, budget: QuadratureBudget) -> Scalar {
        integrate_length(|t| self.ellip.deriv_at(t), budget)
    }

    pub fn reverse(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            sweep: !self.sweep,
            ellip: self.ellip.reverse(),
            ..*self
        }
    }

    /// Apply affine transformation to the arc
    ///
    /// Linear part of the transformation combined with the ellipse axes
    /// `A = M * R(phi) * diag(rx, ry)` is decomposed as `R(alpha) * diag(sx, sy) * R(beta)`
    /// which gives radii and rotation of the transformed ellipse. Sweep direction flips for
    /// transformations with negative determinant. If the ellipse collapses to a segment
    /// the arc is replaced with a line.
    pub fn transform(&self, tr: Transform) -> ArcSegment {
        let start = tr.apply(self.start);
        let end = tr.apply(self.end);
        let (sin, cos) = self.ellip.phi.sin_cos();
        let Point([a, c]) = tr.apply_vector(Point([self.rx * cos, self.rx * sin]));
        let Point([b, d]) = tr.apply_vector(Point([-self.ry * sin, self.ry * cos]));

        let e = (a + d) / 2.0;
        let f = (a - d) / 2.0;
        let g = (c + b) / 2.0;
        let h = (c - b) / 2.0;
        let q = e.hypot(h);
        let r = f.hypot(g);
        let sx = q + r;
        let sy = (q - r).abs();
        let alpha = (h.atan2(e) + g.atan2(f)) / 2.0;

        if sx <= GEOMETRY_TOLERANCE || sy <= GEOMETRY_TOLERANCE * sx {
            tracing::debug!(?start, ?end, "arc collapsed by transformation replaced with a line");
            return ArcSegment::Line(Line::new(start, end), Degenerate::SingularArcTransform);
        }
        let sweep = if tr.determinant() < 0.0 {
            !self.sweep
        } else {
            self.sweep
        };
        Arc::new(start, end, sx, sy, alpha * 180.0 / PI, self.large_arc, sweep)
    }
}

impl ArcSegment {
    /// Start point of the resulting segment
    pub fn start(&self) -> Point {
        match self {
            ArcSegment::Arc(arc) => arc.start(),
            ArcSegment::Line(line, _) => line.start(),
        }
    }

    /// End point of the resulting segment
    pub fn end(&self) -> Point {
        match self {
            ArcSegment::Arc(arc) => arc.end(),
            ArcSegment::Line(line, _) => line.end(),
        }
    }

    /// Degenerate geometry note if arc was replaced by a line
    pub fn note(&self) -> Option<Degenerate> {
        match self {
            ArcSegment::Arc(_) => None,
            ArcSegment::Line(_, note) => Some(*note),
        }
    }

    /// Get the arc if construction was not degenerate
    pub fn to_arc(&self) -> Option<Arc> {
        match self {
            ArcSegment::Arc(arc) => Some(*arc),
            ArcSegment::Line(..) => None,
        }
    }
}
