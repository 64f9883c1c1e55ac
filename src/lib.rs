//! SVG path geometry library: parsing, evaluation, bounding boxes, lengths, cropping and
//! serialization of SVG path data.
//!
//! Main features:
//!  - SVG path data and transform list parsing
//!  - Points and derivatives along a path by global or segment parameter
//!  - Tight bounding boxes and arc lengths
//!  - Cropping and affine transformation, arcs are transformed exactly
//!  - Lossless serialization back into path data
//!
#![deny(warnings)]

mod curve;
mod ellipse;
mod error;
mod format;
mod geometry;
mod path;
mod segment;
mod svg;
mod utils;

pub use curve::{Cubic, Curve, CurveExtremities, Line, Quad};
pub use ellipse::{Arc, ArcSegment, EllipArc};
pub use error::{Degenerate, Error, Result};
pub use format::{PathDisplay, PathFormat};
pub use geometry::{
    scalar_fmt, BBox, Point, Scalar, Transform, EPSILON, EPSILON_SQRT, GEOMETRY_TOLERANCE, PI,
};
pub use path::{Crop, Path};
pub use segment::{Derivative, Segment};
pub use svg::{parse_path, parse_path_with_notes, ParserState, PathParser, Token, Tokenizer};
pub use utils::{Array, ArrayIter, QuadratureBudget};

use error::check_param;
use utils::{integrate, quadratic_solve};
