//! Serialization of paths into SVG path data
use crate::{scalar_fmt, Curve, Path, Point, Scalar, Segment};
use std::{fmt, io};

/// Options controlling SVG path data output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathFormat {
    /// Use lowercase commands with coordinates relative to the current point
    pub relative: bool,
    /// Emit `S` and `T` where control point is a reflection of the previous one
    pub shorthand: bool,
}

impl PathFormat {
    pub fn relative(self, relative: bool) -> Self {
        Self { relative, ..self }
    }

    pub fn shorthand(self, shorthand: bool) -> Self {
        Self { shorthand, ..self }
    }

    /// Write single command, coordinates of the `points` are adjusted in relative mode
    fn write_cmd(
        &self,
        out: &mut impl fmt::Write,
        cmd: char,
        scalars: &[Scalar],
        points: &[Point],
        current: Point,
    ) -> fmt::Result {
        if self.relative {
            out.write_char(cmd.to_ascii_lowercase())?;
        } else {
            out.write_char(cmd)?;
        }
        let mut first = true;
        let offset = if self.relative {
            current
        } else {
            Point::new(0.0, 0.0)
        };
        let coords = points
            .iter()
            .flat_map(|point| {
                let Point([x, y]) = *point - offset;
                [x, y]
            });
        for value in scalars.iter().copied().chain(coords) {
            if !first {
                out.write_char(',')?;
            }
            first = false;
            scalar_fmt(out, value)?;
        }
        Ok(())
    }

    /// Write path as SVG path data
    pub fn write(&self, path: &Path, out: &mut impl fmt::Write) -> fmt::Result {
        let mut current = Point::new(0.0, 0.0);
        let mut subpath_start = current;
        let mut previous: Option<Segment> = None;
        for segment in path.segments() {
            match segment {
                Segment::MoveTo(point) => {
                    self.write_cmd(out, 'M', &[], &[*point], current)?;
                    subpath_start = *point;
                }
                Segment::Line(line) => {
                    self.write_cmd(out, 'L', &[], &[line.end()], current)?;
                }
                Segment::Quad(quad) => {
                    let [_, p1, p2] = quad.points();
                    let smooth = match previous {
                        Some(Segment::Quad(quad)) => quad.smooth(),
                        _ => current,
                    };
                    if self.shorthand && smooth == p1 {
                        self.write_cmd(out, 'T', &[], &[p2], current)?;
                    } else {
                        self.write_cmd(out, 'Q', &[], &[p1, p2], current)?;
                    }
                }
                Segment::Cubic(cubic) => {
                    let [_, p1, p2, p3] = cubic.points();
                    let smooth = match previous {
                        Some(Segment::Cubic(cubic)) => cubic.smooth(),
                        _ => current,
                    };
                    if self.shorthand && smooth == p1 {
                        self.write_cmd(out, 'S', &[], &[p2, p3], current)?;
                    } else {
                        self.write_cmd(out, 'C', &[], &[p1, p2, p3], current)?;
                    }
                }
                Segment::Arc(arc) => {
                    let (rx, ry) = arc.radii();
                    let flags = [arc.large_arc() as u8 as Scalar, arc.sweep() as u8 as Scalar];
                    let scalars = [rx, ry, arc.rotation(), flags[0], flags[1]];
                    self.write_cmd(out, 'A', &scalars, &[arc.end()], current)?;
                }
                Segment::Close(_) => {
                    self.write_cmd(out, 'Z', &[], &[], current)?;
                }
            }
            current = match segment {
                Segment::Close(_) => subpath_start,
                segment => segment.end(),
            };
            previous = Some(*segment);
        }
        Ok(())
    }

    /// Object implementing `Display` which formats path with these options
    pub fn display<'a>(&self, path: &'a Path) -> PathDisplay<'a> {
        PathDisplay {
            path,
            format: *self,
        }
    }
}

/// Path formatted according to `PathFormat`
#[derive(Debug, Clone, Copy)]
pub struct PathDisplay<'a> {
    path: &'a Path,
    format: PathFormat,
}

impl fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format.write(self.path, f)
    }
}

impl Path {
    /// Convert path to SVG path representation
    pub fn to_svg_path(&self, format: PathFormat) -> String {
        format.display(self).to_string()
    }

    /// Save path in SVG path format
    pub fn save(&self, mut out: impl io::Write, format: PathFormat) -> io::Result<()> {
        write!(&mut out, "{}", format.display(self))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        PathFormat::default().write(self, f)
    }
}
