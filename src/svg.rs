//! SVG path data and transform list parsing
use crate::{
    Arc, Cubic, Degenerate, Error, Line, Path, Point, Quad, Result, Scalar, Segment,
    Transform, PI,
};
use std::str::FromStr;

/// Token of the SVG path mini-language
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Command letter, validity of the command is checked by the parser
    Command(u8),
    Number(Scalar),
}

/// Lazy tokenizer of the SVG path data
///
/// Yields tokens together with their byte offset in the input.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    // text containing unparsed path
    text: &'a str,
    // current offset in the text
    offset: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    /// Current byte offset in the input
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Error construction helper, `text` is the input from `start` to the current offset
    fn error(&self, start: usize, reason: &'static str) -> Error {
        let end = self.offset.max(start + 1).min(self.text.len());
        Error::Tokenize {
            offset: start,
            text: self.text.get(start..end).unwrap_or_default().to_string(),
            reason,
        }
    }

    /// Word of the input starting at `offset`, reported together with parse errors
    fn word_at(&self, offset: usize) -> &'a str {
        let rest = self.text.get(offset..).unwrap_or_default();
        let end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == ',')
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Byte at the current position
    fn current(&self) -> Option<u8> {
        self.text.as_bytes().get(self.offset).copied()
    }

    /// Check if end of the input is reached
    pub fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Consume insignificant separators
    pub fn parse_separators(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' | b',') = self.current() {
            self.offset += 1;
        }
    }

    /// Consume digits, returns `true` if at least one digit was found
    fn parse_digits(&mut self) -> bool {
        let start = self.offset;
        while let Some(b'0'..=b'9') = self.current() {
            self.offset += 1;
        }
        self.offset > start
    }

    /// Consume `+|-` sign
    fn parse_sign(&mut self) {
        if let Some(b'-' | b'+') = self.current() {
            self.offset += 1;
        }
    }

    /// Parse single number with the longest match starting at the current offset
    pub fn parse_number(&mut self) -> Result<Scalar> {
        let start = self.offset;
        self.parse_sign();
        let whole = self.parse_digits();
        let fraction = if let Some(b'.') = self.current() {
            self.offset += 1;
            self.parse_digits()
        } else {
            false
        };
        if !whole && !fraction {
            return Err(self.error(start, "malformed number"));
        }
        if let Some(b'e' | b'E') = self.current() {
            self.offset += 1;
            self.parse_sign();
            if !self.parse_digits() {
                return Err(self.error(start, "malformed exponent"));
            }
        }
        let text = &self.text[start..self.offset];
        let value = Scalar::from_str(text).map_err(|_| self.error(start, "malformed number"))?;
        if !value.is_finite() {
            return Err(self.error(start, "number is out of range"));
        }
        Ok(value)
    }

    /// Parse SVG flag `0|1` used by elliptic arc command
    ///
    /// Flag is always a single character, so `1150` is parsed as flag `1` followed by `150`.
    pub fn next_flag(&mut self) -> Result<bool> {
        self.parse_separators();
        let flag = match self.current() {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => {
                return Err(Error::Parse {
                    offset: self.offset,
                    text: self.word_at(self.offset).to_string(),
                    reason: "invalid arc flag, expected 0 or 1".to_string(),
                });
            }
        };
        self.offset += 1;
        Ok(flag)
    }

    /// Next token without consuming it
    pub fn peek(&self) -> Option<Result<(usize, Token)>> {
        let mut tokens = *self;
        tokens.next()
    }

    /// Parse identifier consisting of ascii letters
    fn parse_ident(&mut self) -> &'a str {
        let start = self.offset;
        while let Some(b'a'..=b'z' | b'A'..=b'Z') = self.current() {
            self.offset += 1;
        }
        &self.text[start..self.offset]
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<(usize, Token)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_separators();
        let offset = self.offset;
        let token = match self.current()? {
            byte if byte.is_ascii_alphabetic() => {
                self.offset += 1;
                Ok(Token::Command(byte))
            }
            b'0'..=b'9' | b'-' | b'+' | b'.' => self.parse_number().map(Token::Number),
            _ => {
                // skip the whole utf-8 character so iteration can continue
                let width = self.text[offset..].chars().next().map_or(1, char::len_utf8);
                self.offset += width;
                Err(self.error(offset, "unexpected character"))
            }
        };
        Some(token.map(|token| (offset, token)))
    }
}

/// Explicit state of the path parser
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParserState {
    /// Current point, all relative coordinates are resolved against it
    pub current: Point,
    /// Start point of the current subpath
    pub subpath_start: Point,
    /// Previously emitted segment, used to reflect control points of `S` and `T`
    pub previous: Option<Segment>,
    /// Command which is repeated when numbers follow without a new command letter
    pub command: Option<u8>,
    /// Subpath was closed and next drawing command requires implicit move
    pub closed: bool,
}

impl ParserState {
    /// Resolve point against current position if `cmd` is relative
    fn resolve(&self, cmd: u8, point: Point) -> Point {
        if cmd.is_ascii_lowercase() {
            point + self.current
        } else {
            point
        }
    }

    /// First control point of the smooth cubic `S`
    fn cubic_smooth(&self) -> Point {
        match self.previous {
            Some(Segment::Cubic(cubic)) => cubic.smooth(),
            _ => self.current,
        }
    }

    /// Control point of the smooth quad `T`
    fn quad_smooth(&self) -> Point {
        match self.previous {
            Some(Segment::Quad(quad)) => quad.smooth(),
            _ => self.current,
        }
    }
}

/// SVG path data parser
#[derive(Debug)]
pub struct PathParser<'a> {
    tokens: Tokenizer<'a>,
    state: ParserState,
    segments: Vec<Segment>,
    notes: Vec<Degenerate>,
}

impl<'a> PathParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(text),
            state: ParserState::default(),
            segments: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Current state of the parser
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// Error construction helper
    fn error(&self, offset: usize, reason: impl Into<String>) -> Error {
        Error::Parse {
            offset,
            text: self.tokens.word_at(offset).to_string(),
            reason: reason.into(),
        }
    }

    /// Parse single number argument of a command
    fn parse_scalar(&mut self) -> Result<Scalar> {
        match self.tokens.next() {
            Some(Ok((_, Token::Number(value)))) => Ok(value),
            Some(Ok((offset, Token::Command(cmd)))) => Err(self.error(
                offset,
                format!("expected number, found command '{}'", cmd as char),
            )),
            Some(Err(error)) => Err(error),
            None => Err(self.error(self.tokens.offset(), "unexpected end of input, expected number")),
        }
    }

    /// Parse pair of scalars and convert it to an absolute point
    fn parse_point(&mut self, cmd: u8) -> Result<Point> {
        let x = self.parse_scalar()?;
        let y = self.parse_scalar()?;
        Ok(self.state.resolve(cmd, Point([x, y])))
    }

    /// Append drawable segment and advance current point
    fn push(&mut self, segment: Segment) {
        self.state.current = segment.end();
        self.state.previous = Some(segment);
        self.segments.push(segment);
    }

    /// Parse the command letter or resolve implicit repeat of the previous command
    fn parse_cmd(&mut self) -> Result<Option<(usize, u8)>> {
        let (offset, token) = match self.tokens.peek() {
            None => return Ok(None),
            Some(token) => token?,
        };
        let cmd = match token {
            Token::Command(cmd) => {
                self.tokens.next();
                cmd
            }
            Token::Number(_) => match self.state.command {
                Some(cmd) => cmd,
                None if self.segments.is_empty() => {
                    return Err(self.error(offset, "path must start with a move command"));
                }
                None => return Err(self.error(offset, "number without a command")),
            },
        };
        match cmd {
            b'M' | b'm' => {}
            b'L' | b'l' | b'V' | b'v' | b'H' | b'h' | b'C' | b'c' | b'S' | b's' | b'Q'
            | b'q' | b'T' | b't' | b'A' | b'a' | b'Z' | b'z' => {
                if self.segments.is_empty() {
                    return Err(self.error(offset, "path must start with a move command"));
                }
            }
            _ => {
                return Err(self.error(offset, format!("unknown command '{}'", cmd as char)));
            }
        }
        Ok(Some((offset, cmd)))
    }

    /// Parse SVG path into a list of segments and degenerate geometry notes
    pub fn parse(mut self) -> Result<(Path, Vec<Degenerate>)> {
        while let Some((_, cmd)) = self.parse_cmd()? {
            if self.state.closed && matches!(cmd, b'Z' | b'z') {
                // repeated close has no effect
                continue;
            }
            // drawing after close continues from the start of the closed subpath
            if self.state.closed && !matches!(cmd, b'M' | b'm') {
                let start = self.state.subpath_start;
                self.segments.push(Segment::MoveTo(start));
                self.state.previous = None;
            }
            self.state.closed = false;
            self.state.command = match cmd {
                b'M' => Some(b'L'),
                b'm' => Some(b'l'),
                b'Z' | b'z' => None,
                _ => Some(cmd),
            };
            match cmd {
                b'M' | b'm' => {
                    let point = self.parse_point(cmd)?;
                    let segment = Segment::MoveTo(point);
                    self.state.subpath_start = point;
                    self.push(segment);
                }
                b'L' | b'l' => {
                    let p1 = self.parse_point(cmd)?;
                    self.push(Line::new(self.state.current, p1).into());
                }
                b'V' | b'v' => {
                    let y = self.parse_scalar()?;
                    let p0 = self.state.current;
                    let p1 = if cmd == b'v' {
                        Point::new(p0.x(), p0.y() + y)
                    } else {
                        Point::new(p0.x(), y)
                    };
                    self.push(Line::new(p0, p1).into());
                }
                b'H' | b'h' => {
                    let x = self.parse_scalar()?;
                    let p0 = self.state.current;
                    let p1 = if cmd == b'h' {
                        Point::new(p0.x() + x, p0.y())
                    } else {
                        Point::new(x, p0.y())
                    };
                    self.push(Line::new(p0, p1).into());
                }
                b'Q' | b'q' => {
                    let p1 = self.parse_point(cmd)?;
                    let p2 = self.parse_point(cmd)?;
                    self.push(Quad::new(self.state.current, p1, p2).into());
                }
                b'T' | b't' => {
                    let p1 = self.state.quad_smooth();
                    let p2 = self.parse_point(cmd)?;
                    self.push(Quad::new(self.state.current, p1, p2).into());
                }
                b'C' | b'c' => {
                    let p1 = self.parse_point(cmd)?;
                    let p2 = self.parse_point(cmd)?;
                    let p3 = self.parse_point(cmd)?;
                    self.push(Cubic::new(self.state.current, p1, p2, p3).into());
                }
                b'S' | b's' => {
                    let p1 = self.state.cubic_smooth();
                    let p2 = self.parse_point(cmd)?;
                    let p3 = self.parse_point(cmd)?;
                    self.push(Cubic::new(self.state.current, p1, p2, p3).into());
                }
                b'A' | b'a' => {
                    let rx = self.parse_scalar()?;
                    let ry = self.parse_scalar()?;
                    let x_axis_rot = self.parse_scalar()?;
                    let large_flag = self.tokens.next_flag()?;
                    let sweep_flag = self.tokens.next_flag()?;
                    let dst = self.parse_point(cmd)?;
                    let arc = Arc::new(
                        self.state.current,
                        dst,
                        rx,
                        ry,
                        x_axis_rot,
                        large_flag,
                        sweep_flag,
                    );
                    self.notes.extend(arc.note());
                    self.push(arc.into());
                }
                b'Z' | b'z' => {
                    let close = Line::new(self.state.current, self.state.subpath_start);
                    self.push(Segment::Close(close));
                    self.state.closed = true;
                }
                _ => unreachable!("command is validated by parse_cmd"),
            }
        }
        Ok((Path::new(self.segments)?, self.notes))
    }
}

/// Parse SVG path data
pub fn parse_path(text: &str) -> Result<Path> {
    parse_path_with_notes(text).map(|(path, _)| path)
}

/// Parse SVG path data, also returning notes about degenerate geometry which was replaced
pub fn parse_path_with_notes(text: &str) -> Result<(Path, Vec<Degenerate>)> {
    tracing::trace!(length = text.len(), "parsing path");
    let result = PathParser::new(text).parse();
    match &result {
        Ok((path, notes)) => tracing::trace!(
            segments = path.segments().len(),
            notes = notes.len(),
            "path parsed"
        ),
        Err(error) => tracing::trace!(%error, "path parsing failed"),
    }
    result
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(text: &str) -> Result<Path> {
        parse_path(text)
    }
}

/// Parser of the SVG transform list `translate(..) rotate(..) ...`
struct TransformParser<'a> {
    tokens: Tokenizer<'a>,
}

impl<'a> TransformParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(text),
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        let offset = self.tokens.offset();
        Error::Parse {
            offset,
            text: self.tokens.word_at(offset).to_string(),
            reason: reason.into(),
        }
    }

    fn parse_scalar(&mut self) -> Result<Scalar> {
        self.tokens.parse_separators();
        let offset = self.tokens.offset();
        self.tokens.parse_number().map_err(|_| Error::Parse {
            offset,
            text: self.tokens.word_at(offset).to_string(),
            reason: "expected number".to_string(),
        })
    }

    /// Parse optional argument, which is missing if closing bracket follows
    fn parse_scalar_opt(&mut self) -> Result<Option<Scalar>> {
        self.tokens.parse_separators();
        match self.tokens.current() {
            Some(b')') | None => Ok(None),
            Some(_) => self.parse_scalar().map(Some),
        }
    }

    /// Parse angle in degrees with optional `deg|rad` units
    fn parse_angle(&mut self) -> Result<Scalar> {
        let value = self.parse_scalar()?;
        match self.tokens.parse_ident() {
            "" | "deg" => Ok(value),
            "rad" => Ok(value * 180.0 / PI),
            _ => Err(self.error("invalid angle units")),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        self.tokens.parse_separators();
        if self.tokens.current() == Some(byte) {
            self.tokens.offset += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn parse_transform(&mut self) -> Result<Option<Transform>> {
        self.tokens.parse_separators();
        if self.tokens.is_eof() {
            return Ok(None);
        }
        let op = self.tokens.parse_ident();
        self.expect(b'(')?;
        let tr = match op {
            "matrix" => {
                let m00 = self.parse_scalar()?;
                let m10 = self.parse_scalar()?;
                let m01 = self.parse_scalar()?;
                let m11 = self.parse_scalar()?;
                let m02 = self.parse_scalar()?;
                let m12 = self.parse_scalar()?;
                Transform::new(m00, m01, m02, m10, m11, m12)
            }
            "translate" => {
                let tx = self.parse_scalar()?;
                let ty = self.parse_scalar_opt()?.unwrap_or(0.0);
                Transform::new_translate(tx, ty)
            }
            "scale" => {
                let sx = self.parse_scalar()?;
                let sy = self.parse_scalar_opt()?.unwrap_or(sx);
                Transform::new_scale(sx, sy)
            }
            "rotate" => {
                let angle = self.parse_angle()?;
                match self.parse_scalar_opt()? {
                    None => Transform::new_rotate_deg(angle),
                    Some(cx) => {
                        let cy = self.parse_scalar()?;
                        Transform::identity().rotate_around(angle, (cx, cy))
                    }
                }
            }
            "skewX" => Transform::new_skew(self.parse_angle()? * PI / 180.0, 0.0),
            "skewY" => Transform::new_skew(0.0, self.parse_angle()? * PI / 180.0),
            _ => return Err(self.error(format!("unknown transform '{}'", op))),
        };
        self.expect(b')')?;
        Ok(Some(tr))
    }
}

impl FromStr for Transform {
    type Err = Error;

    /// Parse SVG transform list, rightmost transformation is applied first
    fn from_str(text: &str) -> Result<Self> {
        let mut tr = Transform::identity();
        let mut parser = TransformParser::new(text);
        while let Some(tr_next) = parser.parse_transform()? {
            tr = tr * tr_next;
        }
        Ok(tr)
    }
}
