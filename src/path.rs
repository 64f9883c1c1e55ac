//! Path as a sequence of segments, evaluation by global parameter and cropping
use crate::{
    check_param, BBox, Curve, Degenerate, Derivative, Error, Point, QuadratureBudget, Result,
    Scalar, Segment, Transform,
};
use std::fmt;

/// Sequence of segments where every `MoveTo` starts a new subpath
///
/// Path is either empty or starts with `MoveTo`, every drawable segment starts where previous
/// one ends, and `Close` is the last segment of its subpath ending at the subpath start.
#[derive(Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "Empty")
        } else {
            f.debug_list().entries(self.segments.iter()).finish()
        }
    }
}

/// Result of cropping path at a single parameter value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crop {
    /// Crop at `0.0`, nothing precedes the full path
    Start(Path),
    /// Crop strictly inside the path
    Split(Path, Path),
    /// Crop at `1.0`, nothing follows the full path
    End(Path),
}

impl Crop {
    /// Pair of paths before and after crop point, missing part is an empty path
    pub fn into_pair(self) -> (Path, Path) {
        match self {
            Crop::Start(path) => (Path::empty(), path),
            Crop::Split(head, tail) => (head, tail),
            Crop::End(path) => (path, Path::empty()),
        }
    }
}

impl Path {
    /// Create path from the list of segments, validating path invariants
    pub fn new(segments: Vec<Segment>) -> Result<Self> {
        let invalid = |index, reason| Error::InvalidPath { index, reason };
        let mut subpath_start = match segments.first() {
            None => return Ok(Self::empty()),
            Some(Segment::MoveTo(point)) => *point,
            Some(_) => return Err(invalid(0, "path must start with a move")),
        };
        for (index, segment) in segments.iter().enumerate() {
            if !segment.start().is_finite() || !segment.end().is_finite() {
                return Err(invalid(index, "segment has non-finite coordinates"));
            }
            match segment {
                Segment::MoveTo(point) => {
                    subpath_start = *point;
                    continue;
                }
                Segment::Close(line) => {
                    if line.end() != subpath_start {
                        return Err(invalid(index, "close does not end at the subpath start"));
                    }
                    match segments.get(index + 1) {
                        None | Some(Segment::MoveTo(_)) => {}
                        Some(_) => {
                            return Err(invalid(index + 1, "segment follows close without a move"));
                        }
                    }
                }
                _ => {}
            }
            if segment.start() != segments[index - 1].end() {
                return Err(invalid(
                    index,
                    "segment does not start at the end of the previous segment",
                ));
            }
        }
        Ok(Self { segments })
    }

    /// Segments which are already known to satisfy path invariants
    fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Iterator over subpaths, each one starts with `MoveTo`
    pub fn subpaths(&self) -> impl Iterator<Item = &[Segment]> + '_ {
        let mut rest = self.segments.as_slice();
        std::iter::from_fn(move || {
            if rest.is_empty() {
                return None;
            }
            let end = rest[1..]
                .iter()
                .position(|segment| matches!(segment, Segment::MoveTo(_)))
                .map_or(rest.len(), |index| index + 1);
            let (subpath, tail) = rest.split_at(end);
            rest = tail;
            Some(subpath)
        })
    }

    /// Number of drawable (non `MoveTo`) segments
    pub fn drawable_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_drawable()).count()
    }

    /// Find segment index and local parameter corresponding to global parameter `t`
    ///
    /// Global parameter is distributed uniformly over drawable segments, segment `i` out
    /// of `n` covers `[i/n, (i+1)/n]`. Boundary values belong to the following segment,
    /// except for `1.0` which is the end of the last one.
    pub fn locate(&self, t: Scalar) -> Result<(usize, Scalar)> {
        let t = check_param(t)?;
        let count = self.drawable_count();
        if count == 0 {
            return Err(Error::EmptyPath);
        }
        let pos = t * count as Scalar;
        let (drawable, local) = match pos.floor() as usize {
            index if index >= count => (count - 1, 1.0),
            index => (index, pos - index as Scalar),
        };
        let index = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.is_drawable())
            .nth(drawable)
            .map(|(index, _)| index)
            .ok_or(Error::EmptyPath)?;
        Ok((index, local))
    }

    /// Point at global parameter `t`
    pub fn point_at(&self, t: Scalar) -> Result<Point> {
        let (index, local) = self.locate(t)?;
        self.segments[index].point_at(local)
    }

    /// Derivative at global parameter `t` with respect to the local parameter of the segment
    pub fn derivative_at(&self, t: Scalar) -> Result<Derivative> {
        let (index, local) = self.locate(t)?;
        self.segments[index].derivative_at(local)
    }

    /// Unit tangent at global parameter `t`
    pub fn tangent_at(&self, t: Scalar) -> Result<Option<Point>> {
        let (index, local) = self.locate(t)?;
        self.segments[index].tangent_at(local)
    }

    /// Tight bounding box, `None` if path has no drawable segments
    pub fn bbox(&self) -> Option<BBox> {
        self.segments
            .iter()
            .filter_map(Segment::bbox)
            .reduce(|acc, bbox| acc.union(bbox))
    }

    /// Total length of all segments
    pub fn length(&self) -> Scalar {
        self.length_with(QuadratureBudget::default())
    }

    pub fn length_with(&self, budget: QuadratureBudget) -> Scalar {
        self.segments
            .iter()
            .map(|segment| segment.length_with(budget))
            .sum()
    }

    /// Apply affine transformation to all segments
    pub fn transform(&self, tr: Transform) -> Path {
        self.transform_with_notes(tr).0
    }

    /// Apply affine transformation, also returning notes for arcs collapsed into lines
    pub fn transform_with_notes(&self, tr: Transform) -> (Path, Vec<Degenerate>) {
        let mut notes = Vec::new();
        let segments = self
            .segments
            .iter()
            .map(|segment| {
                let (segment, note) = segment.transform_with_note(tr);
                notes.extend(note);
                segment
            })
            .collect();
        (Self::from_segments(segments), notes)
    }

    /// Same geometry traversed in the opposite direction
    ///
    /// Subpaths are emitted in reverse order, each one starting at the end of the original.
    /// Reversed subpaths do not contain `Close` it is replaced by a line.
    pub fn reverse(&self) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len());
        let subpaths: Vec<_> = self.subpaths().collect();
        for subpath in subpaths.into_iter().rev() {
            let Some(last) = subpath.last() else {
                continue;
            };
            segments.push(Segment::MoveTo(last.end()));
            segments.extend(
                subpath
                    .iter()
                    .rev()
                    .filter(|segment| segment.is_drawable())
                    .map(Segment::reverse),
            );
        }
        Self::from_segments(segments)
    }

    /// Crop path at global parameter `t`
    pub fn crop(&self, t: Scalar) -> Result<Crop> {
        let t = check_param(t)?;
        if t == 0.0 {
            return Ok(Crop::Start(self.clone()));
        }
        if t == 1.0 {
            return Ok(Crop::End(self.clone()));
        }
        let head = self.cropped(0.0, t)?;
        let tail = self.cropped(t, 1.0)?;
        Ok(Crop::Split(head, tail))
    }

    /// Sub-path covering global parameter range between `t0` and `t1`
    ///
    /// If `t0 > t1` resulting path is reversed. Every part starts with its own `MoveTo`,
    /// `Close` which no longer completes its original subpath is replaced by a line.
    pub fn cropped(&self, t0: Scalar, t1: Scalar) -> Result<Path> {
        let t0 = check_param(t0)?;
        let t1 = check_param(t1)?;
        if t0 > t1 {
            return Ok(self.cropped(t1, t0)?.reverse());
        }
        let count = self.drawable_count();
        if count == 0 {
            return Err(Error::EmptyPath);
        }
        if t0 == t1 {
            return Ok(Self::from_segments(vec![Segment::MoveTo(self.point_at(t0)?)]));
        }
        let pos0 = t0 * count as Scalar;
        let pos1 = t1 * count as Scalar;

        let mut segments = Vec::new();
        // next drawable segment is the first one of the original subpath
        let mut subpath_first = false;
        // current output subpath starts at the original move
        let mut at_subpath_start = false;
        // output needs new move before next segment
        let mut needs_move = true;
        let mut drawable = 0;
        for segment in self.segments.iter() {
            if let Segment::MoveTo(_) = segment {
                subpath_first = true;
                needs_move = true;
                continue;
            }
            let low = drawable as Scalar;
            let high = low + 1.0;
            drawable += 1;
            let first = std::mem::replace(&mut subpath_first, false);
            if low >= pos1 {
                break;
            }
            if high <= pos0 {
                continue;
            }
            let a = pos0.max(low) - low;
            let b = pos1.min(high) - low;
            let piece = if a == 0.0 && b == 1.0 {
                *segment
            } else {
                segment.cut(a, b)?
            };
            if needs_move {
                segments.push(Segment::MoveTo(piece.start()));
                at_subpath_start = first && a == 0.0;
                needs_move = false;
            }
            segments.push(if at_subpath_start {
                piece
            } else {
                piece.unclosed()
            });
        }
        Ok(Self::from_segments(segments))
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl TryFrom<Vec<Segment>> for Path {
    type Error = Error;

    fn try_from(segments: Vec<Segment>) -> Result<Self> {
        Self::new(segments)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Path {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = std::borrow::Cow::<'de, str>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{assert_approx_eq, Line, GEOMETRY_TOLERANCE};

    const SQUIRREL: &str = r#"
    M12 1C9.79 1 8 2.31 8 3.92c0 1.94.5 3.03 0 6.08 0-4.5-2.77-6.34-4-6.34.05-.5-.48
    -.66-.48-.66s-.22.11-.3.34c-.27-.31-.56-.27-.56-.27l-.13.58S.7 4.29 .68 6.87c.2.33
    1.53.6 2.47.43.89.05.67.79.47.99C2.78 9.13 2 8 1 8S0 9 1 9s1 1 3 1c-3.09 1.2 0 4 0 4
    H3c-1 0-1 1-1 1h6c3 0 5-1 5-3.47 0-.85-.43-1.79 -1-2.53-1.11-1.46.23-2.68 1-2
    .77.68 3 1 3-2 0-2.21-1.79-4-4-4zM2.5 6 c-.28 0-.5-.22-.5-.5s.22-.5.5-.5.5.22.5.5
    -.22.5-.5.5z
    "#;

    /// Paths covering all commands, used by property tests across the crate
    pub(crate) const CORPUS: &[&str] = &[
        SQUIRREL,
        "M0,0L10,0l10,0",
        "m0,0h10",
        "M10,20 L30,40 H50 V60 h5 v5 l-5-5 Z",
        "M0,0 Q5,10 10,0 T20,0 t10,0",
        "M0,0 C0,10 10,10 10,0 S20,-10 20,0 s10,10 10,0z",
        "M50,20 A50,50 0 0,1 150,20 a25,10 30 1,0 40,40",
        "M10,10 l5,0 z m1,1 l1,0 l0,1 z L3,3",
        "M0,0 A10,20 45 1 1 30,10 L40,0 A5,5 0 0 0 50,0 Z",
        "M0 0 1 1 2 0 3 1 M10 10 20 20",
    ];

    /// Reference path data set: lines, curves, arcs, smooth commands, large and tiny numbers
    pub(crate) const PATH_DATA: &[&str] = &[
        "m0,0l10,0",
        "M0,0L10,0",
        "M0,0L10,0M0,0L10,0",
        "M0,0L10,0m0,0L10,0",
        "M0,0L10,0l10,0",
        "m0,0h10",
        "M50,0H40",
        "m0,0v10",
        "M0,50V40",
        "m0,0h10z",
        "m0,0h10Z",
        "M100,25C10,90,110,100,150,195",
        "m100,25c-90,65,10,75,50,170",
        "M100,200 C100,100 250,100 250,200 S400,300 400,200",
        "M100,200 c0,-100 150,-100 150,0 s150,100 150,0",
        "M100,200 S400,300 400,200",
        "M100,200 s300,100 300,0",
        "M200,300 Q400,50 600,300",
        "M200,300 q200,-250 400,0",
        "M0,100 Q50,-50 100,100 T200,100",
        "M0,100 q50,-150 100,0 t100,0",
        "M0,100 Q50,-50 100,100 T200,100 T300,100",
        "M0,100 T200,100",
        "M0,100 t200,100",
        "M50,20A50,50,0,0,0,150,20",
        "M50,20A50,50,0,0,0,150,20Z",
        "M50,20a50,50,0,0,0,100,0",
        "M137.69692698614858,194.75002119995685L140.5811864522362,200.02784443179866\
         L145.21300688556522,205.5730786360974L151.96589957664872,210.57916233863872\
         L157.11811791245674,216.958427402148L160.38007797705498,217.5517159659712\
         L170.86150068075614,226.50677931755828L184.78753673995035,229.40372164152683\
         L188.48682846625186,231.74464203758626L194.96220985606624,232.24831761753774\
         L199.0151340580992,235.98908347947008L200.33619274822317,239.1501414459547\
         L208.1352797340722,240.97174662891314L214.55451361971706,243.72269753526453\
         L217.92992784370034,242.79750552259512L222.422382828094,245.95312239185364\
         L226.33834281296274,246.6562900586742L232.1785094475572,250.37579609444018\
         L247.67126011118384,253.41216989328635L249.86860925383274,259.67235659237457\
         L258.0102758151366,263.53584756964034L265.7094539012957,271.9301187141604\
         L275.3442092382522,280.797134878233L292.5367640425162,281.439215857073\
         L300.3900165167456,283.19277126134665L317.1541418598862,288.08140107614616\
         L325.68746219694265,282.98731281377525L334.20900545032936,279.42687578910136\
         L341.89090086141164,279.65662234387565L344.6975683081848,280.71420717321774\
         L352.73368224017975,278.81635544720564L357.8378453664788,280.8621873013037\
         L360.27780217558785,280.351713437805L366.10835670115375,282.6140677325477\
         L369.09298803246423,282.32880268111796L376.79699044083907,278.5755589629451\
         L382.0884404158815,278.74374570898004L386.6969703376813,280.7868194847831\
         L391.5118882394122,287.6851129793625L401.6043570144851,289.4523241399227\
         L418.32264375071753,303.60974325767233L416.56748832810626,308.8321991418072\
         L421.85304030224415,309.8073672357337L426.9233662531078,306.30064325383734\
         L428.39794675453993,303.9729502861741L433.7178516894217,301.12745610964237\
         L435.55518815288303,303.2790040699963L429.98849506106274,310.0981677440247\
         L430.3920258191735,315.904266873991L431.8697365975619,320.41310652120495\
         L431.51963155330213,325.7229788905284L437.6672507546333,329.58621381302714\
         L437.3918696288182,334.8637567665635L439.98603260092784,334.44629338092415\
         L446.1764597142119,341.8547790472293L453.6668527230894,346.9381545890387\
         L457.5294853076264,347.9669234517022L462.48118856871827,352.94569484976665\
         L466.87142760911547,353.62325409732335L470.1647323309724,356.65500849656917\
         L478.52329558789495,361.73028232300277L486.88560554821527,370.7823973990582\
         L489.73056770534674,376.3046557640006L489.2413765676388,379.0217789927731\
         L492.6796339000674,384.9123226146289L500.3373626256565,376.6596349946864\
         L507.84942333888387,380.4063594074064L511.8061547036337,380.01502900094323",
        "M240,100C290,100,240,225,290,200S290,75,340,50S515,100,390,150S215,200,90,150\
         S90,25,140,50S140,175,190,200S190,100,240,100",
        "m240,100c50,0,0,125,50,100s0,-125,50,-150s175,50,50,100s-175,50,-300,0s0,-125,50,-100\
         s0,125,50,150s0,-100,50,-100",
        "M100,100h100v100h-100Zm200,0h1v1h-1z",
        "M470,623Q468,627,467,629",
        "M0,0\
         L31.081620209059235,726.1062992125984\
         Q41.44216027874565,726.1062992125984,41.44216027874565,726.1062992125984",
        "M10,30 A20,20,0,0,1,50,30 A20,20,0,0,1,90,30 Q90,60,50,90 Q10,60,10,30 Z",
        "M 80 80 A 45 45, 0, 0, 0, 125 125 L 125 80 Z",
        "M 230 80 A 45 45, 0, 1, 0, 275 125 L 275 80 Z",
        "M 80 230 A 45 45, 0, 0, 1, 125 275 L 125 230 Z",
        "M 230 230 A 45 45, 0, 1, 1, 275 275 L 275 230 Z",
        "M 10 80 Q 52.5 10, 95 80 T 180 80",
        "M 100,100 L 300,100 L 200,300 Z",
        "M 0,0 L 50,20 M 100,100 L 300,100 L 200,300 Z",
        "M 100,100 L 200,200",
        "M 100,200 L 200,100 L -100,-200",
        "M 100,200 C 100,100 250,100 250,200 S 400,300 400,200",
        "M 100,200 C 100,100 400,100 400,200",
        "M 100,500 C 25,400 475,400 400,500",
        "M 100,800 C 175,700 325,700 400,800",
        "M 600,200 C 675,100 975,100 900,200",
        "M 600,500 C 600,350 900,650 900,500",
        "M 600,800 C 625,700 725,700 750,800 S 875,900 900,800",
        "M 200,300 Q 400,50 600,300 T 1000,300",
        "M -3.4E+38,3.4E+38 L -3.4E-38,3.4E-38",
        "M 600,350 L 650,325 A 25,25 -30 0,1 700,300 L 750,275",
        "M352,5779.724c499,2-3-89,496-84",
        "M478,2877.472c247,3-255-88,244-83",
        "M478,2392.817c247,3-246,14,244-83",
        "M478,3361.031c247-69-246,14,244-83",
        "M500.5,1403.542c273-45-220,38,199-37",
        "M500.5,2587.469c215,96-220,38,199-37",
        "M406,1823.559c404,146-31,88,388,13",
        "M406,2064.553c86,150-31,88,388,13",
        "M406,4966.489c261,149-31,88,388,13",
        "M406,4484.496c382,141-31,88,388,13",
        "M394.5,6471.436c405,75-8,22,411-53",
        "M394.5,5279.895c449-4-8,22,411-53",
        "M394.5,6247.762c449-4,0,0,411-53",
        "M489.5,3565.342c449-4,0,0,221-8",
        "M479.072,3809.049c529-26,0,0,167-6",
        "M516.5,1644.744c352-80,0,0,167-6",
        "M798.002,4082.546c-529,7-523-141.999-12-38.999",
        "M801.469,6774.896c-550.999-16-522.999-142-1-140",
        "M799.765,4354.818c-542,32-523-142-1-140",
        "M770.439,7017.016c-380.001-148-523.001-142-1-140",
        "M769.988,274.009C390.988,266.009,247.988,272.009,769.988,274.009",
        "M794.813,1141.56C277.813,1150.56,272.813,1139.56,794.813,1141.56",
        "M785.217,901.998C320.216,900.998,263.217,899.998,785.217,901.998",
        "M347.5,462.172c505-17-17-18,505-16",
        "M339.5,663.235c521,0-1-1,521,1",
        "M377.5,5495.454c445,0-77-1,445,1",
        "M377.5,5978.951c372,1-77-1,445,1",
        "M731.169,7500.317c-551-16-74.463,21-1-140",
        "M731.169,7209.412c-551-4.777-74.463,6.271-1-41.811",
        "M1075.169,7682.533c-1996.043-2.379-269.747,3.121-3.622-20.811",
        "M612.657,8228.399c-57.988-464.354,2.249,314.834-1-140",
        "M748.791,9246.203c-48.561-445.45,0,0,0-246.418",
        "M407.051,9488.014c8.771-403.029,0,0,0-246.416",
        "M492,7954.201c258.471-128.029-126-68.002,216-56",
        "M529.006,8937.162c232.271-130.145,105.271-167.076,123.23-0.48",
        "M532.461,8453.83c213.563-131.8,105.271-167.076,123.232-0.479",
        "M538.385,8695.068c169.485-128.53,105.27-167.075,123.23-0.479",
        "M177.365,9657.754 C2314.484,9433.758-164.635,9645.75,177.365,9657.754",
        "M177.365,9863.064 C2314.484,9798.949-164.635,9859.629,177.365,9863.064",
        "M177.365,10098.412 C2314.482,10062.607-164.635,10096.492,177.365,10098.412",
        "M121.108,10352.402c2137.118-35.807,82,41-10.136-40.705",
        "M163.396,10885.141 C453.589,10902.539,162.471,10562.539,163.396,10885.141",
        "M228.071,10627.99 C1915.305,10622.137,202.129,10387.359,228.071,10627.99",
        "M152.222,10991.809 C1084.453,10959.602,1582.453,10868.578,152.222,10991.809",
        "M 10 315 L 110 215 A 36 60 0 0 1 150.71 170.29 \
         L 172.55 152.45 A 30 50 -45 0 1 215.1 109.9 L 315 10",
        "M396 140a176 112 0 0 1 -352 0a176 112 0 0 1 352 0z",
    ];

    /// Assert that two paths describe the same geometry
    pub(crate) fn assert_path_close(p0: &Path, p1: &Path) {
        assert_eq!(p0.segments().len(), p1.segments().len(), "{:?} != {:?}", p0, p1);
        for (s0, s1) in p0.segments().iter().zip(p1.segments()) {
            assert_eq!(
                std::mem::discriminant(s0),
                std::mem::discriminant(s1),
                "{:?} != {:?}",
                s0,
                s1
            );
            for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let (q0, q1) = (s0.point_at(t).unwrap(), s1.point_at(t).unwrap());
                assert!(
                    q0.is_close(q1, GEOMETRY_TOLERANCE * q0.length().max(1.0)),
                    "{:?} != {:?} at {}",
                    s0,
                    s1,
                    t
                );
            }
        }
    }

    /// Assert path continuity invariants
    pub(crate) fn assert_continuous(path: &Path) {
        for subpath in path.subpaths() {
            assert!(matches!(subpath[0], Segment::MoveTo(_)), "{:?}", subpath);
            for pair in subpath.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start(), "{:?}", path);
            }
            for (index, segment) in subpath.iter().enumerate() {
                if let Segment::Close(line) = segment {
                    assert_eq!(index + 1, subpath.len());
                    assert_eq!(line.end(), subpath[0].start());
                }
            }
        }
    }

    #[test]
    fn test_validate() {
        let line = Line::new((0.0, 0.0), (1.0, 0.0));
        assert_eq!(
            Path::new(vec![line.into()]),
            Err(Error::InvalidPath {
                index: 0,
                reason: "path must start with a move",
            })
        );
        assert!(matches!(
            Path::new(vec![
                Segment::MoveTo(Point::new(0.0, 0.0)),
                Line::new((0.0, 1.0), (1.0, 0.0)).into(),
            ]),
            Err(Error::InvalidPath { index: 1, .. })
        ));
        assert!(matches!(
            Path::new(vec![
                Segment::MoveTo(Point::new(0.0, 0.0)),
                line.into(),
                Segment::Close(Line::new((1.0, 0.0), (2.0, 0.0))),
            ]),
            Err(Error::InvalidPath { index: 2, .. })
        ));
        assert!(matches!(
            Path::new(vec![
                Segment::MoveTo(Point::new(0.0, 0.0)),
                line.into(),
                Segment::Close(Line::new((1.0, 0.0), (0.0, 0.0))),
                line.into(),
            ]),
            Err(Error::InvalidPath { index: 3, .. })
        ));
        assert!(Path::new(vec![
            Segment::MoveTo(Point::new(0.0, 0.0)),
            line.into(),
            Segment::Close(line.reverse()),
        ])
        .is_ok());
        assert_eq!(Path::new(Vec::new()), Ok(Path::empty()));
    }

    #[test]
    fn test_continuity() -> Result<()> {
        for text in CORPUS.iter().chain(PATH_DATA) {
            let path: Path = text.parse()?;
            assert_continuous(&path);
            assert_continuous(&path.reverse());
            assert_continuous(&path.transform(Transform::new_rotate(1.0).scale(2.0, -0.5)));
        }
        Ok(())
    }

    #[test]
    fn test_subpaths() -> Result<()> {
        let path: Path = "M10,10 l5,0 z m1,1 l1,0 l0,1 z L3,3".parse()?;
        let sizes: Vec<_> = path.subpaths().map(|subpath| subpath.len()).collect();
        assert_eq!(sizes, vec![3, 4, 2]);
        assert_eq!(path.drawable_count(), 6);
        assert_eq!(Path::empty().subpaths().count(), 0);
        Ok(())
    }

    #[test]
    fn test_bbox() -> Result<()> {
        let path: Path = "M0,0L10,0l10,0".parse()?;
        let bbox = path.bbox().expect("bbox");
        assert_eq!(bbox, BBox::new((0.0, 0.0), (20.0, 0.0)));
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.height(), 0.0);

        let path: Path = SQUIRREL.parse()?;
        let bbox = path.bbox().expect("bbox");
        assert_approx_eq!(bbox.min_x(), 0.25, 1e-12);
        assert_approx_eq!(bbox.min_y(), 1.0, 1e-12);
        assert_approx_eq!(bbox.width(), 15.75, 1e-12);
        assert_approx_eq!(bbox.height(), 14.0, 1e-12);

        assert_eq!("M1,1".parse::<Path>()?.bbox(), None);
        assert_eq!(Path::empty().bbox(), None);
        Ok(())
    }

    #[test]
    fn test_length() -> Result<()> {
        let path: Path = "m0,0h10".parse()?;
        assert_eq!(path.length(), 10.0);

        // half circle plus diameter
        let path: Path = "M0,0 A10,10 0 0 1 20,0 Z".parse()?;
        assert_approx_eq!(path.length(), 10.0 * crate::PI + 20.0, 1e-9);
        assert_eq!(Path::empty().length(), 0.0);
        Ok(())
    }

    #[test]
    fn test_locate() -> Result<()> {
        let path: Path = "M0,0L10,0 M20,0 L30,0 L40,0".parse()?;
        assert_eq!(path.locate(0.0)?, (1, 0.0));
        assert_eq!(path.locate(0.5)?, (3, 0.5));
        // boundary belongs to the next segment
        let (index, t) = path.locate(1.0 / 3.0)?;
        assert_eq!(index, 3);
        assert_approx_eq!(t, 0.0);
        assert_eq!(path.locate(1.0)?, (4, 1.0));

        assert_eq!(path.point_at(0.5)?, Point::new(25.0, 0.0));
        assert_eq!(path.point_at(1.0)?, Point::new(40.0, 0.0));
        let deriv = path.derivative_at(0.9)?;
        assert_eq!(deriv.vector, Point::new(10.0, 0.0));
        assert_eq!(deriv.note, None);
        assert_eq!(path.tangent_at(0.1)?, Some(Point::new(1.0, 0.0)));

        assert_eq!(path.locate(1.5), Err(Error::InvalidParameter(1.5)));
        assert!(matches!(path.point_at(Scalar::NAN), Err(Error::InvalidParameter(_))));
        assert_eq!(Path::empty().point_at(0.5), Err(Error::EmptyPath));
        assert_eq!("M1,1".parse::<Path>()?.locate(0.0), Err(Error::EmptyPath));
        Ok(())
    }

    #[test]
    fn test_degenerate_derivative() -> Result<()> {
        let path: Path = "M0,0 L0,0 L10,0".parse()?;
        let deriv = path.derivative_at(0.25)?;
        assert_eq!(deriv.vector, Point::new(0.0, 0.0));
        assert_eq!(deriv.note, Some(Degenerate::ZeroLength));
        assert_eq!(path.tangent_at(0.25)?, None);
        Ok(())
    }

    #[test]
    fn test_transform() -> Result<()> {
        let path: Path = "M0,0L10,0".parse()?;
        let tr: Transform = "translate(100,0) rotate(0)".parse()?;
        assert_eq!(path.transform(tr).to_string(), "M100,0L110,0");

        // composition of transforms is the same as sequential application
        let tr0 = Transform::new_rotate(0.7).translate(3.0, -2.0);
        let tr1 = Transform::new_scale(2.0, 0.5).skew(0.3, 0.0);
        for text in CORPUS.iter().chain(PATH_DATA) {
            let path: Path = text.parse()?;
            assert_path_close(
                &path.transform(tr0 * tr1),
                &path.transform(tr1).transform(tr0),
            );
        }

        // singular transformation collapses arcs
        let path: Path = "M0,0 A10,10 0 0 1 20,0".parse()?;
        let (result, notes) = path.transform_with_notes(Transform::new_scale(1.0, 0.0));
        assert_eq!(notes, vec![Degenerate::SingularArcTransform]);
        assert_eq!(result.segments()[1], Line::new((0.0, 0.0), (20.0, 0.0)).into());
        Ok(())
    }

    #[test]
    fn test_reverse() -> Result<()> {
        let path: Path = "M0,0 L10,0 L10,10 Z M20,20 Q30,30 40,20".parse()?;
        let reversed = path.reverse();
        assert_eq!(
            reversed.segments(),
            &[
                Segment::MoveTo(Point::new(40.0, 20.0)),
                crate::Quad::new((40.0, 20.0), (30.0, 30.0), (20.0, 20.0)).into(),
                Segment::MoveTo(Point::new(0.0, 0.0)),
                Line::new((0.0, 0.0), (10.0, 10.0)).into(),
                Line::new((10.0, 10.0), (10.0, 0.0)).into(),
                Line::new((10.0, 0.0), (0.0, 0.0)).into(),
            ]
        );
        assert_approx_eq!(reversed.length(), path.length(), 1e-9);
        Ok(())
    }

    #[test]
    fn test_crop_boundaries() -> Result<()> {
        let path: Path = "M0,0L10,0L20,0".parse()?;
        assert_eq!(path.crop(0.0)?, Crop::Start(path.clone()));
        assert_eq!(path.crop(1.0)?, Crop::End(path.clone()));
        assert_eq!(path.crop(0.0)?.into_pair(), (Path::empty(), path.clone()));
        assert_eq!(path.crop(1.0)?.into_pair(), (path.clone(), Path::empty()));

        // cut exactly at segment boundary does not produce empty pieces
        let (head, tail) = path.crop(0.5)?.into_pair();
        assert_eq!(head.to_string(), "M0,0L10,0");
        assert_eq!(tail.to_string(), "M10,0L20,0");

        let (head, tail) = path.crop(0.25)?.into_pair();
        assert_eq!(head.to_string(), "M0,0L5,0");
        assert_eq!(tail.to_string(), "M5,0L10,0L20,0");

        assert_eq!(path.crop(-0.1), Err(Error::InvalidParameter(-0.1)));
        assert_eq!(Path::empty().crop(0.5), Err(Error::EmptyPath));
        assert!(matches!(Path::empty().crop(0.0), Ok(Crop::Start(_))));
        Ok(())
    }

    #[test]
    fn test_crop_close() -> Result<()> {
        let path: Path = "M0,0 L10,0 L10,10 Z M20,20 L30,20 Z".parse()?;
        let (head, tail) = path.crop(0.25)?.into_pair();
        assert_eq!(head.to_string(), "M0,0L10,0L10,2.5");
        // close of a subpath which no longer starts at its move becomes a line
        assert_eq!(tail.to_string(), "M10,2.5L10,10L0,0M20,20L30,20Z");
        assert!(matches!(tail.segments()[2], Segment::Line(_)));
        assert!(matches!(tail.segments()[5], Segment::Close(_)));

        let (head, tail) = path.crop(0.6)?.into_pair();
        assert_eq!(head.to_string(), "M0,0L10,0L10,10Z");
        assert_eq!(tail.to_string(), "M20,20L30,20Z");

        // crop inside of close
        let (head, tail) = path.crop(0.5)?.into_pair();
        assert_eq!(head.to_string(), "M0,0L10,0L10,10L5,5");
        assert_eq!(tail.to_string(), "M5,5L0,0M20,20L30,20Z");
        assert!(matches!(tail.segments()[1], Segment::Line(_)));
        assert_continuous(&head);
        assert_continuous(&tail);
        Ok(())
    }

    #[test]
    fn test_crop_concatenation() -> Result<()> {
        for text in CORPUS.iter().chain(PATH_DATA) {
            let path: Path = text.parse()?;
            for t in [0.13, 0.4321, 0.77, 0.999] {
                let (head, tail) = path.crop(t)?.into_pair();
                assert_eq!(head, path.cropped(0.0, t)?);
                assert_eq!(tail, path.cropped(t, 1.0)?);
                assert_continuous(&head);
                assert_continuous(&tail);

                let point = path.point_at(t)?;
                let head_end = head.segments().last().expect("head").end();
                let tail_start = tail.segments()[0].start();
                let scale = point.length().max(1.0);
                assert!(head_end.is_close(point, GEOMETRY_TOLERANCE * 100.0 * scale));
                assert_eq!(head_end, tail_start);
                let length = path.length();
                assert_approx_eq!(head.length() + tail.length(), length, 1e-6 * length.max(1.0));
            }
        }
        Ok(())
    }

    #[test]
    fn test_cropped() -> Result<()> {
        let path: Path = "M0,0L10,0L20,0L30,0".parse()?;
        assert_eq!(path.cropped(0.0, 1.0)?, path);
        assert_eq!(path.cropped(0.5, 5.0 / 6.0)?.to_string(), "M15,0L20,0L25,0");
        assert_eq!(path.cropped(5.0 / 6.0, 0.5)?.to_string(), "M25,0L20,0L15,0");
        assert_eq!(path.cropped(0.5, 0.5)?.to_string(), "M15,0");
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() -> Result<(), serde_json::Error> {
        let path: Path = serde_json::from_str(r#""M0 0 10 0""#)?;
        assert_eq!(serde_json::to_string(&path)?, r#""M0,0L10,0""#);
        let crop = path.crop(0.5).expect("crop");
        assert_eq!(
            serde_json::to_string(&crop)?,
            r#"{"Split":["M0,0L5,0","M5,0L10,0"]}"#
        );
        assert!(serde_json::from_str::<Path>(r#""L0 0""#).is_err());
        Ok(())
    }
}
