//! Utility functions and types used accross the library
use crate::{Scalar, EPSILON};
use std::{fmt, iter::FromIterator};

/// Abstraction over slices used by `ArrayIter`
pub trait Array {
    type Item;
    fn new() -> Self;
    fn size(&self) -> usize;
    fn at(&self, index: usize) -> Option<&Self::Item>;
    fn take(&mut self, index: usize) -> Option<Self::Item>;
    fn put(&mut self, index: usize, value: Self::Item) -> Option<Self::Item>;
}

macro_rules! impl_array(
    ($($size:expr),+) => {
        $(
            impl<T: Copy> Array for [Option<T>; $size] {
                type Item = T;
                fn new() -> Self {
                    [None; $size]
                }
                fn size(&self) -> usize { $size }
                fn at(&self, index: usize) -> Option<&Self::Item> {
                    self.get(index).and_then(|item| item.as_ref())
                }
                fn take(&mut self, index: usize) -> Option<Self::Item> {
                    self[index].take()
                }
                fn put(&mut self, index: usize, value: Self::Item) -> Option<Self::Item> {
                    self[index].replace(value)
                }
            }
        )+
    }
);

impl_array!(2, 4);

/// Fixed sized iterator
///
/// This type is similar to a smallvec but it never allocates and just panics
/// if you try to fit more data than its size.
#[derive(Clone, Copy)]
pub struct ArrayIter<A> {
    start: usize,
    end: usize,
    array: A,
}

impl<A> fmt::Debug for ArrayIter<A>
where
    A: Array,
    A::Item: fmt::Debug,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = fmt.debug_list();
        for index in self.start..self.end {
            if let Some(item) = self.array.at(index) {
                list.entry(item);
            }
        }
        list.finish()
    }
}

impl<A: Array> Default for ArrayIter<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Array> ArrayIter<A> {
    pub fn new() -> Self {
        Self {
            start: 0,
            end: 0,
            array: A::new(),
        }
    }

    /// Push new element to the end of the iterator
    pub fn push(&mut self, item: A::Item) {
        self.array.put(self.end, item);
        self.end += 1;
    }

    /// Check if array iterator is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of uncosumed elements
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<A: Array> Extend<A::Item> for ArrayIter<A> {
    fn extend<T: IntoIterator<Item = A::Item>>(&mut self, iter: T) {
        for item in iter.into_iter() {
            self.push(item);
        }
    }
}

impl<A> FromIterator<A::Item> for ArrayIter<A>
where
    A: Array,
    A::Item: Copy,
{
    fn from_iter<T: IntoIterator<Item = A::Item>>(iter: T) -> Self {
        let mut array = ArrayIter::<A>::new();
        for item in iter.into_iter() {
            array.push(item);
        }
        array
    }
}

impl<A: Array> Iterator for ArrayIter<A> {
    type Item = A::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start < self.end {
            let item = self.array.take(self.start);
            self.start += 1;
            item
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.end - self.start;
        (size, Some(size))
    }
}

/// Solve quadratic equation `a * t ^ 2 + b * t + c = 0` for `t`
pub(crate) fn quadratic_solve(a: Scalar, b: Scalar, c: Scalar) -> ArrayIter<[Option<Scalar>; 2]> {
    let mut result = ArrayIter::<[Option<Scalar>; 2]>::new();
    if a.abs() < EPSILON {
        if b.abs() > EPSILON {
            result.push(-c / b);
        }
        return result;
    }
    let disc = b * b - 4.0 * a * c;
    if disc.abs() < EPSILON {
        result.push(-b / (2.0 * a));
    } else if disc > 0.0 {
        let sq = disc.sqrt();
        // More stable solution than generic formula:
        // https://people.csail.mit.edu/bkph/articles/Quadratics.pdf
        if b >= 0.0 {
            let mul = -b - sq;
            result.push(mul / (2.0 * a));
            result.push(2.0 * c / mul);
        } else {
            let mul = -b + sq;
            result.push(2.0 * c / mul);
            result.push(mul / (2.0 * a));
        }
    }
    result
}

/// Pairs of `(weight, abscissa)` for 16 point Gauss-Legendre quadrature on `[-1, 1]`
const GAUSS_LEGENDRE_16: [(Scalar, Scalar); 16] = [
    (0.1894506104550685, -0.0950125098376374),
    (0.1894506104550685, 0.0950125098376374),
    (0.1826034150449236, -0.2816035507792589),
    (0.1826034150449236, 0.2816035507792589),
    (0.1691565193950025, -0.4580167776572274),
    (0.1691565193950025, 0.4580167776572274),
    (0.1495959888165767, -0.6178762444026438),
    (0.1495959888165767, 0.6178762444026438),
    (0.1246289712555339, -0.7554044083550030),
    (0.1246289712555339, 0.7554044083550030),
    (0.0951585116824928, -0.8656312023878318),
    (0.0951585116824928, 0.8656312023878318),
    (0.0622535239386479, -0.9445750230732326),
    (0.0622535239386479, 0.9445750230732326),
    (0.0271524594117541, -0.9894009349916499),
    (0.0271524594117541, 0.9894009349916499),
];

/// Limits for the adaptive quadrature used to compute curve lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureBudget {
    /// Relative error at which interval subdivision stops
    pub tolerance: Scalar,
    /// Maximum number of integrand evaluations
    pub max_evaluations: usize,
}

impl Default for QuadratureBudget {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_evaluations: 10_000,
        }
    }
}

/// Result of the adaptive quadrature
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Quadrature {
    pub value: Scalar,
    pub evaluations: usize,
    pub exhausted: bool,
}

fn gauss_legendre(f: &impl Fn(Scalar) -> Scalar, a: Scalar, b: Scalar) -> Scalar {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    half * GAUSS_LEGENDRE_16
        .iter()
        .map(|(w, x)| w * f(mid + half * x))
        .sum::<Scalar>()
}

/// Integrate `f` over `[a, b]` with adaptive 16 point Gauss-Legendre quadrature.
///
/// Interval is bisected as long as the estimate over the whole interval differs
/// from the sum over its halves by more than the relative tolerance. Once the
/// evaluation budget is spent remaining intervals keep their current estimates.
pub(crate) fn integrate(
    f: impl Fn(Scalar) -> Scalar,
    a: Scalar,
    b: Scalar,
    budget: QuadratureBudget,
) -> Quadrature {
    let points = GAUSS_LEGENDRE_16.len();
    let total = gauss_legendre(&f, a, b);
    let mut evaluations = points;
    let mut exhausted = false;
    let mut value = 0.0;
    // pending intervals together with their current estimate
    let mut stack = vec![(a, b, total)];
    while let Some((a, b, whole)) = stack.pop() {
        if exhausted || evaluations + 2 * points > budget.max_evaluations {
            exhausted = true;
            value += whole;
            continue;
        }
        let mid = 0.5 * (a + b);
        let left = gauss_legendre(&f, a, mid);
        let right = gauss_legendre(&f, mid, b);
        evaluations += 2 * points;
        let refined = left + right;
        if (refined - whole).abs() <= budget.tolerance * refined.abs().max(EPSILON) {
            value += refined;
        } else {
            stack.push((mid, b, right));
            stack.push((a, mid, left));
        }
    }
    Quadrature {
        value,
        evaluations,
        exhausted,
    }
}
