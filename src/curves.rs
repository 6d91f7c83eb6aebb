//! Core functions for math over Elliptic Curves over Finite Fields,
//! especially the ability to define Points on Curves and perform
//! addition and scalar multiplication.
//!
//! The [`CurveMath`] trait is the contract that recovery and signing code
//! is written against; [`crate::secp256k1::Secp256k1`] is the concrete
//! implementation used by Bitcoin.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) s.t. a * x + b * y == gcd
#[must_use]
pub fn extended_euclidean_algorithm(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let mut old_r = a.clone();
    let mut r = b.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();
    let mut old_t = BigInt::zero();
    let mut t = BigInt::one();

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let temp_r = r.clone();
        r = &old_r - &quotient * &r;
        old_r = temp_r;

        let temp_s = s.clone();
        s = &old_s - &quotient * &s;
        old_s = temp_s;

        let temp_t = t.clone();
        t = &old_t - &quotient * &t;
        old_t = temp_t;
    }

    (old_r, old_s, old_t)
}

/// Returns modular multiplicative inverse m s.t. (n * m) % p == 1,
/// or `None` when n and p are not coprime (including n ≡ 0).
#[must_use]
pub fn mod_inv(n: &BigInt, p: &BigInt) -> Option<BigInt> {
    let n = n.mod_floor(p);
    let (gcd, x, _) = extended_euclidean_algorithm(&n, p);
    if gcd.is_one() {
        Some(x.mod_floor(p))
    } else {
        None
    }
}

/// Elliptic Curve over the field of integers modulo a prime.
/// Points on the curve satisfy y^2 = x^3 + a*x + b (mod p).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    pub p: BigInt,
    pub a: BigInt,
    pub b: BigInt,
}

/// An affine point (x, y) on a Curve, or the point at infinity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    Infinity,
    Affine { x: BigInt, y: BigInt },
}

impl Point {
    #[must_use]
    pub const fn new(x: BigInt, y: BigInt) -> Self {
        Point::Affine { x, y }
    }

    #[must_use]
    pub const fn infinity() -> Self {
        Point::Infinity
    }

    #[must_use]
    #[inline]
    pub const fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    #[must_use]
    pub fn x(&self) -> Option<&BigInt> {
        match self {
            Point::Affine { x, .. } => Some(x),
            Point::Infinity => None,
        }
    }

    #[must_use]
    pub fn y(&self) -> Option<&BigInt> {
        match self {
            Point::Affine { y, .. } => Some(y),
            Point::Infinity => None,
        }
    }
}

impl Curve {
    pub fn new(p: BigInt, a: BigInt, b: BigInt) -> Self {
        Curve { p, a, b }
    }

    /// Right-hand side of the curve equation: x^3 + a*x + b (mod p)
    fn rhs(&self, x: &BigInt) -> BigInt {
        (x.modpow(&BigInt::from(3), &self.p) + &self.a * x + &self.b).mod_floor(&self.p)
    }

    /// Does the point satisfy the curve equation with reduced coordinates?
    /// The point at infinity is considered part of every curve.
    pub fn contains(&self, point: &Point) -> bool {
        match point {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                let in_field = |v: &BigInt| !v.is_negative() && v < &self.p;
                in_field(x) && in_field(y) && (y * y).mod_floor(&self.p) == self.rhs(x)
            }
        }
    }

    /// Point addition, including doubling and the identity cases
    pub fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        let (self_x, self_y, other_x, other_y) = match (lhs, rhs) {
            (Point::Infinity, _) => return rhs.clone(),
            (_, Point::Infinity) => return lhs.clone(),
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };
        let p = &self.p;

        // P + (-P), which also covers doubling a point with y == 0
        if self_x == other_x && (self_y + other_y).mod_floor(p).is_zero() {
            return Point::infinity();
        }

        let numerator;
        let denominator;
        if self_x == other_x {
            numerator = BigInt::from(3) * self_x * self_x + &self.a;
            denominator = BigInt::from(2) * self_y;
        } else {
            numerator = other_y - self_y;
            denominator = other_x - self_x;
        }
        let Some(inv) = mod_inv(&denominator, p) else {
            // Denominator is non-zero mod a prime here, so this only happens
            // for a composite modulus.
            return Point::infinity();
        };
        let m = (numerator * inv).mod_floor(p);

        let rx = (&m * &m - self_x - other_x).mod_floor(p);
        let ry = (&m * (self_x - &rx) - self_y).mod_floor(p);

        Point::new(rx, ry)
    }

    pub fn negate(&self, point: &Point) -> Point {
        match point {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::new(x.clone(), (-y).mod_floor(&self.p)),
        }
    }

    /// Reconstruct the point with the given x-coordinate and y parity.
    ///
    /// Square roots are taken as alpha^((p+1)/4), which is only correct for
    /// p ≡ 3 (mod 4); every candidate root is checked before it is returned.
    pub fn lift_x(&self, x: &BigInt, y_odd: bool) -> Option<Point> {
        if x.is_negative() || x >= &self.p {
            return None;
        }

        let alpha = self.rhs(x);
        let exp = (&self.p + BigInt::one()) / BigInt::from(4);
        let beta = alpha.modpow(&exp, &self.p);
        if (&beta * &beta).mod_floor(&self.p) != alpha {
            return None;
        }

        let y = if beta.is_odd() == y_odd {
            beta
        } else {
            (&self.p - beta).mod_floor(&self.p)
        };
        if y.is_odd() != y_odd {
            // y == 0 has no odd counterpart
            return None;
        }

        Some(Point::new(x.clone(), y))
    }
}

/// A generator over a curve: an initial point and the (pre-computed) order
#[derive(Debug, Clone)]
pub struct Generator {
    pub g: Point,  // A generator point on the curve
    pub n: BigInt, // The order of the generating point, so 0*G = n*G = INF
}

impl Generator {
    #[must_use]
    pub const fn new(g: Point, n: BigInt) -> Self {
        Generator { g, n }
    }
}

/// Point and scalar arithmetic over a prime-order curve group.
pub trait CurveMath {
    /// The generator point G
    fn generator(&self) -> &Point;

    /// The order n of G
    fn order(&self) -> &BigInt;

    fn add(&self, lhs: &Point, rhs: &Point) -> Point;

    fn negate(&self, point: &Point) -> Point;

    fn is_on_curve(&self, point: &Point) -> bool;

    /// The curve point with x-coordinate `x` and the requested y parity, if one exists
    fn lift_x(&self, x: &BigInt, y_odd: bool) -> Option<Point>;

    /// Double-and-add scalar multiplication: k * point.
    /// Negative scalars multiply the negated point.
    fn multiply(&self, point: &Point, k: &BigInt) -> Point {
        let (mut addend, mut k) = if k.is_negative() {
            (self.negate(point), -k)
        } else {
            (point.clone(), k.clone())
        };
        let mut result = Point::infinity();

        while !k.is_zero() {
            if k.is_odd() {
                result = self.add(&result, &addend);
            }
            addend = self.add(&addend, &addend);
            k >>= 1;
        }
        result
    }

    /// k * G
    fn multiply_generator(&self, k: &BigInt) -> Point {
        self.multiply(self.generator(), k)
    }

    /// k^-1 mod n
    fn inverse_mod_order(&self, k: &BigInt) -> Option<BigInt> {
        mod_inv(k, self.order())
    }
}
