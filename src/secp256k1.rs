//! secp256k1 domain parameters and the concrete [`CurveMath`] implementation

use crate::curves::{Curve, CurveMath, Generator, Point};
use num_bigint::BigInt;
use std::sync::LazyLock;

/// The secp256k1 curve together with its generator
#[derive(Debug, Clone)]
pub struct Secp256k1 {
    pub curve: Curve,
    pub generator: Generator,
}

fn hex_int(hex: &[u8]) -> BigInt {
    BigInt::parse_bytes(hex, 16).expect("curve constants are valid hex")
}

impl Secp256k1 {
    /// Build the curve from its published constants (SEC 2, section 2.4.1)
    pub fn new() -> Self {
        let p = hex_int(b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");
        let a = BigInt::from(0);
        let b = BigInt::from(7);
        let gx = hex_int(b"79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
        let gy = hex_int(b"483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");
        let n = hex_int(b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

        Secp256k1 {
            curve: Curve::new(p, a, b),
            generator: Generator::new(Point::new(gx, gy), n),
        }
    }
}

impl Default for Secp256k1 {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveMath for Secp256k1 {
    fn generator(&self) -> &Point {
        &self.generator.g
    }

    fn order(&self) -> &BigInt {
        &self.generator.n
    }

    fn add(&self, lhs: &Point, rhs: &Point) -> Point {
        self.curve.add(lhs, rhs)
    }

    fn negate(&self, point: &Point) -> Point {
        self.curve.negate(point)
    }

    fn is_on_curve(&self, point: &Point) -> bool {
        self.curve.contains(point)
    }

    fn lift_x(&self, x: &BigInt, y_odd: bool) -> Option<Point> {
        self.curve.lift_x(x, y_odd)
    }
}

/// Immutable secp256k1 parameters shared by the whole crate
pub static SECP256K1: LazyLock<Secp256k1> = LazyLock::new(Secp256k1::new);

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_bitcoin_curve() {
        let secp = &*SECP256K1;
        assert!(!secp.order().is_zero());
        assert!(!secp.generator().is_infinity());
        assert!(secp.is_on_curve(secp.generator()));
    }

    #[test]
    fn test_generator_has_order_n() {
        let secp = &*SECP256K1;
        assert!(secp.multiply_generator(secp.order()).is_infinity());

        let n_minus_one = secp.order() - 1;
        assert_eq!(secp.multiply_generator(&n_minus_one), secp.negate(secp.generator()));
    }

    #[test]
    fn test_lift_generator_x() {
        let secp = &*SECP256K1;
        let g = secp.generator();
        // Gy ends in 0xB8, so it is even
        assert_eq!(secp.lift_x(g.x().unwrap(), false).as_ref(), Some(g));
        assert_eq!(secp.lift_x(g.x().unwrap(), true), Some(secp.negate(g)));
    }
}
