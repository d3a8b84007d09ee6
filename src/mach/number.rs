use crate::error;
use crate::lang::Error;
use num_bigint::BigInt;
use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Numbers
///
/// Every constructor normalizes: an integral rational or float is an
/// `Integer` and a complex number with no imaginary part is real.

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Boolean(bool),
    Integer(BigInt),
    Rational(BigRational),
    Float(f64),
    Complex(Complex64),
}

enum Pair {
    Integer(BigInt, BigInt),
    Rational(BigRational, BigRational),
    Float(f64, f64),
    Complex(Complex64, Complex64),
}

impl Number {
    pub fn integer<T: Into<BigInt>>(n: T) -> Number {
        Number::Integer(n.into())
    }

    pub fn rational(r: BigRational) -> Number {
        if r.is_integer() {
            Number::Integer(r.to_integer())
        } else {
            Number::Rational(r)
        }
    }

    pub fn float(f: f64) -> Number {
        if f.is_finite() && f.fract() == 0.0 {
            if let Some(i) = BigInt::from_f64(f) {
                return Number::Integer(i);
            }
        }
        Number::Float(f)
    }

    pub fn complex(c: Complex64) -> Number {
        if c.im == 0.0 {
            Number::float(c.re)
        } else {
            Number::Complex(c)
        }
    }

    pub fn zero() -> Number {
        Number::Integer(BigInt::zero())
    }

    fn rank(&self) -> u8 {
        match self {
            Number::Boolean(_) | Number::Integer(_) => 0,
            Number::Rational(_) => 1,
            Number::Float(_) => 2,
            Number::Complex(_) => 3,
        }
    }

    pub fn to_bigint(&self) -> Option<BigInt> {
        match self {
            Number::Boolean(b) => Some(BigInt::from(*b as u8)),
            Number::Integer(i) => Some(i.clone()),
            _ => None,
        }
    }

    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Number::Boolean(_) | Number::Integer(_) => {
                self.to_bigint().map(BigRational::from_integer)
            }
            Number::Rational(r) => Some(r.clone()),
            Number::Float(f) => BigRational::from_float(*f),
            Number::Complex(_) => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Boolean(b) => *b as u8 as f64,
            Number::Integer(i) => i.to_f64().unwrap_or(f64::NAN),
            Number::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
            Number::Float(f) => *f,
            Number::Complex(c) => c.re,
        }
    }

    pub fn to_complex(&self) -> Complex64 {
        match self {
            Number::Complex(c) => *c,
            real => Complex64::new(real.to_f64(), 0.0),
        }
    }

    pub fn to_usize(&self) -> Option<usize> {
        self.to_bigint().and_then(|i| i.to_usize())
    }

    pub fn to_isize(&self) -> Option<isize> {
        self.to_bigint().and_then(|i| i.to_isize())
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Boolean(_) | Number::Integer(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Boolean(b) => !b,
            Number::Integer(i) => i.is_zero(),
            Number::Rational(r) => r.is_zero(),
            Number::Float(f) => *f == 0.0,
            Number::Complex(c) => c.is_zero(),
        }
    }

    fn pair(&self, other: &Number) -> Pair {
        let rank = self.rank().max(other.rank());
        let exact = |n: &Number| n.to_rational().unwrap_or_else(BigRational::zero);
        match rank {
            0 => Pair::Integer(
                self.to_bigint().unwrap_or_default(),
                other.to_bigint().unwrap_or_default(),
            ),
            1 => Pair::Rational(exact(self), exact(other)),
            2 => Pair::Float(self.to_f64(), other.to_f64()),
            _ => Pair::Complex(self.to_complex(), other.to_complex()),
        }
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Boolean(b) => Number::integer(-(*b as i8)),
            Number::Integer(i) => Number::Integer(-i),
            Number::Rational(r) => Number::Rational(-r),
            Number::Float(f) => Number::Float(-f),
            Number::Complex(c) => Number::Complex(-c),
        }
    }

    pub fn abs(&self) -> Number {
        match self {
            Number::Complex(c) => Number::float(c.norm()),
            Number::Integer(i) => Number::Integer(i.abs()),
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Float(f) => Number::Float(f.abs()),
            b => b.clone(),
        }
    }

    pub fn add(&self, other: &Number) -> Number {
        match self.pair(other) {
            Pair::Integer(a, b) => Number::Integer(a + b),
            Pair::Rational(a, b) => Number::rational(a + b),
            Pair::Float(a, b) => Number::float(a + b),
            Pair::Complex(a, b) => Number::complex(a + b),
        }
    }

    pub fn sub(&self, other: &Number) -> Number {
        match self.pair(other) {
            Pair::Integer(a, b) => Number::Integer(a - b),
            Pair::Rational(a, b) => Number::rational(a - b),
            Pair::Float(a, b) => Number::float(a - b),
            Pair::Complex(a, b) => Number::complex(a - b),
        }
    }

    pub fn mul(&self, other: &Number) -> Number {
        match self.pair(other) {
            Pair::Integer(a, b) => Number::Integer(a * b),
            Pair::Rational(a, b) => Number::rational(a * b),
            Pair::Float(a, b) => Number::float(a * b),
            Pair::Complex(a, b) => Number::complex(a * b),
        }
    }

    /// Exact division. Integer by integer gives a rational.
    pub fn div(&self, other: &Number) -> Result<Number> {
        match self.pair(other) {
            Pair::Integer(a, b) => {
                if b.is_zero() {
                    return Err(error!(ValueError; "DIVISION BY ZERO"));
                }
                Ok(Number::rational(BigRational::new(a, b)))
            }
            Pair::Rational(a, b) => {
                if b.is_zero() {
                    return Err(error!(ValueError; "DIVISION BY ZERO"));
                }
                Ok(Number::rational(a / b))
            }
            Pair::Float(a, b) => Ok(Number::float(a / b)),
            Pair::Complex(a, b) => Ok(Number::complex(a / b)),
        }
    }

    /// Floor division and the matching remainder, sign following the divisor.
    pub fn div_rem(&self, other: &Number) -> Result<(Number, Number)> {
        match self.pair(other) {
            Pair::Integer(a, b) => {
                if b.is_zero() {
                    return Err(error!(ValueError; "DIVISION BY ZERO"));
                }
                let (mut q, mut r) = (&a / &b, &a % &b);
                if !r.is_zero() && r.is_negative() != b.is_negative() {
                    q -= 1;
                    r += &b;
                }
                Ok((Number::Integer(q), Number::Integer(r)))
            }
            Pair::Rational(a, b) => {
                if b.is_zero() {
                    return Err(error!(ValueError; "DIVISION BY ZERO"));
                }
                let q = (&a / &b).floor();
                let r = a - &b * &q;
                Ok((Number::rational(q), Number::rational(r)))
            }
            Pair::Float(a, b) => {
                let q = (a / b).floor();
                Ok((Number::float(q), Number::float(a - b * q)))
            }
            Pair::Complex(..) => Err(error!(TypeError; "COMPLEX NUMBERS HAVE NO REMAINDER")),
        }
    }

    pub fn compare(&self, other: &Number) -> Result<Ordering> {
        match self.pair(other) {
            Pair::Integer(a, b) => Ok(a.cmp(&b)),
            Pair::Rational(a, b) => Ok(a.cmp(&b)),
            Pair::Float(a, b) => a
                .partial_cmp(&b)
                .ok_or_else(|| error!(ValueError; "NAN IS UNORDERED")),
            Pair::Complex(..) => Err(error!(TypeError; "COMPLEX NUMBERS ARE UNORDERED")),
        }
    }

    /// Value equality across representations.
    pub fn num_eq(&self, other: &Number) -> bool {
        match self.pair(other) {
            Pair::Integer(a, b) => a == b,
            Pair::Rational(a, b) => a == b,
            Pair::Float(a, b) => a == b,
            Pair::Complex(a, b) => a == b,
        }
    }

    pub fn sign(&self) -> Result<Number> {
        Ok(match self.compare(&Number::zero())? {
            Ordering::Less => Number::integer(-1),
            Ordering::Equal => Number::zero(),
            Ordering::Greater => Number::integer(1),
        })
    }

    pub fn one() -> Number {
        Number::Integer(BigInt::one())
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Number::Boolean(b) => write!(f, "{}", b),
            Number::Integer(i) => write!(f, "{}", i),
            Number::Rational(r) => write!(f, "({}/{})", r.numer(), r.denom()),
            Number::Float(n) => write!(f, "{:?}", n),
            Number::Complex(c) => {
                let sign = if c.im < 0.0 { "" } else { "+" };
                write!(f, "({}{}{}j)", Number::float(c.re), sign, Number::float(c.im))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Number {
        Number::integer(i)
    }

    #[test]
    fn test_integer_division_is_exact() {
        let third = int(1).div(&int(3)).unwrap();
        assert_eq!(third.to_string(), "(1/3)");
        assert_eq!(third.mul(&int(3)), int(1));
        assert!(int(1).div(&int(0)).is_err());
    }

    #[test]
    fn test_floor_remainder() {
        let (q, r) = int(-7).div_rem(&int(2)).unwrap();
        assert_eq!((q, r), (int(-4), int(1)));
        let (q, r) = int(7).div_rem(&int(-2)).unwrap();
        assert_eq!((q, r), (int(-4), int(-1)));
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Number::float(2.0), int(2));
        assert_eq!(Number::float(1.5).add(&Number::float(1.5)), int(3));
        assert_eq!(Number::complex(Complex64::new(4.0, 0.0)), int(4));
        assert!(matches!(Number::float(0.5), Number::Float(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::complex(Complex64::new(1.0, -2.5)).to_string(), "(1-2.5j)");
        assert_eq!(Number::float(0.5).to_string(), "0.5");
        assert_eq!(Number::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_mixed_compare() {
        let half = int(1).div(&int(2)).unwrap();
        assert_eq!(half.compare(&Number::float(0.25)).unwrap(), Ordering::Greater);
        assert!(Number::Boolean(true).num_eq(&int(1)));
        assert!(Number::complex(Complex64::new(0.0, 1.0)).compare(&int(0)).is_err());
    }
}
