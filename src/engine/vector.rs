//! Immutable 2D vector
//!
//! Every operation returns a new value. Division is the only fallible
//! operation: dividing by a zero scalar, or by a vector with a zero
//! component, is an error rather than an infinity.

use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;

use super::error::{EngineError, Result};

/// A 2D vector in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same value broadcast to both components
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v)
    }

    #[inline]
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn add(self, other: Vector) -> Vector {
        (self.as_dvec2() + other.as_dvec2()).into()
    }

    pub fn sub(self, other: Vector) -> Vector {
        (self.as_dvec2() - other.as_dvec2()).into()
    }

    /// Component-wise product
    pub fn mult(self, other: Vector) -> Vector {
        (self.as_dvec2() * other.as_dvec2()).into()
    }

    pub fn mult_scalar(self, s: f64) -> Vector {
        (self.as_dvec2() * s).into()
    }

    /// Component-wise quotient
    pub fn div(self, other: Vector) -> Result<Vector> {
        if other.x == 0.0 || other.y == 0.0 {
            return Err(EngineError::DivisionByZero);
        }
        Ok((self.as_dvec2() / other.as_dvec2()).into())
    }

    pub fn div_scalar(self, s: f64) -> Result<Vector> {
        if s == 0.0 {
            return Err(EngineError::DivisionByZero);
        }
        Ok((self.as_dvec2() / s).into())
    }

    /// Distance between two points
    pub fn dist(self, other: Vector) -> f64 {
        other.sub(self).magnitude()
    }

    /// Euclidean length
    pub fn magnitude(self) -> f64 {
        self.as_dvec2().length()
    }

    /// Unit vector in the same direction, or zero for the zero vector
    pub fn normalize(self) -> Vector {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Vector::ZERO;
        }
        // magnitude is nonzero here so the division cannot fail
        self.div_scalar(magnitude).unwrap_or(Vector::ZERO)
    }

    /// Component-wise absolute value
    pub fn abs(self) -> Vector {
        self.as_dvec2().abs().into()
    }
}

impl From<DVec2> for Vector {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector> for DVec2 {
    fn from(v: Vector) -> Self {
        v.as_dvec2()
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::sub(self, rhs)
    }
}

impl Mul for Vector {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        self.mult(rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.mult_scalar(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}
