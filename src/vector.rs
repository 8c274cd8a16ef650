use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D integer vector, used both for grid cells and for pixel positions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    pub const fn new(x: i32, y: i32) -> Self {
        Vector { x, y }
    }

    /// Moves this vector in place.
    pub fn translate(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    pub fn set(&mut self, x: i32, y: i32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn length(&self) -> f64 {
        (self.x as f64).hypot(self.y as f64)
    }

    pub fn angle(&self) -> f64 {
        (self.y as f64).atan2(self.x as f64)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<i32> for Vector {
    type Output = Vector;

    fn mul(self, value: i32) -> Vector {
        Vector::new(self.x * value, self.y * value)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self * -1
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
