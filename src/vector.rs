//! Three-axis vector used throughout the measurement pipeline.
//!
//! Arithmetic works component-wise between two vectors and broadcasts a
//! scalar to all three components. Integer components wrap on overflow.
//! Division by zero behaves like the element type does: `f32` yields
//! `inf`/`NaN`, integers panic.

use core::ops::{Add, Div, Mul, Sub};

use micromath::vector::Vector3d;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3<T> {
  pub x: T,
  pub y: T,
  pub z: T,
}

impl<T> Vector3<T> {
  pub const fn new(x: T, y: T, z: T) -> Self {
    Vector3 { x, y, z }
  }

  /// Apply `f` to every component.
  pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Vector3<U> {
    Vector3 { x: f(self.x), y: f(self.y), z: f(self.z) }
  }
}

impl Vector3<f32> {
  /// Euclidean length.
  pub fn magnitude(self) -> f32 {
    libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
  }
}

macro_rules! impl_ops {
  ($($t:ty => $add:ident, $sub:ident, $mul:ident, $div:ident);* $(;)?) => {$(
    impl Add for Vector3<$t> {
      type Output = Vector3<$t>;

      fn add(self, rhs: Vector3<$t>) -> Self::Output {
        Vector3 { x: self.x.$add(rhs.x), y: self.y.$add(rhs.y), z: self.z.$add(rhs.z) }
      }
    }

    impl Sub for Vector3<$t> {
      type Output = Vector3<$t>;

      fn sub(self, rhs: Vector3<$t>) -> Self::Output {
        Vector3 { x: self.x.$sub(rhs.x), y: self.y.$sub(rhs.y), z: self.z.$sub(rhs.z) }
      }
    }

    impl Mul for Vector3<$t> {
      type Output = Vector3<$t>;

      fn mul(self, rhs: Vector3<$t>) -> Self::Output {
        Vector3 { x: self.x.$mul(rhs.x), y: self.y.$mul(rhs.y), z: self.z.$mul(rhs.z) }
      }
    }

    impl Div for Vector3<$t> {
      type Output = Vector3<$t>;

      fn div(self, rhs: Vector3<$t>) -> Self::Output {
        Vector3 { x: self.x.$div(rhs.x), y: self.y.$div(rhs.y), z: self.z.$div(rhs.z) }
      }
    }

    impl Add<$t> for Vector3<$t> {
      type Output = Vector3<$t>;

      fn add(self, rhs: $t) -> Self::Output {
        self.map(|c| c.$add(rhs))
      }
    }

    impl Sub<$t> for Vector3<$t> {
      type Output = Vector3<$t>;

      fn sub(self, rhs: $t) -> Self::Output {
        self.map(|c| c.$sub(rhs))
      }
    }

    impl Mul<$t> for Vector3<$t> {
      type Output = Vector3<$t>;

      fn mul(self, rhs: $t) -> Self::Output {
        self.map(|c| c.$mul(rhs))
      }
    }

    impl Div<$t> for Vector3<$t> {
      type Output = Vector3<$t>;

      fn div(self, rhs: $t) -> Self::Output {
        self.map(|c| c.$div(rhs))
      }
    }
  )*};
}

impl_ops! {
  i16 => wrapping_add, wrapping_sub, wrapping_mul, wrapping_div;
  i32 => wrapping_add, wrapping_sub, wrapping_mul, wrapping_div;
  f32 => add, sub, mul, div;
}

impl From<Vector3<f32>> for Vector3d<f32> {
  fn from(v: Vector3<f32>) -> Self {
    Vector3d { x: v.x, y: v.y, z: v.z }
  }
}

impl From<Vector3d<f32>> for Vector3<f32> {
  fn from(v: Vector3d<f32>) -> Self {
    Vector3 { x: v.x, y: v.y, z: v.z }
  }
}

impl From<Vector3<i16>> for Vector3d<i16> {
  fn from(v: Vector3<i16>) -> Self {
    Vector3d { x: v.x, y: v.y, z: v.z }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn elementwise_ops() {
    let a = Vector3::new(6.0f32, 8.0, 10.0);
    let b = Vector3::new(2.0f32, 4.0, 5.0);

    assert_eq!(a + b, Vector3::new(8.0, 12.0, 15.0));
    assert_eq!(a - b, Vector3::new(4.0, 4.0, 5.0));
    assert_eq!(a * b, Vector3::new(12.0, 32.0, 50.0));
    assert_eq!(a / b, Vector3::new(3.0, 2.0, 2.0));
  }

  #[test]
  fn scalar_ops_broadcast() {
    let v = Vector3::new(1i16, -2, 3);

    assert_eq!(v + 1, Vector3::new(2, -1, 4));
    assert_eq!(v - 1, Vector3::new(0, -3, 2));
    assert_eq!(v * 3, Vector3::new(3, -6, 9));
    assert_eq!(Vector3::new(4.0f32, 8.0, -2.0) / 2.0, Vector3::new(2.0, 4.0, -1.0));
  }

  #[test]
  fn float_division_by_zero_does_not_fail() {
    let v = Vector3::new(1.0f32, -1.0, 0.0) / 0.0;
    assert_eq!(v.x, f32::INFINITY);
    assert_eq!(v.y, f32::NEG_INFINITY);
    assert!(v.z.is_nan());
  }

  #[test]
  fn magnitude() {
    assert!((Vector3::new(3.0f32, 4.0, 12.0).magnitude() - 13.0).abs() < 1e-4);
    assert!((Vector3::new(1160.0f32, 0.0, 0.0).magnitude() - 1160.0).abs() < 1e-3);
    assert_eq!(Vector3::new(0.0f32, 0.0, 0.0).magnitude(), 0.0);
  }

  #[test]
  fn integer_ops_wrap_on_overflow() {
    assert_eq!(Vector3::new(i16::MAX, 0, 0) + 1, Vector3::new(i16::MIN, 1, 1));
    assert_eq!(Vector3::new(i16::MIN, 0, 0) - Vector3::new(1, 0, 0), Vector3::new(i16::MAX, 0, 0));
    assert_eq!(Vector3::new(i16::MAX, 2, 3) * 2, Vector3::new(-2, 4, 6));
    assert_eq!(Vector3::new(i16::MIN, 4, -6) / -1, Vector3::new(i16::MIN, -4, 6));
    assert_eq!(Vector3::new(i32::MAX, 0, 0) * Vector3::new(2, 0, 0), Vector3::new(-2, 0, 0));
  }

  #[test]
  #[should_panic]
  fn integer_division_by_zero_panics() {
    let _ = Vector3::new(1i16, 2, 3) / 0;
  }

  #[test]
  fn micromath_conversion() {
    let v: Vector3d<f32> = Vector3::new(1.0f32, 2.0, 3.0).into();
    assert_eq!((v.x, v.y, v.z), (1.0, 2.0, 3.0));
    assert_eq!(Vector3::from(v), Vector3::new(1.0, 2.0, 3.0));
  }
}
