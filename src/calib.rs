//! Self-test based calibration.
//!
//! The positive and negative bias responses are averaged and divided by the
//! nominal bias field, giving a per-axis gain correction that
//! [`read_calibrated`](crate::Hmc5883l::read_calibrated) multiplies in.
//!
//! # Examples
//!
//! ```no_run
//! # fn example<I, D>(mut mag: hmc5883l::Hmc5883l<I, D>) -> Result<(), hmc5883l::Error<I::Error>>
//! # where I: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs {
//! use hmc5883l::SingleShot;
//!
//! let cal = mag.calibrate(SingleShot::default())?;
//! let field = mag.read_calibrated()?;
//! # Ok(())
//! # }
//! ```

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::*, Error, Hmc5883l, SingleShot, Vector3};

/// Per-axis calibration from the two bias test responses.
///
/// The negative test reads the bias field with the opposite sign, so its
/// response is negated before averaging.
pub fn calibration_from(positive: Vector3<f32>, negative: Vector3<f32>) -> Vector3<f32> {
  (positive - negative) / 2.0 / Vector3::new(BIAS_FIELD_XY, BIAS_FIELD_XY, BIAS_FIELD_Z)
}

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  /// Cached calibration. No bus traffic.
  pub fn calibration(&self) -> Vector3<f32> {
    self.calibration
  }

  /// Run the positive and negative bias tests and store the resulting
  /// calibration.
  ///
  /// Both tests use the same polling parameters. If either fails the
  /// previous calibration stays in place.
  pub fn calibrate(&mut self, shot: SingleShot) -> Result<Vector3<f32>, Error<E>> {
    let positive = self.positive_test(shot)?;
    let negative = self.negative_test(shot)?;

    self.calibration = calibration_from(positive.field, negative.field);
    debug!(
      "hmc5883l: calibration x={=f32} y={=f32} z={=f32}",
      self.calibration.x,
      self.calibration.y,
      self.calibration.z
    );
    Ok(self.calibration)
  }
}
