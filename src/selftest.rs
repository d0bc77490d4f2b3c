//! Bias self-tests.
//!
//! With a bias mode set the device adds a known field to every axis, so a
//! healthy sensor reads about ±1160 mG on X/Y and ±1080 mG on Z at gain
//! ±1.3 G (scaled by the gain ratio otherwise).

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{BiasMode, Error, Hmc5883l, Sample, SingleShot};

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  /// Single measurement with the positive bias applied. The bias is
  /// switched off again afterwards.
  pub fn positive_test(&mut self, shot: SingleShot) -> Result<Sample<f32>, Error<E>> {
    self.bias_test(BiasMode::Positive, shot)
  }

  /// Single measurement with the negative bias applied. The bias is
  /// switched off again afterwards.
  pub fn negative_test(&mut self, shot: SingleShot) -> Result<Sample<f32>, Error<E>> {
    self.bias_test(BiasMode::Negative, shot)
  }

  fn bias_test(&mut self, bias: BiasMode, shot: SingleShot) -> Result<Sample<f32>, Error<E>> {
    self.set_bias_mode(bias)?;
    let measured = self.read_single(shot);
    let restored = self.set_bias_mode(BiasMode::None);
    self.settle(measured, restored)
  }
}
