//! Measurement configuration.
//!
//! Every setter validates its input, rewrites only its own bit-field and
//! updates the driver cache once the write went through. Getters answer
//! from the cache unless `update_cache` is set; the measurement mode is the
//! exception, see [`get_measurement_mode`](crate::Hmc5883l::get_measurement_mode).
//!
//! # Examples
//!
//! ```no_run
//! # fn example<I, D>(mut mag: hmc5883l::Hmc5883l<I, D>) -> Result<(), hmc5883l::Error<I::Error>>
//! # where I: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs {
//! use hmc5883l::{Averaging, Gain, OutputRate};
//!
//! mag.set_gain(Gain::Gauss4_7)?;
//! mag.set_averaging(Averaging::Avg8)?;
//! mag.set_output_rate(OutputRate::Hz75)?;
//!
//! // Raw levels are accepted too and checked against the valid range
//! assert!(mag.set_gain(9u8).is_err());
//! # Ok(())
//! # }
//! ```

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::*, types::*, Error, Hmc5883l};

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  /// Set the gain (register B, bits 5..7). Register B carries nothing else
  /// and is written without being read first.
  pub fn set_gain(&mut self, gain: impl Into<u8>) -> Result<(), Error<E>> {
    let level = gain.into();
    let gain = Gain::try_from(level).map_err(|_| self.fail(Error::InvalidGain(level)))?;
    self.write_field(GAIN, gain.into())?;
    self.config.gain = gain;
    Ok(())
  }

  pub fn get_gain(&mut self, update_cache: bool) -> Result<Gain, Error<E>> {
    if update_cache {
      let level = self.read_field(GAIN)?;
      self.config.gain = Gain::try_from(level).map_err(|_| self.fail(Error::InvalidGain(level)))?;
    }
    Ok(self.config.gain)
  }

  /// Set the number of samples averaged per output (register A, bits 5..6).
  pub fn set_averaging(&mut self, averaging: impl Into<u8>) -> Result<(), Error<E>> {
    let level = averaging.into();
    let averaging = Averaging::try_from(level).map_err(|_| self.fail(Error::InvalidAveraging(level)))?;
    self.write_field(AVERAGING, averaging.into())?;
    self.config.averaging = averaging;
    Ok(())
  }

  pub fn get_averaging(&mut self, update_cache: bool) -> Result<Averaging, Error<E>> {
    if update_cache {
      let level = self.read_field(AVERAGING)?;
      self.config.averaging = Averaging::try_from(level).map_err(|_| self.fail(Error::InvalidAveraging(level)))?;
    }
    Ok(self.config.averaging)
  }

  /// Set the continuous-mode output rate (register A, bits 2..4).
  pub fn set_output_rate(&mut self, rate: impl Into<u8>) -> Result<(), Error<E>> {
    let level = rate.into();
    let rate = OutputRate::try_from(level).map_err(|_| self.fail(Error::InvalidOutputRate(level)))?;
    self.write_field(OUTPUT_RATE, rate.into())?;
    self.config.output_rate = rate;
    Ok(())
  }

  /// Fails with [`Error::InvalidOutputRate`] if the device holds the
  /// reserved value 7.
  pub fn get_output_rate(&mut self, update_cache: bool) -> Result<OutputRate, Error<E>> {
    if update_cache {
      let level = self.read_field(OUTPUT_RATE)?;
      self.config.output_rate = OutputRate::try_from(level).map_err(|_| self.fail(Error::InvalidOutputRate(level)))?;
    }
    Ok(self.config.output_rate)
  }

  /// Set the measurement mode (mode register, bits 0..1). The high-speed
  /// bit is carried over.
  pub fn set_measurement_mode(&mut self, mode: impl Into<u8>) -> Result<(), Error<E>> {
    let level = mode.into();
    let mode = MeasurementMode::try_from(level).map_err(|_| self.fail(Error::InvalidMeasurementMode(level)))?;
    let written = self.write_field(MEASUREMENT_MODE, mode.into())?;
    self.config.mode = mode;
    self.high_speed = HIGH_SPEED.decode(written) != 0;
    Ok(())
  }

  /// Current measurement mode.
  ///
  /// A cached `Single` is never trusted: the device drops back to idle by
  /// itself once the measurement is done, so the register is read again even
  /// with `update_cache == false`.
  pub fn get_measurement_mode(&mut self, update_cache: bool) -> Result<MeasurementMode, Error<E>> {
    if update_cache || self.mode_cache_stale() {
      let reg = self.read_u8(Reg::Mode)?;
      self.config.mode = MeasurementMode::from_bits(MEASUREMENT_MODE.decode(reg));
      self.high_speed = HIGH_SPEED.decode(reg) != 0;
    }
    Ok(self.config.mode)
  }

  fn mode_cache_stale(&self) -> bool {
    self.config.mode == MeasurementMode::Single
  }

  /// Set the self-test bias (register A, bits 0..1).
  pub fn set_bias_mode(&mut self, bias: impl Into<u8>) -> Result<(), Error<E>> {
    let level = bias.into();
    let bias = BiasMode::try_from(level).map_err(|_| self.fail(Error::InvalidBiasMode(level)))?;
    self.write_field(BIAS, bias.into())?;
    self.config.bias = bias;
    Ok(())
  }

  /// Fails with [`Error::InvalidBiasMode`] if the device holds the reserved
  /// value 3.
  pub fn get_bias_mode(&mut self, update_cache: bool) -> Result<BiasMode, Error<E>> {
    if update_cache {
      let level = self.read_field(BIAS)?;
      self.config.bias = BiasMode::try_from(level).map_err(|_| self.fail(Error::InvalidBiasMode(level)))?;
    }
    Ok(self.config.bias)
  }

  /// Enable or disable 3400 kHz high-speed I2C (mode register, bit 7). The
  /// measurement mode bits are carried over.
  pub fn set_high_speed(&mut self, enabled: bool) -> Result<(), Error<E>> {
    let written = self.write_field(HIGH_SPEED, enabled as u8)?;
    self.high_speed = enabled;
    self.config.mode = MeasurementMode::from_bits(MEASUREMENT_MODE.decode(written));
    Ok(())
  }

  pub fn get_high_speed(&mut self, update_cache: bool) -> Result<bool, Error<E>> {
    if update_cache {
      self.high_speed = self.read_field(HIGH_SPEED)? != 0;
    }
    Ok(self.high_speed)
  }
}
