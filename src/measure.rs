//! Magnetic field readout.
//!
//! Reads are layered: [`read_raw`](crate::Hmc5883l::read_raw) returns ADC
//! counts, [`read_scaled`](crate::Hmc5883l::read_scaled) converts them to
//! milligauss using the cached gain and
//! [`read_calibrated`](crate::Hmc5883l::read_calibrated) applies the
//! self-test calibration on top. [`read_single`](crate::Hmc5883l::read_single)
//! triggers a single measurement, waits for it and reads it scaled.
//!
//! # Examples
//!
//! ```no_run
//! # fn example<I, D>(mut mag: hmc5883l::Hmc5883l<I, D>) -> Result<(), hmc5883l::Error<I::Error>>
//! # where I: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs {
//! use hmc5883l::SingleShot;
//!
//! let sample = mag.read_single(SingleShot { delay_ms: 1.0, max_retries: 10 })?;
//! if sample.saturation.any() {
//!   // Field exceeds the range of the current gain
//! }
//! println!("x={} y={} z={} mG", sample.field.x, sample.field.y, sample.field.z);
//! # Ok(())
//! # }
//! ```

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::*, Error, Hmc5883l, MeasurementMode, SingleShot, Vector3};

/// Per-axis ADC saturation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Saturation {
  pub x: bool,
  pub y: bool,
  pub z: bool,
}

impl Saturation {
  pub fn any(&self) -> bool {
    self.x || self.y || self.z
  }
}

/// One field reading together with the saturation flags of the raw sample
/// it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample<T> {
  pub field: Vector3<T>,
  pub saturation: Saturation,
}

/// ADC counts straight from the data registers.
pub type RawSample = Sample<i16>;

impl RawSample {
  /// Decode the six data registers. The device orders the axes X, Z, Y,
  /// each as a big-endian two's complement word.
  pub(crate) fn from_registers(b: [u8; 6]) -> Self {
    let x = i16::from_be_bytes([b[0], b[1]]);
    let z = i16::from_be_bytes([b[2], b[3]]);
    let y = i16::from_be_bytes([b[4], b[5]]);

    Sample {
      field: Vector3::new(x, y, z),
      saturation: Saturation { x: x == SATURATION_VALUE, y: y == SATURATION_VALUE, z: z == SATURATION_VALUE },
    }
  }
}

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  /// Read the data registers as raw counts.
  ///
  /// A channel reading -4096 overflowed the ADC and has its saturation flag
  /// set.
  pub fn read_raw(&mut self) -> Result<RawSample, Error<E>> {
    let mut b = [0u8; 6];
    self.read_bytes(Reg::DataOutX, &mut b)?;
    let raw = RawSample::from_registers(b);
    if raw.saturation.any() {
      debug!("hmc5883l: saturated x={=bool} y={=bool} z={=bool}", raw.saturation.x, raw.saturation.y, raw.saturation.z);
    }
    Ok(raw)
  }

  /// Read the field in milligauss, scaled by the resolution of the cached
  /// gain.
  pub fn read_scaled(&mut self) -> Result<Sample<f32>, Error<E>> {
    let raw = self.read_raw()?;
    let scale = self.config.gain.milligauss_per_lsb();
    Ok(Sample { field: raw.field.map(|c| c as f32 * scale), saturation: raw.saturation })
  }

  /// Read the field in milligauss with the calibration applied per axis.
  pub fn read_calibrated(&mut self) -> Result<Sample<f32>, Error<E>> {
    let scaled = self.read_scaled()?;
    Ok(Sample { field: scaled.field * self.calibration, saturation: scaled.saturation })
  }

  /// Take one measurement in single mode and read it scaled.
  ///
  /// The current measurement mode is put back afterwards, whatever happened
  /// in between. The data registers are read once polling ends, whether the
  /// device reported ready, the retries ran out or a status read failed, so
  /// expect stale data if the device was slow. A failed status read only
  /// decides the outcome when the data read fails too; it stays in
  /// [`last_error`](Self::last_error) either way. When both the measurement
  /// and the mode restore fail, the measurement's error is returned.
  pub fn read_single(&mut self, shot: SingleShot) -> Result<Sample<f32>, Error<E>> {
    self.check_delay(shot.delay_ms)?;

    let previous = self.get_measurement_mode(false)?;
    self.set_measurement_mode(MeasurementMode::Single)?;

    let polled = self.poll_ready(shot);
    let measured = match (polled, self.read_scaled()) {
      (Err(e), Err(_)) => Err(e),
      (_, read) => read,
    };
    let restored = self.set_measurement_mode(previous);

    self.settle(measured, restored)
  }
}
