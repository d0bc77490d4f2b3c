#![no_std]
#![doc = include_str!("../README.md")]
//!
//! ## Design Principles
//!
//! - **Type-safe**: Settings are enums; raw levels are validated before they reach the bus
//! - **Blocking**: Built on the `embedded-hal` 1.0 I2C and delay traits
//! - **Cached**: Configuration is mirrored in the driver, reads without `update_cache` cost no bus traffic
//! - **Recoverable**: Every failure is a returned error, the last one is also kept on the driver
//!
//! ## Module Organization
//!
//! - [`config`]: Gain, averaging, output rate, measurement mode, bias and I2C speed settings
//! - [`measure`]: Raw, scaled, calibrated and single-shot reads
//! - [`status`]: Status register and data-ready polling
//! - [`selftest`]: Positive and negative bias self-tests
//! - [`calib`]: Self-test based calibration
//! - [`vector`]: Three-axis vector type
//!
//! ## Basic Usage
//!
//! ```no_run
//! # fn example<I, D>(i2c: I, delay: D) -> Result<(), hmc5883l::Error<I::Error>>
//! # where I: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs {
//! use hmc5883l::{Hmc5883l, SingleShot};
//!
//! let mut mag = Hmc5883l::new(i2c, delay);
//!
//! // Write the default configuration and calibrate against the on-chip bias field
//! mag.initialize(false)?;
//! mag.calibrate(SingleShot::default())?;
//!
//! let field = mag.read_single(SingleShot::default())?;
//! # Ok(())
//! # }
//! ```

use embedded_hal::{delay::DelayNs, i2c::*};

#[macro_use]
mod log;

pub mod calib;
pub mod config;
mod defs;
pub mod measure;
#[cfg(test)]
mod mock;
pub(crate) mod rw;
pub mod selftest;
pub mod status;
mod types;
pub mod vector;

use defs::*;
pub use measure::{RawSample, Sample, Saturation};
pub use status::Status;
pub use types::*;
pub use vector::Vector3;

/// Driver error type.
///
/// This error type wraps the underlying I2C error and adds HMC5883L-specific
/// error conditions.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I2C communication error
  I2c(E),
  /// Gain level outside 0..=7
  InvalidGain(u8),
  /// Averaging setting outside 0..=3
  InvalidAveraging(u8),
  /// Output rate setting outside 0..=6 (7 is reserved)
  InvalidOutputRate(u8),
  /// Measurement mode outside 0..=2
  InvalidMeasurementMode(u8),
  /// Bias mode outside 0..=2 (3 is reserved)
  InvalidBiasMode(u8),
  /// Negative or NaN polling delay
  InvalidDelay,
  /// Identification registers do not read "H43"
  InvalidChipId([u8; 3]),
  /// Register contents could not be decoded
  Data,
}

/// Classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
  /// Transfer did not fit the controller buffer (reported as an overrun)
  DataTooLong,
  /// No acknowledge on the address byte
  AddressNack,
  /// No acknowledge on a data byte
  DataNack,
  /// Any other bus failure
  Other,
  /// Fewer bytes than requested came back
  ShortRead,
}

impl BusError {
  /// The bus classification inside `kind`, or `None` for driver errors.
  ///
  /// ```
  /// use hmc5883l::{BusError, ErrorKind};
  ///
  /// assert_eq!(BusError::from_kind(ErrorKind::Bus(BusError::DataNack)), Some(BusError::DataNack));
  /// assert_eq!(BusError::from_kind(ErrorKind::InvalidGain), None);
  /// ```
  pub fn from_kind(kind: ErrorKind) -> Option<Self> {
    match kind {
      ErrorKind::Bus(b) => Some(b),
      _ => None,
    }
  }
}

/// Copyable summary of an [`Error`], as stored in the driver's last-error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
  Bus(BusError),
  InvalidGain,
  InvalidAveraging,
  InvalidOutputRate,
  InvalidMeasurementMode,
  InvalidBiasMode,
  InvalidDelay,
  InvalidChipId,
  Data,
}

impl ErrorKind {
  /// Numeric error code. Bus errors use 1..=5, driver errors start at 8.
  pub fn code(self) -> u8 {
    match self {
      ErrorKind::Bus(BusError::DataTooLong) => 1,
      ErrorKind::Bus(BusError::AddressNack) => 2,
      ErrorKind::Bus(BusError::DataNack) => 3,
      ErrorKind::Bus(BusError::Other) => 4,
      ErrorKind::Bus(BusError::ShortRead) => 5,
      ErrorKind::InvalidGain => 8,
      ErrorKind::InvalidAveraging => 9,
      ErrorKind::InvalidOutputRate => 10,
      ErrorKind::InvalidMeasurementMode => 11,
      ErrorKind::InvalidBiasMode => 12,
      ErrorKind::InvalidDelay => 13,
      ErrorKind::InvalidChipId => 14,
      ErrorKind::Data => 15,
    }
  }
}

impl<E: embedded_hal::i2c::Error> Error<E> {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::I2c(e) => ErrorKind::Bus(match e.kind() {
        embedded_hal::i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => BusError::AddressNack,
        embedded_hal::i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => BusError::DataNack,
        embedded_hal::i2c::ErrorKind::Overrun => BusError::DataTooLong,
        _ => BusError::Other,
      }),
      Error::InvalidGain(_) => ErrorKind::InvalidGain,
      Error::InvalidAveraging(_) => ErrorKind::InvalidAveraging,
      Error::InvalidOutputRate(_) => ErrorKind::InvalidOutputRate,
      Error::InvalidMeasurementMode(_) => ErrorKind::InvalidMeasurementMode,
      Error::InvalidBiasMode(_) => ErrorKind::InvalidBiasMode,
      Error::InvalidDelay => ErrorKind::InvalidDelay,
      Error::InvalidChipId(_) => ErrorKind::InvalidChipId,
      Error::Data => ErrorKind::Data,
    }
  }
}

/// Combine the result of an action with the result of the cleanup that
/// always runs after it. The action's error wins; the cleanup's error only
/// surfaces when the action succeeded.
pub(crate) fn prioritize<T, E>(primary: Result<T, E>, cleanup: Result<(), E>) -> Result<T, E> {
  match (primary, cleanup) {
    (Err(e), _) => Err(e),
    (Ok(_), Err(e)) => Err(e),
    (Ok(v), Ok(())) => Ok(v),
  }
}

/// HMC5883L device driver instance.
///
/// Owns the I2C bus and the delay provider, and mirrors the device
/// configuration so that cached getters do not touch the bus.
///
/// # Type Parameters
///
/// - `I`: I2C implementation (must implement `embedded_hal::i2c::I2c`)
/// - `D`: Delay provider (must implement `embedded_hal::delay::DelayNs`)
pub struct Hmc5883l<I, D> {
  i2c: I,
  delay: D,
  config: Config,
  high_speed: bool,
  calibration: Vector3<f32>,
  last_error: Option<ErrorKind>,
}

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  /// Create a new driver instance.
  ///
  /// No bus traffic happens here. The cache starts out with the power-on
  /// register values and a unit calibration; call
  /// [`initialize`](Self::initialize) to bring it in line with the device.
  pub fn new(i2c: I, delay: D) -> Self {
    Self {
      i2c,
      delay,
      config: Config::power_on(),
      high_speed: false,
      calibration: Vector3::new(1.0, 1.0, 1.0),
      last_error: None,
    }
  }

  /// Give back the bus and the delay provider.
  pub fn release(self) -> (I, D) {
    (self.i2c, self.delay)
  }

  /// Bring the device and the driver cache in sync.
  ///
  /// With `no_config == false` the default [`Config`] is written (gain
  /// ±1.3 G, no averaging, 15 Hz, idle, no bias) and the calibration is reset
  /// to unity. The first failing write aborts.
  ///
  /// With `no_config == true` the device is left untouched: all settings are
  /// read back into the cache and the current calibration is kept. The first
  /// failing read aborts.
  pub fn initialize(&mut self, no_config: bool) -> Result<(), Error<E>> {
    if no_config {
      self.get_gain(true)?;
      self.get_averaging(true)?;
      self.get_output_rate(true)?;
      self.get_measurement_mode(true)?;
      self.get_bias_mode(true)?;
      debug!("hmc5883l: cache synced from device");
      return Ok(());
    }

    self.calibration = Vector3::new(1.0, 1.0, 1.0);
    self.configure(Config::default())
  }

  /// Write every setting of `cfg`, in register order. Stops at the first
  /// failure; settings written before it stay applied.
  pub fn configure(&mut self, cfg: Config) -> Result<(), Error<E>> {
    self.set_gain(cfg.gain)?;
    self.set_averaging(cfg.averaging)?;
    self.set_output_rate(cfg.output_rate)?;
    self.set_measurement_mode(cfg.mode)?;
    self.set_bias_mode(cfg.bias)
  }

  /// Cached configuration. No bus traffic.
  pub fn config(&self) -> Config {
    self.config
  }

  /// Most recent failure recorded by any operation on this driver.
  ///
  /// Successful operations leave it alone; use [`clear_error`](Self::clear_error)
  /// to reset it.
  pub fn last_error(&self) -> Option<ErrorKind> {
    self.last_error
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
  }

  /// Read the three identification registers (`b"H43"` on a genuine part).
  pub fn get_id(&mut self) -> Result<[u8; 3], Error<E>> {
    let mut id = [0u8; 3];
    self.read_bytes(Reg::IdA, &mut id)?;
    Ok(id)
  }

  /// Fail with [`Error::InvalidChipId`] unless the identification registers match.
  pub fn check_id(&mut self) -> Result<(), Error<E>> {
    let id = self.get_id()?;
    if id != HMC5883L_ID {
      return Err(self.fail(Error::InvalidChipId(id)));
    }
    Ok(())
  }

  /// Record `e` as the last error and hand it back.
  pub(crate) fn fail(&mut self, e: Error<E>) -> Error<E> {
    self.last_error = Some(e.kind());
    e
  }

  /// [`prioritize`] plus bookkeeping: the error that is returned is also the
  /// one left in the last-error slot.
  pub(crate) fn settle<T>(&mut self, primary: Result<T, Error<E>>, cleanup: Result<(), Error<E>>) -> Result<T, Error<E>> {
    if cleanup.is_err() {
      warn!("hmc5883l: restore after measurement failed");
    }
    prioritize(primary, cleanup).map_err(|e| self.fail(e))
  }
}

#[cfg(test)]
mod tests {
  use embedded_hal::i2c::ErrorKind as I2cErrorKind;

  use super::*;
  use crate::mock::*;

  #[test]
  fn prioritize_prefers_primary_error() {
    let r: Result<u8, u8> = prioritize(Err(1), Err(2));
    assert_eq!(r, Err(1));
    let r: Result<u8, u8> = prioritize(Ok(7), Err(2));
    assert_eq!(r, Err(2));
    let r: Result<u8, u8> = prioritize(Err(1), Ok(()));
    assert_eq!(r, Err(1));
    let r: Result<u8, u8> = prioritize(Ok(7), Ok(()));
    assert_eq!(r, Ok(7));
  }

  #[test]
  fn error_kind_codes() {
    assert_eq!(ErrorKind::Bus(BusError::DataTooLong).code(), 1);
    assert_eq!(ErrorKind::Bus(BusError::AddressNack).code(), 2);
    assert_eq!(ErrorKind::InvalidGain.code(), 8);
    assert_eq!(ErrorKind::InvalidBiasMode.code(), 12);
    assert_eq!(BusError::from_kind(ErrorKind::Bus(BusError::DataNack)), Some(BusError::DataNack));
    assert_eq!(BusError::from_kind(ErrorKind::InvalidDelay), None);
  }

  #[test]
  fn bus_errors_are_classified() {
    let nack_addr: Error<I2cErrorKind> = Error::I2c(I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    let nack_data: Error<I2cErrorKind> = Error::I2c(I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
    let overrun: Error<I2cErrorKind> = Error::I2c(I2cErrorKind::Overrun);
    let lost: Error<I2cErrorKind> = Error::I2c(I2cErrorKind::ArbitrationLoss);

    assert_eq!(nack_addr.kind(), ErrorKind::Bus(BusError::AddressNack));
    assert_eq!(nack_data.kind(), ErrorKind::Bus(BusError::DataNack));
    assert_eq!(overrun.kind(), ErrorKind::Bus(BusError::DataTooLong));
    assert_eq!(lost.kind(), ErrorKind::Bus(BusError::Other));
  }

  #[test]
  fn initialize_writes_defaults() {
    let mut mag = driver(&[
      write(0x01, 0x20),
      read(0x00, &[0x70]),
      write(0x00, 0x10),
      read(0x00, &[0x10]),
      write(0x00, 0x10),
      read(0x02, &[0x81]),
      write(0x02, 0x82),
      read(0x00, &[0x10]),
      write(0x00, 0x10),
    ]);
    mag.calibration = Vector3::new(2.0, 2.0, 2.0);

    mag.initialize(false).unwrap();

    assert_eq!(mag.config(), Config::default());
    assert_eq!(mag.calibration(), Vector3::new(1.0, 1.0, 1.0));
    assert!(mag.get_high_speed(false).unwrap());
    done(mag);
  }

  #[test]
  fn initialize_stops_at_first_failure() {
    let mut mag = driver(&[write(0x01, 0x20), read(0x00, &[0x00]).with_error(I2cErrorKind::Other)]);

    let err = mag.initialize(false).unwrap_err();

    assert!(matches!(err, Error::I2c(I2cErrorKind::Other)));
    assert_eq!(mag.last_error(), Some(ErrorKind::Bus(BusError::Other)));
    assert_eq!(mag.config().gain, Gain::Gauss1_3);
    done(mag);
  }

  #[test]
  fn initialize_without_config_reads_back_and_keeps_calibration() {
    let mut mag = driver(&[
      read(0x01, &[0xA0]),
      read(0x00, &[0x75]),
      read(0x00, &[0x75]),
      read(0x02, &[0x00]),
      read(0x00, &[0x75]),
    ]);
    mag.calibration = Vector3::new(0.9, 1.1, 1.0);

    mag.initialize(true).unwrap();

    assert_eq!(
      mag.config(),
      Config {
        gain: Gain::Gauss4_7,
        averaging: Averaging::Avg8,
        output_rate: OutputRate::Hz30,
        mode: MeasurementMode::Continuous,
        bias: BiasMode::Positive,
      }
    );
    assert_eq!(mag.calibration(), Vector3::new(0.9, 1.1, 1.0));
    done(mag);
  }

  #[test]
  fn initialize_without_config_aborts_on_read_failure() {
    let mut mag = driver(&[
      read(0x01, &[0xA0]),
      read(0x00, &[0x00]).with_error(I2cErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
    ]);

    assert!(mag.initialize(true).is_err());
    assert_eq!(mag.last_error(), Some(ErrorKind::Bus(BusError::AddressNack)));
    assert_eq!(mag.config().gain, Gain::Gauss4_7);
    done(mag);
  }

  #[test]
  fn check_id() {
    let mut mag = driver(&[read(0x0A, b"H43"), read(0x0A, b"H44")]);

    assert_eq!(mag.get_id().unwrap(), *b"H43");
    assert!(matches!(mag.check_id(), Err(Error::InvalidChipId([b'H', b'4', b'4']))));
    assert_eq!(mag.last_error(), Some(ErrorKind::InvalidChipId));
    done(mag);
  }

  #[test]
  fn last_error_survives_success_until_cleared() {
    let mut mag = driver(&[read(0x01, &[0x20]).with_error(I2cErrorKind::Bus), read(0x01, &[0x20])]);

    assert!(mag.get_gain(true).is_err());
    assert_eq!(mag.get_gain(true).unwrap(), Gain::Gauss1_3);
    assert_eq!(mag.last_error(), Some(ErrorKind::Bus(BusError::Other)));
    mag.clear_error();
    assert_eq!(mag.last_error(), None);
    done(mag);
  }
}
