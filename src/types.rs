use crate::defs::*;

/// Sensor gain. Selects the field range and the resolution of one LSB.
///
/// | Variant     | Level | LSB/Gauss | Range (G) | mG/LSB |
/// | :---------- | :---: | :-------: | :-------: | :----: |
/// | `Gauss0_88` |   0   |   1370    |  ±0.88    |  0.73  |
/// | `Gauss1_3`  |   1   |   1090    |  ±1.3     |  0.92  |
/// | `Gauss1_9`  |   2   |    820    |  ±1.9     |  1.22  |
/// | `Gauss2_5`  |   3   |    660    |  ±2.5     |  1.52  |
/// | `Gauss4_0`  |   4   |    440    |  ±4.0     |  2.27  |
/// | `Gauss4_7`  |   5   |    390    |  ±4.7     |  2.56  |
/// | `Gauss5_6`  |   6   |    330    |  ±5.6     |  3.03  |
/// | `Gauss8_1`  |   7   |    230    |  ±8.1     |  4.35  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
  Gauss0_88 = 0x00,
  Gauss1_3 = 0x01,
  Gauss1_9 = 0x02,
  Gauss2_5 = 0x03,
  Gauss4_0 = 0x04,
  Gauss4_7 = 0x05,
  Gauss5_6 = 0x06,
  Gauss8_1 = 0x07,
}

impl Gain {
  pub fn lsb_per_gauss(self) -> u16 {
    GAIN_LSB_PER_GAUSS[self as usize]
  }

  /// Resolution of one raw count in milligauss.
  pub fn milligauss_per_lsb(self) -> f32 {
    GAIN_MG_PER_LSB[self as usize]
  }

  pub fn range_milligauss(self) -> u16 {
    GAIN_RANGE_MG[self as usize]
  }
}

impl From<Gain> for u8 {
  fn from(value: Gain) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for Gain {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x00 => Ok(Gain::Gauss0_88),
      0x01 => Ok(Gain::Gauss1_3),
      0x02 => Ok(Gain::Gauss1_9),
      0x03 => Ok(Gain::Gauss2_5),
      0x04 => Ok(Gain::Gauss4_0),
      0x05 => Ok(Gain::Gauss4_7),
      0x06 => Ok(Gain::Gauss5_6),
      0x07 => Ok(Gain::Gauss8_1),
      _ => Err(()),
    }
  }
}

/// Number of samples averaged per measurement output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
  Avg1 = 0x00,
  Avg2 = 0x01,
  Avg4 = 0x02,
  Avg8 = 0x03,
}

impl Averaging {
  pub fn samples(self) -> u8 {
    1 << (self as u8)
  }
}

impl From<Averaging> for u8 {
  fn from(value: Averaging) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for Averaging {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x00 => Ok(Averaging::Avg1),
      0x01 => Ok(Averaging::Avg2),
      0x02 => Ok(Averaging::Avg4),
      0x03 => Ok(Averaging::Avg8),
      _ => Err(()),
    }
  }
}

/// Data output rate in continuous measurement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputRate {
  Hz0_75 = 0x00,
  Hz1_5 = 0x01,
  Hz3 = 0x02,
  Hz7_5 = 0x03,
  Hz15 = 0x04,
  Hz30 = 0x05,
  Hz75 = 0x06,
}

impl OutputRate {
  pub fn hz(self) -> f32 {
    OUTPUT_RATE_HZ[self as usize]
  }
}

impl From<OutputRate> for u8 {
  fn from(value: OutputRate) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for OutputRate {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x00 => Ok(OutputRate::Hz0_75),
      0x01 => Ok(OutputRate::Hz1_5),
      0x02 => Ok(OutputRate::Hz3),
      0x03 => Ok(OutputRate::Hz7_5),
      0x04 => Ok(OutputRate::Hz15),
      0x05 => Ok(OutputRate::Hz30),
      0x06 => Ok(OutputRate::Hz75),
      _ => Err(()),
    }
  }
}

/// Operating mode of the measurement engine.
///
/// In `Single` mode the device takes one measurement, raises RDY and falls
/// back to `Idle` on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementMode {
  Continuous = 0x00,
  Single = 0x01,
  Idle = 0x02,
}

impl MeasurementMode {
  /// Decode the mode bits read back from the device. Both `0b10` and `0b11`
  /// mean idle.
  pub(crate) fn from_bits(bits: u8) -> Self {
    match bits & 0x03 {
      0x00 => MeasurementMode::Continuous,
      0x01 => MeasurementMode::Single,
      _ => MeasurementMode::Idle,
    }
  }
}

impl From<MeasurementMode> for u8 {
  fn from(value: MeasurementMode) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for MeasurementMode {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x00 => Ok(MeasurementMode::Continuous),
      0x01 => Ok(MeasurementMode::Single),
      0x02 => Ok(MeasurementMode::Idle),
      _ => Err(()),
    }
  }
}

/// Self-test bias applied to all three axes.
///
/// With a bias set, every measurement is the difference between a biased and
/// an unbiased sample. The applied field is ±1160 mG on X/Y and ±1080 mG on Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiasMode {
  None = 0x00,
  Positive = 0x01,
  Negative = 0x02,
}

impl From<BiasMode> for u8 {
  fn from(value: BiasMode) -> Self {
    value as u8
  }
}

impl TryFrom<u8> for BiasMode {
  type Error = ();

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    match value {
      0x00 => Ok(BiasMode::None),
      0x01 => Ok(BiasMode::Positive),
      0x02 => Ok(BiasMode::Negative),
      _ => Err(()),
    }
  }
}

/// Measurement configuration as cached by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  pub gain: Gain,
  pub averaging: Averaging,
  pub output_rate: OutputRate,
  pub mode: MeasurementMode,
  pub bias: BiasMode,
}

impl Config {
  /// Register contents after power-on reset.
  pub(crate) const fn power_on() -> Self {
    Config {
      gain: Gain::Gauss1_3,
      averaging: Averaging::Avg1,
      output_rate: OutputRate::Hz15,
      mode: MeasurementMode::Single,
      bias: BiasMode::None,
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Config {
      gain: Gain::Gauss1_3,
      averaging: Averaging::Avg1,
      output_rate: OutputRate::Hz15,
      mode: MeasurementMode::Idle,
      bias: BiasMode::None,
    }
  }
}

/// Polling parameters for single-shot acquisition.
///
/// `max_retries == 0` polls until the device reports data, however long
/// that takes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SingleShot {
  /// Pause between status polls, in milliseconds.
  pub delay_ms: f32,
  pub max_retries: u16,
}

impl Default for SingleShot {
  fn default() -> Self {
    SingleShot { delay_ms: 2.0, max_retries: 20 }
  }
}
