#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reg {
  ConfigA = 0x00,
  ConfigB = 0x01,
  Mode = 0x02,
  DataOutX = 0x03,
  Status = 0x09,
  IdA = 0x0A,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

// I2C address (fixed, no address pins on the part)
pub(crate) const ADDR_I2C: u8 = 0x1E;

// Identification registers A..C read back as ASCII "H43".
pub(crate) const HMC5883L_ID: [u8; 3] = *b"H43";

// Raw channel value reported when the ADC over/underflows.
pub(crate) const SATURATION_VALUE: i16 = -4096;

// Self-test bias field strength in mG.
pub(crate) const BIAS_FIELD_XY: f32 = 1160.0;
pub(crate) const BIAS_FIELD_Z: f32 = 1080.0;

/// Bit-field inside a single 8-bit register.
///
/// `keep` lists the bits outside the field that a write must carry over from
/// the current register value. A field with `keep == 0` owns the whole
/// register and is written without reading it first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
  pub reg: Reg,
  pub offset: u8,
  pub width: u8,
  pub keep: u8,
}

impl Field {
  pub(crate) const fn mask(&self) -> u8 {
    (((1u16 << self.width) - 1) as u8) << self.offset
  }

  /// Clear the field in `current` and OR in `value` at the field offset.
  pub(crate) const fn encode(&self, current: u8, value: u8) -> u8 {
    (current & self.keep & !self.mask()) | ((value << self.offset) & self.mask())
  }

  pub(crate) const fn decode(&self, reg: u8) -> u8 {
    (reg & self.mask()) >> self.offset
  }

  pub(crate) const fn needs_read(&self) -> bool {
    self.keep != 0
  }
}

// Register B must hold nothing but the gain.
pub(crate) const GAIN: Field = Field { reg: Reg::ConfigB, offset: 5, width: 3, keep: 0x00 };
pub(crate) const AVERAGING: Field = Field { reg: Reg::ConfigA, offset: 5, width: 2, keep: 0x9F };
pub(crate) const OUTPUT_RATE: Field = Field { reg: Reg::ConfigA, offset: 2, width: 3, keep: 0xE3 };
pub(crate) const BIAS: Field = Field { reg: Reg::ConfigA, offset: 0, width: 2, keep: 0xFC };
// Bits 2..6 of the mode register are reserved and written as zero.
pub(crate) const MEASUREMENT_MODE: Field = Field { reg: Reg::Mode, offset: 0, width: 2, keep: 0x80 };
pub(crate) const HIGH_SPEED: Field = Field { reg: Reg::Mode, offset: 7, width: 1, keep: 0x03 };
pub(crate) const STATUS: Field = Field { reg: Reg::Status, offset: 0, width: 2, keep: 0x00 };

// Lookup tables indexed by gain level.
pub(crate) const GAIN_LSB_PER_GAUSS: [u16; 8] = [1370, 1090, 820, 660, 440, 390, 330, 230];
pub(crate) const GAIN_MG_PER_LSB: [f32; 8] = [0.73, 0.92, 1.22, 1.52, 2.27, 2.56, 3.03, 4.35];
pub(crate) const GAIN_RANGE_MG: [u16; 8] = [880, 1300, 1900, 2500, 4000, 4700, 5600, 8100];

// Indexed by output rate setting.
pub(crate) const OUTPUT_RATE_HZ: [f32; 7] = [0.75, 1.5, 3.0, 7.5, 15.0, 30.0, 75.0];

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn masks_cover_their_bits() {
    assert_eq!(GAIN.mask(), 0xE0);
    assert_eq!(AVERAGING.mask(), 0x60);
    assert_eq!(OUTPUT_RATE.mask(), 0x1C);
    assert_eq!(BIAS.mask(), 0x03);
    assert_eq!(MEASUREMENT_MODE.mask(), 0x03);
    assert_eq!(HIGH_SPEED.mask(), 0x80);
    assert_eq!(STATUS.mask(), 0x03);
  }

  #[test]
  fn encode_preserves_bits_outside_field() {
    // 1_00_101_10: bit 7 set, averaging 0, rate 5, bias 2
    let reg = 0b1001_0110;

    assert_eq!(AVERAGING.encode(reg, 3), 0b1111_0110);
    assert_eq!(OUTPUT_RATE.encode(reg, 1), 0b1000_0110);
    assert_eq!(BIAS.encode(reg, 1), 0b1001_0101);
  }

  #[test]
  fn encode_clears_reserved_mode_bits() {
    assert_eq!(MEASUREMENT_MODE.encode(0xFF, 2), 0x82);
    assert_eq!(MEASUREMENT_MODE.encode(0x7D, 0), 0x00);
    assert_eq!(HIGH_SPEED.encode(0x7E, 1), 0x82);
    assert_eq!(HIGH_SPEED.encode(0x81, 0), 0x01);
  }

  #[test]
  fn gain_owns_whole_register() {
    assert!(!GAIN.needs_read());
    assert_eq!(GAIN.encode(0xFF, 1), 0x20);
    assert_eq!(GAIN.encode(0x00, 7), 0xE0);
  }

  #[test]
  fn decode_extracts_field() {
    let reg = 0b1101_1010;
    assert_eq!(AVERAGING.decode(reg), 2);
    assert_eq!(OUTPUT_RATE.decode(reg), 6);
    assert_eq!(BIAS.decode(reg), 2);
    assert_eq!(HIGH_SPEED.decode(reg), 1);
    assert_eq!(GAIN.decode(0xA0), 5);
  }
}
