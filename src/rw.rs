use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::*, Error, Hmc5883l};

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  pub(crate) fn read_u8(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let mut b = [0u8; 1];
    self.read_bytes(reg, &mut b)?;
    Ok(b[0])
  }

  pub(crate) fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    // The register pointer auto-increments, so multi-byte reads walk
    // consecutive registers.
    match self.i2c.write_read(ADDR_I2C, &[reg.into()], buf) {
      Ok(()) => Ok(()),
      Err(e) => Err(self.fail(Error::I2c(e))),
    }
  }

  pub(crate) fn write_u8(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    match self.i2c.write(ADDR_I2C, &[reg.into(), value]) {
      Ok(()) => Ok(()),
      Err(e) => Err(self.fail(Error::I2c(e))),
    }
  }

  /// Write `value` into `field`, carrying over the register bits the field
  /// does not own. Returns the byte that was written.
  pub(crate) fn write_field(&mut self, field: Field, value: u8) -> Result<u8, Error<E>> {
    let current = if field.needs_read() { self.read_u8(field.reg)? } else { 0 };
    let next = field.encode(current, value);
    self.write_u8(field.reg, next)?;
    Ok(next)
  }

  pub(crate) fn read_field(&mut self, field: Field) -> Result<u8, Error<E>> {
    Ok(field.decode(self.read_u8(field.reg)?))
  }

  pub(crate) fn sleep_ms(&mut self, ms: f32) {
    self.delay.delay_us((ms * 1000.0) as u32);
  }
}
