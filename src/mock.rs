//! Bus transcript helpers shared by the unit tests.

extern crate std;

use embedded_hal_mock::eh1::{
  delay::NoopDelay,
  i2c::{Mock as I2cMock, Transaction},
};

use crate::{defs::ADDR_I2C, Hmc5883l};

pub(crate) type MockDriver = Hmc5883l<I2cMock, NoopDelay>;

/// Expect a register read of `reg` answered with `data`.
pub(crate) fn read(reg: u8, data: &[u8]) -> Transaction {
  Transaction::write_read(ADDR_I2C, std::vec![reg], data.to_vec())
}

/// Expect a single-byte register write.
pub(crate) fn write(reg: u8, value: u8) -> Transaction {
  Transaction::write(ADDR_I2C, std::vec![reg, value])
}

pub(crate) fn driver(expectations: &[Transaction]) -> MockDriver {
  Hmc5883l::new(I2cMock::new(expectations), NoopDelay::new())
}

/// Assert the whole transcript was consumed.
pub(crate) fn done(mag: MockDriver) {
  let (mut i2c, _) = mag.release();
  i2c.done();
}

/// Data register bytes for a raw X, Y, Z sample, in the device's X, Z, Y order.
pub(crate) fn sample_bytes(x: i16, y: i16, z: i16) -> [u8; 6] {
  let (x, y, z) = (x.to_be_bytes(), y.to_be_bytes(), z.to_be_bytes());
  [x[0], x[1], z[0], z[1], y[0], y[1]]
}
