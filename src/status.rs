//! Status register and data-ready polling.

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::*, Error, Hmc5883l, SingleShot};

/// Decoded status register (0x09).
///
/// `ready` (RDY) is raised once all six data registers hold a new sample.
/// `locked` (LOCK) is raised while only part of the data registers has been
/// read and the rest is held back from updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct Status {
  pub ready: bool,
  pub locked: bool,
}

impl Status {
  /// The two status bits, as laid out in the register.
  pub fn bits(&self) -> u8 {
    (self.locked as u8) << 1 | self.ready as u8
  }

  /// A complete new sample is waiting in the data registers.
  pub fn is_data_ready(&self) -> bool {
    self.ready && !self.locked
  }
}

impl<I, D, E> Hmc5883l<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  E: embedded_hal::i2c::Error,
  D: DelayNs,
{
  /// Read the status register. Bits 2..7 are reserved and dropped.
  pub fn get_status(&mut self) -> Result<Status, Error<E>> {
    let bits = self.read_field(STATUS)?;
    Status::try_from([bits]).map_err(|_| self.fail(Error::Data))
  }

  /// Whether a complete sample can be read right now.
  pub fn is_ready(&mut self) -> Result<bool, Error<E>> {
    Ok(self.get_status()?.is_data_ready())
  }

  /// Poll the status register until data is ready, sleeping
  /// `shot.delay_ms` between polls.
  ///
  /// Returns `Ok(false)` when `shot.max_retries` polls went by without data.
  /// A failing status read ends the wait with that error.
  pub fn wait_until_ready(&mut self, shot: SingleShot) -> Result<bool, Error<E>> {
    self.check_delay(shot.delay_ms)?;
    self.poll_ready(shot)
  }

  pub(crate) fn check_delay(&mut self, delay_ms: f32) -> Result<(), Error<E>> {
    // Written so that NaN is rejected as well.
    if !(delay_ms >= 0.0) {
      return Err(self.fail(Error::InvalidDelay));
    }
    Ok(())
  }

  pub(crate) fn poll_ready(&mut self, shot: SingleShot) -> Result<bool, Error<E>> {
    let mut polls: u16 = 0;
    loop {
      polls = polls.saturating_add(1);
      if self.get_status()?.is_data_ready() {
        trace!("hmc5883l: data ready after {=u16} polls", polls);
        return Ok(true);
      }
      // No sleep after the last poll.
      if shot.max_retries != 0 && polls >= shot.max_retries {
        warn!("hmc5883l: no data after {=u16} polls", polls);
        return Ok(false);
      }
      self.sleep_ms(shot.delay_ms);
    }
  }
}
