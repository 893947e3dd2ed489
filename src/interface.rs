//! Transport between the register map and the part.
//!
//! The register layer only needs "read one byte at a register address" and
//! "write one byte at a register address". Anything that can do that
//! implements [`RegisterInterface`]; [`I2cInterface`] does it over an
//! `embedded-hal-async` I2C bus.

use embedded_hal_async::i2c;

use crate::fmt::*;

/// The LTC4099 answers at a fixed 7-bit address, 0b0001001
pub const DEFAULT_ADDRESS: u8 = 0x09;

/// Byte-wide register transport. Each call is one bus transaction.
/// Errors are opaque to the driver and handed back to the caller untouched.
#[allow(async_fn_in_trait)]
pub trait RegisterInterface {
    type Error;

    async fn read_register(&mut self, address: u8) -> Result<u8, Self::Error>;
    async fn write_register(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: RegisterInterface> RegisterInterface for &mut T {
    type Error = T::Error;

    async fn read_register(&mut self, address: u8) -> Result<u8, Self::Error> {
        (**self).read_register(address).await
    }

    async fn write_register(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(address, value).await
    }
}

/// Register access over I2C. A register read is a single write-read
/// transaction, a write sends the register address followed by the value
pub struct I2cInterface<I> {
    i2c: I,
    addr: u8,
}

impl<I> I2cInterface<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self { i2c, addr }
    }

    pub fn with_default_address(i2c: I) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Gives the bus back
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I, E> RegisterInterface for I2cInterface<I>
where
    I: i2c::I2c<Error = E>,
{
    type Error = E;

    async fn read_register(&mut self, address: u8) -> Result<u8, E> {
        let mut response = [0];

        self.i2c
            .write_read(self.addr, &[address], &mut response)
            .await?;

        trace!("read reg {=u8} -> {=u8}", address, response[0]);
        Ok(response[0])
    }

    async fn write_register(&mut self, address: u8, value: u8) -> Result<(), E> {
        trace!("write reg {=u8} <- {=u8}", address, value);
        self.i2c.write(self.addr, &[address, value]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

    #[tokio::test]
    async fn read_is_one_write_read() {
        let expectations = [Transaction::write_read(DEFAULT_ADDRESS, vec![0x03], vec![0xa5])];
        let mut iface = I2cInterface::with_default_address(Mock::new(&expectations));

        assert_eq!(iface.read_register(0x03).await, Ok(0xa5));

        iface.release().done();
    }

    #[tokio::test]
    async fn write_sends_address_then_value() {
        let expectations = [Transaction::write(0x12, vec![0x01, 0b0001_0000])];
        let mut iface = I2cInterface::new(Mock::new(&expectations), 0x12);

        assert_eq!(iface.address(), 0x12);
        assert_eq!(iface.write_register(0x01, 0b0001_0000).await, Ok(()));

        iface.release().done();
    }

    #[tokio::test]
    async fn bus_errors_pass_through() {
        let expectations = [
            Transaction::write_read(DEFAULT_ADDRESS, vec![0x00], vec![0x00])
                .with_error(ErrorKind::Other),
            Transaction::write(DEFAULT_ADDRESS, vec![0x00, 0xff])
                .with_error(ErrorKind::ArbitrationLoss),
        ];
        let mut iface = I2cInterface::with_default_address(Mock::new(&expectations));

        assert_eq!(iface.read_register(0x00).await, Err(ErrorKind::Other));
        assert_eq!(
            iface.write_register(0x00, 0xff).await,
            Err(ErrorKind::ArbitrationLoss)
        );

        iface.release().done();
    }

    async fn toggle<T: RegisterInterface>(mut iface: T, address: u8) -> Result<u8, T::Error> {
        let value = iface.read_register(address).await?;
        iface.write_register(address, !value).await?;
        Ok(!value)
    }

    #[tokio::test]
    async fn borrowed_transport() {
        let expectations = [
            Transaction::write_read(DEFAULT_ADDRESS, vec![0x02], vec![0x80]),
            Transaction::write(DEFAULT_ADDRESS, vec![0x02, 0x7f]),
        ];
        let mut iface = I2cInterface::with_default_address(Mock::new(&expectations));

        assert_eq!(toggle(&mut iface, 0x02).await, Ok(0x7f));

        iface.release().done();
    }
}
