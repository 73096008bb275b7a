//! Pimoroni Scroll pHAT HD: a 17x7 matrix of white LEDs behind an IS31FL3731 driver.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use is31fl3731::devices::ScrollPhatHD;
use is31fl3731::IS31FL3731;

use super::frame_buffer::FrameBuffer;
use super::Rotation;

pub const WIDTH: usize = 17;
pub const HEIGHT: usize = 7;

pub const DEFAULT_ADDRESS: u8 = 0x74;

#[derive(Debug, thiserror::Error)]
pub enum ScrollPhatError {
    #[error("I2C transfer to the LED driver failed")]
    I2c(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("The LED driver rejected location {0}")]
    InvalidLocation(u8),

    #[error("The LED driver rejected frame {0}")]
    InvalidFrame(u8),
}

impl<E> From<is31fl3731::Error<E>> for ScrollPhatError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: is31fl3731::Error<E>) -> Self {
        match error {
            is31fl3731::Error::I2cError(error) => ScrollPhatError::I2c(Box::new(error)),
            is31fl3731::Error::InvalidLocation(location) => {
                ScrollPhatError::InvalidLocation(location)
            }
            is31fl3731::Error::InvalidFrame(frame) => ScrollPhatError::InvalidFrame(frame),
        }
    }
}

/// PWM register offset of the LED at unrotated `(x, y)`.
///
/// Replaces the mapping shipped with `ScrollPhatHD::configure`, which subtracts 8 from `y` on
/// the right half of the board and overflows.
fn pixel_address(x: u8, y: u8) -> u8 {
    if x > 8 {
        (x - 8) * 16 - (y + 2)
    } else {
        (8 - x) * 16 + y
    }
}

pub struct ScrollPhatHd<I2C> {
    device: IS31FL3731<I2C>,
    buffer: FrameBuffer<WIDTH, HEIGHT>,
    /// PWM values the driver currently holds, only changed LEDs are written on `show()`.
    shown: [[u8; WIDTH]; HEIGHT],
}

impl<I2C, E> ScrollPhatHd<I2C>
where
    I2C: Write<Error = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Resets the driver, which leaves every LED off.
    pub fn new(
        i2c: I2C,
        address: u8,
        delay: &mut impl DelayMs<u8>,
    ) -> Result<Self, ScrollPhatError> {
        let mut device = ScrollPhatHD::configure(i2c);
        device.set_address(address);
        device.calc_pixel = pixel_address;
        device.setup(delay)?;

        tracing::debug!(address, "Initialized IS31FL3731");
        Ok(Self {
            device,
            buffer: FrameBuffer::default(),
            shown: [[0; WIDTH]; HEIGHT],
        })
    }

    #[cfg(test)]
    pub fn bus_mut(&mut self) -> &mut I2C {
        &mut self.device.i2c
    }
}

impl<I2C, E> super::Display for ScrollPhatHd<I2C>
where
    I2C: Write<Error = E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = ScrollPhatError;

    fn size(&self) -> (u8, u8) {
        self.buffer.size()
    }

    fn rotate(&mut self, rotation: Rotation) {
        self.buffer.set_rotation(rotation);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn set_pixel(&mut self, x: u8, y: u8, brightness: f32) {
        self.buffer.set(x, y, brightness);
    }

    fn show(&mut self) -> Result<(), Self::Error> {
        for (x, y, brightness) in self.buffer.iter() {
            let pwm = (brightness * 255.0).round() as u8;
            if self.shown[y][x] == pwm {
                continue;
            }

            self.device.pixel(x as u8, y as u8, pwm)?;
            self.shown[y][x] = pwm;
        }

        Ok(())
    }
}
