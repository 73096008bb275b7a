use rand::Rng;

use crate::display::Display;
use crate::layout::Field;
use crate::layout::HAND_BITS;
use crate::layout::HAND_POSITIONS;
use crate::layout::HAND_SLOTS;
use crate::oscillator::Oscillators;
use crate::time_source::Clock;
use crate::time_source::TimeSource;

/// Brightness of a set bit.
pub const FULL_BRIGHTNESS: f32 = 1.0;

/// Shows the time as binary-coded decimal, letting the unset bits glow softly.
pub struct BinaryClock<D, C, R> {
    display: D,
    time: TimeSource<C>,
    oscillators: Oscillators<R>,
    brightness: [[f32; HAND_BITS]; HAND_SLOTS],
}

impl<D, C, R> BinaryClock<D, C, R>
where
    D: Display,
    C: Clock,
    R: Rng,
{
    pub fn new(
        display: D,
        time: TimeSource<C>,
        oscillators: Oscillators<R>,
    ) -> Result<Self, crate::error::Error> {
        let (width, height) = display.size();
        if !crate::layout::fits(width, height) {
            return Err(crate::error::Error::LayoutDoesNotFit { width, height });
        }

        Ok(Self {
            display,
            time,
            oscillators,
            brightness: [[0.0; HAND_BITS]; HAND_SLOTS],
        })
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Samples the time and moves every LED's animation forward by one step.
    pub fn update(&mut self) {
        self.time.update();
        self.brightness = self.oscillators.step();
    }

    /// Writes the current state to the display and shows it.
    pub fn draw(&mut self) -> Result<(), D::Error> {
        tracing::debug!(
            hour = self.time.hour(),
            minute = self.time.minute(),
            second = self.time.second(),
            "Drawing"
        );

        let time = self.time.time();

        for field in Field::ALL {
            let (tens, units) = crate::layout::decompose(field.value(&time));
            let (tens_slot, units_slot) = field.slots();

            self.draw_digit(tens_slot, tens);
            self.draw_digit(units_slot, units);
        }

        self.display.show()
    }

    fn draw_digit(&mut self, slot: usize, digit: u8) {
        let x = HAND_POSITIONS[slot];

        for bit in 0..HAND_BITS {
            let y = crate::layout::row_for_bit(bit);
            let brightness = if crate::layout::bit_is_set(digit, bit) {
                FULL_BRIGHTNESS
            } else {
                self.brightness[slot][bit]
            };

            tracing::trace!(x, y, brightness, "Setting pixel");
            self.display.set_pixel(x, y, brightness);
        }
    }
}
