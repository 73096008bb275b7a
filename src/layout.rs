//! Where the binary-coded-decimal digits of the time end up on the matrix.
//!
//! Every two-digit time field occupies two columns ("hand slots"), the tens digit on the left and
//! the units digit on the right. A digit is shown as four bits stacked vertically, most significant
//! bit on top, with an empty row between bits.

use crate::time_source::ClockTime;

/// Number of bit rows per slot, enough for a decimal digit.
pub const HAND_BITS: usize = 4;

/// Columns of the six hand slots, left to right.
pub const HAND_POSITIONS: [u8; 6] = [2, 4, 7, 9, 12, 14];

pub const HAND_SLOTS: usize = HAND_POSITIONS.len();

/// Smallest matrix (width, height) that holds every slot.
pub const REQUIRED_SIZE: (u8, u8) = (HAND_POSITIONS[HAND_SLOTS - 1] + 1, row_for_bit(0) + 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Hour,
    Minute,
    Second,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Hour, Field::Minute, Field::Second];

    /// Indices into [`HAND_POSITIONS`] of the (tens, units) slots.
    pub fn slots(self) -> (usize, usize) {
        match self {
            Field::Hour => (0, 1),
            Field::Minute => (2, 3),
            Field::Second => (4, 5),
        }
    }

    pub fn value(self, time: &ClockTime) -> u8 {
        match self {
            Field::Hour => time.hour(),
            Field::Minute => time.minute(),
            Field::Second => time.second(),
        }
    }
}

/// Splits a two-digit value into its (tens, units) digits.
pub fn decompose(value: u8) -> (u8, u8) {
    let tens = value / 10;
    assert!(
        usize::from(tens) < 1 << HAND_BITS,
        "{value} does not fit into {HAND_BITS} bits per digit"
    );

    (tens, value % 10)
}

pub fn bit_is_set(digit: u8, bit: usize) -> bool {
    assert!(
        usize::from(digit) < 1 << HAND_BITS,
        "digit {digit} does not fit into {HAND_BITS} bits"
    );

    digit & (1 << bit) != 0
}

/// Row of a bit inside a slot, bit 0 being the bottom row.
pub const fn row_for_bit(bit: usize) -> u8 {
    ((HAND_BITS - 1 - bit) * 2) as u8
}

/// Whether a matrix of the given size can show all slots.
pub fn fits(width: u8, height: u8) -> bool {
    let (required_width, required_height) = REQUIRED_SIZE;
    width >= required_width && height >= required_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_all_two_digit_values() {
        for value in 0..=99 {
            let (tens, units) = decompose(value);
            assert_eq!(tens, value / 10);
            assert_eq!(units, value % 10);
            assert!(tens <= 9 && units <= 9);
        }
    }

    #[test]
    fn test_bits_of_decimal_digits() {
        for digit in 0..=9u8 {
            for bit in 0..HAND_BITS {
                assert_eq!(bit_is_set(digit, bit), (digit >> bit) & 1 == 1);
            }
        }
    }

    #[test]
    fn test_digit_three() {
        let bits: Vec<bool> = (0..HAND_BITS).map(|bit| bit_is_set(3, bit)).collect();
        assert_eq!(bits, [true, true, false, false]);
    }

    #[test]
    fn test_rows_are_spaced() {
        let rows: Vec<u8> = (0..HAND_BITS).map(row_for_bit).collect();
        assert_eq!(rows, [6, 4, 2, 0]);
    }

    #[test]
    fn test_required_size() {
        assert_eq!(REQUIRED_SIZE, (15, 7));
        assert!(fits(17, 7));
        assert!(!fits(7, 17));
    }

    #[test]
    fn test_field_slots_cover_every_position_once() {
        let mut slots: Vec<usize> = Field::ALL
            .iter()
            .flat_map(|field| {
                let (tens, units) = field.slots();
                [tens, units]
            })
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..HAND_SLOTS).collect::<Vec<_>>());
    }

    #[test]
    fn test_largest_representable_value() {
        assert_eq!(decompose(159), (15, 9));
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_decompose_rejects_wide_tens() {
        let _ = decompose(160);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_bit_is_set_rejects_wide_digit() {
        let _ = bit_is_set(16, 0);
    }
}
