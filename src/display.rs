pub mod frame_buffer;
pub mod scroll_phat_hd;
pub mod terminal;

/// An LED matrix with a frame buffer that is written pixel by pixel and then flushed.
pub trait Display {
    type Error;

    /// (width, height) of the matrix as seen through the current rotation.
    fn size(&self) -> (u8, u8);

    fn rotate(&mut self, rotation: Rotation);

    fn clear(&mut self);

    /// Panics if `(x, y)` lies outside of [`Display::size`]. Brightness is clamped to `0.0..=1.0`.
    fn set_pixel(&mut self, x: u8, y: u8, brightness: f32);

    fn show(&mut self) -> Result<(), Self::Error>;
}

/// Clockwise rotation of the picture.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Whether width and height trade places.
    pub fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Rotation must be one of 0, 90, 180 or 270 degrees, got {0}")]
pub struct InvalidRotation(u16);

impl TryFrom<u16> for Rotation {
    type Error = InvalidRotation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(InvalidRotation(other)),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
