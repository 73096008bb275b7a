use super::Rotation;

/// Brightness of every LED of a `W`x`H` matrix, in the matrix's own (unrotated) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer<const W: usize, const H: usize> {
    pixels: [[f32; W]; H],
    rotation: Rotation,
}

impl<const W: usize, const H: usize> Default for FrameBuffer<W, H> {
    fn default() -> Self {
        Self {
            pixels: [[0.0; W]; H],
            rotation: Rotation::default(),
        }
    }
}

impl<const W: usize, const H: usize> FrameBuffer<W, H> {
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Size of the buffer as addressed by [`FrameBuffer::set`].
    pub fn size(&self) -> (u8, u8) {
        let (width, height) = if self.rotation.is_transposed() {
            (H, W)
        } else {
            (W, H)
        };

        (width as u8, height as u8)
    }

    pub fn clear(&mut self) {
        self.pixels = [[0.0; W]; H];
    }

    /// Sets a pixel given in rotated coordinates.
    pub fn set(&mut self, x: u8, y: u8, brightness: f32) {
        let (width, height) = self.size();
        assert!(
            x < width && y < height,
            "pixel ({x}, {y}) is outside of the {width}x{height} matrix"
        );

        let (x, y) = (usize::from(x), usize::from(y));
        let (physical_x, physical_y) = match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, H - 1 - x),
            Rotation::Deg180 => (W - 1 - x, H - 1 - y),
            Rotation::Deg270 => (W - 1 - y, x),
        };

        self.pixels[physical_y][physical_x] = brightness.clamp(0.0, 1.0);
    }

    /// Brightness at unrotated coordinates.
    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.pixels[y][x]
    }

    /// Every LED as `(x, y, brightness)` in unrotated coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.pixels.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, brightness)| (x, y, *brightness))
        })
    }
}

fn glyph(brightness: f32) -> char {
    match brightness {
        b if b <= 0.0 => '.',
        b if b < 0.25 => '░',
        b if b < 0.5 => '▒',
        b if b < 0.75 => '▓',
        _ => '█',
    }
}

impl<const W: usize, const H: usize> std::fmt::Display for FrameBuffer<W, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.pixels.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }

            for brightness in row {
                write!(f, "{}", glyph(*brightness))?;
            }
        }

        Ok(())
    }
}
