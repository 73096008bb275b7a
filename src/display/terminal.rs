use std::io::Write;

use super::frame_buffer::FrameBuffer;
use super::scroll_phat_hd::HEIGHT;
use super::scroll_phat_hd::WIDTH;
use super::Rotation;

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";

/// Stand-in for the LED matrix that draws each frame as text, redrawing in place.
pub struct Terminal<W> {
    out: W,
    buffer: FrameBuffer<WIDTH, HEIGHT>,
    screen_cleared: bool,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: FrameBuffer::default(),
            screen_cleared: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> super::Display for Terminal<W> {
    type Error = std::io::Error;

    fn size(&self) -> (u8, u8) {
        self.buffer.size()
    }

    fn rotate(&mut self, rotation: Rotation) {
        tracing::debug!(%rotation, "Ignoring rotation, the terminal is always upright");
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn set_pixel(&mut self, x: u8, y: u8, brightness: f32) {
        self.buffer.set(x, y, brightness);
    }

    fn show(&mut self) -> Result<(), Self::Error> {
        if !self.screen_cleared {
            write!(self.out, "{CLEAR_SCREEN}")?;
            self.screen_cleared = true;
        }

        writeln!(self.out, "{CURSOR_HOME}{}", self.buffer)?;
        self.out.flush()
    }
}
