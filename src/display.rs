// display size
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

const DISPLAY_SIZE: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;

/// Monochrome 64x32 frame buffer, one cell per pixel, row-major.
///
/// Cells only ever hold 0 or 1: the engine mutates the buffer exclusively
/// through `clear` and `draw_sprite`.
#[derive(Clone, PartialEq, Eq)]
pub struct Display {
    pixels: [u8; DISPLAY_SIZE],
}

impl Default for Display {
    fn default() -> Self {
        Display {
            pixels: [0u8; DISPLAY_SIZE],
        }
    }
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.pixels.iter().filter(|&&p| p == 1).count();
        write!(f, "Display {{ {} pixels on }}", lit)
    }
}

impl Display {
    /// Read-only view of all 2048 cells.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[(y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)] == 1
    }

    /// Iterate over the buffer one 64-cell row at a time.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks(DISPLAY_WIDTH)
    }

    pub(crate) fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// XOR an 8-pixel wide sprite onto the buffer with its top-left corner
    /// at `(x, y)`, wrapping around both edges.
    ///
    /// Returns `true` if any pixel that was on got turned off.
    pub(crate) fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;

        for (row, line) in sprite.iter().enumerate() {
            for col in 0..8 {
                if line & (0x80 >> col) == 0 {
                    continue;
                }

                let px = (x + col) % DISPLAY_WIDTH;
                let py = (y + row) % DISPLAY_HEIGHT;
                let cell = &mut self.pixels[py * DISPLAY_WIDTH + px];

                if *cell == 1 {
                    collision = true;
                }
                *cell ^= 1;
            }
        }

        collision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(display: &Display) -> Vec<(usize, usize)> {
        let mut on = Vec::new();
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                if display.pixel(x, y) {
                    on.push((x, y));
                }
            }
        }
        on
    }

    #[test]
    fn test_starts_blank() {
        let display = Display::default();
        assert_eq!(display.pixels().len(), 2048);
        assert!(display.pixels().iter().all(|&p| p == 0));
        assert_eq!(display.iter_rows().count(), DISPLAY_HEIGHT);
    }

    #[test]
    fn test_draw_sprite_bits_msb_first() {
        let mut display = Display::default();
        let collision = display.draw_sprite(10, 5, &[0b1000_0001, 0b0100_0000]);

        assert!(!collision);
        assert_eq!(lit(&display), vec![(10, 5), (17, 5), (11, 6)]);
    }

    #[test]
    fn test_draw_sprite_wraps_around() {
        let mut display = Display::default();
        display.draw_sprite(62, 31, &[0xF0, 0x80]);

        // (62,31) (63,31) (0,31) (1,31) then (62,0) on the wrapped row
        assert_eq!(lit(&display), vec![(62, 0), (0, 31), (1, 31), (62, 31), (63, 31)]);
    }

    #[test]
    fn test_draw_sprite_twice_erases_and_collides() {
        let mut display = Display::default();
        let sprite = [0xF0, 0x90, 0xF0];

        assert!(!display.draw_sprite(3, 3, &sprite));
        assert!(display.draw_sprite(3, 3, &sprite));
        assert_eq!(display, Display::default());
    }

    #[test]
    fn test_partial_overlap_collides() {
        let mut display = Display::default();
        display.draw_sprite(0, 0, &[0x01]);

        // only the last pixel of the second sprite overlaps
        assert!(display.draw_sprite(0, 0, &[0xFF]));
        assert!(!display.pixel(7, 0));
        assert!(display.pixel(0, 0));
    }

    #[test]
    fn test_collision_is_kept_across_rows() {
        let mut display = Display::default();
        display.draw_sprite(0, 0, &[0x80]);

        // row 0 collides, rows 1 and 2 land on blank pixels
        assert!(display.draw_sprite(0, 0, &[0x80, 0x80, 0x80]));
        assert!(!display.pixel(0, 0));
        assert!(display.pixel(0, 1));
        assert!(display.pixel(0, 2));
    }

    #[test]
    fn test_clear() {
        let mut display = Display::default();
        display.draw_sprite(0, 0, &[0xFF; 15]);
        display.clear();
        assert_eq!(display, Display::default());
    }
}
