// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory
//!
//! The screen is a 1bpp bitmap whose size follows the current resolution:
//! 64x32 in lores, 128x64 in hires. Each row is a [u128], with column 0 in
//! the most significant bit. In lores, only the leftmost 64 columns of the
//! first 32 rows are in use.

/// Width and height of the lores screen
pub const LORES: (usize, usize) = (64, 32);
/// Width and height of the hires screen
pub const HIRES: (usize, usize) = (128, 64);

/// Number of columns moved by a horizontal scroll
const SCROLL_COLUMNS: u32 = 4;

/// The Chip-8's display
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Screen {
    rows: [u128; HIRES.1],
    hires: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            rows: [0; HIRES.1],
            hires: false,
        }
    }
}

impl Screen {
    /// Constructs a blank lores screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the screen is in hires mode
    pub fn hires(&self) -> bool {
        self.hires
    }

    /// Switches resolution, clearing the screen
    pub fn set_hires(&mut self, hires: bool) {
        self.hires = hires;
        self.clear();
    }

    /// Width of the screen in the current resolution, in pixels
    pub fn width(&self) -> usize {
        if self.hires {
            HIRES.0
        } else {
            LORES.0
        }
    }

    /// Height of the screen in the current resolution, in pixels
    pub fn height(&self) -> usize {
        if self.hires {
            HIRES.1
        } else {
            LORES.1
        }
    }

    /// Mask of the columns visible in the current resolution
    #[inline(always)]
    fn column_mask(&self) -> u128 {
        !0u128 << (128 - self.width())
    }

    /// Clears every pixel
    pub fn clear(&mut self) {
        self.rows = [0; HIRES.1];
    }

    /// Gets the pixel at (x, y). Pixels off the screen are never set.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let screen = Screen::new();
    /// assert!(!screen.pixel(0, 0));
    /// assert!(!screen.pixel(500, 500));
    /// ```
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= self.width() || y >= self.height() {
            return false;
        }
        self.rows[y] & (1u128 << (127 - x)) != 0
    }

    /// Iterates over every pixel in the current resolution, in row-major order
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let screen = Screen::new();
    /// assert_eq!(64 * 32, screen.pixels().count());
    /// ```
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        let width = self.width();
        self.rows[..self.height()]
            .iter()
            .flat_map(move |row| (0..width).map(move |x| row & (1u128 << (127 - x)) != 0))
    }

    /// XORs one left-aligned sprite row onto the screen, with column 0 of the
    /// sprite landing on column `x`.
    ///
    /// Pixels that fall off the right edge are clipped, as are rows past the bottom.
    /// Returns true if any set pixel was cleared.
    pub fn draw_row(&mut self, x: usize, y: usize, sprite: u128) -> bool {
        if x >= self.width() || y >= self.height() {
            return false;
        }
        let sprite = (sprite >> x) & self.column_mask();
        let row = &mut self.rows[y];
        let collided = *row & sprite != 0;
        *row ^= sprite;
        collided
    }

    /// Scrolls the screen down `n` rows, filling the top with blank rows
    pub fn scroll_down(&mut self, n: usize) {
        let height = self.height();
        let n = n.min(height);
        self.rows.copy_within(0..height - n, n);
        self.rows[..n].fill(0);
    }

    /// Scrolls the screen right by 4 columns
    pub fn scroll_right(&mut self) {
        let mask = self.column_mask();
        for row in self.rows.iter_mut() {
            *row = (*row >> SCROLL_COLUMNS) & mask;
        }
    }

    /// Scrolls the screen left by 4 columns
    pub fn scroll_left(&mut self) {
        for row in self.rows.iter_mut() {
            *row <<= SCROLL_COLUMNS;
        }
    }

    /// Prints the screen at 1bpp using braille or box characters
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// Screen::new().print_screen();
    /// ```
    pub fn print_screen(&self) {
        let (width, height) = (self.width(), self.height());
        // draw with the drawille library, if available
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(width as u32, height as u32);
            for (index, _) in self.pixels().enumerate().filter(|(_, pixel)| *pixel) {
                canvas.set((index % width) as u32, (index / width) as u32);
            }
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        for (y, row) in self.rows[..height].iter().enumerate() {
            let line: String = (0..width)
                .map(|x| if row & (1u128 << (127 - x)) != 0 { '█' } else { ' ' })
                .collect();
            println!("{y:02}|{line}|");
        }
    }
}
