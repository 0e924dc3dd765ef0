// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Represents flags that aid in implementation but aren't a part of the Chip-8 architecture

use super::{Mode, Quirks};

/// Represents flags that aid in operation, but aren't inherent to the CPU
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    /// Set when debug (live disassembly) mode enabled
    pub debug: bool,
    /// Set when the emulator is paused by the user (or by `00fd`) and should not update
    pub pause: bool,
    /// Set when the emulator is waiting for a key to be released
    pub keypause: bool,
    /// Set when the screen has changed since the host last cleared this flag
    pub redraw: bool,
    /// Represents the current emulator [Mode]
    pub mode: Mode,
    /// Represents the set of emulator [Quirks] to enable, independent of the [Mode]
    pub quirks: Quirks,
}

impl Flags {
    /// Constructs a set of [Flags] for the given [Mode], with that mode's [Quirks]
    ///
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let flags = Flags::new(Mode::SChip);
    /// assert_eq!(flags.quirks, Quirks::from(Mode::SChip));
    /// ```
    pub fn new(mode: Mode) -> Self {
        Flags {
            mode,
            quirks: mode.into(),
            ..Default::default()
        }
    }

    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.debug);
    /// // Toggle debug mode
    /// cpu.flags.debug();
    /// assert_eq!(true, cpu.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }

    /// Toggles pause
    ///
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.pause);
    /// // Pause the cpu
    /// cpu.flags.pause();
    /// assert_eq!(true, cpu.flags.pause);
    /// ```
    pub fn pause(&mut self) {
        self.pause = !self.pause
    }

    /// Returns true if the CPU shouldn't fetch instructions
    pub fn is_paused(&self) -> bool {
        self.pause || self.keypause
    }
}
