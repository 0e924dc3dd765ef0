// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements a Chip-8 and Super Chip interpreter as if it were a real
//! CPU architecture.
//!
//! The [CPU] owns its memory, screen, and keypad. A host feeds it key events,
//! calls [CPU::frame] to run a batch of instructions, ticks the timers at 60 Hz,
//! and draws the [Screen] whenever [Flags::redraw] is set.

pub mod cpu;
pub mod error;
pub mod screen;

pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region, Region::*, CHARSET, HIRES_CHARSET, MEM_SIZE},
    mode::Mode,
    quirks::Quirks,
    CPU,
};
pub use error::{Error, Result};
pub use screen::{Screen, HIRES, LORES};

/// Common imports for schirp
pub mod prelude {
    use super::*;
    pub use cpu::{flags::Flags, mode::Mode, quirks::Quirks, CPU};
    pub use error::{Error, Result};
    pub use screen::Screen;
    pub use {Dis, Disassembler};
}
