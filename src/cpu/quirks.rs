// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Controls the [Quirks] behavior of the CPU on a granular level.

use super::mode::Mode;

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `false` is Cosmac-VIP-like behavior. [Quirks::from] a [Mode] gives the
/// full table for that interpreter:
///
/// | quirk            | Chip8 | SChip | affects
/// |------------------|-------|-------|---------
/// | `bin_ops`        | false | false | `8xy1`, `8xy2`, `8xy3`
/// | `shift`          | false | true  | `8xy6`, `8xyE`
/// | `dma_inc`        | false | true  | `Fx55`, `Fx65`
/// | `jump_vx`        | false | true  | `Bnnn`
/// | `index_overflow` | false | true  | `Fx1E`
/// | `extended`       | false | true  | `00Cn`, `00FB`..`00FF`, `Dxy0`, `Fx30`, `Fx75`, `Fx85`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quirks {
    /// Binary ops in `8xy`(`1`, `2`, `3`) shouldn't set vF to 0
    pub bin_ops: bool,
    /// Super Chip: Shift ops in `8xy`(`6`, `E`) shouldn't source from vY instead of vX
    pub shift: bool,
    /// Super Chip: DMA instructions `Fx55`/`Fx65` shouldn't change I to I + x + 1
    pub dma_inc: bool,
    /// Super Chip: Indexed jump instructions should go to `adr` + v`a` where `a` is high nibble of `adr`.
    pub jump_vx: bool,
    /// Super Chip: `Fx1E` sets vF when I leaves the 12-bit address space
    pub index_overflow: bool,
    /// Super Chip: enables hires mode, scrolling, 16x16 sprites, the big font, and flag registers
    pub extended: bool,
}

impl From<Mode> for Quirks {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Chip8 => Quirks {
                bin_ops: false,
                shift: false,
                dma_inc: false,
                jump_vx: false,
                index_overflow: false,
                extended: false,
            },
            Mode::SChip => Quirks {
                bin_ops: false,
                shift: true,
                dma_inc: true,
                jump_vx: true,
                index_overflow: true,
                extended: true,
            },
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::from(Mode::default())
    }
}
