// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Selects the instruction-set behavior of the [super::CPU]

use crate::error::Error;
use std::str::FromStr;

/// Selects which interpreter the CPU imitates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// VIP emulation mode
    #[default]
    Chip8,
    /// Super-Chip 1.1 emulation mode
    SChip,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "c" | "chip8" | "chip-8" => Ok(Mode::Chip8),
            "s" | "schip" | "superchip" | "super-chip" => Ok(Mode::SChip),
            _ => Err(Error::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}
