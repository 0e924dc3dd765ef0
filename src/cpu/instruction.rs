// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Decodes Chip-8 and Super Chip words into [Insn]s
//!
//! Mnemonics are printed destination-first, as in `ld v3, #2a`.

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// A decoded Chip-8 or Super Chip instruction
///
/// Field names follow the opcode pattern: `x` and `y` are register nibbles,
/// `n` is a nibble, `B` a byte and `A` a 12-bit address.
#[allow(non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
pub enum Insn {
    /// `00E0`: clear the screen
    #[opcode = "0x00e0"]
    Cls,
    /// `00EE`: pop pc from the stack
    #[opcode = "0x00ee"]
    Ret,
    /// `1nnn`
    #[opcode = "0x1AAA"]
    Jp { A: u16 },
    /// `2nnn`: push pc, then jump
    #[opcode = "0x2AAA"]
    Call { A: u16 },
    /// `3xkk`
    #[opcode = "0x3xBB"]
    SeImm { B: u8, x: usize },
    /// `4xkk`
    #[opcode = "0x4xBB"]
    SneImm { B: u8, x: usize },
    /// `5xy0`
    #[opcode = "0x5xy0"]
    Se { y: usize, x: usize },
    /// `6xkk`
    #[opcode = "0x6xBB"]
    LdImm { B: u8, x: usize },
    /// `7xkk`: add without carry
    #[opcode = "0x7xBB"]
    AddImm { B: u8, x: usize },
    /// `8xy0`
    #[opcode = "0x8xy0"]
    Ld { y: usize, x: usize },
    /// `8xy1`
    #[opcode = "0x8xy1"]
    Or { y: usize, x: usize },
    /// `8xy2`
    #[opcode = "0x8xy2"]
    And { y: usize, x: usize },
    /// `8xy3`
    #[opcode = "0x8xy3"]
    Xor { y: usize, x: usize },
    /// `8xy4`: vF = carry
    #[opcode = "0x8xy4"]
    Add { y: usize, x: usize },
    /// `8xy5`: vX -= vY, vF = !borrow
    #[opcode = "0x8xy5"]
    Sub { y: usize, x: usize },
    /// `8xy6`: shift vY (or vX) right into vX
    #[opcode = "0x8xy6"]
    Shr { y: usize, x: usize },
    /// `8xy7`: vX = vY - vX, vF = !borrow
    #[opcode = "0x8xy7"]
    Subn { y: usize, x: usize },
    /// `8xyE`: shift vY (or vX) left into vX
    #[opcode = "0x8xye"]
    Shl { y: usize, x: usize },
    /// `9xy0`
    #[opcode = "0x9xy0"]
    Sne { y: usize, x: usize },
    /// `Annn`
    #[opcode = "0xaAAA"]
    LdI { A: u16 },
    /// `Bnnn`: jump to nnn + v0, or nnn + vN where N is the top nibble of nnn
    #[opcode = "0xbAAA"]
    JpIndexed { A: u16 },
    /// `Cxkk`: vX = random & kk
    #[opcode = "0xcxBB"]
    Rnd { B: u8, x: usize },
    /// `Dxyn`: draw an n-row sprite from I at (vX, vY). `Dxy0` draws 16x16.
    #[opcode = "0xdxyn"]
    Drw { y: usize, x: usize, n: u8 },
    /// `Ex9E`: skip if key vX is held
    #[opcode = "0xex9e"]
    Skp { x: usize },
    /// `ExA1`: skip if key vX is not held
    #[opcode = "0xexa1"]
    Sknp { x: usize },
    /// `Fx07`
    #[opcode = "0xfx07"]
    GetDelay { x: usize },
    /// `Fx0A`: wait for a key release
    #[opcode = "0xfx0a"]
    WaitKey { x: usize },
    /// `Fx15`
    #[opcode = "0xfx15"]
    SetDelay { x: usize },
    /// `Fx18`
    #[opcode = "0xfx18"]
    SetSound { x: usize },
    /// `Fx1E`
    #[opcode = "0xfx1e"]
    AddI { x: usize },
    /// `Fx29`: point I at the small glyph for vX
    #[opcode = "0xfx29"]
    Font { x: usize },
    /// `Fx33`: store vX as three decimal digits at I
    #[opcode = "0xfx33"]
    Bcd { x: usize },
    /// `Fx55`: store v0..=vX at I
    #[opcode = "0xfx55"]
    Store { x: usize },
    /// `Fx65`: load v0..=vX from I
    #[opcode = "0xfx65"]
    Load { x: usize },

    /// `00Cn`: scroll down n rows
    #[opcode = "0x00cn"]
    ScrollDown { n: u8 },
    /// `00FB`: scroll right 4 columns
    #[opcode = "0x00fb"]
    ScrollRight,
    /// `00FC`: scroll left 4 columns
    #[opcode = "0x00fc"]
    ScrollLeft,
    /// `00FD`: stop the interpreter
    #[opcode = "0x00fd"]
    Exit,
    /// `00FE`
    #[opcode = "0x00fe"]
    Lores,
    /// `00FF`
    #[opcode = "0x00ff"]
    Hires,
    /// `Fx30`: point I at the big glyph for vX
    #[opcode = "0xfx30"]
    BigFont { x: usize },
    /// `Fx75`: save v0..=vX to the flag registers
    #[opcode = "0xfx75"]
    SaveFlags { x: usize },
    /// `Fx85`: load v0..=vX from the flag registers
    #[opcode = "0xfx85"]
    LoadFlags { x: usize },
}

impl Insn {
    /// Returns true if this instruction only exists on the Super Chip
    ///
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// assert!(Insn::Hires.is_superchip());
    /// assert!(!Insn::Cls.is_superchip());
    /// ```
    pub fn is_superchip(&self) -> bool {
        matches!(
            self,
            Insn::ScrollDown { .. }
                | Insn::ScrollRight
                | Insn::ScrollLeft
                | Insn::Exit
                | Insn::Lores
                | Insn::Hires
                | Insn::BigFont { .. }
                | Insn::SaveFlags { .. }
                | Insn::LoadFlags { .. }
        )
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::Cls                => write!(f, "cls"),
            Insn::Ret                => write!(f, "ret"),
            Insn::Jp { A }           => write!(f, "jp     ${A:03x}"),
            Insn::Call { A }         => write!(f, "call   ${A:03x}"),
            Insn::SeImm { B, x }     => write!(f, "se     v{x:X}, #{B:02x}"),
            Insn::SneImm { B, x }    => write!(f, "sne    v{x:X}, #{B:02x}"),
            Insn::Se { y, x }        => write!(f, "se     v{x:X}, v{y:X}"),
            Insn::LdImm { B, x }     => write!(f, "ld     v{x:X}, #{B:02x}"),
            Insn::AddImm { B, x }    => write!(f, "add    v{x:X}, #{B:02x}"),
            Insn::Ld { y, x }        => write!(f, "ld     v{x:X}, v{y:X}"),
            Insn::Or { y, x }        => write!(f, "or     v{x:X}, v{y:X}"),
            Insn::And { y, x }       => write!(f, "and    v{x:X}, v{y:X}"),
            Insn::Xor { y, x }       => write!(f, "xor    v{x:X}, v{y:X}"),
            Insn::Add { y, x }       => write!(f, "add    v{x:X}, v{y:X}"),
            Insn::Sub { y, x }       => write!(f, "sub    v{x:X}, v{y:X}"),
            Insn::Shr { y, x }       => write!(f, "shr    v{x:X}, v{y:X}"),
            Insn::Subn { y, x }      => write!(f, "subn   v{x:X}, v{y:X}"),
            Insn::Shl { y, x }       => write!(f, "shl    v{x:X}, v{y:X}"),
            Insn::Sne { y, x }       => write!(f, "sne    v{x:X}, v{y:X}"),
            Insn::LdI { A }          => write!(f, "ld     I, ${A:03x}"),
            // the offset register depends on the jump quirk
            Insn::JpIndexed { A }    => write!(f, "jp     v0|v{:X}, ${A:03x}", A >> 8),
            Insn::Rnd { B, x }       => write!(f, "rnd    v{x:X}, #{B:02x}"),
            Insn::Drw { y, x, n }    => write!(f, "drw    v{x:X}, v{y:X}, #{n:x}"),
            Insn::Skp { x }          => write!(f, "skp    v{x:X}"),
            Insn::Sknp { x }         => write!(f, "sknp   v{x:X}"),
            Insn::GetDelay { x }     => write!(f, "ld     v{x:X}, DT"),
            Insn::WaitKey { x }      => write!(f, "ld     v{x:X}, K"),
            Insn::SetDelay { x }     => write!(f, "ld     DT, v{x:X}"),
            Insn::SetSound { x }     => write!(f, "ld     ST, v{x:X}"),
            Insn::AddI { x }         => write!(f, "add    I, v{x:X}"),
            Insn::Font { x }         => write!(f, "ld     F, v{x:X}"),
            Insn::Bcd { x }          => write!(f, "ld     B, v{x:X}"),
            Insn::Store { x }        => write!(f, "ld     [I], v0-v{x:X}"),
            Insn::Load { x }         => write!(f, "ld     v0-v{x:X}, [I]"),
            Insn::ScrollDown { n }   => write!(f, "scd    #{n:x}"),
            Insn::ScrollRight        => write!(f, "scr"),
            Insn::ScrollLeft         => write!(f, "scl"),
            Insn::Exit               => write!(f, "exit"),
            Insn::Lores              => write!(f, "lores"),
            Insn::Hires              => write!(f, "hires"),
            Insn::BigFont { x }      => write!(f, "ld     HF, v{x:X}"),
            Insn::SaveFlags { x }    => write!(f, "ld     R, v0-v{x:X}"),
            Insn::LoadFlags { x }    => write!(f, "ld     v0-v{x:X}, R"),
        }
    }
}
