// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Schirp

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Schirp.
#[derive(Debug, Error)]
pub enum Error {
    /// Represents a breakpoint being hit
    #[error("breakpoint hit: {addr:03x} ({next:04x})")]
    BreakpointHit {
        /// The address of the breakpoint
        addr: u16,
        /// The instruction after the breakpoint
        next: u16,
    },
    /// Represents an unimplemented operation.
    ///
    /// The instruction was skipped; the interpreter is still in a consistent state.
    #[error("opcode {word:04x} at {addr:03x} not recognized")]
    UnimplementedInstruction {
        /// The offending word
        word: u16,
        /// The address the word was fetched from
        addr: u16,
    },
    /// Tried to load a program that does not fit in program memory
    #[error("program is {size} bytes, but only {capacity} bytes are available")]
    RomTooLarge {
        /// The size of the rejected program
        size: usize,
        /// The size of program memory
        capacity: usize,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into mode, but it did not match.
    #[error("no suitable conversion of \"{mode}\" into Mode (expected `c` or `s`)")]
    InvalidMode {
        /// The string which failed to become a mode
        mode: String,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "minifb")]
    /// Error originated in [minifb]
    #[error(transparent)]
    MinifbError(#[from] minifb::Error),
}
