// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::error::{Error, Result};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Size of the Chip-8 address space, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Mask applied to every address before it touches memory
pub const ADDR_MASK: usize = MEM_SIZE - 1;

/// 4x5 hexadecimal font, loaded at [Region::Charset]
#[rustfmt::skip]
pub const CHARSET: [u8; 16 * 5] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // a
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // b
    0xf0, 0x80, 0x80, 0x80, 0xf0, // c
    0xe0, 0x90, 0x90, 0x90, 0xe0, // d
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // e
    0xf0, 0x80, 0xf0, 0x80, 0x80, // f
];

/// 8x10 hexadecimal font, loaded at [Region::HiresCharset]
#[rustfmt::skip]
pub const HIRES_CHARSET: [u8; 16 * 10] = [
    0xff, 0xff, 0xc3, 0xc3, 0xc3, 0xc3, 0xc3, 0xc3, 0xff, 0xff, // 0
    0x18, 0x78, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0xff, 0xff, // 1
    0xff, 0xff, 0x03, 0x03, 0xff, 0xff, 0xc0, 0xc0, 0xff, 0xff, // 2
    0xff, 0xff, 0x03, 0x03, 0xff, 0xff, 0x03, 0x03, 0xff, 0xff, // 3
    0xc3, 0xc3, 0xc3, 0xc3, 0xff, 0xff, 0x03, 0x03, 0x03, 0x03, // 4
    0xff, 0xff, 0xc0, 0xc0, 0xff, 0xff, 0x03, 0x03, 0xff, 0xff, // 5
    0xff, 0xff, 0xc0, 0xc0, 0xff, 0xff, 0xc3, 0xc3, 0xff, 0xff, // 6
    0xff, 0xff, 0x03, 0x03, 0x06, 0x0c, 0x18, 0x18, 0x18, 0x18, // 7
    0xff, 0xff, 0xc3, 0xc3, 0xff, 0xff, 0xc3, 0xc3, 0xff, 0xff, // 8
    0xff, 0xff, 0xc3, 0xc3, 0xff, 0xff, 0x03, 0x03, 0xff, 0xff, // 9
    0x7e, 0xff, 0xc3, 0xc3, 0xc3, 0xff, 0xff, 0xc3, 0xc3, 0xc3, // a
    0xfc, 0xfc, 0xc3, 0xc3, 0xfc, 0xfc, 0xc3, 0xc3, 0xfc, 0xfc, // b
    0x3c, 0xff, 0xc3, 0xc0, 0xc0, 0xc0, 0xc0, 0xc3, 0xff, 0x3c, // c
    0xfc, 0xfe, 0xc3, 0xc3, 0xc3, 0xc3, 0xc3, 0xc3, 0xfe, 0xfc, // d
    0xff, 0xff, 0xc0, 0xc0, 0xff, 0xff, 0xc0, 0xc0, 0xff, 0xff, // e
    0xff, 0xff, 0xc0, 0xc0, 0xff, 0xff, 0xc0, 0xc0, 0xc0, 0xc0, // f
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Super Chip big character ROM
    HiresCharset,
    /// Program memory
    Program,
}

impl Region {
    /// Gets the fixed address range of this [Region]
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// assert_eq!(Program.range(), 0x200..0x1000);
    /// ```
    pub const fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0x000..0x050,
            Region::HiresCharset => 0x050..0x0f0,
            Region::Program => 0x200..MEM_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::HiresCharset => "HiresCharset",
                Region::Program => "Program",
            }
        )
    }
}

/// Stores the 4 KiB address space, split into named [Region]s
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mem {
    memory: Vec<u8>,
}

impl Default for Mem {
    /// Constructs a zeroed [Mem] with both fonts loaded
    fn default() -> Self {
        let mut mem = Mem {
            memory: vec![0; MEM_SIZE],
        };
        mem.reload_fonts();
        mem
    }
}

impl Mem {
    /// Constructs a new [Mem], zeroed except for the fonts
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mem = Mem::new();
    /// assert_eq!(0x1000, mem.len());
    /// assert_eq!(Some(&CHARSET[..]), mem.get_region(Charset));
    /// ```
    pub fn new() -> Self {
        Mem::default()
    }

    /// Gets the length of the backing memory. This is always [MEM_SIZE].
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Gets a slice of [Mem] memory
    #[inline(always)]
    pub fn get<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets a mutable slice of [Mem] memory
    #[inline(always)]
    pub fn get_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get_mut(index)
    }

    /// Reads a byte. The address wraps around the 4 KiB address space.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mem = Mem::new();
    /// // 0x1000 wraps around to 0x000, the first row of the `0` glyph
    /// assert_eq!(0xf0, mem.read(0x1000u16));
    /// ```
    #[inline(always)]
    pub fn read(&self, addr: impl Into<usize>) -> u8 {
        self.memory[addr.into() & ADDR_MASK]
    }

    /// Writes a byte. The address wraps around the 4 KiB address space.
    #[inline(always)]
    pub fn write(&mut self, addr: impl Into<usize>, data: u8) {
        self.memory[addr.into() & ADDR_MASK] = data;
    }

    /// Reads a big-endian word. Both bytes wrap around the address space independently.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut mem = Mem::new();
    /// mem.write(0x200u16, 0x12);
    /// mem.write(0x201u16, 0x34);
    /// assert_eq!(0x1234, mem.read_word(0x200u16));
    /// ```
    #[inline(always)]
    pub fn read_word(&self, addr: impl Into<usize>) -> u16 {
        let addr = addr.into();
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Loads data into the start of a named [Region]
    ///
    /// Returns [Error::RomTooLarge] without touching memory if `data` doesn't fit.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// # fn main() -> Result<()> {
    /// let mut mem = Mem::new();
    /// mem.load_region(Program, b"Hello, world!")?;
    /// assert_eq!(Some(&b"Hello"[..]), mem.get(0x200..0x205));
    /// // the program region holds 0xe00 bytes
    /// assert!(mem.load_region(Program, &[0; 0xe01]).is_err());
    /// #    Ok(())
    /// # }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let region = self.get_region_mut(name).ok_or(Error::RomTooLarge {
            size: data.len(),
            capacity: 0,
        })?;
        let capacity = region.len();
        match region.get_mut(..data.len()) {
            Some(dest) => dest.copy_from_slice(data),
            None => {
                return Err(Error::RomTooLarge {
                    size: data.len(),
                    capacity,
                })
            }
        }
        Ok(self)
    }

    /// Fills a [Region] with zeroes
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        if let Some(region) = self.get_region_mut(name) {
            region.fill(0)
        }
        self
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> Option<&[u8]> {
        self.get(name.range())
    }

    /// Gets a mutable slice of a named region of memory
    #[inline(always)]
    pub fn get_region_mut(&mut self, name: Region) -> Option<&mut [u8]> {
        self.get_mut(name.range())
    }

    /// Restores both fonts to their power-on contents
    pub fn reload_fonts(&mut self) -> &mut Self {
        for (region, font) in [
            (Region::Charset, &CHARSET[..]),
            (Region::HiresCharset, &HIRES_CHARSET[..]),
        ] {
            if let Some(dest) = self.get_region_mut(region) {
                dest.copy_from_slice(font);
            }
        }
        self
    }
}
