// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod mode;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, Region::*},
    mode::Mode,
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    screen::Screen,
};
use imperative_rs::InstructionSet;
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Address of the first instruction of every program
pub const PROGRAM_START: Adr = 0x200;
/// Address of the 4x5 font
pub const FONT: Adr = 0x000;
/// Address of the 8x10 Super Chip font
pub const HIRES_FONT: Adr = 0x050;
/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;
/// Number of Super Chip flag registers that `Fx75`/`Fx85` can reach
pub const FLAG_REGISTERS: usize = 8;

/// Represents the internal state of the CPU interpreter
#[derive(Clone, PartialEq)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], [Mode], pause state, etc.
    pub flags: Flags,
    // memory
    mem: Mem,
    screen: Screen,
    stack: Vec<Adr>,
    flag_storage: [u8; 16],
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    wait_reg: Reg,
    // Execution data
    cycle: usize,
    breakpoints: Vec<Adr>,
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU which imitates the given [Mode]
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let cpu = CPU::new(Mode::SChip);
    /// assert_eq!(Quirks::from(Mode::SChip), cpu.flags.quirks);
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(mode: Mode) -> Self {
        CPU {
            flags: Flags::new(mode),
            ..Default::default()
        }
    }

    /// Loads a program into the CPU's program space
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        let bytes = std::fs::read(rom)?;
        log::debug!("read {} bytes from {}", bytes.len(), rom.display());
        self.load_program_bytes(&bytes)
    }

    /// Loads bytes into the CPU's program space
    ///
    /// If the program doesn't fit, returns [Error::RomTooLarge] and leaves memory untouched.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert!(cpu.load_program_bytes(&[0; 0x1000]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let capacity = Program.range().len();
        if rom.len() > capacity {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                capacity,
            });
        }
        self.mem.clear_region(Program);
        self.mem.load_region(Program, rom)?;
        log::debug!("loaded {} byte program at {PROGRAM_START:03x}", rom.len());
        Ok(self)
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = !*keyref;
        *keyref = true;
        Ok(changed)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// If the CPU is waiting on `Fx0A`, the released key is stored in the
    /// waiting register and execution resumes.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// // press key `7`
    /// cpu.press(0x7).unwrap();
    /// // release key `7`
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(changed); // key released
    /// // try releasing `7` again
    /// let changed = cpu.release(0x7).unwrap();
    /// assert!(!changed); // key was not held
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        let keyref = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let changed = *keyref;
        *keyref = false;
        if self.flags.keypause {
            self.v[self.wait_reg] = key as u8;
            self.flags.keypause = false;
        }
        Ok(changed)
    }

    /// Returns true if the CPU is suspended by `Fx0A`, waiting for a key release
    pub fn is_waiting(&self) -> bool {
        self.flags.keypause
    }

    /// Gets the state of every key
    pub fn keys(&self) -> &[bool] {
        self.keys.as_slice()
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0x41).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        let gpr = self.v.get_mut(reg).ok_or(Error::InvalidRegister { reg })?;
        *gpr = value;
        Ok(())
    }

    /// Gets a slice of the entire general purpose registers
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x0, 0x41).unwrap();
    /// assert_eq!(
    ///     cpu.v(),
    ///     [0x41, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    /// )
    /// ```
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the return addresses on the stack, innermost last
    pub fn stack(&self) -> &[Adr] {
        self.stack.as_slice()
    }

    /// Gets the Super Chip flag registers
    pub fn flag_storage(&self) -> &[u8] {
        self.flag_storage.as_slice()
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Counts both timers down by one. The host calls this at 60 Hz.
    ///
    /// Timers keep counting while the CPU waits for a key.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.tick_timers();
    /// assert_eq!(0, cpu.delay());
    /// ```
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Gets a read-only view of the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets a read-only view of memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the number of instructions the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Soft resets the CPU, releasing keypause and
    /// reinitializing the program counter to 0x200
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x13, 0x40]).unwrap(); // jp $340
    /// cpu.tick().unwrap();
    /// cpu.flags.keypause = true;
    /// assert_eq!(0x340, cpu.pc());
    /// cpu.soft_reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(false, cpu.flags.keypause);
    /// ```
    pub fn soft_reset(&mut self) {
        self.pc = PROGRAM_START;
        self.flags.keypause = false;
    }

    /// Resets the emulator.
    ///
    /// Touches the [Flags] (keypause, redraw), the screen, stack, pc,
    /// registers, timers, keys, and cycle count.
    ///
    /// Does not touch [Quirks], [Mode], [Dis], breakpoints, flag registers, or memory.
    pub fn reset(&mut self) {
        self.flags = Flags {
            keypause: false,
            redraw: true,
            ..self.flags
        };
        self.screen = Screen::default();
        // clear the stack
        self.stack.truncate(0);
        // Reset the program counter
        self.pc = PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; 16];
        self.wait_reg = 0;
        // Execution data
        self.cycle = 0;
    }

    /// Set a breakpoint
    pub fn set_break(&mut self, point: Adr) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point)
        }
        self
    }

    /// Unset a breakpoint
    pub fn unset_break(&mut self, point: Adr) -> &mut Self {
        if let Some(idx) = self.breakpoints.iter().position(|&bp| bp == point) {
            self.breakpoints.swap_remove(idx);
        }
        self
    }

    /// Gets a slice of breakpoints
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let cpu = CPU::default();
    /// assert_eq!(cpu.breakpoints(), &[]);
    /// ```
    pub fn breakpoints(&self) -> &[Adr] {
        self.breakpoints.as_slice()
    }

    /// Unpauses the emulator for a single tick,
    /// even if cpu.flags.pause is set.
    ///
    /// Like with [CPU::tick], this returns [Error::UnimplementedInstruction]
    /// if the instruction is unimplemented.
    ///
    /// A CPU waiting for a key stays waiting.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0, 0x12, 0x02]).unwrap();
    /// cpu.flags.pause = true;
    /// cpu.singlestep().unwrap();
    /// assert_eq!(0x202, cpu.pc());
    /// assert!(cpu.flags.pause);
    /// ```
    pub fn singlestep(&mut self) -> Result<&mut Self> {
        let pause = std::mem::replace(&mut self.flags.pause, false);
        let result = self.tick().map(|_| ());
        // a breakpoint or `halt` may have requested a pause of its own
        self.flags.pause |= pause;
        result?;
        Ok(self)
    }

    /// Runs up to `steps` instructions, the way a host runs one frame.
    ///
    /// Stops early after a draw, or when the CPU starts waiting for a key,
    /// so the host can render and poll input before continuing.
    ///
    /// Unrecognized words are skipped without ending the batch.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x60, 0x01, // ld v0, #01
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.frame(0x20)
    ///     .expect("The program should only have valid opcodes.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(0x20, cpu.cycle());
    /// ```
    pub fn frame(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            if self.flags.is_paused() {
                break;
            }
            self.flags.redraw = false;
            match self.tick().map(|_| ()) {
                // already logged, and skipped
                Err(Error::UnimplementedInstruction { .. }) | Ok(()) => (),
                Err(e) => return Err(e),
            }
            if self.flags.redraw || self.flags.keypause {
                break;
            }
        }
        Ok(self)
    }

    /// Executes a single instruction
    ///
    /// Does nothing if the CPU is paused, or waiting for a key.
    ///
    /// Returns [Error::BreakpointHit] if a breakpoint was hit after the instruction executed.
    /// This result contains information about the breakpoint, but can be safely ignored.
    ///
    /// Returns [Error::UnimplementedInstruction] if the instruction at `pc` is unimplemented.
    /// The instruction is skipped, so this can also be safely ignored.
    /// If the skip lands on a breakpoint, the breakpoint is reported instead.
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.tick()
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    /// Returns [Error::UnimplementedInstruction] if the instruction is not implemented.
    /// ```rust
    /// # use schirp::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0xff, 0xff, // invalid!
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// dbg!(cpu.tick())
    ///     .expect_err("Should return Error::UnimplementedInstruction { 0xffff }");
    /// // The invalid instruction was skipped
    /// assert_eq!(0x202, cpu.pc());
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.is_paused() {
            return Ok(self);
        }
        self.cycle += 1;
        // fetch opcode
        let addr = self.pc;
        let opcode = self.mem.read_word(addr);

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                addr,
                self.disassembler.once(opcode)
            );
        }

        // decode opcode
        let result = match Insn::decode(&opcode.to_be_bytes()) {
            Ok((_, insn)) if insn.is_superchip() && !self.flags.quirks.extended => {
                self.pc = self.pc.wrapping_add(2);
                Err(self.unimplemented(opcode, addr))
            }
            Ok((inc, insn)) => {
                self.pc = self.pc.wrapping_add(inc as u16);
                self.execute(insn);
                Ok(())
            }
            Err(_) => {
                self.pc = self.pc.wrapping_add(2);
                Err(self.unimplemented(opcode, addr))
            }
        };

        // process breakpoints, even after a skipped word. The skip was logged.
        if !self.breakpoints.is_empty() && self.breakpoints.contains(&self.pc) {
            self.flags.pause = true;
            return Err(Error::BreakpointHit {
                addr: self.pc,
                next: self.mem.read_word(self.pc),
            });
        }
        result?;
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use schirp::*;
    /// let cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

// internal helpers
impl CPU {
    /// Reports an instruction which can't run in the current [Mode]
    fn unimplemented(&self, word: u16, addr: Adr) -> Error {
        log::warn!(
            "skipping unrecognized opcode {word:04x} at {addr:03x} ({:?})",
            self.flags.mode
        );
        Error::UnimplementedInstruction { word, addr }
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("flag_storage", &self.flag_storage)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("wait_reg", &self.wait_reg)
            .field("cycle", &self.cycle)
            .field("breakpoints", &self.breakpoints)
            .field("disassembler", &self.disassembler)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new Chip-8 CPU with sane defaults
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0000` | Location of the 4x5 font.
    /// | bigfont|`0x0050` | Location of the 8x10 font.
    /// | pc     |`0x0200` | Start location.
    ///
    /// # Examples
    /// ```rust
    /// use schirp::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(Mode::Chip8, cpu.flags.mode);
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::default(),
            stack: Vec::with_capacity(STACK_DEPTH),
            flag_storage: [0; 16],
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            wait_reg: 0,
            cycle: 0,
            breakpoints: vec![],
            disassembler: Dis::default(),
        }
    }
}
