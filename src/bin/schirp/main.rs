// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Schirp: A Chip-8 and Super Chip interpreter in Rust
//!
//! `schirp <rom> <mode>`, where mode is `c` (Chip-8) or `s` (Super Chip)

#[cfg(test)]
mod tests;
mod ui;

use gumdrop::Options;
use owo_colors::OwoColorize;
use schirp::*;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

pub fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
    let options = Arguments::parse_args_default_or_exit();
    let state = State::new(options)?;
    for result in state {
        if let Err(e) = result {
            eprintln!("{}", e.bold().red());
            break;
        }
    }
    Ok(())
}

/// Parses a hexadecimal string into a u16
fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Load a ROM to run on Schirp.", required, free)]
    pub file: PathBuf,
    #[options(help = "Run in (c)hip8 or (s)chip mode.", required, free)]
    pub mode: Mode,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(
        help = "Set the instructions-per-frame rate.",
        default = "11",
        meta = "IPF"
    )]
    pub speed: usize,

    #[options(
        short = "z",
        help = "Disable setting vF to 0 after a bitwise operation."
    )]
    pub vfreset: bool,

    #[options(short = "c", help = "Toggle CHIP-48 style DMA instructions, which don't touch I.")]
    pub memory: bool,

    #[options(short = "v", help = "Toggle CHIP-48 style bit-shifts, which don't touch vY.")]
    pub shift: bool,

    #[options(
        short = "b",
        help = "Toggle SUPER-CHIP style indexed jump, which is indexed relative to v[adr]."
    )]
    pub jumping: bool,

    #[options(
        long = "break",
        help = "Set breakpoints for the emulator to stop at.",
        parse(try_from_str = "parse_hex"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,

    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
}

#[derive(Debug)]
struct State {
    pub speed: usize,
    pub rate: u64,
    pub cpu: CPU,
    pub ui: UI,
    pub ft: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let mut cpu = CPU::new(options.mode);
        cpu.load_program(&options.file)?;
        cpu.flags.debug = options.debug;
        cpu.flags.pause = options.pause;
        // Flip the state of the quirks
        cpu.flags.quirks.bin_ops ^= options.vfreset;
        cpu.flags.quirks.dma_inc ^= options.memory;
        cpu.flags.quirks.shift ^= options.shift;
        cpu.flags.quirks.jump_vx ^= options.jumping;
        for point in options.breakpoints {
            cpu.set_break(point);
        }
        log::info!(
            "running {} in {:?} mode at {} ipf",
            options.file.display(),
            cpu.flags.mode,
            options.speed
        );
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate.max(1),
            cpu,
            ui: UIBuilder::new(HIRES.0, HIRES.1, &options.file).build()?,
            ft: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.cpu)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.cpu)
    }
    fn tick_cpu(&mut self) -> Result<()> {
        if !self.cpu.flags.pause {
            self.cpu.frame(self.speed)?;
        }
        Ok(())
    }
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// One frame: poll input, run the CPU, tick the timers, then draw
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        match self.tick_cpu() {
            // Allow breakpoint hit messages
            Err(Error::BreakpointHit { addr, next }) => {
                eprintln!("Breakpoint hit: {:3x} ({:4x})", addr, next);
            }
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        self.cpu.tick_timers();
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
