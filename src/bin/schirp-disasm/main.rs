// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Disassembles a Chip-8 or Super Chip ROM, one word per line

use gumdrop::*;
use owo_colors::OwoColorize;
use schirp::{Dis, Disassembler, Result};
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(
        help = "Load address (usually 200)",
        parse(try_from_str = "parse_hex"),
        default = "200"
    )]
    pub loadaddr: u16,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
    #[options(help = "Don't color the output")]
    pub plain: bool,
}

fn parse_hex(value: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(value, 16)
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    log::debug!("read {} bytes from {}", contents.len(), options.file.display());
    let disassembler = if options.plain {
        Dis::plain()
    } else {
        Dis::default()
    };
    let start = options.loadaddr as usize + options.offset;
    for (addr, insn) in contents
        .get(options.offset..)
        .unwrap_or_default()
        .chunks_exact(2)
        .enumerate()
    {
        let insn = u16::from_be_bytes([insn[0], insn[1]]);
        if options.plain {
            println!("{:03x}: {} {insn:04x}", start + 2 * addr, disassembler.once(insn));
        } else {
            println!(
                "{:03x}: {} {:04x}",
                start + 2 * addr,
                disassembler.once(insn),
                insn.bright_black(),
            );
        }
    }
    Ok(())
}
