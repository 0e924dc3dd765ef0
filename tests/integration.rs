//! Testing methods on Schirp's public API
use schirp::*;
use std::{collections::hash_map::DefaultHasher, hash::Hash};

/// Builds a CPU in the given [Mode], with `program` loaded at 0x200
fn run(mode: Mode, program: &[u8], steps: usize) -> CPU {
    let mut cpu = CPU::new(mode);
    cpu.load_program_bytes(program)
        .expect("Test programs should fit in memory");
    for _ in 0..steps {
        cpu.tick().expect("Test programs should only contain valid opcodes");
    }
    cpu
}

#[test]
fn cpu() {
    let cpu = CPU::default(); // Default
    let cpu2 = cpu.clone(); // Clone
    assert_eq!(cpu, cpu2); // PartialEq
    println!("{cpu:?}"); // Debug
}

/// Properties every conforming interpreter upholds
mod properties {
    use super::*;

    #[test]
    fn fonts_and_zeroed_memory() {
        let cpu = CPU::default();
        let mem = cpu.mem();
        assert_eq!(Some(&CHARSET[..]), mem.get(0x000..0x050));
        assert_eq!(Some(&HIRES_CHARSET[..]), mem.get(0x050..0x0f0));
        assert!(mem.get(0x0f0..0x1000).unwrap().iter().all(|&b| b == 0));
        assert_eq!([0xf0, 0x90, 0x90, 0x90, 0xf0], CHARSET[..5]);
    }

    /// `6xnn; Fx29; Fx65` reads the glyph for every digit
    #[test]
    fn glyph_lookup() {
        for digit in 0..0x10u8 {
            let cpu = run(Mode::Chip8, &[0x6a, digit, 0xfa, 0x29, 0xf4, 0x65], 3);
            let glyph = &CHARSET[5 * digit as usize..5 * digit as usize + 5];
            assert_eq!(glyph, &cpu.v()[..5]);
        }
    }

    /// `Fx55` then `Fx65` restores the registers. I moves on the Chip-8 only.
    #[test]
    fn dma_round_trip() {
        #[rustfmt::skip]
        let program = [
            0x60, 0x11, 0x61, 0x22, 0x62, 0x33, // v0..=v2 = 11, 22, 33
            0xa3, 0x00,                         // I = 300
            0xf2, 0x55,                         // store v0..=v2
            0x60, 0x00, 0x61, 0x00, 0x62, 0x00, // clobber v0..=v2
            0xa3, 0x00,                         // I = 300
            0xf2, 0x65,                         // load v0..=v2
        ];
        let chip8 = run(Mode::Chip8, &program, 10);
        assert_eq!([0x11, 0x22, 0x33], chip8.v()[..3]);
        assert_eq!(0x303, chip8.i());
        assert_eq!(Some(&[0x11, 0x22, 0x33][..]), chip8.mem().get(0x300..0x303));

        let schip = run(Mode::SChip, &program, 10);
        assert_eq!([0x11, 0x22, 0x33], schip.v()[..3]);
        assert_eq!(0x300, schip.i());
    }

    #[test]
    fn add_with_and_without_carry() {
        // 0xff + 0x01 = 0x00, carry
        let cpu = run(Mode::Chip8, &[0x60, 0xff, 0x61, 0x01, 0x80, 0x14], 3);
        assert_eq!((0x00, 1), (cpu.v()[0], cpu.v()[0xf]));
        // 0x10 + 0x01 = 0x11, no carry
        let cpu = run(Mode::Chip8, &[0x60, 0x10, 0x61, 0x01, 0x80, 0x14], 3);
        assert_eq!((0x11, 0), (cpu.v()[0], cpu.v()[0xf]));
    }

    /// Drawing the same sprite twice clears it, and reports the collision
    #[test]
    fn double_draw() {
        #[rustfmt::skip]
        let program = [
            0x60, 0x08, 0x61, 0x04, // v0 = 8, v1 = 4
            0xa0, 0x00,             // I = glyph 0
            0xd0, 0x15,             // draw
            0xd0, 0x15,             // draw again
        ];
        let cpu = run(Mode::Chip8, &program, 4);
        assert_eq!(0, cpu.v()[0xf]);
        assert!(cpu.screen().pixel(8, 4));
        let cpu = run(Mode::Chip8, &program, 5);
        assert_eq!(1, cpu.v()[0xf]);
        assert!(cpu.screen().pixels().all(|pixel| !pixel));
    }

    #[test]
    fn skip_immediate() {
        // v0 = 5; se #05, v0
        let cpu = run(Mode::Chip8, &[0x60, 0x05, 0x30, 0x05], 2);
        assert_eq!(0x206, cpu.pc());
        // v0 = 5; se #06, v0
        let cpu = run(Mode::Chip8, &[0x60, 0x05, 0x30, 0x06], 2);
        assert_eq!(0x204, cpu.pc());
    }

    /// `Fx0A` suspends the CPU until a key is released
    #[test]
    fn wait_for_key_release() {
        let mut cpu = run(Mode::Chip8, &[0xf5, 0x0a, 0x60, 0x01], 1);
        assert!(cpu.is_waiting());
        // waiting CPUs don't run
        cpu.tick().unwrap();
        assert_eq!(0x202, cpu.pc());
        assert_eq!(0, cpu.v()[0]);

        assert!(cpu.press(0xa).unwrap());
        assert!(cpu.is_waiting());
        assert!(cpu.release(0xa).unwrap());
        assert!(!cpu.is_waiting());
        assert_eq!(0xa, cpu.v()[5]);

        cpu.tick().unwrap();
        assert_eq!(1, cpu.v()[0]);
    }

    /// Rows clipped at the bottom of the hires screen count towards vF
    #[test]
    fn hires_bottom_clipping() {
        #[rustfmt::skip]
        let program = [
            0x00, 0xff,             // hires
            0x60, 0x00, 0x61, 0x3d, // v0 = 0, v1 = 61
            0xa0, 0x50,             // I = big glyph 0
            0xd0, 0x16,             // draw 6 rows at y = 61
        ];
        let cpu = run(Mode::SChip, &program, 5);
        assert!(cpu.v()[0xf] >= 3);
        assert_eq!(3, cpu.v()[0xf]);
        assert!(cpu.screen().pixel(0, 63));
    }
}

mod cpu {
    use super::*;

    #[test]
    fn set_break() {
        let mut cpu = CPU::default();
        let point = 0x234;
        assert_eq!(cpu.breakpoints(), &[]);
        // Attempt to set the same breakpoint 100 times
        for _ in 0..100 {
            cpu.set_break(point);
        }
        assert_eq!(cpu.breakpoints(), &[point]);
    }
    #[test]
    fn unset_break() {
        let mut cpu = CPU::default();
        let point = 0x234;
        // set TWO breakpoints
        cpu.set_break(point + 1);
        cpu.set_break(point);
        assert_eq!(cpu.breakpoints(), &[point + 1, point]);
        // Attempt to unset the same breakpoint 100 times
        for _ in 0..100 {
            cpu.unset_break(point);
        }
        // Only unset the matching point
        assert_eq!(cpu.breakpoints(), &[point + 1]);
    }

    #[test]
    fn press_invalid_key() {
        let mut cpu = CPU::default();
        let cpu2 = cpu.clone();
        match cpu.press(0x21345134) {
            Err(Error::InvalidKey { key }) => assert_eq!(0x21345134, key),
            other => unreachable!("{other:?}"),
        }
        // no change has been made, everything is safe.
        assert_eq!(cpu, cpu2);
    }

    #[test]
    fn release_invalid_key() {
        let mut cpu = CPU::default();
        let cpu2 = cpu.clone();
        cpu.release(0x10)
            .expect_err("This should produce an Error::InvalidKey");
        // no change has been made, everything is safe.
        assert_eq!(cpu, cpu2);
    }

    #[test]
    fn set_invalid_reg() {
        let mut cpu = CPU::default();
        let cpu2 = cpu.clone();
        cpu.set_v(0x21345134, 0xff)
            .expect_err("This should produce an Error::InvalidRegister");
        // no change has been made
        assert_eq!(cpu, cpu2);
    }

    #[test]
    fn rom_too_large() {
        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x12, 0x00]).unwrap();
        let cpu2 = cpu.clone();
        match cpu.load_program_bytes(&[0xaa; 0xe01]) {
            Err(Error::RomTooLarge { size, capacity }) => {
                assert_eq!(0xe01, size);
                assert_eq!(0xe00, capacity);
            }
            other => unreachable!("{other:?}"),
        }
        // the old program is untouched
        assert_eq!(cpu, cpu2);
        // but a ROM that exactly fits is fine
        cpu.load_program_bytes(&[0xaa; 0xe00]).unwrap();
    }

    #[test]
    fn load_missing_file() {
        let mut cpu = CPU::default();
        match cpu.load_program("this/rom/does/not/exist.ch8") {
            Err(Error::IoError(_)) => (),
            other => unreachable!("{other:?}"),
        }
    }

    #[test]
    fn load_program_from_file() {
        let path = std::env::temp_dir().join(format!("schirp-{}.ch8", std::process::id()));
        std::fs::write(&path, [0x60, 0x2a]).unwrap();
        let mut cpu = CPU::default();
        cpu.load_program(&path).unwrap();
        std::fs::remove_file(&path).ok();
        cpu.tick().unwrap();
        assert_eq!(0x2a, cpu.v()[0]);
    }

    #[test]
    fn unimplemented_opcode_is_skipped() {
        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x01, 0x23, 0x60, 0x07]).unwrap();
        match cpu.tick() {
            Err(Error::UnimplementedInstruction { word, addr }) => {
                assert_eq!((0x0123, 0x200), (word, addr));
            }
            other => unreachable!("{other:?}"),
        }
        cpu.tick().unwrap();
        assert_eq!(7, cpu.v()[0]);
    }

    /// Sixteen nested calls fit. The seventeenth is ignored.
    #[test]
    fn stack_is_clamped() {
        // 200: call 200, forever
        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x22, 0x00]).unwrap();
        for _ in 0..17 {
            cpu.tick().unwrap();
        }
        assert_eq!(16, cpu.stack().len());
        // once full, the call falls through
        assert_eq!(0x202, cpu.pc());
    }

    #[test]
    fn ret_on_empty_stack() {
        let cpu = run(Mode::Chip8, &[0x00, 0xee], 1);
        assert_eq!(0x202, cpu.pc());
    }

    #[test]
    fn call_and_return() {
        #[rustfmt::skip]
        let cpu = run(Mode::Chip8, &[
            0x22, 0x06, // 200: call 206
            0x60, 0x01, // 202: v0 = 1
            0x12, 0x04, // 204: jp $204
            0x61, 0x02, // 206: v1 = 2
            0x00, 0xee, // 208: ret
        ], 4);
        assert_eq!([1, 2], cpu.v()[..2]);
        assert_eq!(0x204, cpu.pc());
        assert!(cpu.stack().is_empty());
    }

    #[test]
    fn timers() {
        let mut cpu = run(Mode::Chip8, &[0x60, 0x02, 0xf0, 0x15, 0xf0, 0x18], 3);
        assert_eq!((2, 2), (cpu.delay(), cpu.sound()));
        cpu.tick_timers();
        assert_eq!((1, 1), (cpu.delay(), cpu.sound()));
        cpu.tick_timers();
        cpu.tick_timers();
        assert_eq!((0, 0), (cpu.delay(), cpu.sound()));
    }

    #[test]
    fn keys() {
        let mut cpu = CPU::default();
        for key in 0..16 {
            assert!(cpu.press(key).unwrap());
        }
        assert!(cpu.keys().iter().all(|&key| key));
        // ex9e skips when the key is held
        cpu.load_program_bytes(&[0x60, 0x0c, 0xe0, 0x9e]).unwrap();
        cpu.frame(2).unwrap();
        assert_eq!(0x206, cpu.pc());
    }

    #[test]
    fn reset() {
        let mut cpu = run(Mode::SChip, &[0x00, 0xff, 0x63, 0x99, 0x22, 0x00], 3);
        cpu.reset();
        assert_eq!(0x200, cpu.pc());
        assert_eq!(0, cpu.v()[3]);
        assert!(cpu.stack().is_empty());
        assert!(!cpu.screen().hires());
        assert_eq!(0, cpu.cycle());
        // memory is untouched, so the program runs again
        cpu.frame(1).unwrap();
        assert!(cpu.screen().hires());
    }
}

/// Super Chip extensions, and how the Chip-8 rejects them
mod schip {
    use super::*;

    #[test]
    fn chip8_rejects_hires() {
        let mut cpu = CPU::new(Mode::Chip8);
        cpu.load_program_bytes(&[0x00, 0xff]).unwrap();
        cpu.tick().expect_err("00ff is a Super Chip instruction");
        assert!(!cpu.screen().hires());
        assert_eq!(0x202, cpu.pc());
    }

    #[test]
    fn scroll() {
        #[rustfmt::skip]
        let program = [
            0x00, 0xff,             // hires
            0xa0, 0x00,             // I = glyph 0
            0xd0, 0x01,             // draw 1 row (0xf0) at (0, 0)
            0x00, 0xc2,             // scroll down 2
            0x00, 0xfb,             // scroll right 4
        ];
        let cpu = run(Mode::SChip, &program, 5);
        let lit: Vec<(usize, usize)> = (0..128)
            .flat_map(|x| (0..64).map(move |y| (x, y)))
            .filter(|&(x, y)| cpu.screen().pixel(x, y))
            .collect();
        assert_eq!(lit, [(4, 2), (5, 2), (6, 2), (7, 2)]);
    }

    #[test]
    fn exit_pauses() {
        let mut cpu = run(Mode::SChip, &[0x00, 0xfd, 0x60, 0x01], 1);
        assert!(cpu.flags.pause);
        cpu.frame(10).unwrap();
        assert_eq!(0, cpu.v()[0]);
        // singlestep steps anyway
        cpu.singlestep().unwrap();
        assert_eq!(1, cpu.v()[0]);
    }

    /// Only 8 flag registers exist
    #[test]
    fn flag_registers_are_capped() {
        #[rustfmt::skip]
        let program = [
            0x60, 0x01, 0x67, 0x08, 0x68, 0x09, // v0 = 1, v7 = 8, v8 = 9
            0xff, 0x75,                         // save v0..=vF
            0x60, 0x00, 0x67, 0x00, 0x68, 0x00, // clobber
            0xff, 0x85,                         // load v0..=vF
        ];
        let cpu = run(Mode::SChip, &program, 8);
        assert_eq!(1, cpu.v()[0]);
        assert_eq!(8, cpu.v()[7]);
        assert_eq!(0, cpu.v()[8]);
        assert_eq!(0, cpu.flag_storage()[8]);
    }

    #[test]
    fn index_overflow_quirk() {
        // vF = c5, I = fff, v0 = 1, add I, v0
        let program = [0x6f, 0xc5, 0xaf, 0xff, 0x60, 0x01, 0xf0, 0x1e];
        let cpu = run(Mode::SChip, &program, 4);
        assert_eq!((0x1000, 1), (cpu.i(), cpu.v()[0xf]));
        // the Chip-8 never touches vF
        let cpu = run(Mode::Chip8, &program, 4);
        assert_eq!((0x1000, 0xc5), (cpu.i(), cpu.v()[0xf]));

        // vF = c5, I = 100, v0 = 1, add I, v0
        let program = [0x6f, 0xc5, 0xa1, 0x00, 0x60, 0x01, 0xf0, 0x1e];
        let cpu = run(Mode::SChip, &program, 4);
        assert_eq!((0x101, 0), (cpu.i(), cpu.v()[0xf]));
        let cpu = run(Mode::Chip8, &program, 4);
        assert_eq!((0x101, 0xc5), (cpu.i(), cpu.v()[0xf]));
    }

    #[test]
    fn jump_quirk() {
        // v0 = 1, v3 = 3, jp v0|v3, $310
        let program = [0x60, 0x01, 0x63, 0x03, 0xb3, 0x10];
        assert_eq!(0x311, run(Mode::Chip8, &program, 3).pc());
        assert_eq!(0x313, run(Mode::SChip, &program, 3).pc());
    }

    #[test]
    fn shift_quirk() {
        // v0 = 1, v1 = 0x80, shl v1, v0
        let program = [0x60, 0x01, 0x61, 0x80, 0x80, 0x1e];
        let chip8 = run(Mode::Chip8, &program, 3);
        assert_eq!((0x00, 1), (chip8.v()[0], chip8.v()[0xf]));
        let schip = run(Mode::SChip, &program, 3);
        assert_eq!((0x02, 0), (schip.v()[0], schip.v()[0xf]));
    }

    #[test]
    fn big_font() {
        // v0 = 9, ld HF, v0
        let cpu = run(Mode::SChip, &[0x60, 0x09, 0xf0, 0x30], 2);
        assert_eq!(0x50 + 90, cpu.i());
    }
}

mod mode {
    use super::*;
    #[test]
    fn from_str() {
        for (s, mode) in [
            ("c", Mode::Chip8),
            ("chip8", Mode::Chip8),
            ("CHIP-8", Mode::Chip8),
            ("s", Mode::SChip),
            ("schip", Mode::SChip),
            ("SuperChip", Mode::SChip),
        ] {
            assert_eq!(mode, s.parse().unwrap());
        }
    }
    #[test]
    fn invalid() {
        match "xochip".parse::<Mode>() {
            Err(Error::InvalidMode { mode }) => assert_eq!("xochip", mode),
            other => unreachable!("{other:?}"),
        }
    }
    #[test]
    fn default() {
        assert_eq!(Mode::Chip8, Mode::default());
    }
}

mod quirks {
    use super::*;

    #[test]
    fn from_chip8() {
        assert_eq!(
            Quirks::from(Mode::Chip8),
            Quirks {
                bin_ops: false,
                shift: false,
                dma_inc: false,
                jump_vx: false,
                index_overflow: false,
                extended: false,
            }
        )
    }

    #[test]
    fn from_schip() {
        assert_eq!(
            Quirks::from(Mode::SChip),
            Quirks {
                bin_ops: false,
                shift: true,
                dma_inc: true,
                jump_vx: true,
                index_overflow: true,
                extended: true,
            }
        )
    }

    #[test]
    fn eq() {
        assert_ne!(Quirks::from(Mode::Chip8), Quirks::from(Mode::SChip));
    }

    #[test]
    fn ord() {
        assert!(Quirks::from(Mode::Chip8) < Quirks::from(Mode::SChip));
    }

    #[test]
    fn hash() {
        let mut hasher = DefaultHasher::new();
        Quirks::from(Mode::SChip).hash(&mut hasher);
        println!("{hasher:?}");
    }
}

mod flags {
    use super::*;
    #[test]
    fn new() {
        let flags = Flags::new(Mode::SChip);
        assert_eq!(Mode::SChip, flags.mode);
        assert_eq!(Quirks::from(Mode::SChip), flags.quirks);
        assert!(!flags.debug && !flags.pause && !flags.keypause);
    }
    #[test]
    fn is_paused() {
        let mut flags = Flags::default();
        assert!(!flags.is_paused());
        flags.keypause = true;
        assert!(flags.is_paused());
    }
}

mod dis {
    use super::*;
    use imperative_rs::InstructionSet;

    #[test]
    #[allow(clippy::clone_on_copy)]
    fn clone() {
        let opcode = Insn::decode(&[0xef, 0xa1]).unwrap().1; // random valid opcode
        let clone = opcode.clone();
        assert_eq!(opcode, clone);
    }
    #[test]
    fn display() {
        let dis = Dis::plain();
        assert!(dis.once(0x00e0).contains("cls"));
        assert!(dis.once(0xa123).contains("123"));
        assert!(dis.once(0x00ff).contains("hires"));
        assert!(dis.once(0x5001).contains("inval"));
    }
    #[test]
    fn indexed_jump() {
        // both candidate offset registers are shown
        assert!(Dis::plain().once(0xb310).contains("v0|v3, $310"));
    }
    #[test]
    fn superchip() {
        assert!(Insn::decode(&[0x00, 0xfe]).unwrap().1.is_superchip());
        assert!(!Insn::decode(&[0xd0, 0x10]).unwrap().1.is_superchip());
    }
}

mod screen {
    use super::*;
    #[test]
    fn resolution() {
        let mut screen = Screen::new();
        assert_eq!(LORES, (screen.width(), screen.height()));
        screen.set_hires(true);
        assert_eq!(HIRES, (screen.width(), screen.height()));
        assert_eq!(128 * 64, screen.pixels().count());
    }
    #[test]
    fn print() {
        run(Mode::Chip8, &[0xd0, 0x05], 1).screen().print_screen();
    }
}

mod region {
    use super::*;
    #[test]
    fn display() {
        println!("{Charset}{HiresCharset}{Program}");
    }
    #[test]
    fn ranges_do_not_overlap() {
        assert!(Charset.range().end <= HiresCharset.range().start);
        assert!(HiresCharset.range().end <= Program.range().start);
        assert_eq!(MEM_SIZE, Program.range().end);
    }
}

#[test]
fn error() {
    let error = Error::UnimplementedInstruction {
        word: 0xffff,
        addr: 0x200,
    };
    // Print it with Display and Debug
    println!("{error} {error:?}");
}
