//! Tests for schirp

use super::ui::*;
use minifb::Key;
use schirp::*;

mod frame_buffer {
    use super::*;
    #[test]
    fn blank() {
        let mut fb = FrameBuffer::default();
        fb.draw(&Screen::new());
        let bg = FrameBufferFormat::default().bg;
        assert!(fb.buffer().iter().all(|&pixel| pixel == bg));
    }
    /// Lores pixels are drawn 2x2
    #[test]
    fn lores_scaling() {
        let mut cpu = CPU::default();
        // draw a single pixel at (1, 1)
        cpu.load_program_bytes(&[0x61, 0x01, 0xa3, 0x00, 0xd1, 0x11])
            .unwrap();
        cpu.frame(3).unwrap();
        // sprite data at 0x300 is blank, so nothing to see yet
        let mut fb = FrameBuffer::default();
        fb.draw(cpu.screen());
        let fg = FrameBufferFormat::default().fg;
        assert_eq!(0, fb.buffer().iter().filter(|&&pixel| pixel == fg).count());

        let mut cpu = CPU::default();
        cpu.load_program_bytes(&[0x61, 0x01, 0xa2, 0x06, 0xd1, 0x11, 0x80])
            .unwrap();
        cpu.frame(3).unwrap();
        fb.draw(cpu.screen());
        let lit: Vec<usize> = fb
            .buffer()
            .iter()
            .enumerate()
            .filter(|(_, &pixel)| pixel == fg)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(lit, [2 * 128 + 2, 2 * 128 + 3, 3 * 128 + 2, 3 * 128 + 3]);
    }
}

mod keys {
    use super::*;
    #[test]
    fn keypad_layout() {
        let rows = [
            [Key::Key1, Key::Key2, Key::Key3, Key::Key4],
            [Key::Q, Key::W, Key::E, Key::R],
            [Key::A, Key::S, Key::D, Key::F],
            [Key::Z, Key::X, Key::C, Key::V],
        ];
        let expected = [
            [0x1, 0x2, 0x3, 0xc],
            [0x4, 0x5, 0x6, 0xd],
            [0x7, 0x8, 0x9, 0xe],
            [0xa, 0x0, 0xb, 0xf],
        ];
        for (row, expected) in rows.iter().zip(expected) {
            for (&key, expected) in row.iter().zip(expected) {
                assert_eq!(Some(expected), identify_key(key));
            }
        }
    }
    #[test]
    fn unmapped() {
        assert_eq!(None, identify_key(Key::Space));
        assert_eq!(None, identify_key(Key::Key5));
    }
}
