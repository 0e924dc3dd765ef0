// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use minifb::*;
use schirp::{Result, Screen, CPU};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width,
            height,
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            fb: FrameBuffer::new(self.width, self.height),
            rom: self.rom.to_owned().unwrap_or_default(),
            time: Instant::now(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: 128,
            height: 64,
            name: Some("Super Chip Interpreter"),
            rom: None,
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X8,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001E2431,
        }
    }
}

/// A window-sized buffer. Lores screens are scaled up to fill it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            buffer: vec![0x00be4d; width * height],
            width,
            height,
            format: Default::default(),
        }
    }
    /// Copies the screen into the buffer, scaling each pixel to fit
    pub fn draw(&mut self, screen: &Screen) {
        let scale_x = (self.width / screen.width()).max(1);
        let scale_y = (self.height / screen.height()).max(1);
        for (idx, pixel) in self.buffer.iter_mut().enumerate() {
            let (x, y) = (idx % self.width / scale_x, idx / self.width / scale_y);
            *pixel = if screen.pixel(x, y) {
                self.format.fg
            } else {
                self.format.bg
            };
        }
    }
    pub fn render(&mut self, window: &mut Window, screen: &Screen) -> Result<()> {
        self.draw(screen);
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
    #[allow(dead_code)] // used in tests
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(128, 64)
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
    rom: PathBuf,
    time: Instant,
}

impl UI {
    pub fn frame(&mut self, cpu: &mut CPU) -> Result<bool> {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        if cpu.flags.pause {
            self.window.set_title(&format!("Schirp ⏸ {name}"))
        } else {
            self.window.set_title(&format!(
                "Schirp ▶ {name} {:02.02}{}",
                (1.0 / self.time.elapsed().as_secs_f64()),
                if cpu.sound() > 0 { " ♪" } else { "" }
            ));
        }
        if !self.window.is_open() {
            return Ok(false);
        }
        self.time = Instant::now();
        // update framebuffer
        self.fb.render(&mut self.window, cpu.screen())?;
        Ok(true)
    }

    pub fn keys(&mut self, cpu: &mut CPU) -> Result<bool> {
        // minifb reports held keys, so diff them against the last frame
        let held = self.window.get_keys();
        let released: Vec<Key> = self
            .keyboard
            .iter()
            .filter(|key| !held.contains(key))
            .copied()
            .collect();
        let pressed: Vec<Key> = held
            .iter()
            .filter(|key| !self.keyboard.contains(key))
            .copied()
            .collect();
        for key in released {
            if let Some(key) = identify_key(key) {
                cpu.release(key)?;
            }
        }
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                F1 | Comma => cpu.dump(),
                F2 | Period => cpu.screen().print_screen(),
                F4 | Slash => {
                    eprintln!("Debug {}.", {
                        cpu.flags.debug();
                        if cpu.flags.debug {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    })
                }
                F5 | Backslash => eprintln!("{}.", {
                    cpu.flags.pause();
                    if cpu.flags.pause {
                        "Paused"
                    } else {
                        "Unpaused"
                    }
                }),
                F6 | Enter => {
                    eprintln!("Step");
                    match cpu.singlestep() {
                        Err(schirp::Error::BreakpointHit { addr, .. }) => {
                            eprintln!("Breakpoint hit: {addr:03x}")
                        }
                        Err(schirp::Error::UnimplementedInstruction { .. }) => (),
                        result => {
                            result?;
                        }
                    }
                }
                F7 => {
                    eprintln!("Set breakpoint {:03x}.", cpu.pc());
                    cpu.set_break(cpu.pc());
                }
                F8 => {
                    eprintln!("Unset breakpoint {:03x}.", cpu.pc());
                    cpu.unset_break(cpu.pc());
                }
                F9 | Delete => {
                    eprintln!("Soft reset state.cpu {:03x}", cpu.pc());
                    cpu.soft_reset();
                }
                F12 | Backspace => {
                    eprintln!("Reset state.cpu");
                    cpu.reset();
                }
                Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        cpu.press(key)?;
                    }
                }
            }
        }
        self.keyboard = held;
        Ok(true)
    }
}

/// Maps the left side of a QWERTY keyboard onto the hex keypad
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  =>  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
