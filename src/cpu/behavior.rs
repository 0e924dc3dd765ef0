// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::*;
use rand::random;

impl CPU {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn) {
        match instruction {
            // Core Chip-8 instructions
            Insn::Cls                    => self.clear_screen(),
            Insn::Ret                    => self.ret(),
            Insn::Jp         {       A } => self.jump(A),
            Insn::Call       {       A } => self.call(A),
            Insn::SeImm      {    x, B } => self.skip_equals_immediate(x, B),
            Insn::SneImm     {    x, B } => self.skip_not_equals_immediate(x, B),
            Insn::Se         { y, x    } => self.skip_equals(x, y),
            Insn::LdImm      {    x, B } => self.load_immediate(x, B),
            Insn::AddImm     {    x, B } => self.add_immediate(x, B),
            Insn::Ld         { y, x    } => self.load(x, y),
            Insn::Or         { y, x    } => self.or(x, y),
            Insn::And        { y, x    } => self.and(x, y),
            Insn::Xor        { y, x    } => self.xor(x, y),
            Insn::Add        { y, x    } => self.add(x, y),
            Insn::Sub        { y, x    } => self.sub(x, y),
            Insn::Shr        { y, x    } => self.shift_right(x, y),
            Insn::Subn       { y, x    } => self.backwards_sub(x, y),
            Insn::Shl        { y, x    } => self.shift_left(x, y),
            Insn::Sne        { y, x    } => self.skip_not_equals(x, y),
            Insn::LdI        {       A } => self.load_i_immediate(A),
            Insn::JpIndexed  {       A } => self.jump_indexed(A),
            Insn::Rnd        {    x, B } => self.rand(x, B),
            Insn::Drw        { y, x, n } => self.draw(x, y, n),
            Insn::Skp        {    x    } => self.skip_key_equals(x),
            Insn::Sknp       {    x    } => self.skip_key_not_equals(x),
            Insn::GetDelay   {    x    } => self.load_delay_timer(x),
            Insn::WaitKey    {    x    } => self.wait_for_key(x),
            Insn::SetDelay   {    x    } => self.store_delay_timer(x),
            Insn::SetSound   {    x    } => self.store_sound_timer(x),
            Insn::AddI       {    x    } => self.add_i(x),
            Insn::Font       {    x    } => self.load_sprite(x),
            Insn::Bcd        {    x    } => self.bcd_convert(x),
            Insn::Store      {    x    } => self.store_dma(x),
            Insn::Load       {    x    } => self.load_dma(x),
            // Super-Chip extensions
            Insn::ScrollDown {       n } => self.scroll_down(n),
            Insn::ScrollRight            => self.scroll_right(),
            Insn::ScrollLeft             => self.scroll_left(),
            Insn::Exit                   => self.halt(),
            Insn::Lores                  => self.init_lores(),
            Insn::Hires                  => self.init_hires(),
            Insn::BigFont    {    x    } => self.load_big_sprite(x),
            Insn::SaveFlags  {    x    } => self.store_flags(x),
            Insn::LoadFlags  {    x    } => self.load_flags(x),
        }
    }
}

/// |`0aaa`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) {
        self.screen.clear();
        self.flags.redraw = true;
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// Returning with an empty stack does nothing.
    #[inline(always)]
    pub(super) fn ret(&mut self) {
        match self.stack.pop() {
            Some(addr) => self.pc = addr,
            None => log::warn!("ret with empty stack at {:03x}", self.pc.wrapping_sub(2)),
        }
    }
}

/// Super Chip screen-control routines
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00cN`| Scroll the screen down N lines     |
/// |`00fb`| Scroll the screen right            |
/// |`00fc`| Scroll the screen left             |
/// |`00fd`| Exit the interpreter               |
/// |`00fe`| Initialize lores mode              |
/// |`00ff`| Initialize hires mode              |
impl CPU {
    /// # |`00cN`|
    /// Scroll the screen down N lines
    #[inline(always)]
    pub(super) fn scroll_down(&mut self, n: Nib) {
        self.screen.scroll_down(n as usize);
        self.flags.redraw = true;
    }
    /// # |`00fb`|
    /// Scroll the screen right
    #[inline(always)]
    pub(super) fn scroll_right(&mut self) {
        self.screen.scroll_right();
        self.flags.redraw = true;
    }
    /// # |`00fc`|
    ///  Scroll the screen left
    #[inline(always)]
    pub(super) fn scroll_left(&mut self) {
        self.screen.scroll_left();
        self.flags.redraw = true;
    }
    /// # |`00fd`|
    /// Stops execution until the host unpauses the CPU
    pub(super) fn halt(&mut self) {
        log::info!("program exited at {:03x}", self.pc.wrapping_sub(2));
        self.flags.pause = true;
    }
    /// # |`00fe`|
    /// Initialize lores mode
    pub(super) fn init_lores(&mut self) {
        log::info!("lores mode");
        self.screen.set_hires(false);
        self.flags.redraw = true;
    }
    /// # |`00ff`|
    /// Initialize hires mode
    pub(super) fn init_hires(&mut self) {
        log::info!("hires mode");
        self.screen.set_hires(true);
        self.flags.redraw = true;
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) {
        self.pc = a;
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    ///
    /// A call past [STACK_DEPTH] nested subroutines is dropped entirely.
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) {
        if self.stack.len() >= STACK_DEPTH {
            log::warn!(
                "stack overflow: call {a:03x} at {:03x} ignored",
                self.pc.wrapping_sub(2)
            );
            return;
        }
        self.stack.push(self.pc);
        self.pc = a;
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] == b {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) {
        if self.v[x] != b {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`5xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`5XY0`| Skip next instruction if vX == vY  |
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] == self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX, without touching vF
impl CPU {
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) {
        self.v[x] = self.v[x].wrapping_add(b);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// vF is always written after the result, so when X is F the flag wins.
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = Y >> 1 (or X >> 1)             |
/// |`8xy7`| X = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = Y << 1 (or X << 1)             |
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The COSMAC VIP interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.v[x] |= self.v[y];
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The COSMAC VIP interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.v[x] &= self.v[y];
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The COSMAC VIP interpreter will clobber vF for any 8-series instruction
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.v[x] ^= self.v[y];
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_add(self.v[y]);
        self.v[0xf] = carry.into();
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[x].overflowing_sub(self.v[y]);
        self.v[0xf] = (!carry).into();
    }
    /// |`8xy6`| Performs bitwise right shift of vY, and stores the result in vX
    ///
    /// # Quirk
    /// On the Super Chip, this shifts vX in place
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift { x } else { y };
        let shift_out = self.v[src] & 1;
        self.v[x] = self.v[src] >> 1;
        self.v[0xf] = shift_out;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let carry;
        (self.v[x], carry) = self.v[y].overflowing_sub(self.v[x]);
        self.v[0xf] = (!carry).into();
    }
    /// |`8xyE`| Performs bitwise left shift of vY, and stores the result in vX
    ///
    /// # Quirk
    /// On the Super Chip, this shifts vX in place
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift { x } else { y };
        let shift_out: u8 = self.v[src] >> 7;
        self.v[x] = self.v[src] << 1;
        self.v[0xf] = shift_out;
    }
}

/// |`9xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`9XY0`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        if self.v[x] != self.v[y] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) {
        self.i = a;
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// # Quirk
    /// On the Super Chip, the offset comes from vX, where X is the high nibble of adr
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) {
        let reg = if self.flags.quirks.jump_vx {
            (a as usize >> 8) & 0xf
        } else {
            0
        };
        self.pc = a.wrapping_add(self.v[reg] as Adr);
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) {
        self.v[x] = random::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
///
/// The starting coordinates wrap around the screen. The sprite itself
/// is clipped at the right and bottom edges.
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// # Quirk
    /// On the Super Chip, `Dxy0` draws a 16x16 sprite
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) {
        let (w, h) = (self.screen.width(), self.screen.height());
        let (x, y) = (self.v[x] as usize % w, self.v[y] as usize % h);
        self.flags.redraw = true;
        match n {
            0 if self.flags.quirks.extended => self.draw_sprite(x, y, 16, 2),
            0 => self.v[0xf] = 0,
            n => self.draw_sprite(x, y, n as usize, 1),
        }
    }

    /// Draws a sprite `rows` tall and `width` bytes wide, starting at memory address I
    ///
    /// In lores, vF is set when any pixel is erased. In hires, vF counts the rows
    /// that erased a pixel, plus the rows that fell off the bottom of the screen.
    #[inline(always)]
    pub(super) fn draw_sprite(&mut self, x: usize, y: usize, rows: usize, width: usize) {
        let height = self.screen.height();
        let mut collisions = 0;
        for row in 0..rows.min(height - y) {
            let addr = self.i as usize + row * width;
            let sprite = (0..width).fold(0u128, |sprite, byte| {
                sprite | (self.mem.read(addr + byte) as u128) << (120 - 8 * byte)
            });
            if self.screen.draw_row(x, y + row, sprite) {
                collisions += 1;
            }
        }
        self.v[0xf] = if self.screen.hires() {
            let clipped = (y + rows).saturating_sub(height);
            (collisions + clipped) as u8
        } else {
            (collisions > 0).into()
        };
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key == vX |
/// |`eXa1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key == vX
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) {
        if self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
    /// |`ExA1`| Skip next instruction if key != vX
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) {
        if !self.keys[self.v[x] as usize & 0xf] {
            self.pc = self.pc.wrapping_add(2);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// The CPU stops fetching until a key is released. See [CPU::release].
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        self.wait_reg = x;
        self.flags.keypause = true;
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
    }
    /// |`Fx1e`| Add vX to I,
    /// ```py
    /// I += vX;
    /// ```
    /// # Quirk
    /// On the Super Chip, vF is set when I leaves the 12-bit address space
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x] as Adr);
        if self.flags.quirks.index_overflow {
            self.v[0xf] = (self.i > 0xfff).into();
        }
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        self.i = FONT + 5 * (self.v[x] as Adr & 0xf);
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) {
        let x = self.v[x];
        self.mem.write(self.i.wrapping_add(2), x % 10);
        self.mem.write(self.i.wrapping_add(1), x / 10 % 10);
        self.mem.write(self.i, x / 100 % 10);
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// # Quirk
    /// The COSMAC VIP interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) {
        for reg in 0..=x {
            self.mem.write(self.i.wrapping_add(reg as Adr), self.v[reg]);
        }
        if !self.flags.quirks.dma_inc {
            self.i = self.i.wrapping_add(x as Adr + 1);
        }
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// # Quirk
    /// The COSMAC VIP interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) {
        for reg in 0..=x {
            self.v[reg] = self.mem.read(self.i.wrapping_add(reg as Adr));
        }
        if !self.flags.quirks.dma_inc {
            self.i = self.i.wrapping_add(x as Adr + 1);
        }
    }
}

/// |`Fxbb`| Super Chip: Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`Fx30`| 8x10 equivalent of load_sprite     |
/// |`Fx75`| Save to "flag registers"           |
/// |`Fx85`| Load from "flag registers"         |
impl CPU {
    /// |`Fx30`| (Super-Chip) 8x10 equivalent of [CPU::load_sprite]
    #[inline(always)]
    pub(super) fn load_big_sprite(&mut self, x: Reg) {
        self.i = HIRES_FONT + 10 * (self.v[x] as Adr & 0xf);
    }

    /// |`Fx75`| (Super-Chip) Save v0..=vX to the flag registers
    ///
    /// Only the first [FLAG_REGISTERS] registers are saved.
    #[inline(always)]
    pub(super) fn store_flags(&mut self, x: Reg) {
        let x = x.min(FLAG_REGISTERS - 1);
        self.flag_storage[..=x].copy_from_slice(&self.v[..=x]);
    }

    /// |`Fx85`| (Super-Chip) Load v0..=vX from the flag registers
    ///
    /// Only the first [FLAG_REGISTERS] registers are loaded.
    #[inline(always)]
    pub(super) fn load_flags(&mut self, x: Reg) {
        let x = x.min(FLAG_REGISTERS - 1);
        self.v[..=x].copy_from_slice(&self.flag_storage[..=x]);
    }
}
