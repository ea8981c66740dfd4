use bitflags::bitflags;

bitflags! {
    /* See: https://www.nesdev.org/wiki/PPU_registers#PPUMASK
        7  bit  0
        ---- ----
        BGRs bMmG
        |||| ||||
        |||| |||+- Greyscale (0: normal color, 1: greyscale)
        |||| ||+-- 1: Show background in leftmost 8 pixels of screen, 0: Hide
        |||| |+--- 1: Show sprites in leftmost 8 pixels of screen, 0: Hide
        |||| +---- 1: Enable background rendering
        |||+------ 1: Enable sprite rendering
        ||+------- Emphasize red (green on PAL/Dendy)
        |+-------- Emphasize green (red on PAL/Dendy)
        +--------- Emphasize blue
     */
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct MaskRegister: u8 {
        const GREYSCALE                 = 0b0000_0001;
        const LEFTMOST_8PXL_BACKGROUND  = 0b0000_0010;
        const LEFTMOST_8PXL_SPRITE      = 0b0000_0100;
        const SHOW_BACKGROUND           = 0b0000_1000;
        const SHOW_SPRITES              = 0b0001_0000;
        const EMPHASISE_RED             = 0b0010_0000;
        const EMPHASISE_GREEN           = 0b0100_0000;
        const EMPHASISE_BLUE            = 0b1000_0000;
    }
}

impl MaskRegister {
    pub fn new() -> Self {
        MaskRegister::empty()
    }

    /// Either layer enabled; mappers only see scanline edges while this holds
    pub fn rendering_enabled(&self) -> bool {
        self.intersects(MaskRegister::SHOW_BACKGROUND | MaskRegister::SHOW_SPRITES)
    }

    pub fn update(&mut self, data: u8) {
        *self = MaskRegister::from_bits_truncate(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendering_enabled() {
        let mut mask = MaskRegister::new();
        assert!(!mask.rendering_enabled());

        mask.update(0b0000_1000);
        assert!(mask.rendering_enabled());

        mask.update(0b0001_0000);
        assert!(mask.rendering_enabled());

        mask.update(0b1110_0111);
        assert!(!mask.rendering_enabled());
    }
}
