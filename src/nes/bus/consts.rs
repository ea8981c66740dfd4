pub const CPU_RAM_SIZE: usize = 2048;
pub const CPU_RAM_START: u16 = 0x0000;
pub const CPU_RAM_END: u16 = 0x1FFF;
pub const CPU_RAM_MASK: u16 = 0x07FF;

pub const PPU_REGISTERS_START: u16 = 0x2000;
pub const PPU_REGISTERS_END: u16 = 0x3FFF;
pub const PPU_REGISTERS_MASK: u16 = 0x0007;

pub const IO_REGISTERS_START: u16 = 0x4000;
pub const IO_REGISTERS_END: u16 = 0x401F;

pub const CART_START: u16 = 0x4020;
pub const CART_END: u16 = 0xFFFF;

pub const PAGE_SIZE: usize = 0x100;
