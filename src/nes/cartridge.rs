use crate::nes::cpu::interrupts::InterruptLatch;
use rom::Mirroring;
use std::cell::RefCell;
use std::rc::Rc;

pub mod mapper000_nrom;
pub mod mapper002_ux_rom;
pub mod mapper003_cn_rom;
pub mod rom;

/// Mapper handle shared by the CPU-side and PPU-side buses
pub type SharedMapper = Rc<RefCell<Box<dyn Mapper>>>;

pub trait Mapper {
    /// iNES mapper number this variant implements
    fn mapper_id(&self) -> u8;

    /// CPU read ($4020–$FFFF)
    fn read_prg(&mut self, addr: u16) -> u8;

    /// CPU write ($4020–$FFFF)
    fn write_prg(&mut self, addr: u16, data: u8);

    /// PPU read ($0000–$1FFF)
    fn read_chr(&mut self, addr: u16) -> u8;

    /// PPU write ($0000–$1FFF)
    fn write_chr(&mut self, addr: u16, data: u8);

    /// Nametable mirroring mode
    fn mirroring(&self) -> Mirroring;

    /// Battery-backed / extended RAM present on the board
    fn has_extended_ram(&self) -> bool;

    /// Called by the pixel engine once per visible scanline.
    /// Boards with a scanline counter raise IRQ through `irq`.
    fn scanline_irq(&mut self, _irq: &InterruptLatch) {}
}
