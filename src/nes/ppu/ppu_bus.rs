use crate::nes::cartridge::SharedMapper;
use crate::nes::cartridge::rom::Mirroring;

pub const NAME_TABLE_SIZE: u16 = 0x400;
/// Console RAM backs two nametables; the other two come from mirroring
pub const VRAM_SIZE: usize = 2 * NAME_TABLE_SIZE as usize;
pub const PALETTE_SIZE: usize = 0x20;

const PPU_ADDR_MASK: u16 = 0x3FFF;
const PATTERN_TABLE_END: u16 = 0x1FFF;
const NAME_TABLE_START: u16 = 0x2000;
const NAME_TABLE_END: u16 = 0x3EFF;
const PALETTE_START: u16 = 0x3F00;

/// PPU-visible address space.
///
/// `$0000-$1FFF` pattern tables through the mapper (CHR ROM/RAM)
/// `$2000-$3EFF` nametables folded by the cartridge's mirroring
/// `$3F00-$3FFF` palette, 32 bytes mirrored
pub struct PpuBus {
    mapper: SharedMapper,
    vram: [u8; VRAM_SIZE],
    /// Extra cartridge VRAM used only by four-screen boards
    four_screen_vram: [u8; VRAM_SIZE],
    pub palette_table: [u8; PALETTE_SIZE],
}

impl PpuBus {
    pub fn new(mapper: SharedMapper) -> PpuBus {
        PpuBus {
            mapper,
            vram: [0; VRAM_SIZE],
            four_screen_vram: [0; VRAM_SIZE],
            palette_table: [0; PALETTE_SIZE],
        }
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        let addr = addr & PPU_ADDR_MASK;
        match addr {
            0..=PATTERN_TABLE_END => self.mapper.borrow_mut().read_chr(addr),
            NAME_TABLE_START..=NAME_TABLE_END => {
                let (upper, index) = self.mirror_vram_addr(addr);
                match upper {
                    true => self.four_screen_vram[index],
                    false => self.vram[index],
                }
            }
            _ => self.palette_table[mirror_palette_addr(addr)],
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        let addr = addr & PPU_ADDR_MASK;
        match addr {
            0..=PATTERN_TABLE_END => self.mapper.borrow_mut().write_chr(addr, data),
            NAME_TABLE_START..=NAME_TABLE_END => {
                let (upper, index) = self.mirror_vram_addr(addr);
                match upper {
                    true => self.four_screen_vram[index] = data,
                    false => self.vram[index] = data,
                }
            }
            _ => self.palette_table[mirror_palette_addr(addr)] = data,
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mapper.borrow().mirroring()
    }

    /// Resolves a nametable address to (uses four-screen RAM, index).
    ///
    /// $3000-$3EFF mirrors $2000-$2EFF.
    fn mirror_vram_addr(&self, addr: u16) -> (bool, usize) {
        let index = (addr - NAME_TABLE_START) & 0x0FFF;
        let table = index / NAME_TABLE_SIZE;
        let offset = index % NAME_TABLE_SIZE;

        let folded = match self.mirroring() {
            // NT0 and NT2 share, NT1 and NT3 share
            Mirroring::Vertical => (table & 1) * NAME_TABLE_SIZE + offset,
            // NT0 and NT1 share, NT2 and NT3 share
            Mirroring::Horizontal => (table >> 1) * NAME_TABLE_SIZE + offset,
            Mirroring::FourScreen => {
                return (table >= 2, (index % VRAM_SIZE as u16) as usize);
            }
        };
        (false, folded as usize)
    }
}

/// Maps $3F00-$3FFF onto the 32-byte palette.
/// $3F10/$3F14/$3F18/$3F1C alias the backdrop entries below them.
pub fn mirror_palette_addr(addr: u16) -> usize {
    let index = (addr - PALETTE_START) as usize % PALETTE_SIZE;
    match index {
        0x10 | 0x14 | 0x18 | 0x1C => index - 0x10,
        _ => index,
    }
}
