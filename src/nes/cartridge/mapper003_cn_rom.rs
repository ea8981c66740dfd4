use super::Mapper;
use super::rom::{CHR_ROM_PAGE_SIZE, Mirroring, Rom};

#[derive(Debug)]
pub struct Mapper003CnRom {
    rom: Rom,
    prg_mask: u16,
    bank_select: usize,
}

impl Mapper003CnRom {
    pub fn new(rom: Rom) -> Mapper003CnRom {
        let prg_mask = if rom.prg_banks() > 1 { 0x7FFF } else { 0x3FFF };
        Mapper003CnRom {
            rom,
            prg_mask,
            bank_select: 0,
        }
    }

    fn chr_bank_count(&self) -> usize {
        // CHR RAM boards still expose one 8 KiB bank
        self.rom.chr_banks().max(1)
    }

    fn chr_offset(&self, addr: u16) -> usize {
        let bank = self.bank_select % self.chr_bank_count();
        bank * CHR_ROM_PAGE_SIZE + (addr as usize % CHR_ROM_PAGE_SIZE)
    }
}

impl Mapper for Mapper003CnRom {
    fn mapper_id(&self) -> u8 {
        3
    }

    fn read_prg(&mut self, addr: u16) -> u8 {
        match addr {
            0x8000..=0xFFFF => self.rom.read_prg(((addr - 0x8000) & self.prg_mask) as usize),
            _ => 0,
        }
    }

    fn write_prg(&mut self, addr: u16, data: u8) {
        /*
           7  bit  0
           ---- ----
           xxxx CCCC
                ||||
                ++++- Select 8 KB CHR ROM bank at PPU $0000
        */
        if let 0x8000..=0xFFFF = addr {
            self.bank_select = (data & 0x0F) as usize;
            log::debug!("CNROM: CHR bank {}", self.bank_select);
        }
    }

    fn read_chr(&mut self, addr: u16) -> u8 {
        self.rom.read_chr(self.chr_offset(addr))
    }

    fn write_chr(&mut self, addr: u16, data: u8) {
        let offset = self.chr_offset(addr);
        self.rom.write_chr(offset, data);
    }

    fn mirroring(&self) -> Mirroring {
        self.rom.screen_mirroring
    }

    fn has_extended_ram(&self) -> bool {
        self.rom.battery_backed
    }
}
