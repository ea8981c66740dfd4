use super::Mapper;
use super::rom::{Mirroring, PRG_ROM_PAGE_SIZE, Rom};

#[derive(Debug)]
pub struct Mapper002UxRom {
    rom: Rom,
    bank_select: usize,
}

impl Mapper002UxRom {
    pub fn new(rom: Rom) -> Mapper002UxRom {
        Mapper002UxRom {
            rom,
            bank_select: 0,
        }
    }
}

impl Mapper for Mapper002UxRom {
    fn mapper_id(&self) -> u8 {
        2
    }

    fn read_prg(&mut self, addr: u16) -> u8 {
        let bank_count = self.rom.prg_banks();
        match addr {
            0x8000..=0xBFFF => {
                // Switchable bank
                let base = (self.bank_select % bank_count) * PRG_ROM_PAGE_SIZE;
                self.rom.read_prg(base + (addr - 0x8000) as usize)
            }
            0xC000..=0xFFFF => {
                // Fixed to the last bank
                let base = (bank_count - 1) * PRG_ROM_PAGE_SIZE;
                self.rom.read_prg(base + (addr - 0xC000) as usize)
            }
            _ => 0,
        }
    }

    fn write_prg(&mut self, addr: u16, data: u8) {
        /*
           7  bit  0
           ---- ----
           xxxx pPPP
                ||||
                ++++- Select 16 KB PRG ROM bank for CPU $8000-$BFFF
                     (UNROM uses bits 2-0; UOROM uses bits 3-0)
        */
        if let 0x8000..=0xFFFF = addr {
            self.bank_select = (data & 0x0F) as usize;
            log::debug!("UxROM: PRG bank {} at $8000", self.bank_select);
        }
    }

    fn read_chr(&mut self, addr: u16) -> u8 {
        self.rom.read_chr(addr as usize)
    }

    fn write_chr(&mut self, addr: u16, data: u8) {
        self.rom.write_chr(addr as usize, data);
    }

    fn mirroring(&self) -> Mirroring {
        self.rom.screen_mirroring
    }

    fn has_extended_ram(&self) -> bool {
        self.rom.battery_backed
    }
}
