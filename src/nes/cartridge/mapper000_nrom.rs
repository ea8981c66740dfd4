use super::Mapper;
use super::rom::{Mirroring, Rom};

const PRG_RAM_SIZE: usize = 0x2000;

#[derive(Debug)]
pub struct NromCart {
    rom: Rom,
    prg_ram: Vec<u8>,
    prg_mask: u16,
}

impl NromCart {
    pub fn new(rom: Rom) -> NromCart {
        // One 16 KiB bank mirrors into $C000-$FFFF
        let prg_mask = if rom.prg_banks() > 1 { 0x7FFF } else { 0x3FFF };
        NromCart {
            rom,
            prg_ram: vec![0; PRG_RAM_SIZE],
            prg_mask,
        }
    }
}

impl Mapper for NromCart {
    fn mapper_id(&self) -> u8 {
        0
    }

    fn read_prg(&mut self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => self.rom.read_prg(((addr - 0x8000) & self.prg_mask) as usize),
            _ => 0,
        }
    }

    fn write_prg(&mut self, addr: u16, data: u8) {
        if let 0x6000..=0x7FFF = addr {
            self.prg_ram[(addr - 0x6000) as usize] = data;
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
