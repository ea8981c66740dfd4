use crate::nes::cartridge::mapper000_nrom::NromCart;
use crate::nes::cartridge::mapper002_ux_rom::Mapper002UxRom;
use crate::nes::cartridge::mapper003_cn_rom::Mapper003CnRom;
use crate::nes::cartridge::{Mapper, SharedMapper};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

const NES_MAGIC_BYTES: &[u8; 4] = b"NES\x1A";
pub const HEADER_SIZE: usize = 0x10;
pub const TRAINER_SIZE: usize = 0x200;
pub const PRG_ROM_PAGE_SIZE: usize = 0x4000;
pub const CHR_ROM_PAGE_SIZE: usize = 0x2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RomError {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("Image declares no PRG ROM banks")]
    NoPrgBanks,

    #[error("Trainer blocks are not supported")]
    TrainerUnsupported,

    #[error("PAL images are not supported")]
    UnsupportedRegion,

    #[error("Unsupported Mapper: {0}")]
    UnsupportedMapper(u8),

    #[error("Truncated image: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Vertical,
    Horizontal,
    FourScreen,
}

impl Mirroring {
    /// Four-screen (bit 3) takes precedence over the vertical/horizontal bit (bit 0)
    pub fn from_flags6(flags6: u8) -> Mirroring {
        match (flags6 & 0b1000 != 0, flags6 & 0b1 != 0) {
            (true, _) => Mirroring::FourScreen,
            (false, true) => Mirroring::Vertical,
            (false, false) => Mirroring::Horizontal,
        }
    }
}

/// Decoded iNES image.
///
/// PRG/CHR data is immutable except for CHR RAM (allocated when the header
/// declares zero CHR banks), which mappers write through `write_chr`.
#[derive(Debug)]
pub struct Rom {
    pub prg_rom: Vec<u8>,
    pub chr_rom: Vec<u8>,
    pub chr_is_ram: bool,
    pub mapper: u8,
    pub screen_mirroring: Mirroring,
    pub battery_backed: bool,
}

impl Rom {
    pub fn parse(raw: &[u8]) -> Result<Rom, RomError> {
        // Check NES magic bytes
        if raw.len() < HEADER_SIZE || &raw[0..4] != NES_MAGIC_BYTES {
            return Err(RomError::InvalidFormat("Not an iNES file".into()));
        }

        let prg_banks = raw[4] as usize;
        let chr_banks = raw[5] as usize;
        let flags6 = raw[6];
        let flags7 = raw[7];
        let flags10 = raw[10];

        if prg_banks == 0 {
            return Err(RomError::NoPrgBanks);
        }
        if flags6 & 0b100 != 0 {
            return Err(RomError::TrainerUnsupported);
        }
        if (flags10 & 0b11) == 0b10 || (flags10 & 0b01) != 0 {
            return Err(RomError::UnsupportedRegion);
        }

        let mapper = (flags7 & 0b1111_0000) | (flags6 >> 4);
        let screen_mirroring = Mirroring::from_flags6(flags6);
        let battery_backed = flags6 & 0b10 != 0;

        let prg_rom_size = prg_banks * PRG_ROM_PAGE_SIZE;
        let chr_rom_size = chr_banks * CHR_ROM_PAGE_SIZE;
        let prg_rom_start = HEADER_SIZE;
        let chr_rom_start = prg_rom_start + prg_rom_size;
        let expected = chr_rom_start + chr_rom_size;
        if raw.len() < expected {
            return Err(RomError::Truncated {
                expected,
                actual: raw.len(),
            });
        }

        let chr_is_ram = chr_banks == 0;
        let chr_rom = if chr_is_ram {
            vec![0u8; CHR_ROM_PAGE_SIZE]
        } else {
            raw[chr_rom_start..expected].to_vec()
        };

        log::info!(
            "iNES image: mapper={} prg_banks={} chr_banks={} mirroring={:?} battery={}",
            mapper,
            prg_banks,
            chr_banks,
            screen_mirroring,
            battery_backed
        );

        Ok(Rom {
            prg_rom: raw[prg_rom_start..chr_rom_start].to_vec(),
            chr_rom,
            chr_is_ram,
            mapper,
            screen_mirroring,
            battery_backed,
        })
    }

    #[cfg(any(test, feature = "testing-utils"))]
    pub fn new_custom(
        prg_rom: Vec<u8>,
        chr_rom: Vec<u8>,
        mapper: u8,
        screen_mirroring: Mirroring,
    ) -> Rom {
        let chr_is_ram = chr_rom.is_empty();
        Rom {
            prg_rom,
            chr_rom: if chr_is_ram {
                vec![0u8; CHR_ROM_PAGE_SIZE]
            } else {
                chr_rom
            },
            chr_is_ram,
            mapper,
            screen_mirroring,
            battery_backed: false,
        }
    }

    pub fn prg_banks(&self) -> usize {
        self.prg_rom.len() / PRG_ROM_PAGE_SIZE
    }

    /// Number of 8 KiB CHR banks declared by the image (0 for CHR RAM)
    pub fn chr_banks(&self) -> usize {
        if self.chr_is_ram {
            0
        } else {
            self.chr_rom.len() / CHR_ROM_PAGE_SIZE
        }
    }

    pub fn read_prg(&self, offset: usize) -> u8 {
        self.prg_rom[offset % self.prg_rom.len()]
    }

    pub fn read_chr(&self, offset: usize) -> u8 {
        self.chr_rom[offset % self.chr_rom.len()]
    }

    pub fn write_chr(&mut self, offset: usize, data: u8) {
        if self.chr_is_ram {
            let len = self.chr_rom.len();
            self.chr_rom[offset % len] = data;
        }
    }

    /// Moves the image into the mapper selected by its header
    pub fn into_mapper(self) -> Result<Box<dyn Mapper>, RomError> {
        log::debug!("Building mapper {} for image", self.mapper);
        match self.mapper {
            0 => Ok(Box::new(NromCart::new(self))),
            2 => Ok(Box::new(Mapper002UxRom::new(self))),
            3 => Ok(Box::new(Mapper003CnRom::new(self))),
            id => Err(RomError::UnsupportedMapper(id)),
        }
    }

    pub fn into_shared_mapper(self) -> Result<SharedMapper, RomError> {
        let mapper = self.into_mapper()?;
        Ok(Rc::new(RefCell::new(mapper)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut raw = vec![0u8; HEADER_SIZE];
        raw[0..4].copy_from_slice(NES_MAGIC_BYTES);
        raw[4] = prg_banks;
        raw[5] = chr_banks;
        raw[6] = flags6;
        raw[7] = flags7;
        raw
    }

    fn image(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut raw = header(prg_banks, chr_banks, flags6, flags7);
        raw.resize(
            HEADER_SIZE
                + prg_banks as usize * PRG_ROM_PAGE_SIZE
                + chr_banks as usize * CHR_ROM_PAGE_SIZE,
            0,
        );
        raw
    }

    #[test]
    fn test_parse_one_bank_image() {
        let mut raw = image(1, 1, 0b0000_0001, 0);
        raw[HEADER_SIZE] = 0xA9;
        raw[HEADER_SIZE + PRG_ROM_PAGE_SIZE] = 0x3C;

        let rom = Rom::parse(&raw).unwrap();
        assert_eq!(rom.prg_banks(), 1);
        assert_eq!(rom.chr_banks(), 1);
        assert_eq!(rom.mapper, 0);
        assert_eq!(rom.screen_mirroring, Mirroring::Vertical);
        assert_eq!(rom.prg_rom[0], 0xA9);
        assert_eq!(rom.chr_rom[0], 0x3C);
        assert!(!rom.chr_is_ram);
        assert!(!rom.battery_backed);
    }

    #[test]
    fn test_mapper_id_from_both_nibbles() {
        let raw = image(1, 1, 0b0010_0000, 0b0100_0000);
        let rom = Rom::parse(&raw).unwrap();
        assert_eq!(rom.mapper, 0x42);
    }

    #[test]
    fn test_four_screen_takes_precedence() {
        assert_eq!(Mirroring::from_flags6(0b1001), Mirroring::FourScreen);
        assert_eq!(Mirroring::from_flags6(0b1000), Mirroring::FourScreen);
        assert_eq!(Mirroring::from_flags6(0b0001), Mirroring::Vertical);
        assert_eq!(Mirroring::from_flags6(0b0000), Mirroring::Horizontal);
    }

    #[test]
    fn test_battery_flag() {
        let raw = image(1, 1, 0b0000_0010, 0);
        assert!(Rom::parse(&raw).unwrap().battery_backed);
    }

    #[test]
    fn test_zero_chr_banks_allocates_chr_ram() {
        let raw = image(2, 0, 0, 0);
        let mut rom = Rom::parse(&raw).unwrap();
        assert!(rom.chr_is_ram);
        assert_eq!(rom.chr_banks(), 0);
        assert_eq!(rom.chr_rom.len(), CHR_ROM_PAGE_SIZE);
        rom.write_chr(0x0123, 0x77);
        assert_eq!(rom.read_chr(0x0123), 0x77);
    }

    #[test]
    fn test_chr_rom_ignores_writes() {
        let raw = image(1, 1, 0, 0);
        let mut rom = Rom::parse(&raw).unwrap();
        rom.write_chr(0x10, 0xFF);
        assert_eq!(rom.read_chr(0x10), 0x00);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut raw = image(1, 1, 0, 0);
        raw[3] = 0x00;
        assert!(matches!(Rom::parse(&raw), Err(RomError::InvalidFormat(_))));
        assert!(matches!(Rom::parse(&[]), Err(RomError::InvalidFormat(_))));
    }

    #[test]
    fn test_rejects_zero_prg_banks() {
        let raw = image(0, 1, 0, 0);
        assert_eq!(Rom::parse(&raw).unwrap_err(), RomError::NoPrgBanks);
    }

    #[test]
    fn test_rejects_trainer() {
        let raw = image(1, 1, 0b0000_0100, 0);
        assert_eq!(Rom::parse(&raw).unwrap_err(), RomError::TrainerUnsupported);
    }

    #[test]
    fn test_rejects_pal_region() {
        let mut raw = image(1, 1, 0, 0);
        raw[10] = 0b01;
        assert_eq!(Rom::parse(&raw).unwrap_err(), RomError::UnsupportedRegion);
        raw[10] = 0b10;
        assert_eq!(Rom::parse(&raw).unwrap_err(), RomError::UnsupportedRegion);
        raw[10] = 0b11;
        assert_eq!(Rom::parse(&raw).unwrap_err(), RomError::UnsupportedRegion);
    }

    #[test]
    fn test_rejects_truncated_data() {
        let mut raw = image(2, 1, 0, 0);
        raw.truncate(raw.len() - 1);
        let expected = HEADER_SIZE + 2 * PRG_ROM_PAGE_SIZE + CHR_ROM_PAGE_SIZE;
        assert_eq!(
            Rom::parse(&raw).unwrap_err(),
            RomError::Truncated {
                expected,
                actual: expected - 1
            }
        );
    }

    #[test]
    fn test_unsupported_mapper_fails_construction() {
        let raw = image(1, 1, 0b0001_0000, 0);
        let rom = Rom::parse(&raw).unwrap();
        assert!(matches!(
            rom.into_mapper(),
            Err(RomError::UnsupportedMapper(1))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RomError::UnsupportedMapper(4).to_string(),
            "Unsupported Mapper: 4"
        );
        assert_eq!(
            RomError::Truncated {
                expected: 10,
                actual: 5
            }
            .to_string(),
            "Truncated image: expected 10 bytes, found 5"
        );
    }
}
