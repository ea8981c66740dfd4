//! Helpers for tests and downstream test harnesses (`testing-utils` feature)

use crate::nes::cartridge::rom::{CHR_ROM_PAGE_SIZE, HEADER_SIZE, PRG_ROM_PAGE_SIZE};

pub use crate::nes::bus::simple_bus::{PROGRAM_START, SimpleBus};

/// Routes `log` output through the test harness; safe to call repeatedly
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assembles an iNES image from raw PRG/CHR data.
///
/// Bank counts are derived from the data lengths, which must be whole banks.
pub fn ines_image(prg_rom: &[u8], chr_rom: &[u8], flags6: u8, flags7: u8) -> Vec<u8> {
    let mut raw = Vec::with_capacity(HEADER_SIZE + prg_rom.len() + chr_rom.len());
    raw.extend_from_slice(b"NES\x1A");
    raw.push((prg_rom.len() / PRG_ROM_PAGE_SIZE) as u8);
    raw.push((chr_rom.len() / CHR_ROM_PAGE_SIZE) as u8);
    raw.push(flags6);
    raw.push(flags7);
    raw.resize(HEADER_SIZE, 0);
    raw.extend_from_slice(prg_rom);
    raw.extend_from_slice(chr_rom);
    raw
}

/// One 16 KiB PRG bank with `program` at $8000 and every vector pointing
/// at the given handlers. The bank mirrors into $C000-$FFFF.
pub fn nrom_program(program: &[u8], nmi: u16, reset: u16, irq: u16) -> Vec<u8> {
    let mut prg = vec![0xEA; PRG_ROM_PAGE_SIZE];
    prg[..program.len()].copy_from_slice(program);
    let vectors = [nmi, reset, irq];
    for (i, vector) in vectors.iter().enumerate() {
        let offset = PRG_ROM_PAGE_SIZE - 6 + i * 2;
        prg[offset] = *vector as u8;
        prg[offset + 1] = (*vector >> 8) as u8;
    }
    prg
}

/// NROM image (one PRG bank, one CHR bank, horizontal mirroring) that
/// starts executing `program` at $8000
pub fn nrom_image(program: &[u8]) -> Vec<u8> {
    let prg = nrom_program(program, 0x8000, 0x8000, 0x8000);
    ines_image(&prg, &vec![0; CHR_ROM_PAGE_SIZE], 0, 0)
}
