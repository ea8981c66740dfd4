// NES core modules
pub mod nes;
pub mod prelude;

// Re-exports
pub use nes::NES;

pub use nes::cartridge::Mapper;
pub use nes::cartridge::rom::{Rom, RomError};
