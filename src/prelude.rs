//! Convenient imports for consumers of nes-core
//!
//! Pull in everything commonly needed in one line:
//! ```rust
//! use nes_core::prelude::*;
//! ```

// Main NES emulator API
pub use crate::nes::NES;
pub use crate::nes::bus::system_bus::{IoPort, SystemBus};
pub use crate::nes::cartridge::rom::{Mirroring, Rom, RomError};
pub use crate::nes::cpu::CPU;
pub use crate::nes::cpu::interrupts::{InterruptLatch, InterruptLine};
pub use crate::nes::ppu::Ppu;

// Traits that users might need
pub use crate::nes::cartridge::{Mapper, SharedMapper};
pub use crate::nes::cpu::CpuBusInterface;
pub use crate::nes::ppu::PixelEngine;

// Macros
pub use crate::trace_dump;

// Conditional testing utilities
#[cfg(feature = "testing-utils")]
pub use crate::nes::test_utils::*;
