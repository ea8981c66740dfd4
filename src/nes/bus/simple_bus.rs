use crate::nes::cpu::CpuBusInterface;
use crate::nes::cpu::interrupts::RESET_VECTOR;

/// Where `SimpleBus::with_program` places code
pub const PROGRAM_START: u16 = 0x0600;

/// Flat 64 KiB read/write memory for exercising the CPU in isolation
pub struct SimpleBus {
    pub memory: Vec<u8>,
}

impl SimpleBus {
    pub fn new() -> SimpleBus {
        SimpleBus {
            memory: vec![0; 0x10000],
        }
    }

    /// Loads `program` at `PROGRAM_START` and points the reset vector at it
    pub fn with_program(program: &[u8]) -> SimpleBus {
        let mut bus = SimpleBus::new();
        bus.load(PROGRAM_START, program);
        bus.store_u16(RESET_VECTOR, PROGRAM_START);
        bus
    }

    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn store_u16(&mut self, addr: u16, value: u16) {
        self.memory[addr as usize] = value as u8;
        self.memory[addr.wrapping_add(1) as usize] = (value >> 8) as u8;
    }
}

impl Default for SimpleBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBusInterface for SimpleBus {
    fn cpu_bus_read(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }
    fn cpu_bus_write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}
