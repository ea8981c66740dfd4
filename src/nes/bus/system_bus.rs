use super::consts::*;
use crate::nes::cartridge::SharedMapper;
use crate::nes::cpu::CpuBusInterface;
use std::collections::HashMap;

pub type ReadCallback = Box<dyn FnMut() -> u8>;
pub type WriteCallback = Box<dyn FnMut(u8)>;

/// Memory-mapped registers that collaborators can attach handlers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IoPort {
    PpuCtrl = 0x2000,
    PpuMask = 0x2001,
    PpuStatus = 0x2002,
    OamAddr = 0x2003,
    OamData = 0x2004,
    PpuScroll = 0x2005,
    PpuAddr = 0x2006,
    PpuData = 0x2007,
    OamDma = 0x4014,
    ApuStatus = 0x4015,
    Joypad1 = 0x4016,
    /// Reads poll the second controller; writes land on the APU frame counter
    Joypad2 = 0x4017,
}

impl IoPort {
    pub const fn addr(self) -> u16 {
        self as u16
    }
}

/// CPU-visible address space.
///
/// `$0000-$1FFF` 2 KiB RAM mirrored every $800
/// `$2000-$3FFF` 8 PPU ports mirrored every 8 bytes
/// `$4000-$401F` APU / DMA / joypad ports
/// `$4020-$FFFF` cartridge
pub struct SystemBus {
    pub cpu_ram: [u8; CPU_RAM_SIZE],
    mapper: SharedMapper,
    read_callbacks: HashMap<u16, ReadCallback>,
    write_callbacks: HashMap<u16, WriteCallback>,
}

impl SystemBus {
    pub fn new(mapper: SharedMapper) -> SystemBus {
        SystemBus {
            cpu_ram: [0; CPU_RAM_SIZE],
            mapper,
            read_callbacks: HashMap::new(),
            write_callbacks: HashMap::new(),
        }
    }

    pub fn mapper(&self) -> SharedMapper {
        self.mapper.clone()
    }

    pub fn set_read_callback(&mut self, port: IoPort, callback: impl FnMut() -> u8 + 'static) {
        self.read_callbacks.insert(port.addr(), Box::new(callback));
    }

    pub fn set_write_callback(&mut self, port: IoPort, callback: impl FnMut(u8) + 'static) {
        self.write_callbacks.insert(port.addr(), Box::new(callback));
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            CPU_RAM_START..=CPU_RAM_END => self.cpu_ram[(addr & CPU_RAM_MASK) as usize],
            PPU_REGISTERS_START..=PPU_REGISTERS_END => {
                self.read_port(PPU_REGISTERS_START | (addr & PPU_REGISTERS_MASK))
            }
            IO_REGISTERS_START..=IO_REGISTERS_END => self.read_port(addr),
            CART_START..=CART_END => self.mapper.borrow_mut().read_prg(addr),
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            CPU_RAM_START..=CPU_RAM_END => self.cpu_ram[(addr & CPU_RAM_MASK) as usize] = data,
            PPU_REGISTERS_START..=PPU_REGISTERS_END => {
                self.write_port(PPU_REGISTERS_START | (addr & PPU_REGISTERS_MASK), data)
            }
            IO_REGISTERS_START..=IO_REGISTERS_END => self.write_port(addr, data),
            CART_START..=CART_END => self.mapper.borrow_mut().write_prg(addr, data),
        }
    }

    /// Direct view of a 256-byte RAM page, used by the OAM DMA fast path.
    ///
    /// Pages $00-$1F resolve through the RAM mirrors; anything else is `None`.
    pub fn page_ptr(&self, page: u8) -> Option<&[u8; PAGE_SIZE]> {
        let addr = (page as u16) << 8;
        if addr > CPU_RAM_END {
            return None;
        }
        let start = (addr & CPU_RAM_MASK) as usize;
        <&[u8; PAGE_SIZE]>::try_from(&self.cpu_ram[start..start + PAGE_SIZE]).ok()
    }

    fn read_port(&mut self, port: u16) -> u8 {
        match self.read_callbacks.get_mut(&port) {
            Some(callback) => callback(),
            None => 0,
        }
    }

    fn write_port(&mut self, port: u16, data: u8) {
        if let Some(callback) = self.write_callbacks.get_mut(&port) {
            callback(data);
        }
    }
}

impl CpuBusInterface for SystemBus {
    fn cpu_bus_read(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn cpu_bus_write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}
