use crate::nes::bus::system_bus::{IoPort, SystemBus};
use crate::nes::cartridge::SharedMapper;
use crate::nes::cartridge::rom::{Rom, RomError};
use crate::nes::cpu::CPU;
use crate::nes::ppu::{OAM_SIZE, PixelEngine, Ppu};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod ppu;
#[cfg(any(test, feature = "testing-utils"))]
pub mod test_utils;
pub mod tracer;

#[cfg(test)]
mod nes_tests;

/// PPU dots per CPU cycle (NTSC)
const PPU_DOTS_PER_CPU_CYCLE: usize = 3;

/// A console: CPU on the system bus, a pixel engine behind the PPU ports,
/// and the cartridge mapper shared between both.
pub struct NES<P: PixelEngine> {
    pub cpu: CPU<SystemBus>,
    pub ppu: Rc<RefCell<P>>,
    dma_page: Rc<Cell<Option<u8>>>,
}

impl NES<Ppu> {
    /// Decodes an iNES image and powers on a console around it
    pub fn from_rom_bytes(raw: &[u8]) -> Result<NES<Ppu>, RomError> {
        let rom = Rom::parse(raw)?;
        let mapper = rom.into_shared_mapper()?;
        let ppu = Ppu::new(mapper.clone());
        let nes = NES::new(mapper, ppu);
        log::info!("Console powered on, PC=${:04X}", nes.cpu.program_counter);
        Ok(nes)
    }
}

impl<P: PixelEngine + 'static> NES<P> {
    pub fn new(mapper: SharedMapper, ppu: P) -> NES<P> {
        let ppu = Rc::new(RefCell::new(ppu));
        let dma_page = Rc::new(Cell::new(None));
        let mut bus = SystemBus::new(mapper.clone());

        bus.set_read_callback(IoPort::PpuStatus, bind_read(&ppu, P::read_status));
        bus.set_read_callback(IoPort::OamData, bind_read(&ppu, P::read_oam_data));
        bus.set_read_callback(IoPort::PpuData, bind_read(&ppu, P::read_data));

        bus.set_write_callback(IoPort::PpuCtrl, bind_write(&ppu, P::write_control));
        bus.set_write_callback(IoPort::PpuMask, bind_write(&ppu, P::write_mask));
        bus.set_write_callback(IoPort::OamAddr, bind_write(&ppu, P::write_oam_address));
        bus.set_write_callback(IoPort::OamData, bind_write(&ppu, P::write_oam_data));
        bus.set_write_callback(IoPort::PpuScroll, bind_write(&ppu, P::write_scroll));
        bus.set_write_callback(IoPort::PpuAddr, bind_write(&ppu, P::write_address));
        bus.set_write_callback(IoPort::PpuData, bind_write(&ppu, P::write_data));

        // the copy itself runs after the instruction that wrote $4014
        let pending = dma_page.clone();
        bus.set_write_callback(IoPort::OamDma, move |page| pending.set(Some(page)));

        let mut cpu = CPU::new(bus);
        let latch = cpu.interrupt_latch();
        {
            let mut engine = ppu.borrow_mut();
            let nmi = latch.clone();
            engine.set_vblank_callback(Box::new(move || nmi.raise_nmi()));
            let irq = latch;
            engine.set_scanline_callback(Box::new(move || {
                mapper.borrow_mut().scanline_irq(&irq);
            }));
        }
        cpu.reset(None);

        NES { cpu, ppu, dma_page }
    }

    pub fn reset(&mut self) {
        self.dma_page.set(None);
        self.cpu.reset(None);
    }

    /// One CPU cycle: the CPU tick, any OAM DMA it requested, then three PPU dots
    pub fn step(&mut self) {
        self.cpu.step();
        if let Some(page) = self.dma_page.take() {
            self.run_oam_dma(page);
        }

        let mut ppu = self.ppu.borrow_mut();
        for _ in 0..PPU_DOTS_PER_CPU_CYCLE {
            ppu.step();
        }
    }

    /// Steps until the CPU reaches the next instruction boundary and
    /// returns the CPU cycles consumed
    pub fn step_instruction(&mut self) -> u64 {
        let start = self.cpu.cycles;
        self.step();
        while !self.cpu.is_idle() {
            self.step();
        }
        self.cpu.cycles - start
    }

    fn run_oam_dma(&mut self, page: u8) {
        log::debug!("OAM DMA from page ${:02X}", page);
        self.cpu.skip_dma_cycles();
        match self.cpu.bus.page_ptr(page) {
            Some(data) => self.ppu.borrow_mut().handle_dma(data),
            None => {
                // pages outside RAM go through the bus byte by byte
                let base = (page as u16) << 8;
                let mut data = [0u8; OAM_SIZE];
                for (offset, byte) in data.iter_mut().enumerate() {
                    *byte = self.cpu.bus.read(base | offset as u16);
                }
                self.ppu.borrow_mut().handle_dma(&data);
            }
        }
    }
}

fn bind_read<P: PixelEngine + 'static>(
    ppu: &Rc<RefCell<P>>,
    read: fn(&mut P) -> u8,
) -> impl FnMut() -> u8 + 'static {
    let ppu = ppu.clone();
    move || read(&mut *ppu.borrow_mut())
}

fn bind_write<P: PixelEngine + 'static>(
    ppu: &Rc<RefCell<P>>,
    write: fn(&mut P, u8),
) -> impl FnMut(u8) + 'static {
    let ppu = ppu.clone();
    move |data| write(&mut *ppu.borrow_mut(), data)
}
