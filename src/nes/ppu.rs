use crate::nes::cartridge::SharedMapper;
use crate::nes::ppu::ppu_bus::PpuBus;
use crate::nes::ppu::registers::control_register::ControlRegister;
use crate::nes::ppu::registers::mask_register::MaskRegister;
use crate::nes::ppu::registers::status_register::StatusRegister;
use crate::nes::tracer::traceable::Traceable;
use crate::trace_ppu_event;

pub mod ppu_bus;
pub mod registers;

pub const OAM_SIZE: usize = 256;
pub const DOTS_PER_SCANLINE: u16 = 341;
pub const SCANLINES_PER_FRAME: u16 = 262;
pub const VBLANK_SCANLINE: u16 = 241;
pub const PRE_RENDER_SCANLINE: u16 = 261;
/// Dot where boards with a scanline counter see A12 rise
const SCANLINE_IRQ_DOT: u16 = 260;
const LAST_VISIBLE_SCANLINE: u16 = 239;
const PALETTE_START: u16 = 0x3F00;

pub type PpuCallback = Box<dyn FnMut()>;

/// Register-level surface the console drives.
///
/// Each method corresponds to a CPU access of one of the eight PPU ports
/// (or the OAM DMA copy). `step` advances one PPU dot.
pub trait PixelEngine {
    /// $2002 read: status, clears vblank and the write toggle
    fn read_status(&mut self) -> u8;
    /// $2004 read
    fn read_oam_data(&mut self) -> u8;
    /// $2007 read
    fn read_data(&mut self) -> u8;
    /// $2000 write
    fn write_control(&mut self, value: u8);
    /// $2001 write
    fn write_mask(&mut self, value: u8);
    /// $2003 write
    fn write_oam_address(&mut self, value: u8);
    /// $2004 write
    fn write_oam_data(&mut self, value: u8);
    /// $2005 write (two-write sequence)
    fn write_scroll(&mut self, value: u8);
    /// $2006 write (two-write sequence)
    fn write_address(&mut self, value: u8);
    /// $2007 write
    fn write_data(&mut self, value: u8);
    /// Copies a whole CPU page into OAM starting at the current OAM address
    fn handle_dma(&mut self, page: &[u8; OAM_SIZE]);
    /// Invoked when vblank starts with NMI generation enabled
    fn set_vblank_callback(&mut self, callback: PpuCallback);
    /// Invoked once per rendered scanline
    fn set_scanline_callback(&mut self, callback: PpuCallback);
    fn step(&mut self);
}

pub struct Ppu {
    bus: PpuBus,
    pub ctrl_register: ControlRegister,  // $2000 (W)
    pub mask_register: MaskRegister,     // $2001 (W)
    pub status_register: StatusRegister, // $2002 (R)
    pub oam_addr: u8,                    // $2003 (W)
    pub oam_data: [u8; OAM_SIZE],        // $2004 (R/W)

    // loopy registers shared by $2005 / $2006
    v: u16,
    t: u16,
    fine_x: u8,
    write_toggle: bool,
    data_buffer: u8,

    pub cycles: u16,
    pub scanline: u16,
    pub frame: u64,

    vblank_callback: Option<PpuCallback>,
    scanline_callback: Option<PpuCallback>,
}

impl Ppu {
    pub fn new(mapper: SharedMapper) -> Ppu {
        Ppu {
            bus: PpuBus::new(mapper),
            ctrl_register: ControlRegister::new(),
            mask_register: MaskRegister::new(),
            status_register: StatusRegister::new(),
            oam_addr: 0,
            oam_data: [0; OAM_SIZE],
            v: 0,
            t: 0,
            fine_x: 0,
            write_toggle: false,
            data_buffer: 0,
            cycles: 0,
            scanline: PRE_RENDER_SCANLINE,
            frame: 0,
            vblank_callback: None,
            scanline_callback: None,
        }
    }

    /// Current VRAM address (loopy `v`)
    pub fn vram_addr(&self) -> u16 {
        self.v
    }

    /// Latched VRAM address (loopy `t`)
    pub fn temp_addr(&self) -> u16 {
        self.t
    }

    pub fn fine_x(&self) -> u8 {
        self.fine_x
    }

    pub fn bus(&mut self) -> &mut PpuBus {
        &mut self.bus
    }

    fn increment_vram_addr(&mut self) {
        self.v = self.v.wrapping_add(self.ctrl_register.addr_increment()) & 0x7FFF;
    }

    fn fire_vblank(&mut self) {
        if let Some(callback) = self.vblank_callback.as_mut() {
            trace_ppu_event!("NMI at scanline={} dot={}", self.scanline, self.cycles);
            callback();
        }
    }

    fn fire_scanline(&mut self) {
        if let Some(callback) = self.scanline_callback.as_mut() {
            callback();
        }
    }
}

impl PixelEngine for Ppu {
    fn read_status(&mut self) -> u8 {
        let status = self.status_register.value();
        self.status_register.reset_vblank_status();
        self.write_toggle = false;
        status
    }

    fn read_oam_data(&mut self) -> u8 {
        self.oam_data[self.oam_addr as usize]
    }

    fn read_data(&mut self) -> u8 {
        let addr = self.v & 0x3FFF;
        let result = if addr < PALETTE_START {
            let buffered = self.data_buffer;
            self.data_buffer = self.bus.read(addr);
            buffered
        } else {
            // palette reads are immediate; the buffer picks up the nametable underneath
            self.data_buffer = self.bus.read(addr - 0x1000);
            self.bus.read(addr)
        };
        self.increment_vram_addr();
        result
    }

    fn write_control(&mut self, value: u8) {
        let nmi_was_enabled = self.ctrl_register.generate_vblank_nmi();
        self.ctrl_register.update(value);
        self.t = (self.t & !0x0C00) | self.ctrl_register.nametable_bits();

        // enabling NMI during vblank fires immediately
        if !nmi_was_enabled
            && self.ctrl_register.generate_vblank_nmi()
            && self.status_register.in_vblank()
        {
            self.fire_vblank();
        }
    }

    fn write_mask(&mut self, value: u8) {
        self.mask_register.update(value);
    }

    fn write_oam_address(&mut self, value: u8) {
        self.oam_addr = value;
    }

    fn write_oam_data(&mut self, value: u8) {
        self.oam_data[self.oam_addr as usize] = value;
        self.oam_addr = self.oam_addr.wrapping_add(1);
    }

    fn write_scroll(&mut self, value: u8) {
        if !self.write_toggle {
            self.t = (self.t & !0x001F) | (value >> 3) as u16;
            self.fine_x = value & 0x07;
        } else {
            self.t = (self.t & !0x73E0) | (((value & 0x07) as u16) << 12) | (((value & 0xF8) as u16) << 2);
        }
        self.write_toggle = !self.write_toggle;
    }

    fn write_address(&mut self, value: u8) {
        if !self.write_toggle {
            self.t = (self.t & 0x00FF) | (((value & 0x3F) as u16) << 8);
        } else {
            self.t = (self.t & 0xFF00) | value as u16;
            self.v = self.t;
        }
        self.write_toggle = !self.write_toggle;
    }

    fn write_data(&mut self, value: u8) {
        self.bus.write(self.v & 0x3FFF, value);
        self.increment_vram_addr();
    }

    fn handle_dma(&mut self, page: &[u8; OAM_SIZE]) {
        let start = self.oam_addr as usize;
        for (i, byte) in page.iter().enumerate() {
            self.oam_data[(start + i) % OAM_SIZE] = *byte;
        }
    }

    fn set_vblank_callback(&mut self, callback: PpuCallback) {
        self.vblank_callback = Some(callback);
    }

    fn set_scanline_callback(&mut self, callback: PpuCallback) {
        self.scanline_callback = Some(callback);
    }

    fn step(&mut self) {
        self.cycles += 1;
        if self.cycles == DOTS_PER_SCANLINE {
            self.cycles = 0;
            self.scanline += 1;
            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
            }
        }

        match (self.scanline, self.cycles) {
            (VBLANK_SCANLINE, 1) => {
                self.status_register.set_vblank_status();
                if self.ctrl_register.generate_vblank_nmi() {
                    self.fire_vblank();
                }
            }
            (PRE_RENDER_SCANLINE, 1) => {
                self.status_register.reset_vblank_status();
                self.status_register.set_sprite_zero_hit(false);
                self.status_register.set_sprite_overflow(false);
            }
            (0..=LAST_VISIBLE_SCANLINE | PRE_RENDER_SCANLINE, SCANLINE_IRQ_DOT)
                if self.mask_register.rendering_enabled() =>
            {
                self.fire_scanline();
            }
            _ => {}
        }
    }
}

impl Traceable for Ppu {
    fn trace_name(&self) -> &'static str {
        "PPU"
    }

    fn trace_state(&self) -> Option<String> {
        Some(format!(
            "SL={} DOT={} V={:04X} T={:04X} CTRL={:02X} STATUS={:02X}",
            self.scanline,
            self.cycles,
            self.v,
            self.t,
            self.ctrl_register.bits(),
            self.status_register.bits()
        ))
    }
}
