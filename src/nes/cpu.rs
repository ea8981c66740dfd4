use crate::nes::cpu::interrupts::InterruptLatch;
use crate::nes::tracer::traceable::Traceable;
use bitflags::bitflags;

mod instruction_handlers;
pub mod interrupts;
pub mod opcodes;
pub mod processor;


pub const CPU_STACK_RESET: u8 = 0xFD;
pub const CPU_STACK_BASE: u16 = 0x0100;

/// OAM DMA halts the CPU for 513 cycles, plus one alignment cycle on odd CPU cycles
pub const OAM_DMA_STALL_CYCLES: u32 = 513;

bitflags! {
    /* https://www.nesdev.org/wiki/Status_flags
            7  bit  0
        ---- ----
        NV1B DIZC
        |||| ||||
        |||| |||+- Carry
        |||| ||+-- Zero
        |||| |+--- Interrupt Disable
        |||| +---- Decimal
        |||+------ (No CPU effect; see: the B flag)
        ||+------- (No CPU effect; always pushed as 1)
        |+-------- Overflow
        +--------- Negative
     */
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const CARRY             = 1<<0;
        const ZERO              = 1<<1;
        const INTERRUPT_DISABLE = 1<<2;
        const DECIMAL_MODE      = 1<<3;
        const BREAK             = 1<<4;
        const UNUSED            = 1<<5;
        const OVERFLOW          = 1<<6;
        const NEGATIVE          = 1<<7;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect, // Only JMP supports this mode
    IndirectX,
    IndirectY,
    Relative, // The branch instructions exclusively use this mode
    Accumulator,
    Implied,
}

/// How an instruction touches its operand.
///
/// Stores and read-modify-write instructions always pay the indexed
/// page-cross cycle; reads only pay it when the index crosses a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    Read,
    Write,
    ReadModifyWrite,
    None,
}

pub trait CpuBusInterface {
    fn cpu_bus_read(&mut self, addr: u16) -> u8;
    fn cpu_bus_write(&mut self, addr: u16, value: u8);
}

pub struct CPU<B: CpuBusInterface> {
    pub bus: B,

    pub register_a: u8,
    pub register_x: u8,
    pub register_y: u8,
    pub stack_pointer: u8,
    pub status: Flags,
    pub program_counter: u16,

    /// Cycles still owed by the instruction, interrupt or DMA in flight
    pub skip_cycles: u32,
    /// Free-running tick counter, used for DMA alignment
    pub cycles: u64,

    extra_cycles: u8,
    interrupts: InterruptLatch,
    last_opcode_desc: String,
}

impl<B: CpuBusInterface> Traceable for CPU<B> {
    fn trace_name(&self) -> &'static str {
        "CPU"
    }

    fn trace_state(&self) -> Option<String> {
        if self.skip_cycles == 0 {
            Some(format!(
                "PC={:04X} A={:02X} X={:02X} Y={:02X} P={:02X} SP={:02X} CYC={} [{}]",
                self.program_counter,
                self.register_a,
                self.register_x,
                self.register_y,
                self.status.bits(),
                self.stack_pointer,
                self.cycles,
                self.last_opcode_desc
            ))
        } else {
            None
        }
    }
}
