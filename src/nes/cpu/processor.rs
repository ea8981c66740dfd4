use super::interrupts::{self, Interrupt, InterruptLatch, InterruptLine};
use super::opcodes::{self, Opcode};
use super::{
    AccessType, AddressingMode, CPU, CPU_STACK_BASE, CPU_STACK_RESET, CpuBusInterface, Flags,
    OAM_DMA_STALL_CYCLES,
};
use crate::{trace_cpu_event, trace_obj};

impl<B: CpuBusInterface> CPU<B> {
    pub fn new(bus: B) -> CPU<B> {
        CPU {
            bus,
            register_a: 0,
            register_x: 0,
            register_y: 0,
            stack_pointer: CPU_STACK_RESET,
            status: Flags::INTERRUPT_DISABLE | Flags::UNUSED,
            program_counter: 0,
            skip_cycles: 0,
            cycles: 0,
            extra_cycles: 0,
            interrupts: InterruptLatch::new(),
            last_opcode_desc: String::new(),
        }
    }

    /// Restores the power-on register pattern.
    ///
    /// `None` loads PC from the reset vector at $FFFC/$FFFD.
    pub fn reset(&mut self, vector_override: Option<u16>) {
        self.register_a = 0;
        self.register_x = 0;
        self.register_y = 0;
        self.stack_pointer = CPU_STACK_RESET;
        self.status = Flags::INTERRUPT_DISABLE | Flags::UNUSED;
        self.skip_cycles = 0;
        self.extra_cycles = 0;
        // IRQ belongs to its source and survives reset
        self.interrupts.acknowledge_nmi();
        self.program_counter = match vector_override {
            Some(addr) => addr,
            None => self.bus_read_u16(interrupts::RESET_VECTOR),
        };
        log::debug!("CPU reset, PC=${:04X}", self.program_counter);
    }

    /// Handle for components that raise interrupts on this CPU
    pub fn interrupt_latch(&self) -> InterruptLatch {
        self.interrupts.clone()
    }

    pub fn interrupt(&mut self, line: InterruptLine) {
        self.interrupts.signal(line);
    }

    /// Stalls the CPU for an OAM DMA transfer
    pub fn skip_dma_cycles(&mut self) {
        self.skip_cycles += OAM_DMA_STALL_CYCLES;
        self.skip_cycles += (self.cycles & 1) as u32;
        trace_cpu_event!("OAM DMA stall, skip={}", self.skip_cycles);
    }

    /// True when the next `step` will start a new instruction or interrupt
    pub fn is_idle(&self) -> bool {
        self.skip_cycles <= 1
    }

    /// Advances the CPU by one cycle.
    ///
    /// Outstanding debt is burned first; otherwise NMI, then IRQ (unless
    /// masked), then the next instruction is started.
    pub fn step(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
        if self.skip_cycles > 1 {
            self.skip_cycles -= 1;
            return;
        }
        self.skip_cycles = 0;

        if self.interrupts.nmi_pending() {
            self.interrupts.acknowledge_nmi();
            self.run_interrupt(interrupts::NMI);
            return;
        }
        if self.interrupts.irq_pending() && !self.status.contains(Flags::INTERRUPT_DISABLE) {
            self.run_interrupt(interrupts::IRQ);
            return;
        }

        let code = self.consume_program_counter();
        if let Some(opcode) = opcodes::OPCODES_MAP.get(&code).copied() {
            #[cfg(feature = "tracing")]
            self.describe(opcode);
            trace_obj!(&*self);
            self.extra_cycles = 0;
            self.execute(opcode);
            self.skip_cycles += (opcode.cycles + self.extra_cycles) as u32;
        }
    }

    /// Ticks until the next instruction boundary and returns the cycles consumed
    pub fn step_instruction(&mut self) -> u64 {
        let start = self.cycles;
        self.step();
        while !self.is_idle() {
            self.step();
        }
        self.cycles - start
    }

    pub(super) fn run_interrupt(&mut self, interrupt: Interrupt) {
        trace_cpu_event!(
            "{:?} at PC=${:04X}",
            interrupt.interrupt_type,
            self.program_counter
        );
        self.stack_push_u16(self.program_counter);
        let flags = self.status | Flags::BREAK | Flags::UNUSED;
        self.stack_push(flags.bits());
        self.status.insert(Flags::INTERRUPT_DISABLE);
        self.program_counter = self.bus_read_u16(interrupt.vector_addr);
        self.skip_cycles += interrupt.cpu_cycles as u32;
    }

    pub fn bus_read(&mut self, addr: u16) -> u8 {
        self.bus.cpu_bus_read(addr)
    }

    pub fn bus_read_u16(&mut self, addr: u16) -> u16 {
        let lo = self.bus_read(addr) as u16;
        let hi = self.bus_read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn bus_write(&mut self, addr: u16, data: u8) {
        self.bus.cpu_bus_write(addr, data);
    }

    pub(super) fn consume_program_counter(&mut self) -> u8 {
        let byte = self.bus_read(self.program_counter);
        self.program_counter = self.program_counter.wrapping_add(1);
        byte
    }

    fn consume_program_counter_u16(&mut self) -> u16 {
        let lo = self.consume_program_counter() as u16;
        let hi = self.consume_program_counter() as u16;
        (hi << 8) | lo
    }

    /// Reads a pointer from the zero page, wrapping $FF into $00
    fn read_zero_page_u16(&mut self, ptr: u8) -> u16 {
        let lo = self.bus_read(ptr as u16) as u16;
        let hi = self.bus_read(ptr.wrapping_add(1) as u16) as u16;
        (hi << 8) | lo
    }

    pub(super) fn stack_push(&mut self, value: u8) {
        let address = CPU_STACK_BASE | self.stack_pointer as u16;
        self.bus_write(address, value);
        self.stack_pointer = self.stack_pointer.wrapping_sub(1);
    }

    pub(super) fn stack_push_u16(&mut self, value: u16) {
        self.stack_push((value >> 8) as u8);
        self.stack_push(value as u8);
    }

    pub(super) fn stack_pop(&mut self) -> u8 {
        self.stack_pointer = self.stack_pointer.wrapping_add(1);
        self.bus_read(CPU_STACK_BASE | self.stack_pointer as u16)
    }

    pub(super) fn stack_pop_u16(&mut self) -> u16 {
        let lo = self.stack_pop() as u16;
        let hi = self.stack_pop() as u16;
        (hi << 8) | lo
    }

    /// Consumes the operand bytes for `opcode` and returns the effective address.
    ///
    /// Accumulator and implied modes have no address. Relative mode returns the
    /// branch target. Page-cross penalties accumulate in `extra_cycles`.
    pub(super) fn resolve_operand(&mut self, opcode: &Opcode) -> Option<u16> {
        let always_penalty = matches!(
            opcode.access_type,
            AccessType::Write | AccessType::ReadModifyWrite
        );
        let address = match opcode.mode {
            AddressingMode::Accumulator | AddressingMode::Implied => return None,
            AddressingMode::Immediate => {
                let addr = self.program_counter;
                self.program_counter = self.program_counter.wrapping_add(1);
                addr
            }
            AddressingMode::ZeroPage => self.consume_program_counter() as u16,
            AddressingMode::ZeroPageX => {
                let base = self.consume_program_counter();
                base.wrapping_add(self.register_x) as u16
            }
            AddressingMode::ZeroPageY => {
                let base = self.consume_program_counter();
                base.wrapping_add(self.register_y) as u16
            }
            AddressingMode::Absolute => self.consume_program_counter_u16(),
            AddressingMode::AbsoluteX => {
                let base = self.consume_program_counter_u16();
                let addr = base.wrapping_add(self.register_x as u16);
                self.charge_page_cross(base, addr, always_penalty);
                addr
            }
            AddressingMode::AbsoluteY => {
                let base = self.consume_program_counter_u16();
                let addr = base.wrapping_add(self.register_y as u16);
                self.charge_page_cross(base, addr, always_penalty);
                addr
            }
            AddressingMode::Indirect => {
                /* NOTE:
                  An original 6502 does not correctly fetch the target address if the indirect vector falls
                  on a page boundary (e.g. $xxFF where xx is any value from $00 to $FF). In this case it fetches
                  the LSB from $xxFF as expected but takes the MSB from $xx00.
                */
                let ptr = self.consume_program_counter_u16();
                let lo = self.bus_read(ptr) as u16;
                let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let hi = self.bus_read(hi_addr) as u16;
                (hi << 8) | lo
            }
            AddressingMode::IndirectX => {
                let base = self.consume_program_counter();
                self.read_zero_page_u16(base.wrapping_add(self.register_x))
            }
            AddressingMode::IndirectY => {
                let ptr = self.consume_program_counter();
                let base = self.read_zero_page_u16(ptr);
                let addr = base.wrapping_add(self.register_y as u16);
                self.charge_page_cross(base, addr, always_penalty);
                addr
            }
            AddressingMode::Relative => {
                // Offset is relative to the PC after the operand
                let offset = self.consume_program_counter() as i8;
                self.program_counter.wrapping_add_signed(offset as i16)
            }
        };
        Some(address)
    }

    fn charge_page_cross(&mut self, base: u16, addr: u16, always: bool) {
        if always || is_boundary_crossed(base, addr) {
            self.extra_cycles += 1;
        }
    }

    pub(super) fn add_extra_cycles(&mut self, cycles: u8) {
        self.extra_cycles += cycles;
    }

    #[cfg(feature = "tracing")]
    fn describe(&mut self, opcode: &Opcode) {
        let start = self.program_counter.wrapping_sub(1);
        let operand_bytes: Vec<u8> = (1..opcode.size as u16)
            .map(|i| self.bus_read(start.wrapping_add(i)))
            .collect();
        self.last_opcode_desc = format!("${:04X} {} {:02X?}", start, opcode.name, operand_bytes);
    }
}

pub(super) fn is_boundary_crossed(addr1: u16, addr2: u16) -> bool {
    addr1 & 0xFF00 != addr2 & 0xFF00
}
