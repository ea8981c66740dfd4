// See: https://www.nesdev.org/wiki/CPU_interrupts

use std::cell::Cell;
use std::rc::Rc;

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InterruptType {
    Nmi, // Non-maskable interrupt (triggered from PPU at VBLANK)
    Irq,
    Brk, // Software-defined interrupt
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Interrupt {
    pub interrupt_type: InterruptType,
    pub vector_addr: u16,
    pub cpu_cycles: u8,
}

pub const NMI: Interrupt = Interrupt {
    interrupt_type: InterruptType::Nmi,
    vector_addr: NMI_VECTOR,
    cpu_cycles: 7,
};

pub const BRK: Interrupt = Interrupt {
    interrupt_type: InterruptType::Brk,
    vector_addr: IRQ_VECTOR,
    cpu_cycles: 7,
};

pub const IRQ: Interrupt = Interrupt {
    interrupt_type: InterruptType::Irq,
    vector_addr: IRQ_VECTOR,
    cpu_cycles: 7,
};

/// Which input line a collaborator drives
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InterruptLine {
    /// Edge: latched until the CPU services it
    Nmi,
    /// Level: follows the source until it releases the line
    Irq { asserted: bool },
}

/// Pending interrupt state shared between the CPU and the components
/// that raise interrupts (PPU vblank, mapper scanline counters).
///
/// Cloning yields another handle onto the same latch.
#[derive(Debug, Default, Clone)]
pub struct InterruptLatch {
    nmi: Rc<Cell<bool>>,
    irq: Rc<Cell<bool>>,
}

impl InterruptLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self, line: InterruptLine) {
        match line {
            InterruptLine::Nmi => self.nmi.set(true),
            InterruptLine::Irq { asserted } => self.irq.set(asserted),
        }
    }

    pub fn raise_nmi(&self) {
        self.signal(InterruptLine::Nmi);
    }

    pub fn set_irq(&self, asserted: bool) {
        self.signal(InterruptLine::Irq { asserted });
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi.get()
    }

    pub fn irq_pending(&self) -> bool {
        self.irq.get()
    }

    /// Only the CPU acknowledges NMI; IRQ is cleared by its source
    pub(crate) fn acknowledge_nmi(&self) {
        self.nmi.set(false);
    }
}
