use super::interrupts;
use super::opcodes::{Mnemonic, Opcode};
use super::processor::is_boundary_crossed;
use super::{CPU, CpuBusInterface, Flags};

impl<B: CpuBusInterface> CPU<B> {
    pub(super) fn execute(&mut self, opcode: &Opcode) {
        match opcode.mnemonic {
            Mnemonic::Brk => self.brk(),
            Mnemonic::Nop => {}

            Mnemonic::Jmp => self.jmp(opcode),
            Mnemonic::Jsr => self.jsr(opcode),
            Mnemonic::Rts => self.rts(),
            Mnemonic::Rti => self.rti(),

            Mnemonic::Tax => self.set_register_x(self.register_a),
            Mnemonic::Tay => self.set_register_y(self.register_a),
            Mnemonic::Tsx => self.set_register_x(self.stack_pointer),
            Mnemonic::Txa => self.set_register_a(self.register_x),
            Mnemonic::Txs => self.stack_pointer = self.register_x, // No flags
            Mnemonic::Tya => self.set_register_a(self.register_y),

            Mnemonic::Cld => self.status.remove(Flags::DECIMAL_MODE),
            Mnemonic::Cli => self.status.remove(Flags::INTERRUPT_DISABLE),
            Mnemonic::Clv => self.status.remove(Flags::OVERFLOW),
            Mnemonic::Clc => self.status.remove(Flags::CARRY),
            Mnemonic::Sec => self.status.insert(Flags::CARRY),
            Mnemonic::Sei => self.status.insert(Flags::INTERRUPT_DISABLE),
            Mnemonic::Sed => self.status.insert(Flags::DECIMAL_MODE),

            Mnemonic::Bne => self.branch(opcode, !self.status.contains(Flags::ZERO)),
            Mnemonic::Beq => self.branch(opcode, self.status.contains(Flags::ZERO)),
            Mnemonic::Bvc => self.branch(opcode, !self.status.contains(Flags::OVERFLOW)),
            Mnemonic::Bvs => self.branch(opcode, self.status.contains(Flags::OVERFLOW)),
            Mnemonic::Bpl => self.branch(opcode, !self.status.contains(Flags::NEGATIVE)),
            Mnemonic::Bmi => self.branch(opcode, self.status.contains(Flags::NEGATIVE)),
            Mnemonic::Bcc => self.branch(opcode, !self.status.contains(Flags::CARRY)),
            Mnemonic::Bcs => self.branch(opcode, self.status.contains(Flags::CARRY)),

            Mnemonic::Inx => self.set_register_x(self.register_x.wrapping_add(1)),
            Mnemonic::Iny => self.set_register_y(self.register_y.wrapping_add(1)),
            Mnemonic::Dex => self.set_register_x(self.register_x.wrapping_sub(1)),
            Mnemonic::Dey => self.set_register_y(self.register_y.wrapping_sub(1)),

            Mnemonic::Pha => self.stack_push(self.register_a),
            Mnemonic::Pla => {
                let value = self.stack_pop();
                self.set_register_a(value);
            }
            Mnemonic::Php => self.php(),
            Mnemonic::Plp => self.plp(),

            Mnemonic::Lda => {
                let value = self.read_operand(opcode);
                self.set_register_a(value);
            }
            Mnemonic::Ldx => {
                let value = self.read_operand(opcode);
                self.set_register_x(value);
            }
            Mnemonic::Ldy => {
                let value = self.read_operand(opcode);
                self.set_register_y(value);
            }
            Mnemonic::Sta => self.store(opcode, self.register_a),
            Mnemonic::Stx => self.store(opcode, self.register_x),
            Mnemonic::Sty => self.store(opcode, self.register_y),

            Mnemonic::Asl => self.shift(opcode, |value, _| (value << 1, value & 0x80 != 0)),
            Mnemonic::Lsr => self.shift(opcode, |value, _| (value >> 1, value & 0x01 != 0)),
            Mnemonic::Rol => self.shift(opcode, rotate_value_left),
            Mnemonic::Ror => self.shift(opcode, rotate_value_right),

            Mnemonic::Inc => self.modify(opcode, |value| value.wrapping_add(1)),
            Mnemonic::Dec => self.modify(opcode, |value| value.wrapping_sub(1)),

            Mnemonic::Cmp => self.compare(opcode, self.register_a),
            Mnemonic::Cpx => self.compare(opcode, self.register_x),
            Mnemonic::Cpy => self.compare(opcode, self.register_y),

            Mnemonic::Adc => {
                let value = self.read_operand(opcode);
                self.add_to_register_a(value);
            }
            Mnemonic::Sbc => {
                let value = self.read_operand(opcode);
                self.sub_from_register_a(value);
            }

            Mnemonic::And => {
                let value = self.read_operand(opcode);
                self.set_register_a(self.register_a & value);
            }
            Mnemonic::Eor => {
                let value = self.read_operand(opcode);
                self.set_register_a(self.register_a ^ value);
            }
            Mnemonic::Ora => {
                let value = self.read_operand(opcode);
                self.set_register_a(self.register_a | value);
            }
            Mnemonic::Bit => self.bit(opcode),
        }
    }

    // Utility functions
    /////////////////////
    fn operand_address(&mut self, opcode: &Opcode) -> u16 {
        // Every memory-operand mode resolves to an address
        self.resolve_operand(opcode)
            .unwrap_or(self.program_counter)
    }

    fn read_operand(&mut self, opcode: &Opcode) -> u8 {
        let address = self.operand_address(opcode);
        self.bus_read(address)
    }

    fn store(&mut self, opcode: &Opcode, value: u8) {
        let address = self.operand_address(opcode);
        self.bus_write(address, value);
    }

    fn set_register_a(&mut self, value: u8) {
        self.register_a = value;
        self.update_zero_and_negative_flags(value);
    }

    fn set_register_x(&mut self, value: u8) {
        self.register_x = value;
        self.update_zero_and_negative_flags(value);
    }

    fn set_register_y(&mut self, value: u8) {
        self.register_y = value;
        self.update_zero_and_negative_flags(value);
    }

    fn update_zero_and_negative_flags(&mut self, result: u8) {
        self.status.set(Flags::ZERO, result == 0);
        self.status.set(Flags::NEGATIVE, result & 0b1000_0000 != 0);
    }

    fn add_to_register_a(&mut self, value: u8) {
        let curr_carry = self.status.contains(Flags::CARRY) as u16;
        let sum = self.register_a as u16 + value as u16 + curr_carry;
        let result = sum as u8;

        // OVERFLOW if the inputs share a sign and the result's sign differs:
        //   Positive + Positive = Negative OR
        //   Negative + Negative = Positive
        // See: https://forums.nesdev.org/viewtopic.php?t=6331
        let signed_overflow =
            ((self.register_a ^ result) & 0x80 != 0) && ((self.register_a ^ value) & 0x80 == 0);

        self.status.set(Flags::OVERFLOW, signed_overflow);
        self.status.set(Flags::CARRY, sum > 0xFF);
        self.set_register_a(result);
    }

    /// A - M - (1 - C) is A + !M + C
    fn sub_from_register_a(&mut self, value: u8) {
        self.add_to_register_a(!value);
    }

    fn compare(&mut self, opcode: &Opcode, compare_value: u8) {
        let value = self.read_operand(opcode);
        self.status.set(Flags::CARRY, compare_value >= value);
        self.update_zero_and_negative_flags(compare_value.wrapping_sub(value));
    }

    fn branch(&mut self, opcode: &Opcode, condition: bool) {
        // The offset byte is consumed whether or not the branch is taken
        let Some(target) = self.resolve_operand(opcode) else {
            return;
        };
        if condition {
            let penalty = 1 + is_boundary_crossed(self.program_counter, target) as u8;
            self.add_extra_cycles(penalty);
            self.program_counter = target;
        }
    }

    fn shift(&mut self, opcode: &Opcode, op: fn(u8, bool) -> (u8, bool)) {
        let curr_carry = self.status.contains(Flags::CARRY);
        match self.resolve_operand(opcode) {
            None => {
                let (result, new_carry) = op(self.register_a, curr_carry);
                self.set_register_a(result);
                self.status.set(Flags::CARRY, new_carry);
            }
            Some(address) => {
                let value = self.bus_read(address);
                let (result, new_carry) = op(value, curr_carry);
                self.bus_write(address, result);
                self.update_zero_and_negative_flags(result);
                self.status.set(Flags::CARRY, new_carry);
            }
        }
    }

    fn modify(&mut self, opcode: &Opcode, op: fn(u8) -> u8) {
        let address = self.operand_address(opcode);
        let result = op(self.bus_read(address));
        self.bus_write(address, result);
        self.update_zero_and_negative_flags(result);
    }

    // Opcodes
    /////////////
    fn brk(&mut self) {
        // Skip the padding byte; RTI returns past it
        self.program_counter = self.program_counter.wrapping_add(1);
        self.stack_push_u16(self.program_counter);
        self.php();
        self.status.insert(Flags::INTERRUPT_DISABLE);
        self.program_counter = self.bus_read_u16(interrupts::BRK.vector_addr);
    }

    fn php(&mut self) {
        // https://www.nesdev.org/wiki/Status_flags
        // B and bit 5 are pushed as 1 but don't exist in the register
        let status_copy = self.status | Flags::BREAK | Flags::UNUSED;
        self.stack_push(status_copy.bits());
    }

    fn plp(&mut self) {
        self.status = Flags::from_bits_truncate(self.stack_pop());
        self.status.remove(Flags::BREAK);
        self.status.insert(Flags::UNUSED);
    }

    fn jmp(&mut self, opcode: &Opcode) {
        self.program_counter = self.operand_address(opcode);
    }

    fn jsr(&mut self, opcode: &Opcode) {
        // Pushes the address of the last operand byte
        let jump_address = self.operand_address(opcode);
        let return_address = self.program_counter.wrapping_sub(1);
        self.stack_push_u16(return_address);
        self.program_counter = jump_address;
    }

    fn rts(&mut self) {
        let return_address_minus_one = self.stack_pop_u16();
        self.program_counter = return_address_minus_one.wrapping_add(1);
    }

    fn rti(&mut self) {
        // Unlike RTS, the return address on the stack is the actual address
        self.plp();
        self.program_counter = self.stack_pop_u16();
    }

    fn bit(&mut self, opcode: &Opcode) {
        let value = self.read_operand(opcode);
        self.status.set(Flags::ZERO, value & self.register_a == 0);
        self.status.set(Flags::NEGATIVE, value & 0b1000_0000 != 0);
        self.status.set(Flags::OVERFLOW, value & 0b0100_0000 != 0);
    }
}

pub(super) fn rotate_value_left(value: u8, current_carry: bool) -> (u8, bool) {
    let new_carry = value & 0b1000_0000 != 0;
    let shifted = (value << 1) | current_carry as u8;
    (shifted, new_carry)
}

pub(super) fn rotate_value_right(value: u8, current_carry: bool) -> (u8, bool) {
    let new_carry = value & 0b0000_0001 != 0;
    let shifted = (value >> 1) | ((current_carry as u8) << 7);
    (shifted, new_carry)
}
