//! ALU condition-flag latch and comparison predicates
//!
//! The ALU itself is combinational: shift, logic, and carry-added-sum
//! outputs are bus sources (see [`crate::bus`]) and hold no state. The one
//! latched piece is the flags register, loaded from the bus by the
//! set-ALU-flags opcode and consumed by the six conditional-jump opcodes.
//!
//! Flag encoding (part of the contract with assembled programs): the latch
//! is read as a two's-complement subtraction result. A program compares X
//! against Y by computing X - Y through the adder (B = !Y, carry-in = 1)
//! and latching the sum. Then:
//!
//! - `equal` holds iff the latch is zero
//! - `less_than` holds iff bit 31 (the sign bit) is set
//! - `greater_than` holds iff neither of the above
//!
//! The remaining predicates are the evident unions and negations.

/// The latched ALU flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AluFlags(pub u32);

impl AluFlags {
    /// Load the latch from a bus value.
    pub fn new(value: u32) -> Self {
        AluFlags(value)
    }

    /// The raw latched word.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Compared operands were equal.
    pub fn equal(self) -> bool {
        self.0 == 0
    }

    /// Compared operands were unequal.
    pub fn not_equal(self) -> bool {
        self.0 != 0
    }

    /// Left operand was less than the right.
    pub fn less_than(self) -> bool {
        (self.0 as i32) < 0
    }

    /// Left operand was less than or equal to the right.
    pub fn less_or_equal(self) -> bool {
        self.less_than() || self.equal()
    }

    /// Left operand was greater than the right.
    pub fn greater_than(self) -> bool {
        !self.less_than() && !self.equal()
    }

    /// Left operand was greater than or equal to the right.
    pub fn greater_or_equal(self) -> bool {
        !self.less_than()
    }
}
