// Interrupt plumbing
//
// The video core raises three interrupt sources: vertical blank, horizontal
// blank, and vcounter coincidence. It only ever sets request flags; masking
// and CPU delivery belong to the interrupt controller behind the trait.

/// Interrupt sources the video core can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    HBlank,
    VCoincidence,
}

impl Interrupt {
    /// Bit position in the IF/IE registers
    pub fn bit(self) -> u16 {
        match self {
            Interrupt::VBlank => 1 << 0,
            Interrupt::HBlank => 1 << 1,
            Interrupt::VCoincidence => 1 << 2,
        }
    }
}

/// Receiver for interrupt requests from the video core
pub trait InterruptLine {
    /// Latch a pending interrupt request
    fn set_flag(&mut self, interrupt: Interrupt);

    /// Whether the CPU is currently halted or stopped; the display blanks
    /// while it is
    fn halted(&self) -> bool;
}

/// Standalone interrupt latch mirroring the IF register
#[derive(Debug, Clone, Default)]
pub struct IrqLatch {
    flags: u16,
    halted: bool,
}

impl IrqLatch {
    pub fn new() -> Self {
        IrqLatch::default()
    }

    /// Pending request flags
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Whether a given source is pending
    pub fn pending(&self, interrupt: Interrupt) -> bool {
        self.flags & interrupt.bit() != 0
    }

    /// Acknowledge (clear) the given sources
    pub fn acknowledge(&mut self, mask: u16) {
        self.flags &= !mask;
    }

    pub fn set_halted(&mut self, halted: bool) {
        self.halted = halted;
    }
}

impl InterruptLine for IrqLatch {
    fn set_flag(&mut self, interrupt: Interrupt) {
        self.flags |= interrupt.bit();
    }

    fn halted(&self) -> bool {
        self.halted
    }
}
