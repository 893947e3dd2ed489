//! Simulated part for tests: keeps the last byte written to each address

use crate::interface::RegisterInterface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

pub struct FakeChip {
    pub regs: [u8; 4],
    pub reads: usize,
    pub writes: usize,
    fail: bool,
}

impl FakeChip {
    pub fn new() -> Self {
        Self {
            regs: [0; 4],
            reads: 0,
            writes: 0,
            fail: false,
        }
    }

    /// Every transaction fails and nothing is stored
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl RegisterInterface for FakeChip {
    type Error = BusFault;

    async fn read_register(&mut self, address: u8) -> Result<u8, BusFault> {
        self.reads += 1;

        if self.fail {
            return Err(BusFault);
        }

        self.regs.get(address as usize).copied().ok_or(BusFault)
    }

    async fn write_register(&mut self, address: u8, value: u8) -> Result<(), BusFault> {
        self.writes += 1;

        if self.fail {
            return Err(BusFault);
        }

        let reg = self.regs.get_mut(address as usize).ok_or(BusFault)?;
        *reg = value;
        Ok(())
    }
}
