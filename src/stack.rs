use crate::error::{Error, Result};
use num_bigint::BigInt;

/// The data stack. The end of the vector is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    cells: Vec<BigInt>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: BigInt) {
        self.cells.push(value);
    }

    pub fn pop(&mut self) -> Result<BigInt> {
        self.cells.pop().ok_or(Error::StackUnderflow)
    }

    /// Bottom to top, without popping anything.
    pub fn peek_all(&self) -> &[BigInt] {
        &self.cells
    }

    /// Replaces the top two cells with their sum. Leaves the stack untouched
    /// when fewer than two cells are present.
    pub fn add(&mut self) -> Result<()> {
        if self.cells.len() < 2 {
            return Err(Error::StackUnderflow);
        }
        let right = self.pop()?;
        let left = self.pop()?;
        self.push(left + right);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
