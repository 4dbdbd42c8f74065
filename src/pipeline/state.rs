//! Observable lifecycle states of producers and consumers
//!
//! Each unit publishes its state through a [`UnitState`] cell that the
//! coordinator reads for status snapshots. The cells are write-only for the
//! unit and read-only for everyone else; no coordination flows through them.

use serde::Serialize;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Compact encoding of a state enum for atomic storage
pub trait StateCode: Copy {
    fn code(self) -> u8;
    fn from_code(code: u8) -> Self;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProducerState {
    Running,
    Finished,
}

impl StateCode for ProducerState {
    fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Self {
        match code {
            0 => ProducerState::Running,
            _ => ProducerState::Finished,
        }
    }
}

/// `Draining` means the queue was observed closed while items were still being yielded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConsumerState {
    Running,
    Draining,
    Stopped,
}

impl StateCode for ConsumerState {
    fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Self {
        match code {
            0 => ConsumerState::Running,
            1 => ConsumerState::Draining,
            _ => ConsumerState::Stopped,
        }
    }
}

/// Atomic cell holding one unit's current state
#[derive(Debug)]
pub struct UnitState<S> {
    code: AtomicU8,
    _state: PhantomData<S>,
}

impl<S: StateCode> UnitState<S> {
    pub fn new(initial: S) -> Self {
        Self {
            code: AtomicU8::new(initial.code()),
            _state: PhantomData,
        }
    }

    pub fn get(&self) -> S {
        S::from_code(self.code.load(Ordering::Acquire))
    }

    pub fn set(&self, state: S) {
        self.code.store(state.code(), Ordering::Release);
    }
}

/// Sets a terminal state when dropped, including while unwinding from a panic
pub(crate) struct TerminalOnDrop<S: StateCode> {
    cell: Arc<UnitState<S>>,
    terminal: S,
}

impl<S: StateCode> TerminalOnDrop<S> {
    pub(crate) fn new(cell: Arc<UnitState<S>>, terminal: S) -> Self {
        Self { cell, terminal }
    }
}

impl<S: StateCode> Drop for TerminalOnDrop<S> {
    fn drop(&mut self) {
        self.cell.set(self.terminal);
    }
}
