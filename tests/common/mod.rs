//! Test doubles: a simulated TMC5160 board, recording pins and a recording delay.
#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorKind, ErrorType as SpiErrorType, SpiBus};
use embedded_hal_async::delay::DelayNs;

pub const RAMP_STAT: u8 = 0x35;
pub const XTARGET: u8 = 0x2D;
pub const VMAX: u8 = 0x27;
pub const AMAX: u8 = 0x26;
pub const RAMPMODE: u8 = 0x20;

pub const POSITION_REACHED: u32 = 1 << 9;
pub const VELOCITY_REACHED: u32 = 1 << 8;
pub const VZERO: u32 = 1 << 10;

/// One chip: a 128-word register file behind the one-frame-late read pipeline.
#[derive(Debug)]
pub struct SimulatedChip {
    registers: [u32; 128],
    latched: u32,
    writes: Vec<(u8, u32)>,
    ramp_stat_frames: u32,
    reached: Option<(u32, u32)>,
    status: u8,
}

impl SimulatedChip {
    pub fn new() -> Self {
        Self {
            registers: [0; 128],
            latched: 0,
            writes: Vec::new(),
            ramp_stat_frames: 0,
            reached: None,
            status: 0,
        }
    }

    /// RAMP_STAT reads as zero for the first `reads` register reads, then as `bits`.
    pub fn reach_after(&mut self, reads: u32, bits: u32) {
        self.reached = Some((reads, bits));
    }

    pub fn set_register(&mut self, address: u8, word: u32) {
        self.registers[usize::from(address)] = word;
    }

    pub fn register(&self, address: u8) -> u32 {
        self.registers[usize::from(address)]
    }

    pub fn set_status(&mut self, status: u8) {
        self.status = status;
    }

    pub fn writes(&self) -> &[(u8, u32)] {
        &self.writes
    }

    pub fn writes_to(&self, address: u8) -> Vec<u32> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, w)| *w)
            .collect()
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Completed RAMP_STAT register reads (two frames each).
    pub fn ramp_stat_reads(&self) -> u32 {
        self.ramp_stat_frames / 2
    }

    fn exchange(&mut self, frame: [u8; 5]) -> [u8; 5] {
        let payload = self.latched.to_be_bytes();
        let address = frame[0] & 0x7F;

        if frame[0] & 0x80 != 0 {
            let word = u32::from_be_bytes([frame[1], frame[2], frame[3], frame[4]]);
            self.registers[usize::from(address)] = word;
            self.writes.push((address, word));
        } else {
            self.latched = self.latch(address);
        }

        [self.status, payload[0], payload[1], payload[2], payload[3]]
    }

    fn latch(&mut self, address: u8) -> u32 {
        if address != RAMP_STAT {
            return self.registers[usize::from(address)];
        }

        self.ramp_stat_frames += 1;
        // Frames 2k-1 and 2k belong to register read k; the first one latches its data.
        let read_number = (self.ramp_stat_frames + 1) / 2;
        match self.reached {
            Some((after, bits)) if read_number > after => bits,
            Some(_) => 0,
            None => self.registers[usize::from(RAMP_STAT)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Select(usize),
    Deselect(usize),
    Transfer(usize),
}

#[derive(Debug)]
struct BoardState {
    chips: Vec<SimulatedChip>,
    selected: Vec<bool>,
    events: Vec<Event>,
    transfers: usize,
    fail_after: Option<usize>,
}

/// Several chips on one SPI bus, each with its own chip-select line.
#[derive(Debug, Clone)]
pub struct Board {
    state: Rc<RefCell<BoardState>>,
}

impl Board {
    pub fn new(chips: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(BoardState {
                chips: (0..chips).map(|_| SimulatedChip::new()).collect(),
                selected: vec![false; chips],
                events: Vec::new(),
                transfers: 0,
                fail_after: None,
            })),
        }
    }

    pub fn spi(&self) -> BoardSpi {
        BoardSpi {
            state: Rc::clone(&self.state),
        }
    }

    pub fn chip_select(&self, index: usize) -> ChipSelect {
        ChipSelect {
            state: Rc::clone(&self.state),
            index,
        }
    }

    pub fn chip<R>(&self, index: usize, f: impl FnOnce(&mut SimulatedChip) -> R) -> R {
        f(&mut self.state.borrow_mut().chips[index])
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.state.borrow().selected[index]
    }

    /// Fail every transfer after the next `transfers` ones.
    pub fn fail_after(&self, transfers: usize) {
        let mut state = self.state.borrow_mut();
        state.fail_after = Some(state.transfers + transfers);
    }

    /// Let transfers succeed again after [`Board::fail_after`].
    pub fn recover(&self) {
        self.state.borrow_mut().fail_after = None;
    }
}

/// Shared SPI handle of a [`Board`].
#[derive(Debug)]
pub struct BoardSpi {
    state: Rc<RefCell<BoardState>>,
}

impl SpiErrorType for BoardSpi {
    type Error = ErrorKind;
}

impl SpiBus for BoardSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        self.transfer_in_place(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut buffer = words.to_vec();
        self.transfer_in_place(&mut buffer)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let mut buffer = write.to_vec();
        self.transfer_in_place(&mut buffer)?;
        let n = read.len().min(buffer.len());
        read[..n].copy_from_slice(&buffer[..n]);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        if state.fail_after.is_some_and(|limit| state.transfers >= limit) {
            return Err(ErrorKind::Other);
        }
        state.transfers += 1;

        let selected: Vec<usize> = state
            .selected
            .iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(i, _)| i)
            .collect();
        let &[index] = selected.as_slice() else {
            return Err(ErrorKind::ChipSelectFault);
        };
        let frame = <[u8; 5]>::try_from(&*words).map_err(|_| ErrorKind::FrameFormat)?;

        state.events.push(Event::Transfer(index));
        let response = state.chips[index].exchange(frame);
        words.copy_from_slice(&response);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Chip-select line of one chip on a [`Board`] (active low).
#[derive(Debug)]
pub struct ChipSelect {
    state: Rc<RefCell<BoardState>>,
    index: usize,
}

impl PinErrorType for ChipSelect {
    type Error = Infallible;
}

impl OutputPin for ChipSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.selected[self.index] = true;
        state.events.push(Event::Select(self.index));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.selected[self.index] = false;
        state.events.push(Event::Deselect(self.index));
        Ok(())
    }
}

/// Output pin that records every level it is driven to (`true` = high).
#[derive(Debug, Clone, Default)]
pub struct RecordingPin {
    pub levels: Rc<RefCell<Vec<bool>>>,
}

impl PinErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

/// Async delay that returns immediately and records each requested sleep in milliseconds.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    pub sleeps_ms: Rc<RefCell<Vec<u32>>>,
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.sleeps_ms.borrow_mut().push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.borrow_mut().push(ms);
    }
}
