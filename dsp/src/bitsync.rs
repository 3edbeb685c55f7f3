//! Bit synchronizer: FM discriminator, lowpass filter, phase-locked bit
//! timing recovery and 3-sample majority vote, driven one ADC sample at a
//! time.

use crate::iir::{Filter, IirState};

/// ADC sample rate, Hz. Fixed: the discriminator/PLL recurrences below are
/// tuned specifically for this rate (see spec Non-goals).
pub const SAMPLERATE: u32 = 9600;
/// Line bit rate, Hz.
pub const BITRATE: u32 = 1200;
/// ADC samples per bit at `SAMPLERATE`.
pub const SAMPLEPERBIT: usize = (SAMPLERATE / BITRATE) as usize;

/// Phase units added to `curr_phase` per ADC sample.
const PHASE_BIT: u8 = 8;
/// Phase nudge applied on a detected edge.
const PHASE_INC: u8 = 1;
/// Phase units in one full bit cell.
pub const PHASE_MAX: u8 = (SAMPLEPERBIT as u8) * PHASE_BIT;
/// Threshold separating "nudge forward" from "nudge back" on an edge.
const PHASE_THRES: u8 = PHASE_MAX / 2;

const DELAY_LEN: usize = SAMPLEPERBIT / 2;

fn bit_differs(a: u8, b: u8) -> bool {
    ((a ^ b) & 0x01) != 0
}

fn edge_found(bitline: u8) -> bool {
    bit_differs(bitline, bitline >> 1)
}

/// A small ring buffer of the last `DELAY_LEN` signed ADC samples, used by
/// the discriminator to multiply a sample against its delayed self.
#[derive(Debug, Clone, Copy)]
struct DelayLine {
    buf: [i8; DELAY_LEN],
    head: usize,
}

impl DelayLine {
    const fn new() -> Self {
        Self {
            buf: [0; DELAY_LEN],
            head: 0,
        }
    }

    /// Pops the oldest sample and pushes `sample`, preserving exactly
    /// `DELAY_LEN` unread samples at all times.
    fn push_pop(&mut self, sample: i8) -> i8 {
        let old = self.buf[self.head];
        self.buf[self.head] = sample;
        self.head = (self.head + 1) % DELAY_LEN;
        old
    }
}

/// Demodulated, NRZI-decoded bit sync and discriminator state.
#[derive(Debug, Clone, Copy)]
pub struct BitSync {
    filter: Filter,
    delay: DelayLine,
    iir: IirState,
    sampled_bits: u8,
    found_bits: u8,
    curr_phase: u8,
}

impl BitSync {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            delay: DelayLine::new(),
            iir: IirState::new(),
            sampled_bits: 0,
            found_bits: 0,
            curr_phase: 0,
        }
    }

    /// Current bit-cell phase, always `< PHASE_MAX`.
    pub fn curr_phase(&self) -> u8 {
        self.curr_phase
    }

    /// Processes one ADC sample. Returns `Some(bit)` with the
    /// NRZI-decoded line bit whenever a bit boundary has just been crossed,
    /// `None` otherwise.
    pub fn tick(&mut self, sample: i8) -> Option<bool> {
        let delayed = self.delay.push_pop(sample);

        let x1 = ((delayed as i16) * (sample as i16)) >> 2;
        let y1 = self.iir.update(self.filter, x1);

        self.sampled_bits = (self.sampled_bits << 1) | u8::from(y1 > 0);

        if edge_found(self.sampled_bits) {
            if self.curr_phase < PHASE_THRES {
                self.curr_phase += PHASE_INC;
            } else {
                self.curr_phase -= PHASE_INC;
            }
        }
        self.curr_phase += PHASE_BIT;

        if self.curr_phase >= PHASE_MAX {
            self.curr_phase -= PHASE_MAX;

            let bits = self.sampled_bits & 0x07;
            let ones = bits.count_ones();
            let majority = ones >= 2;

            self.found_bits = (self.found_bits << 1) | u8::from(majority);

            // NRZI: no transition between the last two decided bits means a
            // logical 1; a transition means a logical 0.
            Some(!edge_found(self.found_bits))
        } else {
            None
        }
    }
}
