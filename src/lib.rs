//! Full-duplex AFSK1200 (Bell 202) software modem core.
//!
//! Converts between a byte stream framed per HDLC and a continuous 9600 Hz
//! audio signal for a 1200-baud Bell 202 link (mark 1200 Hz, space 2200
//! Hz). The signal-processing path (DDS tone generator, discriminator, IIR
//! lowpass, bit-sync PLL) lives in the [`dsp`] workspace member so it stays
//! host-testable and free of any MCU dependency, the same split
//! `stabilizer` draws between its `dsp`/`idsp` crate and its firmware
//! crate. This crate adds HDLC framing, the RX/TX byte queues, and the
//! [`AfskHardware`] contract a board implements against its ADC/DAC ISRs.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), deny(warnings))]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod fifo;
pub mod hardware;
pub mod hdlc;

pub use config::{AfskConfig, ConfigError, FilterSelect, RxTimeout};
pub use fifo::Fifo;
pub use hardware::AfskHardware;
pub use hdlc::{Deframer, Framer, TxOutcome, AX25_ESC, HDLC_FLAG, HDLC_RESET};

use dsp::BitSync;

/// A full-duplex AFSK1200 modem instance.
///
/// `RXN`/`TXN` are the RX/TX FIFO capacities (`CONFIG_AFSK_RX_BUFLEN`/
/// `TX_BUFLEN`), fixed at construction as const generics: buffer capacity
/// is never resized once the modem is running.
pub struct Afsk<H, const RXN: usize, const TXN: usize> {
    hw: H,
    config: AfskConfig,
    rx: Fifo<RXN>,
    tx: Fifo<TXN>,
    bitsync: BitSync,
    deframer: Deframer,
    framer: Framer,
}

impl<H: AfskHardware, const RXN: usize, const TXN: usize> Afsk<H, RXN, TXN> {
    /// One-shot initialization: validates `config`, zeroes all DSP/HDLC
    /// state, and takes ownership of the hardware collaborator. There is no
    /// destructor beyond a board disabling its ADC/DAC interrupts on
    /// shutdown.
    pub fn init(hw: H, config: AfskConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "afsk: init dac_samplerate={} preamble_len={} trailer_len={}",
            config.dac_samplerate,
            config.preamble_len(),
            config.trailer_len(),
        );
        Ok(Self {
            hw,
            config,
            rx: Fifo::new(),
            tx: Fifo::new(),
            bitsync: BitSync::new(config.filter.into()),
            deframer: Deframer::new(),
            framer: Framer::new(config.dac_samplerate),
        })
    }

    /// Releases the hardware collaborator, e.g. to reconfigure it outside
    /// the modem's control.
    pub fn release(self) -> H {
        self.hw
    }

    /// Drives the discriminator/bit-sync/deframer chain from one ADC
    /// sample. Call once per ADC ISR.
    pub fn adc_tick(&mut self) {
        self.hw.strobe_on();
        let sample = self.hw.read_adc();
        if let Some(bit) = self.bitsync.tick(sample) {
            self.deframer.push_bit(bit, &mut self.rx);
        }
        self.hw.strobe_off();
        self.hw.adc_irq_end();
    }

    /// Drives the transmit FSM/DDS and writes one sample to the DAC. Call
    /// once per DAC ISR.
    pub fn dac_tick(&mut self) {
        match self.framer.tick(&mut self.tx) {
            TxOutcome::Sample(sample) => self.hw.set_dac(sample),
            TxOutcome::Stopped => self.hw.dac_irq_stop(),
        }
        self.hw.dac_irq_end();
    }

    /// Starts (or extends) a transmission, mirroring the original
    /// firmware's `afsk_txStart`.
    fn tx_start(&mut self) {
        if !self.framer.is_sending() {
            let preamble_len = self.config.preamble_len();
            self.framer.begin(preamble_len);
            self.hw.dac_irq_start();
        }
        let trailer_len = self.config.trailer_len();
        let framer = &mut self.framer;
        self.hw.critical_tx(|| framer.refresh_trailer(trailer_len));
    }

    /// Writes `buf` to the TX FIFO, busy-waiting on FIFO-full and starting
    /// (or extending) transmission after each byte. Returns the number of
    /// bytes written, always `buf.len()`: this only stalls on a full FIFO,
    /// it never drops data.
    pub fn write(&mut self, buf: &[u8]) -> usize {
        for &byte in buf {
            loop {
                let tx = &mut self.tx;
                if !self.hw.critical_tx(|| tx.is_full()) {
                    break;
                }
                self.hw.cpu_relax();
            }
            let tx = &mut self.tx;
            let _ = self.hw.critical_tx(|| tx.push(byte));
            self.tx_start();
        }
        buf.len()
    }

    /// Reads up to `buf.len()` bytes from the RX FIFO per the configured
    /// `RxTimeout`. Returns the number of bytes actually read.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        match self.config.rx_timeout {
            RxTimeout::NonBlocking => self.read_available(buf),
            RxTimeout::Blocking => self.read_blocking(buf),
            RxTimeout::Millis(timeout_ms) => self.read_with_timeout(buf, timeout_ms),
        }
    }

    fn rx_is_empty(&mut self) -> bool {
        let rx = &mut self.rx;
        self.hw.critical_rx(|| rx.is_empty())
    }

    fn rx_pop(&mut self) -> Option<u8> {
        let rx = &mut self.rx;
        self.hw.critical_rx(|| rx.pop())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() && !self.rx_is_empty() {
            buf[n] = self.rx_pop().expect("checked non-empty above");
            n += 1;
        }
        n
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            while self.rx_is_empty() {
                self.hw.cpu_relax();
            }
            buf[n] = self.rx_pop().expect("checked non-empty above");
            n += 1;
        }
        n
    }

    fn read_with_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> usize {
        let mut n = 0;
        while n < buf.len() {
            let start = self.hw.now_ms();
            while self.rx_is_empty() {
                if self.hw.now_ms().wrapping_sub(start) > timeout_ms {
                    return n;
                }
                self.hw.cpu_relax();
            }
            buf[n] = self.rx_pop().expect("checked non-empty above");
            n += 1;
        }
        n
    }

    /// Busy-waits until any in-flight transmission has finished draining.
    pub fn flush(&mut self) {
        while self.framer.is_sending() {
            self.hw.cpu_relax();
        }
    }
}
