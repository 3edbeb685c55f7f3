//! HDLC framing: the deframer driven by the ADC-side bit sync, and the
//! framer/transmit FSM driven by the DAC-side DDS.

pub mod deframer;
pub mod framer;

pub use deframer::Deframer;
pub use framer::{Framer, TxOutcome};

/// Frame delimiter.
pub const HDLC_FLAG: u8 = 0x7E;
/// Abort pattern: seven or more consecutive one bits, checked against the
/// low 7 bits of the demodulated bit shift register.
pub const HDLC_RESET: u8 = 0x7F;
/// Literal-byte escape: the following byte in the stream is data, not a
/// frame delimiter or abort pattern.
pub const AX25_ESC: u8 = 0x1B;
/// Consecutive one bits after which the framer inserts a stuffed zero.
pub const BIT_STUFF_LEN: u8 = 5;
