//! Runtime configuration surface (`CONFIG_AFSK_*`) and the startup
//! validation that replaces the original firmware's `STATIC_ASSERT`.

use dsp::dds::div_round;
use dsp::Filter;
use dsp::bitsync::BITRATE;
use serde::{Deserialize, Serialize};

/// Selects which of the two integer lowpass recurrences the discriminator
/// runs. A thin, serde-able mirror of [`dsp::Filter`] so this crate's
/// `serde` dependency doesn't have to leak into `dsp`, which stays free of
/// anything beyond the numerics it actually needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterSelect {
    Butterworth,
    Chebyshev,
}

impl From<FilterSelect> for Filter {
    fn from(value: FilterSelect) -> Self {
        match value {
            FilterSelect::Butterworth => Filter::Butterworth,
            FilterSelect::Chebyshev => Filter::Chebyshev,
        }
    }
}

/// `CONFIG_AFSK_RXTIMEOUT`: `0` reads only what's already buffered, `-1`
/// blocks until the whole buffer is filled, and a positive value bounds the
/// wait in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RxTimeout {
    NonBlocking,
    Blocking,
    Millis(u32),
}

/// The `CONFIG_AFSK_*` keys that are runtime, rather than const-generic,
/// configuration. `RX_BUFLEN`/`TX_BUFLEN` are modelled as const generics on
/// [`crate::Afsk`] instead, since capacity is fixed at construction and
/// never resized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AfskConfig {
    /// DAC sample rate, Hz. Must be a multiple of `BITRATE` (1200).
    pub dac_samplerate: u32,
    /// Discriminator lowpass selection.
    pub filter: FilterSelect,
    /// Milliseconds of `HDLC_FLAG` sent before the first payload byte.
    pub preamble_ms: u32,
    /// Milliseconds of `HDLC_FLAG` sent after the last payload byte.
    pub trailer_ms: u32,
    /// `read` blocking behaviour.
    pub rx_timeout: RxTimeout,
}

impl AfskConfig {
    /// Checks that the DAC sample rate is a multiple of the 1200 Hz bit
    /// rate, the one invariant the bit-sync/framer timing depends on.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.dac_samplerate % BITRATE != 0 {
            return Err(ConfigError::DacSampleRateNotMultipleOfBitrate);
        }
        Ok(())
    }

    /// Preamble length in flag bytes, `round(preamble_ms * BITRATE / 8000)`.
    pub const fn preamble_len(&self) -> u16 {
        div_round(self.preamble_ms * BITRATE, 8000) as u16
    }

    /// Trailer length in flag bytes, `round(trailer_ms * BITRATE / 8000)`.
    pub const fn trailer_len(&self) -> u16 {
        div_round(self.trailer_ms * BITRATE, 8000) as u16
    }
}

/// Startup configuration mismatch: refuse to initialize rather than
/// silently running at the wrong rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `dac_samplerate % BITRATE != 0`.
    DacSampleRateNotMultipleOfBitrate,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::DacSampleRateNotMultipleOfBitrate => {
                write!(f, "DAC sample rate must be a multiple of the 1200 Hz bit rate")
            }
        }
    }
}
