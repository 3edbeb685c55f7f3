//! Scaffold RTIC application wiring [`afsk1200::Afsk`] to a board's ADC/DAC
//! sample interrupts, the way `stabilizer`'s `src/bin/lockin.rs` wires its
//! lock-in DSP to its own ADC/DAC DMA-complete tasks. Gated behind the
//! `hardware-demo` feature: it targets a Cortex-M part via `cortex-m-rtic`
//! and `rtt-target` logging, neither of which this crate needs to build and
//! test its signal-processing/HDLC core on the host.
//!
//! This is deliberately a skeleton, not a working board bringup: the ADC and
//! DAC peripheral setup (clock tree, DMA, GPIO alternate functions) is
//! entirely board-specific, and the ADC/DAC device drivers themselves are
//! external collaborators this crate only talks to through
//! [`AfskHardware`]. A board crate fills in [`DemoHardware::new`] and the
//! interrupt bindings below.
#![deny(warnings)]
#![no_std]
#![no_main]

use afsk1200::{Afsk, AfskConfig, AfskHardware, ConfigError, FilterSelect, RxTimeout};
use rtic::app;
use panic_halt as _;

/// Fixed-capacity RX/TX queues for the demo; a real deployment sizes these
/// from its `CONFIG_AFSK_RX_BUFLEN`/`TX_BUFLEN` configuration.
const RXN: usize = 256;
const TXN: usize = 256;

/// Board-specific ADC/DAC access and interrupt control. A real board wires
/// this to its peripheral registers the way `stabilizer::hardware` wires
/// its own ADC/DAC/timer peripherals; here it's left unimplemented since no
/// concrete board is in scope.
struct DemoHardware;

impl DemoHardware {
    fn new() -> Self {
        Self
    }
}

impl AfskHardware for DemoHardware {
    fn read_adc(&mut self) -> i8 {
        0
    }

    fn set_dac(&mut self, _sample: u8) {}

    fn dac_irq_start(&mut self) {}

    fn dac_irq_stop(&mut self) {}

    fn dac_irq_end(&mut self) {}

    fn adc_irq_end(&mut self) {}

    fn critical_rx<R>(&mut self, f: impl FnOnce() -> R) -> R {
        cortex_m::interrupt::free(|_| f())
    }

    fn critical_tx<R>(&mut self, f: impl FnOnce() -> R) -> R {
        cortex_m::interrupt::free(|_| f())
    }

    fn cpu_relax(&mut self) {
        cortex_m::asm::nop();
    }

    fn now_ms(&mut self) -> u32 {
        // A board wires this to its own monotonic timer, the way
        // `stabilizer` wires its `SystemTimer`. `RxTimeout::Millis` isn't
        // exercised by this scaffold's config, so a stub is sufficient
        // here.
        0
    }
}

fn modem_config() -> Result<AfskConfig, ConfigError> {
    let config = AfskConfig {
        dac_samplerate: 9600,
        filter: FilterSelect::Butterworth,
        preamble_ms: 100,
        trailer_ms: 50,
        rx_timeout: RxTimeout::NonBlocking,
    };
    config.validate()?;
    Ok(config)
}

#[app(device = stm32h7xx_hal::stm32, dispatchers = [SPI1])]
mod app {
    use super::*;

    // `modem` is shared rather than local: the ADC and DAC ISRs each need
    // mutable access to the one `Afsk` instance, even though internally the
    // ADC side never touches TX state and the DAC side never touches RX
    // state — a board's two interrupt vectors still can't each hold an
    // exclusive `&mut` to the same struct. RTIC's priority-ceiling lock
    // gives the same masked-critical-section property
    // `AfskHardware::critical_rx`/`critical_tx` ask of a board, applied
    // here one level up since both ISRs run at the same priority.
    #[shared]
    struct Shared {
        modem: Afsk<DemoHardware, RXN, TXN>,
    }

    #[local]
    struct Local {}

    #[init]
    fn init(_c: init::Context) -> (Shared, Local, init::Monotonics) {
        #[cfg(feature = "rtt")]
        {
            rtt_target::rtt_init_print!();
            rtt_logger::init(log::LevelFilter::Info);
        }

        let config = modem_config().expect("afsk1200 config invariant violated at startup");
        let modem =
            Afsk::<DemoHardware, RXN, TXN>::init(DemoHardware::new(), config)
                .expect("afsk1200 init failed");

        log::info!("afsk_demo: modem initialized at {} Hz", config.dac_samplerate);

        (Shared { modem }, Local {}, init::Monotonics())
    }

    /// ADC sample ISR. A real board binds this to the DMA-complete or timer
    /// interrupt the ADC driver raises once per `SAMPLERATE` (9600 Hz) tick.
    #[task(binds = EXTI0, shared = [modem], priority = 3)]
    fn adc_isr(mut c: adc_isr::Context) {
        c.shared.modem.lock(|modem| modem.adc_tick());
    }

    /// DAC sample ISR. A real board binds this to the DMA-complete or timer
    /// interrupt the DAC driver raises once per `DAC_SAMPLERATE` tick.
    #[task(binds = EXTI1, shared = [modem], priority = 3)]
    fn dac_isr(mut c: dac_isr::Context) {
        c.shared.modem.lock(|modem| modem.dac_tick());
    }
}
