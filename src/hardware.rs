//! The hardware collaborator contract: ADC/DAC sample I/O and the
//! interrupt enable/disable/acknowledge hooks a board wires to its own
//! timer-triggered sampling ISRs, standing in for the original firmware's
//! `AFSK_READ_ADC`/`AFSK_SET_DAC`/`AFSK_*_IRQ_*` macros.
//!
//! A real board implements this against register access the way
//! `stabilizer::hardware` wires its ADC/DAC peripherals; the test suite
//! implements it against an in-memory loopback buffer.

/// Everything an [`crate::Afsk`] instance needs from its board to drive the
/// ADC/DAC sample ISRs and the blocking endpoint operations.
pub trait AfskHardware {
    /// Reads one signed, zero-centered ADC sample. Called once per ADC ISR.
    fn read_adc(&mut self) -> i8;

    /// Pushes one sample to the DAC. Called once per DAC ISR.
    fn set_dac(&mut self, sample: u8);

    /// Enables the DAC sample ISR. Called when a transmission starts.
    fn dac_irq_start(&mut self);

    /// Disables the DAC sample ISR. Called when a transmission ends.
    fn dac_irq_stop(&mut self);

    /// Acknowledges the DAC ISR. Called once at the end of every DAC tick.
    fn dac_irq_end(&mut self);

    /// Acknowledges the ADC ISR. Called once at the end of every ADC tick.
    fn adc_irq_end(&mut self);

    /// Runs `f` with the ADC interrupt source masked, for RX FIFO accesses
    /// shared between the main context and the ADC ISR.
    fn critical_rx<R>(&mut self, f: impl FnOnce() -> R) -> R;

    /// Runs `f` with the DAC interrupt source masked, for TX FIFO and
    /// trailer-length accesses shared between the main context and the DAC
    /// ISR.
    fn critical_tx<R>(&mut self, f: impl FnOnce() -> R) -> R;

    /// Yields the CPU until the next interrupt, or cooperatively, while an
    /// endpoint operation busy-waits. Must not block indefinitely on its
    /// own; the endpoint loop re-checks its condition on every return.
    fn cpu_relax(&mut self);

    /// Monotonic millisecond clock, used to bound a `read` with a positive
    /// timeout.
    fn now_ms(&mut self) -> u32;

    /// Debug timing probe raised for the duration of the ADC discriminator
    /// tick, carried over from the original firmware's
    /// `AFSK_STROBE_ON`/`AFSK_STROBE_OFF` scope hooks. Optional: default is
    /// a no-op.
    fn strobe_on(&mut self) {}

    /// See [`AfskHardware::strobe_on`].
    fn strobe_off(&mut self) {}
}
