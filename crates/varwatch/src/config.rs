/// Sizing and pacing for a watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of registered slots.
    pub capacity: usize,
    /// Slot records the encoder may emit in one tick. Clamped to at
    /// least 1; this is the bound on per-tick transmit work.
    pub slots_per_tick: usize,
    /// Maximum inbound frame body, in bytes. Frames that outgrow this are
    /// dropped whole.
    pub rx_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: 32,
            slots_per_tick: 1,
            rx_buffer_size: 32,
        }
    }
}
