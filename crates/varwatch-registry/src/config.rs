/// Controls registry sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of slots. Fixed for the registry's lifetime;
    /// registrations past this bound are rejected with a sticky fault.
    pub capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}
