use crate::constants::DEFAULT_ERRMSG_CAPACITY;

#[derive(Clone, Debug)]
/// Configuration options to tune the diagnostics layer.
pub struct Config {
    /// Capacity of the deferred error-message pool in bytes.
    pub errmsg_capacity: usize,
    /// Whether an assertion failure aborts the process (after draining
    /// pending messages) rather than logging and continuing.
    pub core_dump_wanted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            errmsg_capacity: DEFAULT_ERRMSG_CAPACITY,
            core_dump_wanted: false, // Log and continue by default
        }
    }
}
