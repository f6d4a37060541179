/// Limits applied while loading files.
///
/// The limits guard against corrupt headers that would otherwise request
/// enormous allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Largest `nx * ny` a binary grid header may declare.
    pub max_cells: usize,
    /// Largest id, in UTF-8 bytes, either codec will read.
    pub max_id_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cells: 1 << 26,
            max_id_len: 1 << 20,
        }
    }
}

impl Config {
    /// Validates that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if either limit is zero.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_cells == 0 {
            return Err("max_cells must be positive");
        }
        if self.max_id_len == 0 {
            return Err("max_id_len must be positive");
        }
        Ok(())
    }
}
