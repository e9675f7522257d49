//! # Display Interface

/// A text display with addressable rows, such as the brain screen or the
/// gamepad's screen.
pub trait Display: Send + Sync {
    /// Replace the contents of a row with the given text.
    fn set_line(&self, row: u8, text: &str);
}
