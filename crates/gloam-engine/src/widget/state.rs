/// Widget lifecycle.
///
/// `Uninitialized → Initializing → Ready → ShuttingDown → Destroyed`.
/// A failed initialization goes straight to `Destroyed`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WidgetState {
    Uninitialized,
    Initializing,
    Ready,
    ShuttingDown,
    Destroyed,
}

impl WidgetState {
    /// No operation other than a no-op is valid from here on.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ShuttingDown | Self::Destroyed)
    }
}
