use bitflags::bitflags;

bitflags! {
    /// Context creation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContextFlags: u32 {
        /// Request a debug context.
        const DEBUG = 1 << 0;
        /// Request a forward-compatible core profile.
        const FORWARD_COMPATIBLE = 1 << 1;
        /// Request the OpenGL ES API instead of desktop GL.
        const EMBEDDED = 1 << 2;
        /// Request lose-context-on-reset robustness.
        const ROBUST = 1 << 3;
    }
}

/// Requested GL version.
///
/// `(1, 0)` means "best available legacy-compatible context". Any other value
/// is a hard requirement: drivers must fail rather than downgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const LEGACY_DEFAULT: Self = Self::new(1, 0);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Returns `true` for the `(1, 0)` "whatever the driver offers" request.
    pub fn is_legacy_default(self) -> bool {
        self == Self::LEGACY_DEFAULT
    }
}

impl Default for GlVersion {
    fn default() -> Self {
        Self::LEGACY_DEFAULT
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_zero_is_legacy_default() {
        assert!(GlVersion::new(1, 0).is_legacy_default());
        assert!(GlVersion::default().is_legacy_default());
    }

    #[test]
    fn explicit_versions_are_not_legacy() {
        assert!(!GlVersion::new(3, 3).is_legacy_default());
        assert!(!GlVersion::new(1, 1).is_legacy_default());
    }

    #[test]
    fn versions_order_by_major_then_minor() {
        assert!(GlVersion::new(3, 3) < GlVersion::new(4, 0));
        assert!(GlVersion::new(4, 1) > GlVersion::new(4, 0));
    }

    #[test]
    fn default_flags_are_empty() {
        assert!(ContextFlags::default().is_empty());
    }
}
