//! # Stereolink Core
//!
//! Core crate for the Stereolink VR layer: stereo projection math, pooled
//! render-target borrowing, and prioritized background tasks.

pub mod compute;
pub mod math;
pub mod pool;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
