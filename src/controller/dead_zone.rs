//! # Dead Zone Module
//!
//! Separates a joystick click from a joystick push.
//!
//! ## Why a Dead Zone
//!
//! The runtime reports the same button bit for clicking the joystick and for
//! deflecting it. A press only counts as a click while the stick stays near
//! center, i.e. inside a circle of the configured radius.
//!
//! The test compares squared distances, so no square root is taken:
//! `x² + y² < radius²`. The boundary itself is outside the zone.
//!
//! ## Usage
//!
//! ```
//! use vr_edge::controller::dead_zone::DeadZone;
//! use vr_edge::vr::AxisState;
//!
//! let zone = DeadZone::default(); // radius 0.7
//!
//! assert!(zone.contains(AxisState::new(0.0, 0.0)));
//! assert!(!zone.contains(AxisState::new(0.7, 0.0)));
//! ```

use crate::vr::AxisState;

/// Default dead zone radius in normalized stick units.
pub const DEFAULT_DEAD_ZONE_RADIUS: f32 = 0.7;

/// Circular dead zone around the joystick center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadZone {
    /// Radius (0.0 to 1.0).
    radius: f32,
    /// Cached `radius * radius`.
    radius_squared: f32,
}

impl Default for DeadZone {
    fn default() -> Self {
        Self::new(DEFAULT_DEAD_ZONE_RADIUS)
    }
}

impl DeadZone {
    /// Creates a dead zone with the given radius.
    ///
    /// # Arguments
    ///
    /// * `radius` - Radius in normalized stick units. Values outside 0.0 to 1.0 are clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_edge::controller::dead_zone::DeadZone;
    ///
    /// let zone = DeadZone::new(0.5);
    /// assert_eq!(zone.radius(), 0.5);
    /// ```
    #[must_use]
    pub fn new(radius: f32) -> Self {
        let radius = radius.clamp(0.0, 1.0);
        Self {
            radius,
            radius_squared: radius * radius,
        }
    }

    /// Returns the configured radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether `axis` lies strictly inside the zone.
    #[inline]
    #[must_use]
    pub fn contains(&self, axis: AxisState) -> bool {
        axis.magnitude_squared() < self.radius_squared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone_default() {
        let zone = DeadZone::default();
        assert_eq!(zone.radius(), 0.7);
    }

    #[test]
    fn test_dead_zone_clamps_radius() {
        assert_eq!(DeadZone::new(1.5).radius(), 1.0);
        assert_eq!(DeadZone::new(-0.2).radius(), 0.0);
    }

    #[test]
    fn test_center_is_inside() {
        assert!(DeadZone::default().contains(AxisState::new(0.0, 0.0)));
    }

    #[test]
    fn test_boundary_is_outside() {
        let zone = DeadZone::default();
        assert!(!zone.contains(AxisState::new(0.7, 0.0)));
        assert!(!zone.contains(AxisState::new(0.0, -0.7)));
    }

    #[test]
    fn test_just_below_boundary_is_inside() {
        let zone = DeadZone::default();
        assert!(zone.contains(AxisState::new(0.6999, 0.0)));
        assert!(zone.contains(AxisState::new(0.0, -0.6999)));
    }

    #[test]
    fn test_diagonal_uses_euclidean_distance() {
        let zone = DeadZone::default();
        // |(0.45, 0.45)| ~= 0.636
        assert!(zone.contains(AxisState::new(0.45, 0.45)));
        // |(0.5, 0.5)| ~= 0.707
        assert!(!zone.contains(AxisState::new(0.5, 0.5)));
        assert!(!zone.contains(AxisState::new(-0.5, -0.5)));
    }

    #[test]
    fn test_full_deflection_is_outside() {
        let zone = DeadZone::default();
        assert!(!zone.contains(AxisState::new(1.0, 0.0)));
        assert!(!zone.contains(AxisState::new(0.8, 0.0)));
    }

    #[test]
    fn test_zero_radius_contains_nothing() {
        let zone = DeadZone::new(0.0);
        assert!(!zone.contains(AxisState::new(0.0, 0.0)));
    }
}
