//! Five-star rating control state.
//!
//! Visually the control is a row of star buttons; for assistive technology it
//! is presented as a slider over the same value (see
//! [`crate::accessibility`]). [`Rating::as_slider`] / [`Rating::from_slider`]
//! bridge the integer value to the slider's floating-point scale.

use std::fmt;

/// A rating from 1 to 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a rating, clamping into `1..=5`.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Pressing the star at `index` (1-based) sets the rating to it.
    pub fn set(&mut self, index: u8) {
        *self = Self::new(index);
    }

    pub fn increment(&mut self) {
        *self = Self::new(self.0.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        *self = Self::new(self.0.saturating_sub(1));
    }

    /// Slider position for this rating.
    pub fn as_slider(self) -> f64 {
        f64::from(self.0)
    }

    /// Rating for a slider position: rounded to the nearest step, clamped
    /// into range. Non-finite input yields the minimum.
    pub fn from_slider(position: f64) -> Self {
        if !position.is_finite() {
            return Self::default();
        }
        let clamped = position.round().clamp(f64::from(Self::MIN), f64::from(Self::MAX));
        Self::new(clamped as u8)
    }

    /// Whether the star at `index` (1-based) is filled.
    pub fn is_filled(self, index: u8) -> bool {
        self.0 >= index
    }

    /// Star glyphs, filled up to the current value.
    pub fn stars(self) -> String {
        (Self::MIN..=Self::MAX)
            .map(|i| if self.is_filled(i) { '★' } else { '☆' })
            .collect()
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_is_one() {
        assert_eq!(Rating::default().value(), 1);
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Rating::new(0).value(), 1);
        assert_eq!(Rating::new(9).value(), 5);
        assert_eq!(Rating::new(3).value(), 3);
    }

    #[test]
    fn test_increment_stops_at_max() {
        let mut rating = Rating::new(4);
        rating.increment();
        assert_eq!(rating.value(), 5);
        rating.increment();
        assert_eq!(rating.value(), 5);
    }

    #[test]
    fn test_decrement_stops_at_min() {
        let mut rating = Rating::new(2);
        rating.decrement();
        assert_eq!(rating.value(), 1);
        rating.decrement();
        assert_eq!(rating.value(), 1);
    }

    #[test]
    fn test_set_from_star_press() {
        let mut rating = Rating::default();
        rating.set(4);
        assert_eq!(rating.value(), 4);
    }

    #[test]
    fn test_stars() {
        assert_eq!(Rating::new(1).stars(), "★☆☆☆☆");
        assert_eq!(Rating::new(3).stars(), "★★★☆☆");
        assert_eq!(Rating::new(5).stars(), "★★★★★");
    }

    #[test]
    fn test_from_slider_rounds_and_clamps() {
        assert_eq!(Rating::from_slider(2.4).value(), 2);
        assert_eq!(Rating::from_slider(2.6).value(), 3);
        assert_eq!(Rating::from_slider(-3.0).value(), 1);
        assert_eq!(Rating::from_slider(42.0).value(), 5);
        assert_eq!(Rating::from_slider(f64::NAN).value(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rating::new(3).to_string(), "3 of 5");
    }

    proptest! {
        #[test]
        fn slider_round_trips(value in 1u8..=5) {
            let rating = Rating::new(value);
            prop_assert_eq!(Rating::from_slider(rating.as_slider()), rating);
        }

        #[test]
        fn from_slider_always_in_range(position in proptest::num::f64::ANY) {
            let value = Rating::from_slider(position).value();
            prop_assert!((Rating::MIN..=Rating::MAX).contains(&value));
        }
    }
}
