//! Zoom and pan state for the page view
//!
//! Zoom 1.0 fits the whole page into the viewport. Anything above that
//! overflows and can be panned in terminal cells.

/// Pan direction inside an overflowing page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Zoom and pan state for the document viewer
#[derive(Debug, Clone, PartialEq)]
pub struct Zoom {
    /// Current zoom factor (1.0 = fit page)
    factor: f32,

    /// Horizontal pan offset in terminal cells from the left edge
    pub cell_pan_from_left: u16,

    /// Vertical pan offset in terminal cells from the top edge
    pub cell_pan_from_top: u16,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FACTOR)
    }
}

impl Zoom {
    pub const DEFAULT_FACTOR: f32 = 1.2;
    pub const MIN_FACTOR: f32 = 0.5;
    pub const MAX_FACTOR: f32 = 3.0;
    pub const STEP: f32 = 0.2;

    /// Base pan step in cells for horizontal movement
    pub const PAN_STEP_X: u16 = 4;
    /// Base pan step in cells for vertical movement
    pub const PAN_STEP_Y: u16 = 2;

    pub fn new(factor: f32) -> Self {
        Self {
            factor: Self::clamp_factor(factor),
            cell_pan_from_left: 0,
            cell_pan_from_top: 0,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Zoom as a whole percentage, the way the toolbar shows it
    pub fn percent(&self) -> u32 {
        (self.factor * 100.0).round() as u32
    }

    /// Zoom in by one step. Returns true if the factor changed.
    pub fn step_in(&mut self) -> bool {
        self.set_factor(self.factor + Self::STEP)
    }

    /// Zoom out by one step. Returns true if the factor changed.
    pub fn step_out(&mut self) -> bool {
        self.set_factor(self.factor - Self::STEP)
    }

    fn set_factor(&mut self, factor: f32) -> bool {
        let next = Self::clamp_factor(factor);
        if (next - self.factor).abs() > f32::EPSILON {
            self.factor = next;
            self.reset_pan();
            true
        } else {
            false
        }
    }

    /// Pan in the given direction, never past `max` cells of overflow
    pub fn pan(&mut self, direction: ScrollDirection, max_x: u16, max_y: u16) -> bool {
        let before = (self.cell_pan_from_left, self.cell_pan_from_top);
        match direction {
            ScrollDirection::Up => {
                self.cell_pan_from_top = self.cell_pan_from_top.saturating_sub(Self::PAN_STEP_Y);
            }
            ScrollDirection::Down => {
                self.cell_pan_from_top = self
                    .cell_pan_from_top
                    .saturating_add(Self::PAN_STEP_Y)
                    .min(max_y);
            }
            ScrollDirection::Left => {
                self.cell_pan_from_left = self.cell_pan_from_left.saturating_sub(Self::PAN_STEP_X);
            }
            ScrollDirection::Right => {
                self.cell_pan_from_left = self
                    .cell_pan_from_left
                    .saturating_add(Self::PAN_STEP_X)
                    .min(max_x);
            }
        }
        before != (self.cell_pan_from_left, self.cell_pan_from_top)
    }

    pub fn reset_pan(&mut self) {
        self.cell_pan_from_left = 0;
        self.cell_pan_from_top = 0;
    }

    /// Clamp factor to the allowed range, snapping to tenths so repeated
    /// steps don't drift. NaN/Inf fall back to the default.
    pub fn clamp_factor(factor: f32) -> f32 {
        if !factor.is_finite() {
            return Self::DEFAULT_FACTOR;
        }
        let snapped = (factor * 10.0).round() / 10.0;
        snapped.clamp(Self::MIN_FACTOR, Self::MAX_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_120_percent() {
        let zoom = Zoom::default();
        assert_eq!(zoom.percent(), 120);
    }

    #[test]
    fn steps_clamp_at_bounds() {
        let mut zoom = Zoom::default();
        for _ in 0..20 {
            zoom.step_in();
        }
        assert_eq!(zoom.percent(), 300);
        assert!(!zoom.step_in());

        for _ in 0..20 {
            zoom.step_out();
        }
        assert_eq!(zoom.percent(), 50);
        assert!(!zoom.step_out());
    }

    #[test]
    fn repeated_steps_do_not_drift() {
        let mut zoom = Zoom::default();
        zoom.step_in();
        zoom.step_in();
        zoom.step_out();
        assert_eq!(zoom.percent(), 140);
        assert!((zoom.factor() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn non_finite_factor_falls_back_to_default() {
        assert_eq!(Zoom::new(f32::NAN).percent(), 120);
        assert_eq!(Zoom::new(f32::INFINITY).percent(), 120);
        assert_eq!(Zoom::new(9.0).percent(), 300);
    }

    #[test]
    fn pan_is_bounded_and_reset_by_zoom() {
        let mut zoom = Zoom::default();
        assert!(zoom.pan(ScrollDirection::Down, 0, 3));
        assert!(zoom.pan(ScrollDirection::Down, 0, 3));
        assert_eq!(zoom.cell_pan_from_top, 3);
        assert!(!zoom.pan(ScrollDirection::Right, 0, 3));

        zoom.step_in();
        assert_eq!(zoom.cell_pan_from_top, 0);
    }
}
