//! Zoom state and the fit-to-width computation.

use crate::config::ZoomConfig;
use docview_style::dimension::Margins;

/// Scale that makes a `page_width` page fill the viewport between its padding.
///
/// Pure function of viewport and config; the controller calls it once per load.
pub fn fit_to_width(
    viewport_width: f32,
    padding: &Margins,
    page_width: f32,
    min: f32,
    max: f32,
) -> f32 {
    let available = viewport_width - padding.left - padding.right;
    clamp_scale(available / page_width, min, max)
}

fn clamp_scale(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Current zoom, always inside `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomState {
    scale: f32,
    config: ZoomConfig,
}

impl ZoomState {
    pub fn new(config: ZoomConfig) -> Self {
        let scale = clamp_scale(1.0, config.min, config.max);
        Self { scale, config }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Programmatic set, used for fit-to-width. Returns the new scale if it changed.
    pub fn set(&mut self, value: f32) -> Option<f32> {
        if value.is_nan() {
            log::debug!("Ignoring NaN zoom request");
            return None;
        }
        let next = clamp_scale(value, self.config.min, self.config.max);
        if next == self.scale {
            return None;
        }
        self.scale = next;
        Some(next)
    }

    /// User-initiated set; ignored while zoom is disabled.
    pub fn set_user(&mut self, value: f32) -> Option<f32> {
        if !self.config.enabled {
            log::debug!("Zoom is disabled, ignoring request for {}", value);
            return None;
        }
        self.set(value)
    }

    pub fn zoom_in(&mut self) -> Option<f32> {
        self.set_user(self.scale + self.config.step)
    }

    pub fn zoom_out(&mut self) -> Option<f32> {
        self.set_user(self.scale - self.config.step)
    }

    /// Back to 1.0 (clamped) for a new document.
    pub fn reset(&mut self) -> Option<f32> {
        self.set(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ZoomState {
        ZoomState::new(ZoomConfig::default())
    }

    #[test]
    fn fit_to_width_of_exact_page_is_one() {
        let padding = Margins::x(16.0);
        assert_eq!(fit_to_width(800.0, &padding, 768.0, 0.5, 4.0), 1.0);
    }

    #[test]
    fn fit_to_width_clamps_both_ends() {
        let padding = Margins::x(16.0);
        assert_eq!(fit_to_width(100_000.0, &padding, 768.0, 0.5, 4.0), 4.0);
        assert_eq!(fit_to_width(20.0, &padding, 768.0, 0.5, 4.0), 0.5);
    }

    #[test]
    fn set_is_clamped() {
        let mut zoom = state();
        assert_eq!(zoom.set_user(10.0), Some(4.0));
        assert_eq!(zoom.scale(), 4.0);
        assert_eq!(zoom.set_user(-1.0), Some(0.5));
        assert_eq!(zoom.scale(), 0.5);
        assert_eq!(zoom.set_user(f32::NAN), None);
        assert_eq!(zoom.scale(), 0.5);
    }

    #[test]
    fn unchanged_value_reports_nothing() {
        let mut zoom = state();
        assert_eq!(zoom.set(1.0), None);
    }

    #[test]
    fn steps_stop_at_bounds() {
        let mut zoom = state();
        assert_eq!(zoom.zoom_in(), Some(1.25));
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.scale(), 4.0);
        assert_eq!(zoom.zoom_in(), None);
        zoom.reset();
        assert_eq!(zoom.zoom_out(), Some(0.75));
        assert_eq!(zoom.zoom_out(), Some(0.5));
        assert_eq!(zoom.zoom_out(), None);
    }

    #[test]
    fn disabled_zoom_ignores_user_but_not_programmatic_sets() {
        let mut zoom = ZoomState::new(ZoomConfig {
            enabled: false,
            ..Default::default()
        });
        assert_eq!(zoom.set_user(2.0), None);
        assert_eq!(zoom.zoom_in(), None);
        assert_eq!(zoom.set(2.0), Some(2.0));
    }
}
