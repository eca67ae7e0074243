use crate::filters::types::RangeAxis;

/// Map a slider percentage onto the axis domain, snapped to the axis step
pub fn percent_to_value(axis: RangeAxis, percent: f64) -> u64 {
    if !percent.is_finite() {
        return 0;
    }
    let percent = percent.clamp(0.0, 100.0);
    let raw = percent * axis.domain_max() as f64 / 100.0;
    let step = axis.step() as f64;
    let snapped = (raw / step).round() as u64 * axis.step();
    snapped.min(axis.domain_max())
}

/// Inverse of [`percent_to_value`], used to place handles from URL params
pub fn value_to_percent(axis: RangeAxis, value: u64) -> f64 {
    let value = value.min(axis.domain_max());
    value as f64 * 100.0 / axis.domain_max() as f64
}

/// Dual-handle percentage slider. Handles may cross; readers always get them sorted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSlider {
    axis: RangeAxis,
    handle_a: f64,
    handle_b: f64,
}

impl RangeSlider {
    pub fn new(axis: RangeAxis) -> Self {
        Self {
            axis,
            handle_a: 0.0,
            handle_b: 100.0,
        }
    }

    /// Slider positioned over an existing min/max (max `None` puts the handle at 100%)
    pub fn from_values(axis: RangeAxis, min: u64, max: Option<u64>) -> Self {
        Self {
            axis,
            handle_a: value_to_percent(axis, min),
            handle_b: max.map_or(100.0, |max| value_to_percent(axis, max)),
        }
    }

    pub fn axis(&self) -> RangeAxis {
        self.axis
    }

    /// Handles as (lower, upper) percentages
    pub fn sorted(&self) -> (f64, f64) {
        if self.handle_a <= self.handle_b {
            (self.handle_a, self.handle_b)
        } else {
            (self.handle_b, self.handle_a)
        }
    }

    pub fn handles(&self) -> (f64, f64) {
        (self.handle_a, self.handle_b)
    }

    /// Move whichever handle is closer to the clicked point
    pub fn click(&mut self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        let dist_a = (self.handle_a - percent).abs();
        let dist_b = (self.handle_b - percent).abs();
        if dist_a < dist_b {
            self.handle_a = percent;
        } else if dist_b < dist_a {
            self.handle_b = percent;
        } else if percent > self.handle_a.max(self.handle_b) {
            // Stacked handles: a click above moves the upper one
            if self.handle_a >= self.handle_b {
                self.handle_a = percent;
            } else {
                self.handle_b = percent;
            }
        } else if self.handle_a <= self.handle_b {
            self.handle_a = percent;
        } else {
            self.handle_b = percent;
        }
    }

    /// Real-world (min, max) for the current handles; `None` max when the upper handle is at 100%
    pub fn values(&self) -> (u64, Option<u64>) {
        let (low, high) = self.sorted();
        let min = percent_to_value(self.axis, low);
        let max = if high >= 100.0 {
            None
        } else {
            Some(percent_to_value(self.axis, high))
        };
        (min, max)
    }
}
