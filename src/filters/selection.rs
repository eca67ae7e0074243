use crate::filters::translate::{current_range, DISTRICT_KEY};
use crate::filters::types::{Axis, RangeAxis, ValueRange};
use crate::models::{Feature, PropertyType};
use crate::query::{QueryParams, PROPERTY_TYPE_KEY};
use std::collections::BTreeMap;

/// What is shown as active for one axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSelection {
    pub display: String,
    pub range: Option<ValueRange>,
}

/// Active filter per axis, derived from the query params on every read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    active: BTreeMap<Axis, AxisSelection>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: &QueryParams) -> Self {
        let mut selection = Self::new();

        if let Some(code) = params.get(PROPERTY_TYPE_KEY) {
            let display = code
                .parse::<PropertyType>()
                .map(|t| t.label().to_string())
                .unwrap_or_else(|_| code.to_string());
            selection.set(Axis::Category, display, None);
        }

        if let Some(district) = params.get(DISTRICT_KEY) {
            selection.set(Axis::District, district.to_string(), None);
        }

        for axis in [RangeAxis::Price, RangeAxis::Area] {
            if let Some(range) = current_range(params, axis) {
                selection.set(axis.axis(), range_label(axis, &range), Some(range));
            }
        }

        if let Some(feature) = Feature::ALL
            .into_iter()
            .find(|f| params.get(f.code()) == Some("true"))
        {
            selection.set(Axis::Feature, feature.label().to_string(), None);
        }

        selection
    }

    /// Replace whatever is active on `axis`
    pub fn set(&mut self, axis: Axis, display: String, range: Option<ValueRange>) {
        self.active.insert(axis, AxisSelection { display, range });
    }

    pub fn clear(&mut self, axis: Axis) {
        self.active.remove(&axis);
    }

    pub fn get(&self, axis: Axis) -> Option<&AxisSelection> {
        self.active.get(&axis)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, &AxisSelection)> {
        self.active.iter().map(|(axis, sel)| (*axis, sel))
    }
}

/// Bucket label when the range matches one, otherwise a formatted custom range
pub fn range_label(axis: RangeAxis, range: &ValueRange) -> String {
    if let Some(bucket) = axis
        .buckets()
        .iter()
        .find(|b| b.min == range.min && b.max == range.max)
    {
        return bucket.label.to_string();
    }

    let fmt = |v: u64| match axis {
        RangeAxis::Price => format_millions(v),
        RangeAxis::Area => format!("{v} m²"),
    };
    match range.max {
        Some(max) => format!("{} - {}", fmt(range.min), fmt(max)),
        None => format!("Trên {}", fmt(range.min)),
    }
}

/// 1_500_000 -> "1.5 triệu", 500_000 -> "500 nghìn"
pub fn format_millions(value: u64) -> String {
    if value >= 1_000_000 {
        let millions = value as f64 / 1_000_000.0;
        let text = format!("{millions:.1}");
        format!("{} triệu", text.trim_end_matches(".0"))
    } else if value >= 1_000 {
        format!("{} nghìn", value / 1_000)
    } else {
        value.to_string()
    }
}
