use crate::filters::slider::percent_to_value;
use crate::filters::types::{EnumAxis, RangeAxis, RangeBucket, ValueRange};
use crate::models::{Feature, PropertyType};
use crate::query::{ParamDelta, QueryParams, PAGE_KEY, PROPERTY_TYPE_KEY};
use tracing::warn;

pub const DISTRICT_KEY: &str = "district";

/// Whether `bucket` is exactly the range currently in the params
pub fn is_item_selected(params: &QueryParams, axis: RangeAxis, bucket: &RangeBucket) -> bool {
    let (min_key, max_key) = axis.keys();
    params.get_u64(min_key) == Some(bucket.min) && params.get_u64(max_key) == bucket.max
}

/// Range currently encoded in the params, if either bound is present
pub fn current_range(params: &QueryParams, axis: RangeAxis) -> Option<ValueRange> {
    let (min_key, max_key) = axis.keys();
    let min = params.get_u64(min_key);
    let max = params.get_u64(max_key);
    if min.is_none() && max.is_none() {
        return None;
    }
    ValueRange::new(min.unwrap_or(0), max)
}

/// Pick a predefined bucket. Picking the active bucket again clears the axis.
pub fn select_bucket(params: &QueryParams, axis: RangeAxis, bucket: &RangeBucket) -> ParamDelta {
    let (min_key, max_key) = axis.keys();
    let delta = ParamDelta::new().remove(PAGE_KEY);

    if is_item_selected(params, axis, bucket) {
        return delta.remove(min_key).remove(max_key);
    }

    let delta = delta.set(min_key, bucket.min);
    match bucket.max {
        Some(max) => delta.set(max_key, max),
        // Open-ended: never invent an upper bound
        None => delta.remove(max_key),
    }
}

/// Apply a custom slider range. Handle order does not matter.
pub fn select_custom_range(axis: RangeAxis, percent_a: f64, percent_b: f64) -> ParamDelta {
    let (min_key, max_key) = axis.keys();
    let (percent_a, percent_b) = (handle_percent(percent_a), handle_percent(percent_b));
    let (low, high) = if percent_a <= percent_b {
        (percent_a, percent_b)
    } else {
        (percent_b, percent_a)
    };

    let delta = ParamDelta::new()
        .remove(PAGE_KEY)
        .set(min_key, percent_to_value(axis, low));

    if high >= 100.0 {
        delta.remove(max_key)
    } else {
        delta.set(max_key, percent_to_value(axis, high))
    }
}

// NaN reads as the left edge, same as `percent_to_value`
fn handle_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Toggle a single-select categorical value. Re-selecting the active value clears it.
pub fn select_enum(params: &QueryParams, axis: EnumAxis, code: &str) -> ParamDelta {
    match axis {
        EnumAxis::Category => {
            let code = code
                .parse::<PropertyType>()
                .map(|t| t.code().to_string())
                .unwrap_or_else(|_| code.to_string());
            toggle_key(params, PROPERTY_TYPE_KEY, &code)
        }
        EnumAxis::District => toggle_key(params, DISTRICT_KEY, code),
        EnumAxis::Feature => {
            let Some(feature) = Feature::from_code(code) else {
                warn!("Ignoring unknown feature filter '{}'", code);
                return ParamDelta::new();
            };
            let active = params.get(feature.code()) == Some("true");
            let mut delta = ParamDelta::new().remove(PAGE_KEY);
            for other in Feature::ALL.into_iter().filter(|f| *f != feature) {
                if params.contains(other.code()) {
                    delta = delta.remove(other.code());
                }
            }
            if active {
                delta.remove(feature.code())
            } else {
                delta.set(feature.code(), true)
            }
        }
    }
}

fn toggle_key(params: &QueryParams, key: &str, value: &str) -> ParamDelta {
    let delta = ParamDelta::new().remove(PAGE_KEY);
    if params.get(key) == Some(value) {
        delta.remove(key)
    } else {
        delta.set(key, value)
    }
}
