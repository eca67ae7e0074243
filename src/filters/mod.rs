pub mod selection;
pub mod slider;
pub mod translate;
pub mod types;

pub use selection::{format_millions, range_label, AxisSelection, FilterSelection};
pub use slider::{percent_to_value, value_to_percent, RangeSlider};
pub use translate::{
    current_range, is_item_selected, select_bucket, select_custom_range, select_enum,
};
pub use types::{
    AreaRange, Axis, EnumAxis, PriceRange, RangeAxis, RangeBucket, ValueRange, AREA_BUCKETS,
    PRICE_BUCKETS,
};
