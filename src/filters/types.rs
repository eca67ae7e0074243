use serde::{Deserialize, Serialize};

/// Filter axes a user can pick from. At most one value is active per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    Category,
    District,
    Price,
    Area,
    Feature,
}

/// Axes with a numeric min/max range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeAxis {
    Price,
    Area,
}

impl RangeAxis {
    /// Query keys for the lower and upper bound
    pub fn keys(self) -> (&'static str, &'static str) {
        match self {
            RangeAxis::Price => ("minRent", "maxRent"),
            RangeAxis::Area => ("minSize", "maxSize"),
        }
    }

    /// Upper end of the slider's real-world domain
    pub fn domain_max(self) -> u64 {
        match self {
            RangeAxis::Price => 15_000_000,
            RangeAxis::Area => 90,
        }
    }

    /// Slider values snap to multiples of this
    pub fn step(self) -> u64 {
        match self {
            RangeAxis::Price => 500_000,
            RangeAxis::Area => 5,
        }
    }

    pub fn buckets(self) -> &'static [RangeBucket] {
        match self {
            RangeAxis::Price => PRICE_BUCKETS,
            RangeAxis::Area => AREA_BUCKETS,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            RangeAxis::Price => Axis::Price,
            RangeAxis::Area => Axis::Area,
        }
    }
}

/// Single-select categorical axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumAxis {
    Category,
    District,
    Feature,
}

impl EnumAxis {
    pub fn axis(self) -> Axis {
        match self {
            EnumAxis::Category => Axis::Category,
            EnumAxis::District => Axis::District,
            EnumAxis::Feature => Axis::Feature,
        }
    }
}

/// Inclusive numeric range; `max == None` means no upper bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u64,
    pub max: Option<u64>,
}

pub type PriceRange = ValueRange;
pub type AreaRange = ValueRange;

impl ValueRange {
    /// `None` when both bounds are present and out of order
    pub fn new(min: u64, max: Option<u64>) -> Option<Self> {
        match max {
            Some(max) if max < min => None,
            _ => Some(Self { min, max }),
        }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// Predefined range shown as a one-click option in the filter modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBucket {
    pub label: &'static str,
    pub min: u64,
    pub max: Option<u64>,
}

impl RangeBucket {
    pub fn range(&self) -> ValueRange {
        ValueRange {
            min: self.min,
            max: self.max,
        }
    }
}

pub const PRICE_BUCKETS: &[RangeBucket] = &[
    RangeBucket {
        label: "Dưới 1.5 triệu",
        min: 0,
        max: Some(1_500_000),
    },
    RangeBucket {
        label: "1.5 - 3 triệu",
        min: 1_500_000,
        max: Some(3_000_000),
    },
    RangeBucket {
        label: "3 - 5 triệu",
        min: 3_000_000,
        max: Some(5_000_000),
    },
    RangeBucket {
        label: "5 - 7 triệu",
        min: 5_000_000,
        max: Some(7_000_000),
    },
    RangeBucket {
        label: "Trên 7 triệu",
        min: 7_000_000,
        max: None,
    },
];

pub const AREA_BUCKETS: &[RangeBucket] = &[
    RangeBucket {
        label: "Dưới 20 m²",
        min: 0,
        max: Some(20),
    },
    RangeBucket {
        label: "20 - 30 m²",
        min: 20,
        max: Some(30),
    },
    RangeBucket {
        label: "30 - 50 m²",
        min: 30,
        max: Some(50),
    },
    RangeBucket {
        label: "50 - 70 m²",
        min: 50,
        max: Some(70),
    },
    RangeBucket {
        label: "Trên 70 m²",
        min: 70,
        max: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_rejects_inverted_bounds() {
        assert!(ValueRange::new(5, Some(3)).is_none());
        assert!(ValueRange::new(5, Some(5)).is_some());
        assert!(ValueRange::new(5, None).is_some());
    }

    #[test]
    fn test_open_range_contains_everything_above_min() {
        let range = PRICE_BUCKETS[4].range();
        assert!(range.contains(7_000_000));
        assert!(range.contains(u64::MAX));
        assert!(!range.contains(6_999_999));
    }

    #[test]
    fn test_buckets_are_well_formed() {
        for axis in [RangeAxis::Price, RangeAxis::Area] {
            for bucket in axis.buckets() {
                assert!(ValueRange::new(bucket.min, bucket.max).is_some());
            }
            assert!(axis.buckets().last().unwrap().max.is_none());
        }
    }
}
