use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Promotional package bought for a listing. Lower priority sorts first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PackageTier {
    #[serde(rename = "VIP_1")]
    Vip1,
    #[serde(rename = "VIP_2")]
    Vip2,
    #[serde(rename = "VIP_3")]
    Vip3,
    #[serde(rename = "VIP_4")]
    Vip4,
    #[serde(rename = "THUONG")]
    Thuong,
}

/// Priority given to listings with no package at all
pub const NO_PACKAGE_PRIORITY: u8 = 6;

impl PackageTier {
    pub const ALL: [PackageTier; 5] = [
        PackageTier::Vip1,
        PackageTier::Vip2,
        PackageTier::Vip3,
        PackageTier::Vip4,
        PackageTier::Thuong,
    ];

    pub fn priority(self) -> u8 {
        match self {
            PackageTier::Vip1 => 1,
            PackageTier::Vip2 => 2,
            PackageTier::Vip3 => 3,
            PackageTier::Vip4 => 4,
            PackageTier::Thuong => 5,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            PackageTier::Vip1 => "VIP_1",
            PackageTier::Vip2 => "VIP_2",
            PackageTier::Vip3 => "VIP_3",
            PackageTier::Vip4 => "VIP_4",
            PackageTier::Thuong => "THUONG",
        }
    }

    /// Badge text shown on a card
    pub fn label(self) -> &'static str {
        match self {
            PackageTier::Vip1 => "VIP 1",
            PackageTier::Vip2 => "VIP 2",
            PackageTier::Vip3 => "VIP 3",
            PackageTier::Vip4 => "VIP 4",
            PackageTier::Thuong => "Tin thường",
        }
    }
}

/// Sort priority of an optional package; listings without one go last
pub fn package_priority(tier: Option<PackageTier>) -> u8 {
    tier.map(PackageTier::priority).unwrap_or(NO_PACKAGE_PRIORITY)
}

/// Kind of accommodation, sent to the backend as `propertyType`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Room,
    Apartment,
    MiniApartment,
    House,
    Dormitory,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Room,
        PropertyType::Apartment,
        PropertyType::MiniApartment,
        PropertyType::House,
        PropertyType::Dormitory,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PropertyType::Room => "ROOM",
            PropertyType::Apartment => "APARTMENT",
            PropertyType::MiniApartment => "MINI_APARTMENT",
            PropertyType::House => "HOUSE",
            PropertyType::Dormitory => "DORMITORY",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Room => "Phòng trọ",
            PropertyType::Apartment => "Căn hộ",
            PropertyType::MiniApartment => "Căn hộ mini",
            PropertyType::House => "Nhà nguyên căn",
            PropertyType::Dormitory => "Ký túc xá",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown property type: {s}"))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Amenity flags exposed as the feature filter axis. Each is a boolean query param.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Wifi,
    AirConditioner,
    Parking,
    PrivateBathroom,
    Pets,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::Wifi,
        Feature::AirConditioner,
        Feature::Parking,
        Feature::PrivateBathroom,
        Feature::Pets,
    ];

    /// Query parameter name
    pub fn code(self) -> &'static str {
        match self {
            Feature::Wifi => "hasWifi",
            Feature::AirConditioner => "hasAirConditioner",
            Feature::Parking => "hasParking",
            Feature::PrivateBathroom => "hasPrivateBathroom",
            Feature::Pets => "allowPets",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Wifi => "Wifi",
            Feature::AirConditioner => "Điều hòa",
            Feature::Parking => "Chỗ để xe",
            Feature::PrivateBathroom => "WC riêng",
            Feature::Pets => "Cho nuôi thú cưng",
        }
    }

    pub fn from_code(code: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities_strictly_increase() {
        let priorities: Vec<u8> = PackageTier::ALL.iter().map(|t| t.priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] < w[1]));
        assert!(priorities.iter().all(|p| *p < NO_PACKAGE_PRIORITY));
        assert_eq!(package_priority(None), NO_PACKAGE_PRIORITY);
    }

    #[test]
    fn test_package_wire_names() {
        for tier in PackageTier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.wire_name()));
        }
        assert!(serde_json::from_str::<PackageTier>("\"GOLD\"").is_err());
    }

    #[test]
    fn test_property_type_codes() {
        assert_eq!(
            serde_json::to_string(&PropertyType::MiniApartment).unwrap(),
            "\"MINI_APARTMENT\""
        );
        assert_eq!("house".parse::<PropertyType>(), Ok(PropertyType::House));
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_feature_codes_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_code(feature.code()), Some(feature));
        }
        assert_eq!(Feature::from_code("hasPool"), None);
    }
}
