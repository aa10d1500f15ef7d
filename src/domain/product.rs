//! Product names as requested by clients, and the carrier container/size
//! codes the aggregator expects for each of them.

use crate::utils::error::RatesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    Dry,
    Fl,
    Ot,
    Rf,
}

impl ContainerType {
    pub fn code(&self) -> &'static str {
        match self {
            ContainerType::Dry => "Dry",
            ContainerType::Fl => "Fl",
            ContainerType::Ot => "Ot",
            ContainerType::Rf => "Rf",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeType {
    pub size_type_id: i64,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProductType {
    Dry20,
    Flat20,
    OpenTop20,
    Reefer20,
    Dry40,
    Flat40,
    OpenTop40,
    HighCubeDry40,
    HighCubeFlat40,
    HighCubeOpenTop40,
    HighCubeReefer40,
}

impl ProductType {
    pub const ALL: [ProductType; 11] = [
        ProductType::Dry20,
        ProductType::Flat20,
        ProductType::OpenTop20,
        ProductType::Reefer20,
        ProductType::Dry40,
        ProductType::Flat40,
        ProductType::OpenTop40,
        ProductType::HighCubeDry40,
        ProductType::HighCubeFlat40,
        ProductType::HighCubeOpenTop40,
        ProductType::HighCubeReefer40,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProductType::Dry20 => "20' Dry",
            ProductType::Flat20 => "20' Flat",
            ProductType::OpenTop20 => "20' Open Top",
            ProductType::Reefer20 => "20' Reefer",
            ProductType::Dry40 => "40' Dry",
            ProductType::Flat40 => "40' Flat",
            ProductType::OpenTop40 => "40' Open Top",
            ProductType::HighCubeDry40 => "40' HC Dry",
            ProductType::HighCubeFlat40 => "40' HC Flat",
            ProductType::HighCubeOpenTop40 => "40' HC Open Top",
            ProductType::HighCubeReefer40 => "40' HC Reefer",
        }
    }

    pub fn container_type(&self) -> ContainerType {
        match self {
            ProductType::Dry20 | ProductType::Dry40 | ProductType::HighCubeDry40 => {
                ContainerType::Dry
            }
            ProductType::Flat20 | ProductType::Flat40 | ProductType::HighCubeFlat40 => {
                ContainerType::Fl
            }
            ProductType::OpenTop20 | ProductType::OpenTop40 | ProductType::HighCubeOpenTop40 => {
                ContainerType::Ot
            }
            ProductType::Reefer20 | ProductType::HighCubeReefer40 => ContainerType::Rf,
        }
    }

    pub fn size_type(&self) -> SizeType {
        let (size_type_id, name) = match self {
            ProductType::Dry20 => (1, "20DRY"),
            ProductType::Flat20 => (11, "20FL"),
            ProductType::OpenTop20 => (9, "20OT"),
            ProductType::Reefer20 => (4, "20RF"),
            ProductType::Dry40 => (2, "40DRY"),
            ProductType::Flat40 => (12, "40FL"),
            ProductType::OpenTop40 => (10, "40OT"),
            ProductType::HighCubeDry40 => (3, "40HC"),
            ProductType::HighCubeFlat40 => (15, "40HF"),
            ProductType::HighCubeOpenTop40 => (14, "40HO"),
            ProductType::HighCubeReefer40 => (6, "40RF"),
        };
        SizeType { size_type_id, name }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProductType {
    type Err = RatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| RatesError::UnsupportedProduct {
                product_type: s.to_string(),
            })
    }
}

impl TryFrom<String> for ProductType {
    type Error = RatesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductType> for String {
    fn from(value: ProductType) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for product in ProductType::ALL {
            assert_eq!(product.name().parse::<ProductType>().unwrap(), product);
        }
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let err = "45' Dry".parse::<ProductType>().unwrap_err();
        assert!(matches!(err, RatesError::UnsupportedProduct { product_type } if product_type == "45' Dry"));
    }

    #[test]
    fn test_lookup_table() {
        assert_eq!(ProductType::Dry20.container_type(), ContainerType::Dry);
        assert_eq!(ProductType::Dry20.size_type().size_type_id, 1);
        assert_eq!(ProductType::HighCubeDry40.size_type().name, "40HC");
        assert_eq!(ProductType::HighCubeReefer40.container_type(), ContainerType::Rf);
        assert_eq!(ProductType::HighCubeReefer40.size_type().size_type_id, 6);
        assert_eq!(ProductType::OpenTop40.size_type().size_type_id, 10);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&ProductType::HighCubeOpenTop40).unwrap();
        assert_eq!(json, "\"40' HC Open Top\"");

        let parsed: ProductType = serde_json::from_str("\"20' Reefer\"").unwrap();
        assert_eq!(parsed, ProductType::Reefer20);

        assert!(serde_json::from_str::<ProductType>("\"Pallet\"").is_err());
    }
}
