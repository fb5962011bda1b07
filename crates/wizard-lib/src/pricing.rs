//! Instance pricing
//!
//! The wizard works from an on-demand/spot price pair resolved elsewhere.
//! [`StaticPriceTable`] is the built-in resolver for the families the
//! presets use in us-east-1.

use serde::{Deserialize, Serialize};

pub const HOURS_PER_MONTH: f64 = 24.0 * 30.0;

/// Spot price as a fraction of on-demand
pub const SPOT_PRICE_FACTOR: f64 = 0.3;

pub const CURRENCY: &str = "USD";

/// Hourly on-demand and spot price for one instance type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePair {
    pub on_demand: f64,
    pub spot: f64,
}

impl PricePair {
    pub fn from_on_demand(on_demand: f64) -> Self {
        Self {
            on_demand,
            spot: on_demand * SPOT_PRICE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnDemandPrice {
    pub price: f64,
    pub currency: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotPrice {
    pub price: f64,
    pub currency: String,
    pub unit: String,
    pub discount: String,
    pub interruption_risk: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPrice {
    pub on_demand: f64,
    pub spot: f64,
    pub savings: f64,
}

/// Price quote for an instance type in a region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub region: String,
    pub instance_type: String,
    pub on_demand: OnDemandPrice,
    pub spot: SpotPrice,
    pub monthly: MonthlyPrice,
}

impl PriceQuote {
    pub fn from_pair(region: &str, instance_type: &str, pair: PricePair) -> Self {
        let discount = if pair.on_demand > 0.0 {
            ((1.0 - pair.spot / pair.on_demand) * 100.0).round()
        } else {
            0.0
        };

        Self {
            region: region.to_string(),
            instance_type: instance_type.to_string(),
            on_demand: OnDemandPrice {
                price: pair.on_demand,
                currency: CURRENCY.to_string(),
                unit: "per hour".to_string(),
            },
            spot: SpotPrice {
                price: pair.spot,
                currency: CURRENCY.to_string(),
                unit: "per hour".to_string(),
                discount: format!("{}%", discount),
                interruption_risk: "Low-Medium".to_string(),
            },
            monthly: MonthlyPrice {
                on_demand: pair.on_demand * HOURS_PER_MONTH,
                spot: pair.spot * HOURS_PER_MONTH,
                savings: (pair.on_demand - pair.spot) * HOURS_PER_MONTH,
            },
        }
    }
}

/// Resolves a price pair for a region and instance type
pub trait PriceSource: Send + Sync {
    fn price(&self, region: &str, instance_type: &str) -> PricePair;

    fn quote(&self, region: &str, instance_type: &str) -> PriceQuote {
        PriceQuote::from_pair(region, instance_type, self.price(region, instance_type))
    }
}

/// (family, size, on-demand hourly price)
const US_EAST_1: &[(&str, &str, f64)] = &[
    ("c5", "large", 0.096),
    ("c5", "xlarge", 0.192),
    ("c5", "2xlarge", 0.384),
    ("m5", "large", 0.096),
    ("m5", "xlarge", 0.192),
    ("m5", "2xlarge", 0.384),
    ("t3", "medium", 0.0416),
    ("t3", "large", 0.0832),
    ("t3", "xlarge", 0.1664),
    ("c6g", "large", 0.0768),
    ("c6g", "xlarge", 0.1536),
    ("c6g", "2xlarge", 0.3072),
];

/// Built-in price table. Unknown regions or instance types price at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPriceTable;

impl PriceSource for StaticPriceTable {
    fn price(&self, region: &str, instance_type: &str) -> PricePair {
        let Some((family, size)) = instance_type.split_once('.') else {
            return PricePair::default();
        };

        let table = match region {
            "us-east-1" => US_EAST_1,
            _ => return PricePair::default(),
        };

        table
            .iter()
            .find(|(f, s, _)| *f == family && *s == size)
            .map(|(_, _, price)| PricePair::from_on_demand(*price))
            .unwrap_or_default()
    }
}
