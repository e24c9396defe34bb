use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{BrandId, CategoryId, MinorUnits, OfferId, ProductId, RewardId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBalance {
    pub reward_id: RewardId,
    pub program_name: String,
    pub balance: i64,
    pub currency: String,
    #[serde(default)]
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl RewardBalance {
    pub fn balance_units(&self) -> MinorUnits {
        MinorUnits::new(self.balance, self.decimals)
    }

    pub fn units(&self, value: i64) -> MinorUnits {
        MinorUnits::new(value, self.decimals)
    }
}

/// Pre-computed swap quote. `amount` is the cost in the reward's currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmountResponse {
    pub amount: i64,
    pub currency: String,
    pub receive_amount: i64,
    pub receive_currency: String,
    #[serde(default)]
    pub receive_decimals: u8,
    #[serde(default)]
    pub fee: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

impl SwapAmountResponse {
    pub fn receive_units(&self) -> MinorUnits {
        MinorUnits::new(self.receive_amount, self.receive_decimals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDetail {
    pub offer_id: OfferId,
    pub brand_name: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub offer_id: OfferId,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub brand_id: BrandId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub offer_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub currency: String,
    #[serde(default)]
    pub decimals: u8,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub discounts: Vec<ProductDiscount>,
}

impl Product {
    /// Price after the single largest discount, floored at zero.
    pub fn effective_price(&self) -> i64 {
        let best_reduction = self
            .discounts
            .iter()
            .map(|discount| discount.reduction(self.price))
            .max()
            .unwrap_or(0);
        (self.price - best_reduction).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProductDiscount", into = "RawProductDiscount")]
pub enum ProductDiscount {
    Percentage(f64),
    Amount(i64),
    None,
}

impl ProductDiscount {
    pub fn reduction(&self, price: i64) -> i64 {
        match *self {
            Self::Percentage(pct) => (price as f64 * pct / 100.0).round() as i64,
            Self::Amount(amount) => amount.min(price.max(0)),
            Self::None => 0,
        }
    }
}

/// Wire shape: two nullable fields, at most one of which may be set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RawProductDiscount {
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscountError {
    #[error("discount sets both percentage ({percentage}) and amount ({amount})")]
    BothSet { percentage: f64, amount: i64 },
    #[error("discount percentage {0} is outside 0..=100")]
    PercentageOutOfRange(f64),
    #[error("discount amount {0} is negative")]
    NegativeAmount(i64),
}

impl TryFrom<RawProductDiscount> for ProductDiscount {
    type Error = DiscountError;

    fn try_from(raw: RawProductDiscount) -> Result<Self, Self::Error> {
        match (raw.percentage, raw.amount) {
            (Some(percentage), Some(amount)) => Err(DiscountError::BothSet { percentage, amount }),
            (Some(pct), None) if !pct.is_finite() || !(0.0..=100.0).contains(&pct) => {
                Err(DiscountError::PercentageOutOfRange(pct))
            }
            (Some(pct), None) => Ok(Self::Percentage(pct)),
            (None, Some(amount)) if amount < 0 => Err(DiscountError::NegativeAmount(amount)),
            (None, Some(amount)) => Ok(Self::Amount(amount)),
            (None, None) => Ok(Self::None),
        }
    }
}

impl From<ProductDiscount> for RawProductDiscount {
    fn from(value: ProductDiscount) -> Self {
        match value {
            ProductDiscount::Percentage(pct) => Self {
                percentage: Some(pct),
                amount: None,
            },
            ProductDiscount::Amount(amount) => Self {
                percentage: None,
                amount: Some(amount),
            },
            ProductDiscount::None => Self::default(),
        }
    }
}

/// Everything the widget displays outside the redemption flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub brands: Vec<Brand>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub products: Vec<Product>,
}
