use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(RewardId);
id_newtype!(OfferId);
id_newtype!(BrandId);
id_newtype!(CategoryId);
id_newtype!(ProductId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Production => "https://agent.me.app",
            Self::Staging => "https://staging.agent.me.app",
            Self::Development => "http://localhost:5173",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        }
    }
}

impl FromStr for Environment {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(UnknownVariant::new("environment", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedNetwork {
    #[default]
    Ethereum,
    Polygon,
    Base,
    Arbitrum,
    Optimism,
}

impl SupportedNetwork {
    pub fn chain_id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Polygon => 137,
            Self::Base => 8453,
            Self::Arbitrum => 42161,
            Self::Optimism => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Polygon => "polygon",
            Self::Base => "base",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
        }
    }
}

impl FromStr for SupportedNetwork {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "mainnet" => Ok(Self::Ethereum),
            "polygon" => Ok(Self::Polygon),
            "base" => Ok(Self::Base),
            "arbitrum" => Ok(Self::Arbitrum),
            "optimism" => Ok(Self::Optimism),
            other => Err(UnknownVariant::new("network", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Largest `decimals` an amount may carry; `10^18` still fits an `i64`.
pub const MAX_DECIMALS: u8 = 18;

/// Integer amount in a currency's minor unit, displayed with `decimals`
/// fractional digits and `,` thousands grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinorUnits {
    pub value: i64,
    pub decimals: u8,
}

impl MinorUnits {
    pub fn new(value: i64, decimals: u8) -> Self {
        Self { value, decimals }
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.decimals.min(MAX_DECIMALS);
        let divisor = 10u128.pow(u32::from(decimals));
        let magnitude = u128::from(self.value.unsigned_abs());
        let whole = group_thousands(magnitude / divisor);
        if self.value < 0 {
            f.write_str("-")?;
        }
        f.write_str(&whole)?;
        if decimals > 0 {
            let fraction = magnitude % divisor;
            write!(f, ".{fraction:0width$}", width = usize::from(decimals))?;
        }
        Ok(())
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_points_without_fraction() {
        assert_eq!(MinorUnits::new(300, 0).to_string(), "300");
        assert_eq!(MinorUnits::new(1_250_000, 0).to_string(), "1,250,000");
    }

    #[test]
    fn formats_fractional_currency() {
        assert_eq!(MinorUnits::new(150_050, 2).to_string(), "1,500.50");
        assert_eq!(MinorUnits::new(7, 2).to_string(), "0.07");
        assert_eq!(MinorUnits::new(-1_005, 2).to_string(), "-10.05");
    }

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("Staging".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!(
            " BASE ".parse::<SupportedNetwork>(),
            Ok(SupportedNetwork::Base)
        );
        assert!("moon".parse::<SupportedNetwork>().is_err());
        assert_eq!(SupportedNetwork::Polygon.chain_id(), 137);
    }
}
