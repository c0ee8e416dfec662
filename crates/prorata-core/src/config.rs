use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;

use crate::DEFAULT_ELIGIBILITY_THRESHOLD;

/// Serde adapter for u128 ↔ TOML: serialize as string, deserialize from string or integer.
/// TOML crate doesn't natively support u128, so we round-trip through strings.
mod u128_toml {
    use super::*;

    pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        use serde::de::{self, Visitor};
        struct U128Visitor;

        impl<'de> Visitor<'de> for U128Visitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a u128 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                if v >= 0 {
                    Ok(v as u128)
                } else {
                    Err(E::custom("negative value for u128"))
                }
            }
        }

        d.deserialize_any(U128Visitor)
    }
}

/// Deployment configuration for a distributor instance.
/// Each deployment gets its own token identity and eligibility policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributorConfig {
    pub token_name: String,
    pub token_symbol: String,
    /// Minimum share balance to count as an active holder.
    #[serde(with = "u128_toml")]
    pub eligibility_threshold: u128,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            token_name: "Prorata".to_string(),
            token_symbol: "PRT".to_string(),
            eligibility_threshold: DEFAULT_ELIGIBILITY_THRESHOLD,
        }
    }
}

impl DistributorConfig {
    /// Load config from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: DistributorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from environment variables
    /// Useful for containerized deployments
    pub fn load_from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let token_name =
            std::env::var("PRORATA_TOKEN_NAME").unwrap_or_else(|_| "Prorata".to_string());

        let token_symbol =
            std::env::var("PRORATA_TOKEN_SYMBOL").unwrap_or_else(|_| "PRT".to_string());

        let eligibility_threshold: u128 = std::env::var("PRORATA_ELIGIBILITY_THRESHOLD")
            .unwrap_or_else(|_| DEFAULT_ELIGIBILITY_THRESHOLD.to_string())
            .parse()?;

        Ok(Self {
            token_name,
            token_symbol,
            eligibility_threshold,
        })
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.token_name.is_empty() {
            return Err("token_name cannot be empty".to_string());
        }

        if self.token_symbol.is_empty() || self.token_symbol.len() > 12 {
            return Err("token_symbol must be 1-12 characters".to_string());
        }

        if self.eligibility_threshold == 0 {
            // A zero threshold would admit zero-balance accounts as holders
            return Err("eligibility_threshold must be >= 1".to_string());
        }

        Ok(())
    }
}
