//! Channel catalog configuration (`config/channels.yaml`).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Per-industry multipliers applied on top of a channel's baseline metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndustryModifier {
    #[serde(default = "one")]
    pub cpm: f64,
    #[serde(default = "one")]
    pub ctr: f64,
    #[serde(default = "one")]
    pub conv: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for IndustryModifier {
    fn default() -> Self {
        Self {
            cpm: 1.0,
            ctr: 1.0,
            conv: 1.0,
        }
    }
}

/// One marketing channel as declared in the catalog file.
///
/// Baseline metrics are industry-agnostic averages; `industry_modifiers`
/// adjusts them per lowercase industry key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    pub category: String,
    pub avg_cpm: f64,
    pub avg_cpc: f64,
    pub avg_ctr: f64,
    pub avg_conv_rate: f64,
    #[serde(default)]
    pub industry_modifiers: HashMap<String, IndustryModifier>,
}

impl ChannelConfig {
    /// Generate a URL-safe slug from the channel name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Immutable value form of this channel, as consumed by the engine.
    #[must_use]
    pub fn definition(&self) -> ChannelDefinition {
        ChannelDefinition {
            slug: self.slug(),
            name: self.name.clone(),
            category: self.category.clone(),
            avg_cpm: self.avg_cpm,
            avg_cpc: self.avg_cpc,
            avg_ctr: self.avg_ctr,
            avg_conv_rate: self.avg_conv_rate,
            industry_modifiers: self.industry_modifiers.clone(),
        }
    }
}

/// A seeded marketing channel as the engine sees it: plain values, no
/// persistence handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDefinition {
    pub slug: String,
    pub name: String,
    pub category: String,
    pub avg_cpm: f64,
    pub avg_cpc: f64,
    pub avg_ctr: f64,
    pub avg_conv_rate: f64,
    #[serde(default)]
    pub industry_modifiers: HashMap<String, IndustryModifier>,
}

impl ChannelDefinition {
    /// Conversion modifier for an industry, matched case-insensitively.
    /// Unknown industries get `1.0`.
    #[must_use]
    pub fn conversion_modifier(&self, industry: &str) -> f64 {
        let key = industry.trim().to_lowercase();
        self.industry_modifiers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key)
            .map_or(1.0, |(_, m)| m.conv)
    }
}

/// Top-level shape of `config/channels.yaml`.
#[derive(Debug, Deserialize)]
pub struct ChannelsFile {
    pub channels: Vec<ChannelConfig>,
}

/// Load and validate the channel catalog file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Yaml`] if it fails to parse, or
/// [`ConfigError::DuplicateChannel`] if two channels slug to the same key.
pub fn load_channels_file(path: &Path) -> Result<Vec<ChannelConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let file: ChannelsFile = serde_yaml::from_str(&raw)?;

    let mut seen = HashSet::new();
    for channel in &file.channels {
        if !seen.insert(channel.slug()) {
            return Err(ConfigError::DuplicateChannel(channel.slug()));
        }
    }

    Ok(file.channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(name: &str) -> ChannelConfig {
        ChannelConfig {
            name: name.to_string(),
            category: "paid-search".to_string(),
            avg_cpm: 12.0,
            avg_cpc: 1.5,
            avg_ctr: 0.035,
            avg_conv_rate: 0.045,
            industry_modifiers: HashMap::new(),
        }
    }

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(channel("Google Ads").slug(), "google-ads");
    }

    #[test]
    fn slug_drops_punctuation_and_collapses_hyphens() {
        assert_eq!(channel("TikTok -- Ads! (Beta)").slug(), "tiktok-ads-beta");
    }

    #[test]
    fn conversion_modifier_defaults_to_one() {
        let def = channel("Email").definition();
        assert!((def.conversion_modifier("ecommerce") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn conversion_modifier_matches_case_insensitively() {
        let mut ch = channel("Meta Ads");
        ch.industry_modifiers.insert(
            "Ecommerce".to_string(),
            IndustryModifier {
                cpm: 1.0,
                ctr: 1.0,
                conv: 1.2,
            },
        );
        let def = ch.definition();
        assert!((def.conversion_modifier("ECOMMERCE") - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn definition_carries_slug_and_metrics() {
        let def = channel("Google Ads").definition();
        assert_eq!(def.slug, "google-ads");
        assert!((def.avg_cpm - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn channels_yaml_parses_with_defaulted_modifiers() {
        let yaml = r"
channels:
  - name: Google Ads
    category: paid-search
    avg_cpm: 12.0
    avg_cpc: 1.5
    avg_ctr: 0.035
    avg_conv_rate: 0.045
    industry_modifiers:
      ecommerce:
        conv: 1.15
";
        let file: ChannelsFile = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(file.channels.len(), 1);
        let m = &file.channels[0].industry_modifiers["ecommerce"];
        assert!((m.conv - 1.15).abs() < f64::EPSILON);
        assert!((m.cpm - 1.0).abs() < f64::EPSILON, "cpm defaults to 1.0");
    }
}
