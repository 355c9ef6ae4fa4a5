//! Best-effort social presence discovery.
//!
//! Scans the entity's website for social profile links; explicitly
//! configured handles always win over discovered ones. Follower counts come
//! from a [`FollowerEstimator`] so the external audience provider can be
//! swapped out in tests.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::types::SocialSignal;

/// `(platform id, link pattern, saturation point)` — the saturation point is
/// the follower count treated as full audience overlap.
static PLATFORM_PATTERNS: LazyLock<Vec<(&'static str, Regex, u64)>> = LazyLock::new(|| {
    vec![
        (
            "instagram",
            Regex::new(r"instagram\.com/([A-Za-z0-9_.]+)").expect("static regex"),
            400_000,
        ),
        (
            "facebook",
            Regex::new(r"facebook\.com/([A-Za-z0-9.\-]+)").expect("static regex"),
            500_000,
        ),
        (
            "tiktok",
            Regex::new(r"tiktok\.com/@([A-Za-z0-9_.]+)").expect("static regex"),
            600_000,
        ),
        (
            "linkedin",
            Regex::new(r"linkedin\.com/company/([A-Za-z0-9\-]+)").expect("static regex"),
            150_000,
        ),
        (
            "x",
            Regex::new(r"(?:twitter|x)\.com/([A-Za-z0-9_]+)").expect("static regex"),
            300_000,
        ),
        (
            "youtube",
            Regex::new(r"youtube\.com/@([A-Za-z0-9_.\-]+)").expect("static regex"),
            500_000,
        ),
    ]
});

/// Path segments that look like handles but are share/login plumbing.
const HANDLE_DENYLIST: &[&str] = &["share", "sharer.php", "intent", "login", "home", "hashtag"];

/// External audience provider boundary: maps a resolved handle to a follower
/// estimate. `None` means the provider has no data for the handle.
pub trait FollowerEstimator: Send + Sync {
    fn estimate(&self, platform: &str, handle: &str) -> Option<u64>;
}

/// Deterministic stand-in for the external audience provider: derives a
/// stable pseudo-estimate from `sha256(platform:handle)` scaled into a
/// plausible range. Identical inputs always yield identical estimates.
#[derive(Debug, Default)]
pub struct HashFollowerEstimator;

impl FollowerEstimator for HashFollowerEstimator {
    fn estimate(&self, platform: &str, handle: &str) -> Option<u64> {
        let digest = Sha256::digest(format!("{platform}:{handle}"));
        let raw = u64::from_be_bytes(digest[..8].try_into().ok()?);
        // 500..=100_000 followers.
        Some(500 + raw % 99_501)
    }
}

/// Extract social handles from page HTML, first match per platform.
pub(crate) fn discover_handles(html: &str) -> HashMap<String, String> {
    let mut handles = HashMap::new();
    for (platform, pattern, _) in PLATFORM_PATTERNS.iter() {
        for captures in pattern.captures_iter(html) {
            let handle = captures[1].to_string();
            if HANDLE_DENYLIST.contains(&handle.to_lowercase().as_str()) {
                continue;
            }
            handles.entry((*platform).to_string()).or_insert(handle);
            break;
        }
    }
    handles
}

/// Merge explicitly configured profiles over discovered ones, then resolve
/// each handle to a follower estimate and overlap fraction.
pub(crate) fn resolve_signals(
    discovered: HashMap<String, String>,
    explicit: &HashMap<String, String>,
    estimator: &dyn FollowerEstimator,
) -> HashMap<String, SocialSignal> {
    let mut merged = discovered;
    for (platform, handle) in explicit {
        merged.insert(platform.trim().to_lowercase(), handle.clone());
    }

    let mut signals = HashMap::new();
    for (platform, handle) in merged {
        let Some(followers) = estimator.estimate(&platform, &handle) else {
            tracing::debug!(platform = %platform, handle = %handle, "no follower estimate");
            continue;
        };
        let saturation = PLATFORM_PATTERNS
            .iter()
            .find(|(id, ..)| *id == platform)
            .map_or(500_000, |(.., sat)| *sat);
        #[allow(clippy::cast_precision_loss)]
        let overlap = (followers as f64 / saturation as f64).clamp(0.0, 1.0);
        signals.insert(
            platform.clone(),
            SocialSignal {
                platform,
                handle,
                followers,
                overlap,
            },
        );
    }
    signals
}
