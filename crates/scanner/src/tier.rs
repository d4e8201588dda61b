//! Subscription tiers and their scanner entitlements.
//!
//! A closed enumeration mapped through exhaustive matches: a typo'd tier
//! string can only ever parse to `Free`, never silently grant access, and
//! adding a tier or scanner forces every table here to be revisited.

use crate::criteria::ScanKind;

/// Account subscription tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Pro,
}

impl SubscriptionTier {
    /// Parse the stored string form. Unknown input maps to `Free`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "premium" => SubscriptionTier::Premium,
            "pro" => SubscriptionTier::Pro,
            _ => SubscriptionTier::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Pro => "pro",
        }
    }

    /// Result limit for a scanner at this tier.
    ///
    /// `None` means the scanner is not available at this tier at all
    /// (the low-float scan is a paid feature).
    pub fn scan_limit(&self, kind: ScanKind) -> Option<usize> {
        let limit = match (self, kind) {
            (SubscriptionTier::Free, ScanKind::Momentum) => 5,
            (SubscriptionTier::Free, ScanKind::Gappers) => 3,
            (SubscriptionTier::Free, ScanKind::LowFloat) => 0,
            (SubscriptionTier::Premium, ScanKind::Momentum) => 15,
            (SubscriptionTier::Premium, ScanKind::Gappers) => 10,
            (SubscriptionTier::Premium, ScanKind::LowFloat) => 10,
            (SubscriptionTier::Pro, ScanKind::Momentum) => 25,
            (SubscriptionTier::Pro, ScanKind::Gappers) => 20,
            (SubscriptionTier::Pro, ScanKind::LowFloat) => 20,
        };
        (limit > 0).then_some(limit)
    }
}
