use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived from `active_until`; there is no stored status column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

impl SubscriptionStatus {
    pub fn derive(active_until: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if active_until > now {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Expired
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
        };
        write!(f, "{}", status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn status_flips_at_active_until() {
        let now = Utc::now();
        assert_eq!(
            SubscriptionStatus::derive(now + Duration::seconds(1), now),
            SubscriptionStatus::Active
        );
        assert_eq!(SubscriptionStatus::derive(now, now), SubscriptionStatus::Expired);
        assert_eq!(
            SubscriptionStatus::derive(now - Duration::days(1), now),
            SubscriptionStatus::Expired
        );
    }
}
