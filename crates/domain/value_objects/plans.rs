use std::fmt::Display;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Cuisine preference stored when the caller leaves it blank.
pub const DEFAULT_CUISINE: &str = "All Cuisines";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Day,
    Week,
    Month,
}

/// Fixed price (INR) and length of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTerms {
    pub price: i32,
    pub duration_days: i64,
}

impl SubscriptionPlan {
    pub const ALL: [SubscriptionPlan; 3] = [
        SubscriptionPlan::Day,
        SubscriptionPlan::Week,
        SubscriptionPlan::Month,
    ];

    pub const fn terms(self) -> PlanTerms {
        match self {
            SubscriptionPlan::Day => PlanTerms {
                price: 299,
                duration_days: 1,
            },
            SubscriptionPlan::Week => PlanTerms {
                price: 1499,
                duration_days: 7,
            },
            SubscriptionPlan::Month => PlanTerms {
                price: 4999,
                duration_days: 30,
            },
        }
    }

    pub const fn price(self) -> i32 {
        self.terms().price
    }

    pub fn duration(self) -> Duration {
        Duration::days(self.terms().duration_days)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Day => "day",
            SubscriptionPlan::Week => "week",
            SubscriptionPlan::Month => "month",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Some(SubscriptionPlan::Day),
            "week" => Some(SubscriptionPlan::Week),
            "month" => Some(SubscriptionPlan::Month),
            _ => None,
        }
    }
}

impl Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display entry for the plan picker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanDto {
    pub id: SubscriptionPlan,
    pub name: &'static str,
    pub description: &'static str,
    pub price: i32,
    pub duration_days: i64,
    pub popular: bool,
}

impl From<SubscriptionPlan> for PlanDto {
    fn from(plan: SubscriptionPlan) -> Self {
        let (name, description) = match plan {
            SubscriptionPlan::Day => ("Trial Day", "Try our service for a day"),
            SubscriptionPlan::Week => ("1 Week Plan", "Perfect for a week of delicious meals"),
            SubscriptionPlan::Month => ("1 Month Plan", "Our most popular plan"),
        };
        let terms = plan.terms();

        Self {
            id: plan,
            name,
            description,
            price: terms.price,
            duration_days: terms.duration_days,
            popular: plan == SubscriptionPlan::Month,
        }
    }
}

pub fn plan_catalog() -> Vec<PlanDto> {
    SubscriptionPlan::ALL.into_iter().map(PlanDto::from).collect()
}
