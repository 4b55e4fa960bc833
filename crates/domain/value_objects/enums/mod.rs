pub mod oauth_providers;
pub mod subscription_statuses;
