pub mod addresses;
pub mod auth;
pub mod chefs;
pub mod meals;
pub mod pages;
pub mod plans;
pub mod subscriptions;
