pub mod chefs;
pub mod delivery_addresses;
pub mod meals;
pub mod subscriptions;
