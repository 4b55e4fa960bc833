pub mod chefs;
pub mod delivery_address;
pub mod enums;
pub mod identity;
pub mod plans;
pub mod redirect;
pub mod routes;
pub mod subscriptions;
