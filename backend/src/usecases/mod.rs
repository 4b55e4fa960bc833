pub mod address_intake;
pub mod app_shell;
pub mod chef_profiles;
pub mod meals;
pub mod session_resolver;
pub mod subscription_builder;
