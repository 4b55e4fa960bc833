pub mod auth;
pub mod client;
pub mod postgrest;
pub mod repositories;

pub use auth::SupabaseAuth;
pub use client::{SupabaseClient, SupabaseConfig};
