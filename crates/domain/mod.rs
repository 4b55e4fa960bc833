pub mod entities;
pub mod repositories;
pub mod session_events;
pub mod value_objects;
