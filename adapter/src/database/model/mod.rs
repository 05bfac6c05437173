pub mod booking;
pub mod location;
pub mod user;
