pub mod assistant;
pub mod booking;
pub mod calendar;
pub mod location;
pub mod report;
pub mod roster;
pub mod user;
