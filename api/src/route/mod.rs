pub mod assistant;
pub mod booking;
pub mod calendar;
pub mod event;
pub mod health;
pub mod location;
pub mod report;
pub mod user;
pub mod v1;
