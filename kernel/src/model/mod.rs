pub mod assistant;
pub mod booking;
pub mod calendar;
pub mod change;
pub mod day_status;
pub mod id;
pub mod location;
pub mod policy;
pub mod report;
pub mod role;
pub mod user;
pub mod waitlist;
