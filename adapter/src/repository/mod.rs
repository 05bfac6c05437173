pub mod assistant;
pub mod booking;
pub mod health;
pub mod ledger;
pub mod location;
pub mod report;
pub mod user;
