pub mod auth;
pub mod calendar;
pub mod complaint;
pub mod dashboard;
pub mod employee;
pub mod kyc;
pub mod notification;
pub mod property;
pub mod search;
pub mod vehicle;
