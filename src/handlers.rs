pub mod audit;
pub mod auth;
pub mod calendar;
pub mod complaint;
pub mod dashboard;
pub mod employee;
pub mod internal_complaint;
pub mod kyc;
pub mod notification;
pub mod property;
pub mod search;
pub mod vehicle;
