pub mod costing;
pub mod dispatch;
pub mod error;
pub mod merit_order;
pub mod plan;
pub mod summary;
pub mod unit;
