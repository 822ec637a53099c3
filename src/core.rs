pub mod actor;
pub mod bridge;
pub mod catalog;
pub mod dispatch;
pub mod marshal;
pub mod types;
