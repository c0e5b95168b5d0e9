pub mod handlers;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod uploads;
