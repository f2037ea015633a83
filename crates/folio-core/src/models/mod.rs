//! Data models shared by the extraction pipeline and its drivers.

pub mod config;
pub mod invoice;
