//! Domain records and request DTOs.

pub mod submission;
