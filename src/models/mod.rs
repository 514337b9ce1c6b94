//! Domain model: payloads, reference enums, and aggregate statistics.

pub mod entities;
pub mod enums;

pub use entities::{
    BarBucket, Company, CompanyPayload, ErrorBody, GraphStats, PieEntry, SalaryPayload,
};
pub use enums::{
    CompanySize, Department, ExperienceLevel, Gender, Industry, UnknownValue, display_label,
};
