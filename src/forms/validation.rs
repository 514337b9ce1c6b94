/// Ordered validation rules for the company and salary forms.
///
/// Each form runs its rules in a fixed order and stops at the first failure.
/// A form that passes every rule yields its typed payload directly, so an
/// unvalidated payload can never be built.
use chrono::NaiveDate;

use super::FieldSource;
use crate::models::{CompanyPayload, Department, Gender, Industry, SalaryPayload};

/// Field names shared by the view layer and the rules.
pub mod fields {
    pub const COMPANY_NAME: &str = "company_name";
    pub const COMPANY_SIZE: &str = "company_size";
    pub const INDUSTRY: &str = "industry";
    pub const COUNTRY: &str = "country";

    pub const COMPANY_HASH: &str = "company_hash";
    pub const YEARS_AT_COMPANY: &str = "years_at_the_company";
    pub const TOTAL_EXPERIENCE: &str = "total_experience";
    pub const SALARY_AMOUNT: &str = "salary_amount";
    pub const GENDER: &str = "gender";
    pub const DEPARTMENT: &str = "department";
    pub const JOB_TITLE: &str = "job_title";
    pub const WELL_COMPENSATED: &str = "is_well_compensated";
}

pub const MAX_COMPANY_SIZE: u32 = 1_000_000;
pub const MAX_YEARS: u32 = 50;

/// A violated rule. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Company name must be between 2 and 100 characters.")]
    CompanyName,
    #[error("Company size must be a number between 1 and 1,000,000.")]
    CompanySize,
    #[error("Please select an industry.")]
    Industry,
    #[error("Country must be between 2 and 100 characters.")]
    Country,
    #[error("Please select a company.")]
    Company,
    #[error("Years at the company must be a number between 0 and 50.")]
    YearsAtCompany,
    #[error("Total experience must be a number between 0 and 50.")]
    TotalExperience,
    #[error("Total experience cannot be less than years at the company.")]
    ExperienceBelowTenure,
    #[error("Salary amount must be a positive number.")]
    SalaryAmount,
    #[error("Please select a gender.")]
    Gender,
    #[error("Please select a department.")]
    Department,
    #[error("Job title must be between 1 and 100 characters.")]
    JobTitle,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Validate the company form and build its payload.
pub fn validate_company(form: &dyn FieldSource) -> Result<CompanyPayload, ValidationError> {
    let company_name = trimmed(form, fields::COMPANY_NAME);
    if !char_len_between(&company_name, 2, 100) {
        return Err(ValidationError::CompanyName);
    }

    let company_size = parse_bounded(&trimmed(form, fields::COMPANY_SIZE), 1, MAX_COMPANY_SIZE)
        .ok_or(ValidationError::CompanySize)?;

    let company_industry: Industry = trimmed(form, fields::INDUSTRY)
        .parse()
        .map_err(|_| ValidationError::Industry)?;

    let country = trimmed(form, fields::COUNTRY);
    if !char_len_between(&country, 2, 100) {
        return Err(ValidationError::Country);
    }

    Ok(CompanyPayload {
        company_name,
        company_size,
        company_industry,
        country,
    })
}

/// Validate the salary form and build its payload dated `today`.
pub fn validate_salary(
    form: &dyn FieldSource,
    today: NaiveDate,
) -> Result<SalaryPayload, ValidationError> {
    let company_hash = trimmed(form, fields::COMPANY_HASH);
    if company_hash.is_empty() {
        return Err(ValidationError::Company);
    }

    let years_at_the_company =
        parse_bounded(&trimmed(form, fields::YEARS_AT_COMPANY), 0, MAX_YEARS)
            .ok_or(ValidationError::YearsAtCompany)?;

    let total_experience = parse_bounded(&trimmed(form, fields::TOTAL_EXPERIENCE), 0, MAX_YEARS)
        .ok_or(ValidationError::TotalExperience)?;

    if total_experience < years_at_the_company {
        return Err(ValidationError::ExperienceBelowTenure);
    }

    let salary_amount = parse_amount(&trimmed(form, fields::SALARY_AMOUNT))
        .ok_or(ValidationError::SalaryAmount)?;

    let gender: Gender = trimmed(form, fields::GENDER)
        .parse()
        .map_err(|_| ValidationError::Gender)?;

    let department: Department = trimmed(form, fields::DEPARTMENT)
        .parse()
        .map_err(|_| ValidationError::Department)?;

    let job_title = trimmed(form, fields::JOB_TITLE);
    if !char_len_between(&job_title, 1, 100) {
        return Err(ValidationError::JobTitle);
    }

    let is_well_compensated = trimmed(form, fields::WELL_COMPENSATED) == "true";

    Ok(SalaryPayload {
        company_hash,
        years_at_the_company,
        total_experience,
        salary_amount,
        gender,
        department,
        job_title,
        submission_date: today.format("%Y-%m-%d").to_string(),
        is_well_compensated,
    })
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Read a field and trim it; absent fields read as empty.
fn trimmed(form: &dyn FieldSource, name: &str) -> String {
    form.field(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Length check in characters, not bytes.
fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// Parse a whole integer within `[min, max]`.
fn parse_bounded(value: &str, min: u32, max: u32) -> Option<u32> {
    value
        .parse::<i64>()
        .ok()
        .filter(|n| (i64::from(min)..=i64::from(max)).contains(n))
        .and_then(|n| u32::try_from(n).ok())
}

/// Parse a finite, non-negative amount.
fn parse_amount(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bounded_is_strict() {
        assert_eq!(parse_bounded("12", 0, 50), Some(12));
        assert_eq!(parse_bounded("0", 0, 50), Some(0));
        assert_eq!(parse_bounded("51", 0, 50), None);
        assert_eq!(parse_bounded("-1", 0, 50), None);
        assert_eq!(parse_bounded("12abc", 0, 50), None);
        assert_eq!(parse_bounded("3.5", 0, 50), None);
        assert_eq!(parse_bounded("", 0, 50), None);
        assert_eq!(parse_bounded("99999999999999999999", 0, 50), None);
    }

    #[test]
    fn parse_amount_rejects_nan_and_negatives() {
        assert_eq!(parse_amount("52000.50"), Some(52000.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn length_counts_characters() {
        // Two characters, four bytes.
        assert!(char_len_between("ßü", 2, 100));
        assert!(!char_len_between("A", 2, 100));
        assert!(!char_len_between(&"x".repeat(101), 2, 100));
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            ValidationError::CompanySize.to_string(),
            "Company size must be a number between 1 and 1,000,000."
        );
        assert_eq!(
            ValidationError::ExperienceBelowTenure.to_string(),
            "Total experience cannot be less than years at the company."
        );
        assert_eq!(
            ValidationError::SalaryAmount.to_string(),
            "Salary amount must be a positive number."
        );
    }
}
