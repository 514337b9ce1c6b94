//! Navigation guard for pages that require a prior salary submission.
//!
//! The graph page is only meaningful once the visitor has submitted a
//! salary: the backend keys the "you are here" bucket on the `salary_id` and
//! `salary_amount` cookies. Visitors missing either one are sent to the
//! salary form.

use crate::api::endpoints::SALARY_PAGE;

pub const SALARY_ID_COOKIE: &str = "salary_id";
pub const SALARY_AMOUNT_COOKIE: &str = "salary_amount";

/// Outcome of the guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Look up one cookie in a `Cookie` header (`a=1; b=2`).
///
/// The value is everything after the first `=`.
pub fn get_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
}

/// Allow only when both session cookies are present and non-empty.
pub fn check(cookie_header: &str) -> GuardDecision {
    let present = |name| get_cookie(cookie_header, name).is_some_and(|v| !v.is_empty());

    if present(SALARY_ID_COOKIE) && present(SALARY_AMOUNT_COOKIE) {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect(SALARY_PAGE.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_with_both_cookies() {
        assert_eq!(check("salary_id=12; salary_amount=50000"), GuardDecision::Allow);
        assert_eq!(check("theme=dark;salary_amount=1;salary_id=x"), GuardDecision::Allow);
    }

    #[test]
    fn redirects_when_either_cookie_is_missing() {
        let redirect = GuardDecision::Redirect("/employee/submit".to_string());
        assert_eq!(check(""), redirect);
        assert_eq!(check("salary_id=12"), redirect);
        assert_eq!(check("salary_amount=50000"), redirect);
    }

    #[test]
    fn empty_values_count_as_missing() {
        assert_eq!(
            check("salary_id=; salary_amount=50000"),
            GuardDecision::Redirect("/employee/submit".to_string())
        );
    }

    #[test]
    fn get_cookie_matches_whole_names() {
        let header = "my_salary_id=1; salary_id=a=b";
        assert_eq!(get_cookie(header, "salary_id"), Some("a=b"));
        assert_eq!(get_cookie(header, "salary"), None);
    }
}
