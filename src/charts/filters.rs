/// Chart filter values and their query-string encoding.
use url::form_urlencoded;

/// Recognized filter keys, in query-string order.
pub const FILTER_KEYS: [&str; 6] = [
    "company_hash",
    "industry",
    "department",
    "experience_level",
    "gender",
    "range_steps",
];

/// Raised when a filter edit names a key the graph endpoints do not accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}' (expected one of: {keys})", keys = FILTER_KEYS.join(", "))]
pub struct UnknownFilter(pub String);

/// Current filter selection. Empty strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartFilters {
    pub company_hash: String,
    pub industry: String,
    pub department: String,
    pub experience_level: String,
    pub gender: String,
    /// Bucket width; the backend uses 1000 when absent.
    pub range_steps: String,
}

impl ChartFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one filter by its query key. An empty value clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), UnknownFilter> {
        let slot = match key {
            "company_hash" | "company" => &mut self.company_hash,
            "industry" => &mut self.industry,
            "department" => &mut self.department,
            "experience_level" => &mut self.experience_level,
            "gender" => &mut self.gender,
            "range_steps" => &mut self.range_steps,
            other => return Err(UnknownFilter(other.to_string())),
        };
        *slot = value.trim().to_string();
        Ok(())
    }

    /// Copy with surrounding whitespace stripped from every value.
    pub fn trimmed(self) -> Self {
        let trim = |value: String| value.trim().to_string();
        Self {
            company_hash: trim(self.company_hash),
            industry: trim(self.industry),
            department: trim(self.department),
            experience_level: trim(self.experience_level),
            gender: trim(self.gender),
            range_steps: trim(self.range_steps),
        }
    }

    /// Set a filter from optional CLI input.
    pub fn with(mut self, key: &str, value: Option<&str>) -> Result<Self, UnknownFilter> {
        self.set(key, value.unwrap_or(""))?;
        Ok(self)
    }

    /// Non-empty filters as `(key, value)` pairs in query order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        let values = [
            &self.company_hash,
            &self.industry,
            &self.department,
            &self.experience_level,
            &self.gender,
            &self.range_steps,
        ];
        FILTER_KEYS
            .iter()
            .zip(values)
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (*key, value.as_str()))
            .collect()
    }

    /// Form-urlencoded query without the leading `?`; empty when no filter is set.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Append the query to `path`, adding `?` only when there is one.
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_produce_bare_path() {
        let filters = ChartFilters::new();
        assert_eq!(filters.to_query(), "");
        assert_eq!(filters.apply_to("/api/graphs/employee"), "/api/graphs/employee");
    }

    #[test]
    fn empty_values_are_dropped() {
        let mut filters = ChartFilters::new();
        filters.set("department", "technology_it").unwrap();
        filters.set("gender", "").unwrap();
        filters.set("range_steps", "5000").unwrap();
        assert_eq!(filters.to_query(), "department=technology_it&range_steps=5000");
    }

    #[test]
    fn values_are_form_encoded() {
        let filters = ChartFilters::new()
            .with("company_hash", Some("a b&c"))
            .unwrap();
        assert_eq!(filters.to_query(), "company_hash=a+b%26c");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut filters = ChartFilters::new();
        let err = filters.set("salary", "1").unwrap_err();
        assert_eq!(err, UnknownFilter("salary".to_string()));
        assert!(err.to_string().contains("range_steps"));
    }

    #[test]
    fn key_order_is_fixed() {
        let mut filters = ChartFilters::new();
        filters.set("gender", "female").unwrap();
        filters.set("company", "abc").unwrap();
        let keys: Vec<_> = filters.pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["company_hash", "gender"]);
    }
}
