/// Wire types exchanged with the salary backend.
use serde::{Deserialize, Deserializer, Serialize};

use super::enums::{Department, Gender, Industry};

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// A company as listed by `GET /api/companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Opaque identifier assigned by the backend.
    pub hash: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Submission payloads
// ---------------------------------------------------------------------------

/// Body of a company submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyPayload {
    pub company_name: String,
    pub company_size: u32,
    pub company_industry: Industry,
    pub country: String,
}

/// Body of a salary submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryPayload {
    pub company_hash: String,
    pub years_at_the_company: u32,
    pub total_experience: u32,
    pub salary_amount: f64,
    pub gender: Gender,
    pub department: Department,
    pub job_title: String,
    /// `YYYY-MM-DD`, generated client-side.
    pub submission_date: String,
    pub is_well_compensated: bool,
}

/// Error body returned alongside a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Aggregate statistics
// ---------------------------------------------------------------------------

/// Response of the graph endpoints.
///
/// The employee endpoint names the reference value `current`; the company
/// benchmark endpoint names it `current_avg`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphStats {
    #[serde(default)]
    pub bar_graph: Vec<BarBucket>,
    #[serde(default, alias = "current_avg")]
    pub current: Option<f64>,
    #[serde(default)]
    pub pie_graph: Vec<PieEntry>,
}

/// One salary bucket of the distribution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BarBucket {
    pub range_start: f64,
    pub count: u64,
}

/// Count of submissions per well-compensated flag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PieEntry {
    #[serde(deserialize_with = "flag_from_int_or_bool")]
    pub is_well_compensated: bool,
    pub count: u64,
}

/// Accept `0`/`1` (what SQL aggregates return) as well as JSON booleans.
fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(n) => Ok(n != 0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_payload_serializes_wire_keys() {
        let payload = CompanyPayload {
            company_name: "Acme".to_string(),
            company_size: 120,
            company_industry: Industry::RealEstate,
            country: "Ethiopia".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["company_name"], "Acme");
        assert_eq!(json["company_size"], 120);
        assert_eq!(json["company_industry"], "real_estate");
        assert_eq!(json["country"], "Ethiopia");
    }

    #[test]
    fn graph_stats_accepts_current_avg_alias() {
        let json = r#"{"bar_graph": [{"range_start": 1000, "count": 2}],
                       "current_avg": 1500.5,
                       "pie_graph": []}"#;
        let stats: GraphStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.current, Some(1500.5));
        assert_eq!(stats.bar_graph[0].range_start, 1000.0);
    }

    #[test]
    fn pie_entry_accepts_int_and_bool_flags() {
        let json = r#"[{"is_well_compensated": 1, "count": 4},
                       {"is_well_compensated": false, "count": 2}]"#;
        let entries: Vec<PieEntry> = serde_json::from_str(json).unwrap();
        assert!(entries[0].is_well_compensated);
        assert!(!entries[1].is_well_compensated);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let stats: GraphStats = serde_json::from_str("{}").unwrap();
        assert!(stats.bar_graph.is_empty());
        assert!(stats.pie_graph.is_empty());
        assert_eq!(stats.current, None);
    }
}
