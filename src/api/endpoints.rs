/// Backend route table for each deployment variant.
use crate::config::EndpointVariant;

/// Paths of every backend route and page the client touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub company_submit: &'static str,
    pub salary_submit: &'static str,
    pub companies: &'static str,
    pub employee_graph: &'static str,
    /// Prefix of `GET /api/companies/{hash}`.
    pub company_graph_prefix: &'static str,
    /// Page holding the salary form; also the guard's redirect target.
    pub salary_page: &'static str,
    /// Page holding the company form.
    pub company_page: &'static str,
    /// Page shown after a successful salary submission.
    pub employee_graph_page: &'static str,
}

/// Where a gated page sends visitors who have not submitted a salary.
pub const SALARY_PAGE: &str = "/employee/submit";

impl Endpoints {
    pub fn for_variant(variant: EndpointVariant) -> Self {
        match variant {
            EndpointVariant::Primary => Self {
                company_submit: "/api/company/submit",
                salary_submit: "/api/employee/submit",
                companies: "/api/companies",
                employee_graph: "/api/graphs/employee",
                company_graph_prefix: "/api/companies",
                salary_page: SALARY_PAGE,
                company_page: "/company/submit",
                employee_graph_page: "/employee/graph",
            },
            EndpointVariant::Legacy => Self {
                company_submit: "/api/companies/add",
                salary_submit: "/api/salaries/submit",
                companies: "/api/companies",
                employee_graph: "/api/graphs/employee",
                company_graph_prefix: "/api/companies",
                salary_page: SALARY_PAGE,
                company_page: "/companies/add",
                employee_graph_page: "/graph/employee",
            },
        }
    }

    /// `GET /api/companies/{hash}` with the hash path-encoded.
    pub fn company_graph(&self, company_hash: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(company_hash.as_bytes()).collect();
        format!("{}/{}", self.company_graph_prefix, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_differ_only_where_deployments_do() {
        let primary = Endpoints::for_variant(EndpointVariant::Primary);
        let legacy = Endpoints::for_variant(EndpointVariant::Legacy);
        assert_eq!(primary.company_submit, "/api/company/submit");
        assert_eq!(legacy.company_submit, "/api/companies/add");
        assert_eq!(primary.salary_submit, "/api/employee/submit");
        assert_eq!(legacy.salary_submit, "/api/salaries/submit");
        assert_eq!(primary.companies, legacy.companies);
        assert_eq!(primary.salary_page, legacy.salary_page);
    }

    #[test]
    fn company_graph_appends_hash() {
        let endpoints = Endpoints::for_variant(EndpointVariant::Primary);
        assert_eq!(endpoints.company_graph("ab12"), "/api/companies/ab12");
    }
}
