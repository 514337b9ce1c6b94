/// Enumerated reference values shared by the forms and chart filters.
///
/// Each enum carries its wire value (what the backend stores and the query
/// string carries) and a fixed display order. Display labels are derived from
/// the wire value with [`display_label`].
use serde::{Deserialize, Serialize};

/// Declare a wire enum with its snake_case values in display order.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in the order it is offered to the user.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value sent over the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Human-readable label, e.g. `Real Estate`.
            pub fn label(&self) -> String {
                display_label(self.as_str())
            }

            /// Wire values in display order.
            pub fn wire_values() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Returned when a string is not one of an enum's wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

wire_enum! {
    /// Company industry (16 values).
    Industry {
        Technology => "technology",
        Finance => "finance",
        Healthcare => "healthcare",
        Manufacturing => "manufacturing",
        Retail => "retail",
        Education => "education",
        Transportation => "transportation",
        Energy => "energy",
        Entertainment => "entertainment",
        Telecommunications => "telecommunications",
        Construction => "construction",
        Hospitality => "hospitality",
        RealEstate => "real_estate",
        Agriculture => "agriculture",
        Pharmaceuticals => "pharmaceuticals",
        Other => "other",
    }
}

wire_enum! {
    /// Department of the employee (11 values).
    Department {
        ExecutiveLeadership => "executive_leadership",
        Operations => "operations",
        FinanceAccounting => "finance_accounting",
        HumanResources => "human_resources",
        LegalCompliance => "legal_compliance",
        MarketingSales => "marketing_sales",
        CustomerServiceSupport => "customer_service_support",
        TechnologyIt => "technology_it",
        ProductRd => "product_rd",
        SupplyChainLogistics => "supply_chain_logistics",
        Other => "other",
    }
}

wire_enum! {
    /// Experience level used as a chart filter (6 values).
    ExperienceLevel {
        EntryLevel => "entry_level",
        Junior => "junior",
        MidLevel => "mid_level",
        Senior => "senior",
        Expert => "expert",
        Legendary => "legendary",
    }
}

wire_enum! {
    /// Gender of the employee.
    Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

wire_enum! {
    /// Headcount band of a company.
    CompanySize {
        Small => "small",
        Medium => "medium",
        Large => "large",
        Enterprise => "enterprise",
    }
}

impl CompanySize {
    /// Classify a headcount into its band.
    pub fn from_headcount(employees: u32) -> Self {
        match employees {
            0..=50 => Self::Small,
            51..=200 => Self::Medium,
            201..=400 => Self::Large,
            _ => Self::Enterprise,
        }
    }
}

impl ExperienceLevel {
    /// Derive the level the backend files a submission under.
    ///
    /// Tenure at the current company weighs 1.5x against total experience.
    pub fn derive(years_at_company: u32, total_experience: u32) -> Self {
        let weighted = f64::from(years_at_company) * 1.5 + f64::from(total_experience);
        if weighted < 2.0 {
            Self::EntryLevel
        } else if weighted < 5.0 {
            Self::Junior
        } else if weighted < 9.0 {
            Self::MidLevel
        } else if weighted < 14.0 {
            Self::Senior
        } else if weighted < 20.0 {
            Self::Expert
        } else {
            Self::Legendary
        }
    }
}

/// Turn a wire value into a display label: underscores become spaces and
/// every word is capitalized.
pub fn display_label(value: &str) -> String {
    value
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_sizes_match_reference_lists() {
        assert_eq!(Industry::ALL.len(), 16);
        assert_eq!(Department::ALL.len(), 11);
        assert_eq!(ExperienceLevel::ALL.len(), 6);
    }

    #[test]
    fn display_label_capitalizes_words() {
        assert_eq!(display_label("real_estate"), "Real Estate");
        assert_eq!(display_label("product_rd"), "Product Rd");
        assert_eq!(display_label("technology"), "Technology");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn from_str_round_trips_wire_values() {
        assert_eq!("technology_it".parse::<Department>(), Ok(Department::TechnologyIt));
        assert_eq!("real_estate".parse::<Industry>(), Ok(Industry::RealEstate));
        let err = "Finance".parse::<Industry>().unwrap_err();
        assert_eq!(err.kind, "Industry");
    }

    #[test]
    fn serde_uses_wire_values() {
        let json = serde_json::to_string(&Department::CustomerServiceSupport).unwrap();
        assert_eq!(json, "\"customer_service_support\"");
    }

    #[test]
    fn company_size_bands() {
        assert_eq!(CompanySize::from_headcount(1), CompanySize::Small);
        assert_eq!(CompanySize::from_headcount(50), CompanySize::Small);
        assert_eq!(CompanySize::from_headcount(51), CompanySize::Medium);
        assert_eq!(CompanySize::from_headcount(400), CompanySize::Large);
        assert_eq!(CompanySize::from_headcount(401), CompanySize::Enterprise);
    }

    #[test]
    fn derived_experience_weights_tenure() {
        assert_eq!(ExperienceLevel::derive(0, 1), ExperienceLevel::EntryLevel);
        // 2 * 1.5 + 2 = 5.0
        assert_eq!(ExperienceLevel::derive(2, 2), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::derive(4, 8), ExperienceLevel::Expert);
        assert_eq!(ExperienceLevel::derive(10, 20), ExperienceLevel::Legendary);
    }
}
