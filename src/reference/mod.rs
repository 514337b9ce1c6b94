//! Reference-data populator for selection controls.
//!
//! Static lists (industries, departments, experience levels, genders) are
//! injected in their fixed order. The company list is fetched from the
//! backend on every call and never cached.

use std::cmp::Ordering;

use crate::analytics::logger::{ClientEvent, EventLog};
use crate::api::{self, Backend, FetchError};
use crate::models::{Company, Department, ExperienceLevel, Gender, Industry, display_label};

/// Label of the empty "no filter" company option.
pub const ALL_COMPANIES: &str = "All Companies";

// ---------------------------------------------------------------------------
// Control seam
// ---------------------------------------------------------------------------

/// One `<option>`: the submitted value and the text shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A select-like control that options can be injected into.
pub trait SelectControl {
    fn clear(&mut self);
    fn add_option(&mut self, option: SelectOption);
    /// Mark the option with `value` as selected.
    fn select(&mut self, value: &str);
    /// Whether the control honors a pre-selected default.
    fn supports_default_selection(&self) -> bool {
        true
    }
}

/// In-memory select control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    pub options: Vec<SelectOption>,
    pub selected: Option<String>,
    /// Whether [`SelectControl::select`] is honored.
    pub single_select: bool,
}

impl OptionList {
    /// A control that keeps a selected value.
    pub fn new() -> Self {
        Self {
            single_select: true,
            ..Self::default()
        }
    }

    /// A control without a default selection (e.g. a plain listing).
    pub fn without_selection() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.value.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

impl SelectControl for OptionList {
    fn clear(&mut self) {
        self.options.clear();
        self.selected = None;
    }

    fn add_option(&mut self, option: SelectOption) {
        self.options.push(option);
    }

    fn select(&mut self, value: &str) {
        if self.single_select {
            self.selected = Some(value.to_string());
        }
    }

    fn supports_default_selection(&self) -> bool {
        self.single_select
    }
}

// ---------------------------------------------------------------------------
// Static lists
// ---------------------------------------------------------------------------

/// Which hardcoded list to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticList {
    Industries,
    Departments,
    ExperienceLevels,
    Genders,
}

impl StaticList {
    pub fn values(&self) -> Vec<&'static str> {
        match self {
            Self::Industries => Industry::wire_values(),
            Self::Departments => Department::wire_values(),
            Self::ExperienceLevels => ExperienceLevel::wire_values(),
            Self::Genders => Gender::wire_values(),
        }
    }
}

/// Append the static values, in order, with derived labels.
pub fn populate_static(control: &mut dyn SelectControl, list: StaticList) {
    for value in list.values() {
        control.add_option(SelectOption::new(value, display_label(value)));
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

/// Order companies by name: case-insensitive first, then lowercase before
/// uppercase for names that differ only in case.
pub fn sort_companies(companies: &mut [Company]) {
    companies.sort_by(|a, b| compare_names(&a.name, &b.name));
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Fill `control` with the companies at `path`.
///
/// The control is replaced only once the fetch succeeds. With a
/// `placeholder`, an empty-valued option leads the list. The first company
/// after sorting becomes the selection when the control supports one. On
/// failure the error is logged and the control is left untouched; nothing is
/// surfaced to the user.
///
/// Returns the number of companies added.
pub fn populate_companies(
    backend: &dyn Backend,
    path: &str,
    control: &mut dyn SelectControl,
    placeholder: Option<&str>,
    log: &EventLog,
) -> usize {
    let mut companies = match fetch_companies(backend, path) {
        Ok(companies) => companies,
        Err(e) => {
            eprintln!("Error loading companies: {e}");
            log.record(&ClientEvent::new("reference", "fetch_failed").with_detail(e.to_string()));
            return 0;
        }
    };

    sort_companies(&mut companies);

    control.clear();
    if let Some(label) = placeholder {
        control.add_option(SelectOption::new("", label));
    }

    for company in &companies {
        control.add_option(SelectOption::new(&company.hash, &company.name));
    }

    if let Some(first) = companies.first()
        && control.supports_default_selection()
    {
        control.select(&first.hash);
    }

    companies.len()
}

/// Fetch the raw company list.
pub fn fetch_companies(backend: &dyn Backend, path: &str) -> Result<Vec<Company>, FetchError> {
    api::fetch_json(backend, path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
