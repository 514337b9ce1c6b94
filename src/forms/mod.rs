//! Form controller for the company and salary submission forms.
//!
//! A submission runs in one pass:
//!
//! 1. read and trim fields through the [`FieldSource`] view-model
//! 2. run the form's ordered rules ([`validation`]); the first failure wins
//!    and nothing is sent
//! 3. `POST` the JSON payload to the form's endpoint
//! 4. map the response onto one of three outcomes (success, application
//!    error, transport error) and the UI effects that present it
//!
//! The controller never touches a view directly. It returns [`UiEffect`]s
//! which a [`UiSink`] applies, so the whole flow runs in tests without a
//! terminal or a DOM.

pub mod validation;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::analytics::logger::{ClientEvent, EventLog};
use crate::api::{Backend, Endpoints};
use crate::config::schema::FormsConfig;

pub use validation::{ValidationError, fields};

// ---------------------------------------------------------------------------
// View-model
// ---------------------------------------------------------------------------

/// Read access to the current value of named form fields.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<String>;
}

/// In-memory form state keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    values: BTreeMap<String, String>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Clear every field, as a form reset does.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldSource for FieldMap {
    fn field(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

// ---------------------------------------------------------------------------
// UI effects
// ---------------------------------------------------------------------------

/// Color scheme of the status message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Success,
    Error,
}

impl Palette {
    /// Background color as CSS hex.
    pub fn background(&self) -> &'static str {
        match self {
            Self::Success => "#d4edda",
            Self::Error => "#f8d7da",
        }
    }

    /// Text color as CSS hex.
    pub fn foreground(&self) -> &'static str {
        match self {
            Self::Success => "#155724",
            Self::Error => "#721c24",
        }
    }
}

/// A status message for the message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub palette: Palette,
}

/// How a follow-up page is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    SameTab,
    NewTab,
}

/// A delayed move to another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: String,
    pub delay: Duration,
    pub mode: NavigationMode,
}

/// One presentation step produced by a submission, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    ShowMessage(Message),
    ResetForm,
    Navigate(Navigation),
    HideMessage { after: Duration },
}

/// Receiver of [`UiEffect`]s.
pub trait UiSink {
    fn show_message(&mut self, message: &Message);
    fn reset_form(&mut self);
    fn navigate(&mut self, navigation: &Navigation);
    fn hide_message_after(&mut self, after: Duration);
}

/// Apply effects to a sink in order.
pub fn apply_effects(sink: &mut dyn UiSink, effects: &[UiEffect]) {
    for effect in effects {
        match effect {
            UiEffect::ShowMessage(message) => sink.show_message(message),
            UiEffect::ResetForm => sink.reset_form(),
            UiEffect::Navigate(navigation) => sink.navigate(navigation),
            UiEffect::HideMessage { after } => sink.hide_message_after(*after),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Why a submission did not succeed. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Rejected before anything was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Application { status: u16, message: String },
    /// No usable response (connection failure or unparsable body).
    #[error("{message}")]
    Transport { message: String, cause: String },
}

/// What a successful submission returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub status: u16,
    pub body: serde_json::Value,
    /// `Set-Cookie` values to hand to the cookie jar.
    pub set_cookies: Vec<String>,
}

/// Result of one submit attempt plus the effects that present it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub result: Result<Submitted, FormError>,
    pub effects: Vec<UiEffect>,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The message shown for this outcome.
    pub fn message(&self) -> Option<&Message> {
        self.effects.iter().find_map(|e| match e {
            UiEffect::ShowMessage(m) => Some(m),
            _ => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Form configuration
// ---------------------------------------------------------------------------

/// Which form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Company,
    Salary,
}

impl FormKind {
    /// Component name used in the event log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company_form",
            Self::Salary => "salary_form",
        }
    }
}

pub const NETWORK_ERROR_TEXT: &str = "Network error - please try again later.";

/// Endpoint, texts and follow-up of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub kind: FormKind,
    pub endpoint: String,
    pub success_text: String,
    pub fallback_error: String,
    pub navigation: Navigation,
    pub hide_after: Duration,
}

impl FormSpec {
    /// Company form: opens the salary form in a new tab on success.
    pub fn company(endpoints: &Endpoints, config: &FormsConfig) -> Self {
        Self {
            kind: FormKind::Company,
            endpoint: endpoints.company_submit.to_string(),
            success_text: "Company added successfully!".to_string(),
            fallback_error: "Error submitting company data".to_string(),
            navigation: Navigation {
                target: endpoints.salary_page.to_string(),
                delay: Duration::from_millis(config.company_redirect_delay_ms),
                mode: NavigationMode::NewTab,
            },
            hide_after: Duration::from_millis(config.message_hide_ms),
        }
    }

    /// Salary form: moves to the employee graph page on success.
    pub fn salary(endpoints: &Endpoints, config: &FormsConfig) -> Self {
        Self {
            kind: FormKind::Salary,
            endpoint: endpoints.salary_submit.to_string(),
            success_text: "Submission successful! Thank you for your contribution.".to_string(),
            fallback_error: "Error submitting salary data".to_string(),
            navigation: Navigation {
                target: endpoints.employee_graph_page.to_string(),
                delay: Duration::from_millis(config.salary_redirect_delay_ms),
                mode: NavigationMode::SameTab,
            },
            hide_after: Duration::from_millis(config.message_hide_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Validates and submits one form against a backend.
pub struct FormController<'a> {
    backend: &'a dyn Backend,
    spec: FormSpec,
    log: &'a EventLog,
}

impl<'a> FormController<'a> {
    pub fn new(backend: &'a dyn Backend, spec: FormSpec, log: &'a EventLog) -> Self {
        Self { backend, spec, log }
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    /// Validate and submit the current field values, dated today (UTC).
    pub fn submit(&self, form: &dyn FieldSource) -> SubmitOutcome {
        self.submit_on(form, Utc::now().date_naive())
    }

    /// Validate and submit with an explicit submission date.
    pub fn submit_on(&self, form: &dyn FieldSource, today: NaiveDate) -> SubmitOutcome {
        let result = self.validate(form, today).and_then(|payload| self.send(&payload));
        self.record(&result);

        let effects = match &result {
            Ok(_) => self.success_effects(),
            Err(err) => self.failure_effects(err),
        };

        SubmitOutcome { result, effects }
    }

    /// Run the ordered rules and encode the payload.
    fn validate(
        &self,
        form: &dyn FieldSource,
        today: NaiveDate,
    ) -> Result<serde_json::Value, FormError> {
        let encoded = match self.spec.kind {
            FormKind::Company => serde_json::to_value(validation::validate_company(form)?),
            FormKind::Salary => serde_json::to_value(validation::validate_salary(form, today)?),
        };

        encoded.map_err(|e| FormError::Transport {
            message: NETWORK_ERROR_TEXT.to_string(),
            cause: format!("failed to encode payload: {e}"),
        })
    }

    fn send(&self, payload: &serde_json::Value) -> Result<Submitted, FormError> {
        let resp = self
            .backend
            .post_json(&self.spec.endpoint, payload)
            .map_err(|e| FormError::Transport {
                message: NETWORK_ERROR_TEXT.to_string(),
                cause: e.to_string(),
            })?;

        if !resp.is_success() {
            return Err(FormError::Application {
                status: resp.status,
                message: resp
                    .error_message()
                    .unwrap_or_else(|| self.spec.fallback_error.clone()),
            });
        }

        let body = resp.json().map_err(|e| FormError::Transport {
            message: NETWORK_ERROR_TEXT.to_string(),
            cause: format!("invalid JSON response: {e}"),
        })?;

        Ok(Submitted {
            status: resp.status,
            body,
            set_cookies: resp.set_cookies,
        })
    }

    fn success_effects(&self) -> Vec<UiEffect> {
        vec![
            UiEffect::ShowMessage(Message {
                text: self.spec.success_text.clone(),
                palette: Palette::Success,
            }),
            UiEffect::ResetForm,
            UiEffect::Navigate(self.spec.navigation.clone()),
            UiEffect::HideMessage {
                after: self.spec.hide_after,
            },
        ]
    }

    fn failure_effects(&self, err: &FormError) -> Vec<UiEffect> {
        vec![
            UiEffect::ShowMessage(Message {
                text: err.to_string(),
                palette: Palette::Error,
            }),
            UiEffect::HideMessage {
                after: self.spec.hide_after,
            },
        ]
    }

    fn record(&self, result: &Result<Submitted, FormError>) {
        let component = self.spec.kind.as_str();
        let event = match result {
            Ok(submitted) => ClientEvent::new(component, "success").with_status(submitted.status),
            Err(FormError::Validation(rule)) => {
                ClientEvent::new(component, "invalid").with_detail(rule.to_string())
            }
            Err(FormError::Application { status, message }) => {
                ClientEvent::new(component, "rejected")
                    .with_status(*status)
                    .with_detail(message.clone())
            }
            Err(FormError::Transport { cause, .. }) => {
                eprintln!("Error: {cause}");
                ClientEvent::new(component, "network_error").with_detail(cause.clone())
            }
        };
        self.log.record(&event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointVariant;

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
    }

    impl UiSink for RecordingSink {
        fn show_message(&mut self, message: &Message) {
            self.calls.push(format!("show:{}", message.text));
        }
        fn reset_form(&mut self) {
            self.calls.push("reset".to_string());
        }
        fn navigate(&mut self, navigation: &Navigation) {
            self.calls.push(format!("navigate:{}", navigation.target));
        }
        fn hide_message_after(&mut self, after: Duration) {
            self.calls.push(format!("hide:{}", after.as_millis()));
        }
    }

    #[test]
    fn field_map_reads_and_resets() {
        let mut form = FieldMap::new().with("company_name", "Acme");
        assert_eq!(form.field("company_name").as_deref(), Some("Acme"));
        assert_eq!(form.field("country"), None);
        form.reset();
        assert!(form.is_empty());
    }

    #[test]
    fn palettes_match_message_box_colors() {
        assert_eq!(Palette::Success.background(), "#d4edda");
        assert_eq!(Palette::Success.foreground(), "#155724");
        assert_eq!(Palette::Error.background(), "#f8d7da");
        assert_eq!(Palette::Error.foreground(), "#721c24");
    }

    #[test]
    fn form_specs_follow_variant() {
        let config = FormsConfig::default();
        let legacy = Endpoints::for_variant(EndpointVariant::Legacy);

        let company = FormSpec::company(&legacy, &config);
        assert_eq!(company.endpoint, "/api/companies/add");
        assert_eq!(company.navigation.mode, NavigationMode::NewTab);
        assert_eq!(company.navigation.delay, Duration::from_millis(1000));

        let salary = FormSpec::salary(&legacy, &config);
        assert_eq!(salary.endpoint, "/api/salaries/submit");
        assert_eq!(salary.navigation.target, "/graph/employee");
        assert_eq!(salary.navigation.mode, NavigationMode::SameTab);
        assert_eq!(salary.hide_after, Duration::from_millis(5000));
    }

    #[test]
    fn apply_effects_preserves_order() {
        let effects = vec![
            UiEffect::ShowMessage(Message {
                text: "ok".to_string(),
                palette: Palette::Success,
            }),
            UiEffect::ResetForm,
            UiEffect::Navigate(Navigation {
                target: "/employee/submit".to_string(),
                delay: Duration::from_millis(1000),
                mode: NavigationMode::NewTab,
            }),
            UiEffect::HideMessage {
                after: Duration::from_millis(5000),
            },
        ];
        let mut sink = RecordingSink::default();
        apply_effects(&mut sink, &effects);
        assert_eq!(
            sink.calls,
            vec!["show:ok", "reset", "navigate:/employee/submit", "hide:5000"]
        );
    }

    #[test]
    fn error_display_is_user_text() {
        let err = FormError::Transport {
            message: NETWORK_ERROR_TEXT.to_string(),
            cause: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), NETWORK_ERROR_TEXT);
        let err: FormError = ValidationError::Industry.into();
        assert_eq!(err.to_string(), "Please select an industry.");
    }
}
