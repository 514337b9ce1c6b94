//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `sheweldo company` / `sheweldo salary`: validate and submit a form
//! - `sheweldo options <list>`: print the options a selector would offer
//! - `sheweldo graph` / `sheweldo benchmark <hash>`: fetch and draw charts
//! - `sheweldo guard`: evaluate the graph-page guard for the stored cookies
//! - `sheweldo log`: summarize the client event log
//! - `sheweldo health`: check config, backend reachability, cookies and log
//! - `sheweldo config show|init|set|reset`: configuration management

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::analytics::logger::EventLog;
use crate::analytics::reporter::{self, ComponentSummary};
use crate::api::cookies::{self, CookieJar};
use crate::api::{Backend, Endpoints, HttpBackend};
use crate::charts::{ChartFilters, ChartRenderer, ChartStyle, ChartSurface};
use crate::config::{self, SheweldoConfig};
use crate::forms::{self, FieldMap, FormController, FormSpec, Navigation, NavigationMode, UiSink, fields};
use crate::guard::{self, GuardDecision};
use crate::models::{CompanySize, ExperienceLevel};
use crate::reference::{self, ALL_COMPANIES, OptionList, StaticList};
use crate::view::{TerminalSurface, TerminalUi};

/// Output format for the event log report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything one invocation needs: resolved config, endpoint set, event log
/// and stored cookies.
pub struct Session {
    pub config: SheweldoConfig,
    pub endpoints: Endpoints,
    pub log: EventLog,
    pub jar: CookieJar,
}

impl Session {
    pub fn load() -> Self {
        let config = config::load();
        Self {
            endpoints: Endpoints::for_variant(config.api.variant),
            log: EventLog::from_config(&config.logging),
            jar: CookieJar::load(),
            config,
        }
    }

    /// HTTP backend carrying the stored cookies.
    pub fn backend(&self) -> HttpBackend {
        HttpBackend::from_config(&self.config.api).with_cookies(self.jar.header())
    }

    pub fn ui(&self) -> TerminalUi<io::Stdout> {
        TerminalUi::stdout(&self.config.api.base_url, self.config.forms.open_browser)
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Company form fields. Values are kept as typed so validation sees them raw.
#[derive(Debug, Clone, Args)]
pub struct CompanyArgs {
    /// Company name (2-100 characters)
    #[arg(long)]
    pub name: String,
    /// Number of employees (1-1,000,000)
    #[arg(long)]
    pub size: String,
    /// Industry value, e.g. technology or real_estate
    #[arg(long, default_value = "")]
    pub industry: String,
    /// Country (2-100 characters)
    #[arg(long)]
    pub country: String,
}

impl CompanyArgs {
    pub fn to_form(&self) -> FieldMap {
        FieldMap::new()
            .with(fields::COMPANY_NAME, &self.name)
            .with(fields::COMPANY_SIZE, &self.size)
            .with(fields::INDUSTRY, &self.industry)
            .with(fields::COUNTRY, &self.country)
    }
}

/// Salary form fields.
#[derive(Debug, Clone, Args)]
pub struct SalaryArgs {
    /// Company hash (see `sheweldo options companies`)
    #[arg(long, default_value = "")]
    pub company: String,
    /// Years at the company (0-50)
    #[arg(long)]
    pub years: String,
    /// Total years of experience (0-50)
    #[arg(long)]
    pub experience: String,
    /// Yearly salary amount
    #[arg(long)]
    pub amount: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, default_value = "")]
    pub department: String,
    #[arg(long)]
    pub job_title: String,
    /// Mark the salary as fair for the role
    #[arg(long)]
    pub well_compensated: bool,
}

impl SalaryArgs {
    pub fn to_form(&self) -> FieldMap {
        FieldMap::new()
            .with(fields::COMPANY_HASH, &self.company)
            .with(fields::YEARS_AT_COMPANY, &self.years)
            .with(fields::TOTAL_EXPERIENCE, &self.experience)
            .with(fields::SALARY_AMOUNT, &self.amount)
            .with(fields::GENDER, &self.gender)
            .with(fields::DEPARTMENT, &self.department)
            .with(fields::JOB_TITLE, &self.job_title)
            .with(
                fields::WELL_COMPENSATED,
                if self.well_compensated { "true" } else { "false" },
            )
    }
}

/// Chart filters as command-line flags.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub experience_level: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    /// Bucket width of the salary histogram
    #[arg(long)]
    pub range_steps: Option<String>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> ChartFilters {
        ChartFilters {
            company_hash: self.company.clone().unwrap_or_default(),
            industry: self.industry.clone().unwrap_or_default(),
            department: self.department.clone().unwrap_or_default(),
            experience_level: self.experience_level.clone().unwrap_or_default(),
            gender: self.gender.clone().unwrap_or_default(),
            range_steps: self.range_steps.clone().unwrap_or_default(),
        }
        .trimmed()
    }
}

/// Lists `sheweldo options` can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionsList {
    Industries,
    Departments,
    ExperienceLevels,
    Genders,
    Companies,
}

// ---------------------------------------------------------------------------
// sheweldo company | salary
// ---------------------------------------------------------------------------

/// Validate and submit the company form.
pub fn run_company(args: &CompanyArgs) -> Result<()> {
    let session = Session::load();
    let backend = session.backend();

    if let Ok(headcount) = args.size.trim().parse::<u32>() {
        println!(
            "  {} {}",
            "Size band:".bold(),
            CompanySize::from_headcount(headcount).label()
        );
    }

    let spec = FormSpec::company(&session.endpoints, &session.config.forms);
    let controller = FormController::new(&backend, spec, &session.log);
    let outcome = controller.submit(&args.to_form());

    forms::apply_effects(&mut session.ui(), &outcome.effects);

    if !outcome.is_success() {
        bail!("company submission failed");
    }
    Ok(())
}

/// Validate and submit the salary form, keeping the session cookies it sets.
pub fn run_salary(args: &SalaryArgs) -> Result<()> {
    let mut session = Session::load();
    let backend = session.backend();

    if let (Ok(years), Ok(total)) = (
        args.years.trim().parse::<u32>(),
        args.experience.trim().parse::<u32>(),
    ) {
        println!(
            "  {} {}",
            "Experience level:".bold(),
            ExperienceLevel::derive(years, total).label()
        );
    }

    let spec = FormSpec::salary(&session.endpoints, &session.config.forms);
    let controller = FormController::new(&backend, spec, &session.log);
    let outcome = controller.submit(&args.to_form());

    if let Ok(submitted) = &outcome.result
        && !submitted.set_cookies.is_empty()
    {
        session.jar.store_all(&submitted.set_cookies);
        if let Err(e) = session.jar.save() {
            eprintln!("{} {e:#}", "warning:".yellow());
        }
    }

    forms::apply_effects(&mut session.ui(), &outcome.effects);

    if !outcome.is_success() {
        bail!("salary submission failed");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// sheweldo options
// ---------------------------------------------------------------------------

/// Print the options of one selector.
pub fn run_options(list: OptionsList) -> Result<()> {
    let static_list = match list {
        OptionsList::Industries => Some(StaticList::Industries),
        OptionsList::Departments => Some(StaticList::Departments),
        OptionsList::ExperienceLevels => Some(StaticList::ExperienceLevels),
        OptionsList::Genders => Some(StaticList::Genders),
        OptionsList::Companies => None,
    };

    let mut control = OptionList::new();
    match static_list {
        Some(list) => reference::populate_static(&mut control, list),
        None => {
            let session = Session::load();
            let added = reference::populate_companies(
                &session.backend(),
                session.endpoints.companies,
                &mut control,
                None,
                &session.log,
            );
            if added == 0 {
                println!(
                    "{} Add one at {}",
                    "No companies available.".yellow(),
                    session.ui().page_url(session.endpoints.company_page)
                );
                return Ok(());
            }
        }
    }

    print_options(&control);
    Ok(())
}

fn print_options(control: &OptionList) {
    let width = control
        .options
        .iter()
        .map(|o| o.value.len())
        .max()
        .unwrap_or(0);

    for option in &control.options {
        let marker = if control.selected.as_deref() == Some(option.value.as_str()) {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<width$}  {}{}",
            option.value.as_str().bold(),
            option.label,
            marker
        );
    }
}

// ---------------------------------------------------------------------------
// sheweldo graph | benchmark
// ---------------------------------------------------------------------------

/// Draw the employee salary charts.
///
/// The graph page is guarded: without the cookies of a prior salary
/// submission the visitor is sent to the salary form instead.
pub fn run_graph(filters: &FilterArgs, interactive: bool) -> Result<()> {
    let session = Session::load();

    if let GuardDecision::Redirect(target) = guard::check(&session.jar.header()) {
        println!(
            "{}",
            "Submit your salary first to see where you stand.".yellow()
        );
        session.ui().navigate(&Navigation {
            target,
            delay: std::time::Duration::ZERO,
            mode: NavigationMode::SameTab,
        });
        return Ok(());
    }

    let endpoint = session.endpoints.employee_graph;
    draw_charts(&session, endpoint, filters.to_filters(), interactive)
}

/// Draw the salary charts of one company.
pub fn run_benchmark(company_hash: &str, filters: &FilterArgs, interactive: bool) -> Result<()> {
    let session = Session::load();
    let endpoint = session.endpoints.company_graph(company_hash);
    draw_charts(&session, &endpoint, filters.to_filters(), interactive)
}

fn draw_charts(
    session: &Session,
    endpoint: &str,
    mut filters: ChartFilters,
    interactive: bool,
) -> Result<()> {
    let backend = session.backend();
    let surface = TerminalSurface::stdout(session.config.charts.bar_width, interactive);
    let mut renderer = ChartRenderer::new(
        surface,
        ChartStyle::from_config(&session.config.charts),
        session.log.clone(),
    );

    if !interactive {
        let stats = renderer
            .refresh(&backend, endpoint, &filters)
            .context("could not load chart data")?;
        print_reference_value(stats.current);
        return Ok(());
    }

    print_company_hint(session, &backend);
    let stdin = io::stdin();
    filter_session(stdin.lock(), &mut renderer, &backend, endpoint, &mut filters);
    Ok(())
}

fn print_reference_value(current: Option<f64>) {
    if let Some(value) = current {
        println!("  {} {}", "Reference salary:".bold(), value);
    }
}

/// List the company filter values, led by the "All Companies" placeholder.
fn print_company_hint(session: &Session, backend: &dyn Backend) {
    let mut control = OptionList::without_selection();
    reference::populate_companies(
        backend,
        session.endpoints.companies,
        &mut control,
        Some(ALL_COMPANIES),
        &session.log,
    );
    println!("{}", "Company filter values".bold().cyan());
    for option in &control.options {
        let value = if option.value.is_empty() {
            "(empty)"
        } else {
            option.value.as_str()
        };
        println!("  {:<24} {}", value, option.label.dimmed());
    }
    println!();
}

/// Interactive filter loop.
///
/// Reads one command per line: `key=value` edits a filter (an empty value
/// clears it), `reset` clears every filter, `show` prints the query,
/// `apply` fetches and redraws, `quit` ends the session. The charts are
/// drawn once before the first prompt. Returns the number of refresh attempts.
pub fn filter_session<R, S>(
    input: R,
    renderer: &mut ChartRenderer<S>,
    backend: &dyn Backend,
    endpoint: &str,
    filters: &mut ChartFilters,
) -> usize
where
    R: BufRead,
    S: ChartSurface,
{
    let mut refreshes = 1;
    if let Ok(stats) = renderer.refresh(backend, endpoint, filters) {
        print_reference_value(stats.current);
    }
    prompt();

    for line in input.lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "" => {}
            "quit" | "exit" | "q" => break,
            "apply" => {
                refreshes += 1;
                if let Ok(stats) = renderer.refresh(backend, endpoint, filters) {
                    print_reference_value(stats.current);
                }
            }
            "reset" => *filters = ChartFilters::new(),
            "show" => println!("  ?{}", filters.to_query()),
            edit => match edit.split_once('=') {
                Some((key, value)) => {
                    if let Err(e) = filters.set(key.trim(), value) {
                        eprintln!("{} {e}", "error:".red());
                    }
                }
                None => eprintln!(
                    "{} expected key=value, apply, reset, show or quit",
                    "error:".red()
                ),
            },
        }
        prompt();
    }

    refreshes
}

fn prompt() {
    print!("{} ", "filter>".cyan());
    let _ = io::stdout().flush();
}

// ---------------------------------------------------------------------------
// sheweldo guard
// ---------------------------------------------------------------------------

/// Print the guard decision for the stored cookies.
pub fn run_guard() -> Result<()> {
    let session = Session::load();
    match guard::check(&session.jar.header()) {
        GuardDecision::Allow => println!("{} graph page allowed", "✓".green().bold()),
        GuardDecision::Redirect(target) => println!(
            "{} redirect to {}",
            "✗".red().bold(),
            session.ui().page_url(&target)
        ),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// sheweldo log
// ---------------------------------------------------------------------------

/// Summarize the client event log.
pub fn run_log(format: OutputFormat, days: Option<u32>) -> Result<()> {
    let session = Session::load();
    let events = session.log.read_since_days(days);

    if events.is_empty() {
        println!("{}", "No events recorded yet.".yellow());
        return Ok(());
    }

    let summaries = reporter::summarize(&events);
    match format {
        OutputFormat::Json => print_log_json(&summaries)?,
        OutputFormat::Csv => print_log_csv(&summaries),
        OutputFormat::Table => print_log_table(&summaries, events.len()),
    }
    Ok(())
}

const OUTCOMES: [&str; 5] = ["success", "invalid", "rejected", "network_error", "fetch_failed"];

fn print_log_table(summaries: &[ComponentSummary], total: usize) {
    println!("{}", "SHEweldo Client Events".bold().cyan());
    println!("{}", "=".repeat(72));
    println!("  {} {}", "Total events:".bold(), format_number(total));
    println!();
    println!(
        "  {:<14} {:>6} {:>8} {:>8} {:>9} {:>8} {:>8}  Last seen",
        "Component", "Total", "Success", "Invalid", "Rejected", "Network", "Fetch"
    );
    println!("  {}", "-".repeat(70));

    for (i, s) in summaries.iter().enumerate() {
        let line = format!(
            "  {:<14} {:>6} {:>8} {:>8} {:>9} {:>8} {:>8}  {}",
            truncate(&s.component, 14),
            format_number(s.total),
            s.count("success"),
            s.count("invalid"),
            s.count("rejected"),
            s.count("network_error"),
            s.count("fetch_failed"),
            truncate(&s.last_seen, 19),
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_log_json(summaries: &[ComponentSummary]) -> Result<()> {
    let value = serde_json::json!({
        "components": summaries.iter().map(|s| serde_json::json!({
            "component": s.component,
            "total": s.total,
            "outcomes": s.outcomes,
            "success_pct": s.success_pct(),
            "last_seen": s.last_seen,
        })).collect::<Vec<_>>(),
    });

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_log_csv(summaries: &[ComponentSummary]) {
    println!("component,total,{},last_seen", OUTCOMES.join(","));
    for s in summaries {
        let counts: Vec<String> = OUTCOMES.iter().map(|o| s.count(o).to_string()).collect();
        println!("{},{},{},{}", s.component, s.total, counts.join(","), s.last_seen);
    }
}

// ---------------------------------------------------------------------------
// sheweldo health
// ---------------------------------------------------------------------------

/// Check config files, backend reachability, session cookies and the event log.
pub fn run_health() -> Result<()> {
    println!("{}", "SHEweldo Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.sheweldo/config.toml found"
        } else {
            "not found (run `sheweldo config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".sheweldo.toml found"
        } else {
            "none (optional)"
        },
    );

    let session = Session::load();
    let backend = session.backend();
    print_health_item(
        "Endpoint set",
        true,
        &session.config.api.variant.to_string(),
    );

    match reference::fetch_companies(&backend, session.endpoints.companies) {
        Ok(companies) => print_health_item(
            "Backend",
            true,
            &format!(
                "reachable at {} ({} companies)",
                backend.base_url(),
                companies.len()
            ),
        ),
        Err(e) => print_health_item("Backend", false, &e.to_string()),
    }

    let allowed = guard::check(&session.jar.header()) == GuardDecision::Allow;
    print_health_item(
        "Session cookies",
        allowed,
        if allowed {
            "salary submitted; graph page available"
        } else {
            "none (submit a salary to unlock the graph page)"
        },
    );

    match session.log.path() {
        Some(path) => {
            let entries = session.log.read_all().len();
            print_health_item(
                "Event log",
                true,
                &format!("{} ({} events)", path.display(), entries),
            );
        }
        None => print_health_item("Event log", false, "disabled"),
    }

    if let Some(path) = cookies::cookie_jar_path() {
        print_health_item("Cookie jar", path.exists(), &path.display().to_string());
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<18} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// sheweldo config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective SHEweldo Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    println!("{}", "Sources".bold());
    println!("  {} built-in defaults", "✓".green());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.sheweldo/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "-".dimmed(),
            "~/.sheweldo/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".sheweldo.toml".dimmed());
    }
    println!("  {} SHEWELDO_* environment overrides", "✓".green());
    Ok(())
}

/// Initialize a default config file at `~/.sheweldo/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point the client at your backend.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FieldSource;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("salary_form", 5), "sala…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("yaml")),
            OutputFormat::Table
        );
    }

    #[test]
    fn salary_args_encode_checkbox() {
        let args = SalaryArgs {
            company: "abc".to_string(),
            years: "2".to_string(),
            experience: "5".to_string(),
            amount: "50000".to_string(),
            gender: "female".to_string(),
            department: "finance".to_string(),
            job_title: "Analyst".to_string(),
            well_compensated: false,
        };
        let form = args.to_form();
        assert_eq!(form.field(fields::WELL_COMPENSATED).as_deref(), Some("false"));
        assert_eq!(form.field(fields::COMPANY_HASH).as_deref(), Some("abc"));
    }

    #[test]
    fn filter_args_map_company_to_hash() {
        let args = FilterArgs {
            company: Some(" abc ".to_string()),
            range_steps: Some("5000".to_string()),
            ..FilterArgs::default()
        };
        assert_eq!(
            args.to_filters().to_query(),
            "company_hash=abc&range_steps=5000"
        );
    }
}
