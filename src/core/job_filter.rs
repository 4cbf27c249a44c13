// src/core/job_filter.rs
//! In-memory filtering of job listings

use rust_decimal::Decimal;

use crate::types::job::{parse_decimal_str, JobRecord};

/// The `hasEquity` flag, resolved once when the query is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HasEquity {
    /// Keep only jobs with equity above zero
    Required,
    /// Do not filter on equity
    #[default]
    Ignored,
}

impl HasEquity {
    /// Only `true` (any ASCII case) turns the filter on; anything else is a no-op.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("true") {
            HasEquity::Required
        } else {
            HasEquity::Ignored
        }
    }
}

impl From<bool> for HasEquity {
    fn from(flag: bool) -> Self {
        if flag {
            HasEquity::Required
        } else {
            HasEquity::Ignored
        }
    }
}

/// Lower salary bound as it arrived in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryFloor {
    AtLeast(Decimal),
    /// Not a number; no job satisfies it
    Malformed,
}

impl SalaryFloor {
    pub fn parse(raw: &str) -> Self {
        parse_decimal_str(raw)
            .map(SalaryFloor::AtLeast)
            .unwrap_or(SalaryFloor::Malformed)
    }
}

impl From<i64> for SalaryFloor {
    fn from(amount: i64) -> Self {
        SalaryFloor::AtLeast(Decimal::from(amount))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub title: Option<String>,
    pub min_salary: Option<SalaryFloor>,
    pub has_equity: HasEquity,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_min_salary(mut self, amount: i64) -> Self {
        self.min_salary = Some(SalaryFloor::from(amount));
        self
    }

    pub fn with_has_equity(mut self, flag: impl Into<HasEquity>) -> Self {
        self.has_equity = flag.into();
        self
    }

    /// Build from raw query pairs; unrecognized keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut criteria = Self::new();
        for (key, value) in pairs {
            match key {
                "title" => criteria.title = Some(value.to_string()),
                "minSalary" => criteria.min_salary = Some(SalaryFloor::parse(value)),
                "hasEquity" => criteria.has_equity = HasEquity::parse(value),
                _ => {}
            }
        }
        criteria
    }

    /// True when the job passes every active predicate.
    pub fn matches(&self, job: &JobRecord) -> bool {
        self.title_matches(job) && self.salary_matches(job) && self.equity_matches(job)
    }

    fn title_matches(&self, job: &JobRecord) -> bool {
        match &self.title {
            Some(needle) => job.title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }

    fn salary_matches(&self, job: &JobRecord) -> bool {
        match self.min_salary {
            None => true,
            Some(SalaryFloor::Malformed) => false,
            Some(SalaryFloor::AtLeast(floor)) => job
                .salary
                .map(|salary| Decimal::from(salary) >= floor)
                .unwrap_or(false),
        }
    }

    fn equity_matches(&self, job: &JobRecord) -> bool {
        match self.has_equity {
            HasEquity::Ignored => true,
            HasEquity::Required => job
                .equity_decimal()
                .map(|equity| equity > Decimal::ZERO)
                .unwrap_or(false),
        }
    }
}

/// Keeps the jobs matching `criteria`, preserving input order.
/// Without criteria every job is returned.
pub fn filter_jobs(jobs: Vec<JobRecord>, criteria: Option<&FilterCriteria>) -> Vec<JobRecord> {
    match criteria {
        None => jobs,
        Some(criteria) => jobs.into_iter().filter(|job| criteria.matches(job)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: i64, title: &str, salary: Option<i64>, equity: Option<&str>) -> JobRecord {
        JobRecord {
            id,
            title: title.to_string(),
            salary,
            equity: equity.map(str::to_string),
            company_handle: format!("c{}", id),
        }
    }

    fn seeded() -> Vec<JobRecord> {
        vec![
            job(1, "j1", Some(50000), Some("0")),
            job(2, "j2", Some(75000), Some("0.5")),
            job(3, "j3", Some(97000), Some("0.8")),
        ]
    }

    fn titles(jobs: &[JobRecord]) -> Vec<&str> {
        jobs.iter().map(|j| j.title.as_str()).collect()
    }

    #[test]
    fn test_no_criteria_returns_everything() {
        assert_eq!(filter_jobs(seeded(), None), seeded());
    }

    #[test]
    fn test_empty_criteria_returns_everything() {
        let criteria = FilterCriteria::new();
        assert_eq!(criteria, FilterCriteria::default());
        assert_eq!(filter_jobs(seeded(), Some(&criteria)), seeded());
    }

    #[test]
    fn test_min_salary() {
        let criteria = FilterCriteria::new().with_min_salary(97000);
        assert_eq!(titles(&filter_jobs(seeded(), Some(&criteria))), vec!["j3"]);
    }

    #[test]
    fn test_has_equity_true() {
        let criteria = FilterCriteria::from_pairs([("hasEquity", "true")]);
        assert_eq!(titles(&filter_jobs(seeded(), Some(&criteria))), vec!["j2", "j3"]);
    }

    #[test]
    fn test_has_equity_false_is_noop() {
        let criteria = FilterCriteria::from_pairs([("hasEquity", "false")]);
        assert_eq!(filter_jobs(seeded(), Some(&criteria)), seeded());
    }

    #[test]
    fn test_min_salary_and_false_equity() {
        let criteria = FilterCriteria::from_pairs([("minSalary", "75000"), ("hasEquity", "false")]);
        assert_eq!(titles(&filter_jobs(seeded(), Some(&criteria))), vec!["j2", "j3"]);
    }

    #[test]
    fn test_title_is_case_insensitive_substring() {
        let jobs = vec![
            job(1, "Senior Engineer", Some(1), None),
            job(2, "Accountant", Some(1), None),
            job(3, "engineering manager", Some(1), None),
        ];
        let criteria = FilterCriteria::new().with_title("ENGINEER");
        let kept = filter_jobs(jobs.clone(), Some(&criteria));

        assert_eq!(titles(&kept), vec!["Senior Engineer", "engineering manager"]);
        for j in &jobs {
            let contains = j.title.to_lowercase().contains("engineer");
            assert_eq!(kept.contains(j), contains);
        }
    }

    #[test]
    fn test_null_salary_never_meets_floor() {
        let jobs = vec![job(1, "a", None, None), job(2, "b", Some(0), None)];
        let criteria = FilterCriteria::new().with_min_salary(0);
        assert_eq!(titles(&filter_jobs(jobs, Some(&criteria))), vec!["b"]);
    }

    #[test]
    fn test_malformed_values_do_not_match() {
        let jobs = vec![
            job(1, "a", Some(10), Some("not-a-number")),
            job(2, "b", Some(20), None),
            job(3, "c", Some(30), Some("0.1")),
        ];

        let equity = FilterCriteria::new().with_has_equity(true);
        assert_eq!(titles(&filter_jobs(jobs.clone(), Some(&equity))), vec!["c"]);

        let salary = FilterCriteria::from_pairs([("minSalary", "lots")]);
        assert!(filter_jobs(jobs, Some(&salary)).is_empty());
    }

    #[test]
    fn test_equity_compares_as_decimal() {
        let jobs = vec![job(1, "a", None, Some("0.000")), job(2, "b", None, Some("0.001"))];
        let criteria = FilterCriteria::new().with_has_equity(HasEquity::Required);
        assert_eq!(titles(&filter_jobs(jobs, Some(&criteria))), vec!["b"]);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let criteria = FilterCriteria::from_pairs([("name", "x"), ("page", "2")]);
        assert_eq!(criteria, FilterCriteria::new());
    }

    #[test]
    fn test_has_equity_parsing() {
        assert_eq!(HasEquity::parse("true"), HasEquity::Required);
        assert_eq!(HasEquity::parse("TRUE"), HasEquity::Required);
        assert_eq!(HasEquity::parse("yes"), HasEquity::Ignored);
        assert_eq!(HasEquity::parse("false"), HasEquity::Ignored);
        assert_eq!(HasEquity::parse(""), HasEquity::Ignored);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = FilterCriteria::new().with_min_salary(60000).with_has_equity(true);
        let once = filter_jobs(seeded(), Some(&criteria));
        let twice = filter_jobs(once.clone(), Some(&criteria));
        assert_eq!(once, twice);
    }
}
