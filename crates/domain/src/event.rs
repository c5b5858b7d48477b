use ledger_core::{AppError, AppResult, NonEmptyString, RunId};
use serde_json::Value;

/// Required event fields, in validation order.
pub const REQUIRED_EVENT_FIELDS: [&str; 9] = [
    "event_id",
    "candidate.email",
    "candidate.first_name",
    "candidate.last_name",
    "job.title",
    "job.department",
    "employment.country",
    "employment.contract_type",
    "employment.start_date",
];

/// Candidate identity carried by an offer-signed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

/// Job the candidate signed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Job title.
    pub title: String,
    /// Owning department.
    pub department: String,
    /// Optional seniority level.
    pub level: Option<String>,
}

/// Employment terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employment {
    /// Country code of the employment contract.
    pub country: String,
    /// Contract type.
    pub contract_type: String,
    /// Start date as supplied by the caller.
    pub start_date: String,
}

/// Demo switches steering the orchestration engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scenario {
    /// Nominal onboarding path.
    pub standard: bool,
    /// Role cannot be mapped to a provisioning policy.
    pub unknown_role: bool,
    /// Hardware vendor outage.
    pub simulate_it_failure: bool,
    /// Caller intends to resubmit the same event.
    pub duplicate_event_id: bool,
}

/// Validated offer-signed event. The original payload is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingEvent {
    event_id: NonEmptyString,
    candidate: Candidate,
    job: Job,
    employment: Employment,
    manager_email: Option<String>,
    scenario: Scenario,
    occurred_at: Option<String>,
    payload: Value,
}

impl OnboardingEvent {
    /// Validates an event payload, failing on the first missing required field.
    pub fn from_payload(payload: Value) -> AppResult<Self> {
        if !payload.is_object() {
            return Err(AppError::Validation(
                "event payload must be a JSON object".to_owned(),
            ));
        }

        let event_id = NonEmptyString::new(required_text(&payload, "event_id")?)?;
        let email = required_text(&payload, "candidate.email")?;
        let first_name = required_text(&payload, "candidate.first_name")?;
        let last_name = required_text(&payload, "candidate.last_name")?;
        let title = required_text(&payload, "job.title")?;
        let department = required_text(&payload, "job.department")?;
        let country = required_text(&payload, "employment.country")?;
        let contract_type = required_text(&payload, "employment.contract_type")?;
        let start_date = required_text(&payload, "employment.start_date")?;

        let scenario = Scenario {
            standard: flag(&payload, "scenario.standard"),
            unknown_role: flag(&payload, "scenario.unknown_role"),
            simulate_it_failure: flag(&payload, "scenario.simulate_it_failure"),
            duplicate_event_id: flag(&payload, "scenario.duplicate_event_id"),
        };

        Ok(Self {
            event_id,
            candidate: Candidate {
                first_name,
                last_name,
                email,
            },
            job: Job {
                title,
                department,
                level: optional_text(&payload, "job.level"),
            },
            employment: Employment {
                country,
                contract_type,
                start_date,
            },
            manager_email: optional_text(&payload, "manager.email"),
            scenario,
            occurred_at: optional_text(&payload, "occurred_at"),
            payload,
        })
    }

    /// Returns the deduplication key.
    #[must_use]
    pub fn event_id(&self) -> &NonEmptyString {
        &self.event_id
    }

    /// Returns candidate identity.
    #[must_use]
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Returns job details.
    #[must_use]
    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Returns employment terms.
    #[must_use]
    pub fn employment(&self) -> &Employment {
        &self.employment
    }

    /// Returns optional manager email.
    #[must_use]
    pub fn manager_email(&self) -> Option<&str> {
        self.manager_email.as_deref()
    }

    /// Returns demo scenario switches.
    #[must_use]
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Returns caller-supplied occurrence timestamp.
    #[must_use]
    pub fn occurred_at(&self) -> Option<&str> {
        self.occurred_at.as_deref()
    }

    /// Returns the payload exactly as submitted.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the payload with the assigned run id, as stored on the run.
    #[must_use]
    pub fn with_run_id(&self, run_id: RunId) -> Value {
        let mut payload = self.payload.clone();
        if let Value::Object(map) = &mut payload {
            map.insert("run_id".to_owned(), Value::String(run_id.to_string()));
        }

        payload
    }
}

fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(payload, |current, segment| current.get(segment))
}

fn optional_text(payload: &Value, path: &str) -> Option<String> {
    lookup(payload, path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn required_text(payload: &Value, path: &str) -> AppResult<String> {
    optional_text(payload, path)
        .ok_or_else(|| AppError::Validation(format!("missing required field '{path}'")))
}

fn flag(payload: &Value, path: &str) -> bool {
    lookup(payload, path)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
