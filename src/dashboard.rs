//! Explicit dashboard state and the orchestration of one submission.
//!
//! All mutations go through [`reduce`]. Each request captures a sequence
//! number when issued; a response is applied only while its number is the
//! latest issued on its channel, so overlapping requests cannot render out
//! of order.

use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde_json::json;

use crate::api::OpsSource;
use crate::dates::DateRange;
use crate::error::{RequestError, ValidationError};
use crate::logging::{
    log, log_request, log_response, log_stale_response, log_validation_failure, obj, v_str,
    Domain, Level, ProfileScope,
};
use crate::model::Record;
use crate::query::{FilterForm, Query};
use crate::rank;
use crate::summary::Summary;
use crate::view::{self, ViewModel};

pub const NO_FILTER_LABEL: &str = "Todas";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded { records: Vec<Record>, summary: Summary },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Sub-species selector: a fixed "no filter" entry followed by whatever
/// the last successful load returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubspeciesSelect {
    options: Vec<SelectOption>,
}

impl Default for SubspeciesSelect {
    fn default() -> Self {
        Self {
            options: vec![SelectOption { value: String::new(), label: NO_FILTER_LABEL.to_string() }],
        }
    }
}

impl SubspeciesSelect {
    pub fn replace(&mut self, values: Vec<String>) {
        self.options.truncate(1);
        self.options
            .extend(values.into_iter().map(|v| SelectOption { label: v.clone(), value: v }));
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    OpsLoaded { seq: u64, records: Vec<Record> },
    OpsFailed { seq: u64, error: RequestError },
    FiltersLoaded { seq: u64, options: Vec<String> },
    FiltersFailed { seq: u64, error: RequestError },
}

/// Whether a response made it into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub phase: Phase,
    pub subspecies: SubspeciesSelect,
    ops_seq: u64,
    filters_seq: u64,
}

impl DashboardState {
    /// Issue a new main request: bumps the sequence and shows loading.
    pub fn begin_ops(&mut self) -> u64 {
        self.ops_seq += 1;
        self.phase = Phase::Loading;
        self.ops_seq
    }

    pub fn begin_filters(&mut self) -> u64 {
        self.filters_seq += 1;
        self.filters_seq
    }
}

pub fn reduce(state: &mut DashboardState, event: Event) -> Applied {
    match event {
        Event::OpsLoaded { seq, records } => {
            if seq != state.ops_seq {
                log_stale_response(seq, state.ops_seq, "ops");
                return Applied::Stale;
            }
            let records = rank::ranked(records);
            let summary = Summary::from_records(&records);
            log(
                Level::Debug,
                Domain::Rank,
                "ranked",
                obj(&[("records", json!(records.len())), ("groups", json!(summary.rows.len()))]),
            );
            state.phase = Phase::Loaded { records, summary };
        }
        Event::OpsFailed { seq, error } => {
            if seq != state.ops_seq {
                log_stale_response(seq, state.ops_seq, "ops");
                return Applied::Stale;
            }
            state.phase = Phase::Failed { message: error.to_string() };
        }
        Event::FiltersLoaded { seq, options } => {
            if seq != state.filters_seq {
                log_stale_response(seq, state.filters_seq, "filtros");
                return Applied::Stale;
            }
            state.subspecies.replace(options);
        }
        Event::FiltersFailed { seq, error } => {
            if seq != state.filters_seq {
                log_stale_response(seq, state.filters_seq, "filtros");
                return Applied::Stale;
            }
            // Options stay as they were.
            log(
                Level::Warn,
                Domain::Filters,
                "options_unchanged",
                obj(&[("msg", v_str(&error.to_string()))]),
            );
        }
    }
    Applied::Current
}

/// One dashboard view over a data source.
pub struct Dashboard<S> {
    source: S,
    state: Mutex<DashboardState>,
}

impl<S: OpsSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self { source, state: Mutex::new(DashboardState::default()) }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Validate the form and, if it passes, run the query.
    pub async fn submit(&self, form: &FilterForm) -> Result<Applied, ValidationError> {
        let query = form.build().map_err(|err| {
            log_validation_failure(&err.to_string());
            err
        })?;
        Ok(self.run_query(&query).await)
    }

    pub async fn run_query(&self, query: &Query) -> Applied {
        let seq = self.state().begin_ops();
        log_request(seq, "ops", &query.params());

        let result = {
            let _scope = ProfileScope::with_context("fetch_ops", &[("request_seq", json!(seq))]);
            self.source.fetch_ops(query).await
        };

        let event = match result {
            Ok(records) => {
                log_response(seq, "ops", Ok(records.len()));
                Event::OpsLoaded { seq, records }
            }
            Err(error) => {
                log_response(seq, "ops", Err(error.to_string().as_str()));
                Event::OpsFailed { seq, error }
            }
        };
        reduce(&mut self.state(), event)
    }

    /// Refresh the sub-species options for a date range. The error is
    /// returned for the caller to report; the options are left untouched.
    pub async fn reload_subspecies(&self, range: &DateRange) -> Result<Applied, RequestError> {
        let seq = self.state().begin_filters();
        log_request(seq, "filtros", &range.wire_params());

        match self.source.fetch_subspecies(range).await {
            Ok(options) => {
                log_response(seq, "filtros", Ok(options.len()));
                Ok(reduce(&mut self.state(), Event::FiltersLoaded { seq, options }))
            }
            Err(error) => {
                log_response(seq, "filtros", Err(error.to_string().as_str()));
                reduce(&mut self.state(), Event::FiltersFailed { seq, error: error.clone() });
                Err(error)
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.state().phase.clone()
    }

    pub fn subspecies_options(&self) -> Vec<SelectOption> {
        self.state().subspecies.options().to_vec()
    }

    pub fn view(&self) -> ViewModel {
        let _scope = ProfileScope::new("render");
        view::render(&self.state().phase)
    }
}
