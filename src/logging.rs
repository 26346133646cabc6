//! Structured JSON-lines logging.
//!
//! Every record carries a run id, a global sequence number, the level and
//! the pipeline domain it belongs to. Records go to
//! `$LOG_DIR/<run_id>/events.jsonl` (info and above) or `trace.jsonl`
//! (debug and trace). Stdout belongs to the report, so the console echo
//! goes to stderr and only when `LOG_ECHO=1`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_LEVEL").as_deref().unwrap_or("info"))
    }

    pub fn parse(text: &str) -> Self {
        match text {
            "trace" => Level::Trace,
            "debug" => Level::Debug,
            "warn" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Query,   // Form validation, query building
    Fetch,   // Backend requests and responses
    Rank,    // Ordering of fetched records
    Render,  // View model construction
    Filters, // Sub-species option loading
    System,  // Startup, configuration
    Profile, // Timings
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Query => "query",
            Domain::Fetch => "fetch",
            Domain::Rank => "rank",
            Domain::Render => "render",
            Domain::Filters => "filters",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
    trace: Option<Mutex<BufWriter<File>>>,
    echo: bool,
}

fn open_log(path: PathBuf) -> Option<Mutex<BufWriter<File>>> {
    match File::create(&path) {
        Ok(file) => Some(Mutex::new(BufWriter::new(file))),
        Err(err) => {
            eprintln!("[log] cannot create {}: {}", path.display(), err);
            None
        }
    }
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let base = std::env::var("LOG_DIR").unwrap_or_else(|_| "out/runs".to_string());
        let echo = matches!(std::env::var("LOG_ECHO").as_deref(), Ok("1") | Ok("true"));
        let run_dir = PathBuf::from(base).join(&run_id);

        if let Err(err) = create_dir_all(&run_dir) {
            eprintln!("[log] failed to create run dir: {}", err);
            return RunContext { run_id, events: None, trace: None, echo };
        }

        let _ = std::fs::write(
            run_dir.join("manifest.json"),
            json!({
                "run_id": run_id,
                "ts": ts_now(),
                "pid": process::id(),
                "log_dir": run_dir.to_string_lossy(),
            })
            .to_string(),
        );

        RunContext {
            events: open_log(run_dir.join("events.jsonl")),
            trace: open_log(run_dir.join("trace.jsonl")),
            run_id,
            echo,
        }
    })
}

fn sanitize_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    let redacted = Value::String("[REDACTED]".to_string());
    for key in ["authorization", "Authorization", "cookie", "Cookie", "senha", "password"] {
        if fields.contains_key(key) {
            fields.insert(key.to_string(), redacted.clone());
        }
    }
    fields
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["request_seq", "endpoint", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Option<Mutex<BufWriter<File>>>, line: &str) {
    if let Some(writer) = writer {
        if let Ok(mut w) = writer.lock() {
            let _ = writeln!(w, "{}", line);
            let _ = w.flush();
        }
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain, event, fields);
}

/// Build the JSON line for a record without writing it.
fn build_record(
    run_id: &str,
    level: Level,
    domain: Domain,
    event: &str,
    fields: Map<String, Value>,
) -> Value {
    let fields = sanitize_fields(fields);
    let (mut top, data) = split_fields(fields);

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("domain".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry)
}

fn emit_record(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let line = build_record(&ctx.run_id, level, domain, event, fields).to_string();
    match level {
        Level::Trace | Level::Debug => write_line(&ctx.trace, &line),
        _ => write_line(&ctx.events, &line),
    }
    if ctx.echo {
        eprintln!("{}", line);
    }
}

// =============================================================================
// Pipeline logs
// =============================================================================

pub fn log_validation_failure(reason: &str) {
    log(
        Level::Warn,
        Domain::Query,
        "validation_failed",
        obj(&[("msg", v_str(reason))]),
    );
}

pub fn log_request(request_seq: u64, endpoint: &str, params: &[(&str, String)]) {
    let params: Map<String, Value> = params
        .iter()
        .map(|(k, v)| ((*k).to_string(), v_str(v)))
        .collect();
    log(
        Level::Info,
        Domain::Fetch,
        "request",
        obj(&[
            ("request_seq", json!(request_seq)),
            ("endpoint", v_str(endpoint)),
            ("params", Value::Object(params)),
        ]),
    );
}

pub fn log_response(request_seq: u64, endpoint: &str, outcome: Result<usize, &str>) {
    let (level, fields) = match outcome {
        Ok(count) => (
            Level::Info,
            obj(&[
                ("request_seq", json!(request_seq)),
                ("endpoint", v_str(endpoint)),
                ("records", json!(count)),
            ]),
        ),
        Err(message) => (
            Level::Error,
            obj(&[
                ("request_seq", json!(request_seq)),
                ("endpoint", v_str(endpoint)),
                ("msg", v_str(message)),
            ]),
        ),
    };
    log(level, Domain::Fetch, "response", fields);
}

pub fn log_stale_response(request_seq: u64, latest_seq: u64, endpoint: &str) {
    log(
        Level::Warn,
        Domain::Fetch,
        "stale_response_dropped",
        obj(&[
            ("request_seq", json!(request_seq)),
            ("endpoint", v_str(endpoint)),
            ("latest_seq", json!(latest_seq)),
        ]),
    );
}

// =============================================================================
// Helpers
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Logs the elapsed time of a pipeline step on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self::with_context(label, &[])
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self { label, context: obj(fields), started: Instant::now() }
    }

    fn timing_fields(&mut self) -> Map<String, Value> {
        let elapsed = self.started.elapsed();
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_us".to_string(), json!(elapsed.as_micros() as u64));
        fields.insert("elapsed_ms".to_string(), v_num(elapsed.as_secs_f64() * 1000.0));
        fields
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let fields = self.timing_fields();
        log(Level::Debug, Domain::Profile, "timing", fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Warn < Level::Error);
        assert_eq!(Level::parse("bogus"), Level::Info);
    }

    #[test]
    fn test_sensitive_fields_redacted() {
        let fields = obj(&[("Authorization", v_str("Bearer abc")), ("cod_op", v_str("77"))]);
        let clean = sanitize_fields(fields);
        assert_eq!(clean.get("Authorization").unwrap(), "[REDACTED]");
        assert_eq!(clean.get("cod_op").unwrap(), "77");
    }

    #[test]
    fn test_record_shape() {
        let record = build_record(
            "r-test",
            Level::Warn,
            Domain::Fetch,
            "stale_response_dropped",
            obj(&[("request_seq", json!(3)), ("msg", v_str("late")), ("latest_seq", json!(4))]),
        );
        assert_eq!(record["lvl"], "WARN");
        assert_eq!(record["domain"], "fetch");
        assert_eq!(record["request_seq"], 3);
        assert_eq!(record["msg"], "late");
        assert_eq!(record["data"]["latest_seq"], 4);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_profile_scope_fields() {
        let mut scope = ProfileScope::with_context("fetch_ops", &[("request_seq", json!(2))]);
        let fields = scope.timing_fields();
        assert_eq!(fields["label"], "fetch_ops");
        assert_eq!(fields["request_seq"], 2);
        assert!(fields["elapsed_ms"].as_f64().unwrap() >= 0.0);
        assert!(fields["elapsed_us"].is_u64());
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }
}
