use crate::errors::DbError;
use crate::jobs::{JobService, NewJob};
use crate::query::RawQuery;
use serde::Serialize;
use serde_json::Value;

use super::command::Command;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputMode {
    Human,
    Plain,
    Json,
}

/// The `{success, message, data}` envelope every command answers with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self { success: true, message: message.into(), data }
    }

    /// Envelope for a failed command. Missing postings read as "Job not found".
    #[must_use]
    pub fn failure(err: &DbError) -> Self {
        let message = match err {
            DbError::NoSuchDocument(_) | DbError::InvalidDocumentId(_) => "Job not found".to_string(),
            other => other.to_string(),
        };
        Self { success: false, message, data: None }
    }
}

fn to_data<T: Serialize>(v: &T) -> Result<Option<Value>, DbError> {
    Ok(Some(serde_json::to_value(v)?))
}

/// Runs one command against the service and builds its envelope.
///
/// # Errors
/// Whatever the service or file reading reports; the caller renders it with [`Response::failure`].
pub fn execute(service: &JobService, cmd: Command) -> Result<Response, DbError> {
    match cmd {
        Command::ListJobs { query } => {
            let raw = RawQuery::parse(query.as_deref().unwrap_or_default());
            let jobs = service.list_jobs(&raw)?;
            Ok(Response::ok("Job List", to_data(&jobs)?))
        }
        Command::JobsInRadius { zipcode, distance } => {
            let jobs = service.search_in_radius(&zipcode, distance)?;
            Ok(Response::ok("Filtered Job list", to_data(&jobs)?))
        }
        Command::JobStats { topic } => {
            let stats = service.job_stats(&topic)?;
            if stats.is_empty() {
                return Ok(Response { success: false, message: format!("No stats found for - {topic}"), data: None });
            }
            Ok(Response::ok("Job stats", to_data(&stats)?))
        }
        Command::GetJob { id, slug } => {
            let job = service.get_job(&id, &slug)?;
            Ok(Response::ok("Job found!", to_data(&job)?))
        }
        Command::NewJob { file } => {
            let draft: NewJob = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let job = service.create_job(draft)?;
            Ok(Response::ok("Job created", to_data(&job)?))
        }
        Command::UpdateJob { id, file } => {
            let patch: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let job = service.update_job(&id, &patch)?;
            Ok(Response::ok("Job Updated", to_data(&job)?))
        }
        Command::DeleteJob { id } => {
            service.delete_job(&id)?;
            Ok(Response::ok("Job is Deleted!", None))
        }
    }
}

/// Text for stdout: the whole envelope as JSON, one compact record per line, or
/// the message followed by pretty-printed data.
#[must_use]
pub fn render(resp: &Response, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string(resp).unwrap_or_else(|_| "{}".into()),
        OutputMode::Plain => match &resp.data {
            Some(Value::Array(items)) => items.iter().map(Value::to_string).collect::<Vec<_>>().join("\n"),
            Some(other) => other.to_string(),
            None => resp.message.clone(),
        },
        OutputMode::Human => match &resp.data {
            Some(data) => {
                let body = serde_json::to_string_pretty(data).unwrap_or_else(|_| "null".into());
                format!("{}\n{body}", resp.message)
            }
            None => resp.message.clone(),
        },
    }
}

/// # Errors
/// See [`execute`].
pub fn run_with_format(service: &JobService, cmd: Command, mode: OutputMode) -> Result<Response, DbError> {
    let resp = execute(service, cmd)?;
    println!("{}", render(&resp, mode));
    Ok(resp)
}

/// # Errors
/// See [`execute`].
pub fn run(service: &JobService, cmd: Command) -> Result<Response, DbError> {
    run_with_format(service, cmd, OutputMode::Human)
}
