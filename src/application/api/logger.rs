use std::{fmt::Display, time::Duration};

use hyper::{Method, StatusCode};
use serde_json::Value;

/// One access-log line: `:method :url :status :size - :time ms :body`.
///
/// The body is only ever set for POST requests, the size is printed as
/// `-` when the response has no body.
pub struct RequestLog<'a> {
    method: &'a Method,
    url: &'a str,
    status: StatusCode,
    size: u64,
    elapsed: Duration,
    body: Option<&'a Value>,
}

impl<'a> RequestLog<'a> {
    pub fn new(
        method: &'a Method,
        url: &'a str,
        status: StatusCode,
        size: u64,
        elapsed: Duration,
        body: Option<&'a Value>,
    ) -> Self {
        Self {
            method,
            url,
            status,
            size,
            elapsed,
            body: body.filter(|_| *method == Method::POST),
        }
    }
}

impl Display for RequestLog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} ", self.method, self.url, self.status.as_u16())?;
        if self.size == 0 {
            f.write_str("-")?;
        } else {
            write!(f, "{}", self.size)?;
        }
        write!(f, " - {:.3} ms", self.elapsed.as_secs_f64() * 1000.0)?;
        match self.body {
            // An empty POST is logged as an empty object.
            Some(Value::Null) => f.write_str(" {}")?,
            Some(body) => write!(f, " {}", body)?,
            None => {}
        }
        Ok(())
    }
}

pub fn log_request(line: RequestLog<'_>) {
    tracing::info!(status = line.status.as_u16(), "{}", line);
}
