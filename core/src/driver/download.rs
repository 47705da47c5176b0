//! Download descriptor handed to an HTTP layer.
//!
//! The response framing belongs to the caller; this only carries the
//! status, headers and a producer that is invoked once to push the
//! processed bytes into the response body.

use std::fmt;
use std::io::Write;

use crate::constants::{DOWNLOAD_CONTENT_TYPE, DOWNLOAD_STATUS};
use crate::telemetry::StreamSnapshot;
use crate::types::Result;

pub type Producer = Box<dyn FnOnce(&mut dyn Write) -> Result<StreamSnapshot> + Send>;

pub struct Download {
    filename: String,
    status: u16,
    headers: Vec<(String, String)>,
    producer: Producer,
}

impl Download {
    pub fn new<F>(filename: String, headers: Vec<(String, String)>, producer: F) -> Self
    where
        F: FnOnce(&mut dyn Write) -> Result<StreamSnapshot> + Send + 'static,
    {
        Self { filename, status: DOWNLOAD_STATUS, headers, producer: Box::new(producer) }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Run the producer into `body`. Consumes the descriptor.
    pub fn send(self, body: &mut dyn Write) -> Result<StreamSnapshot> {
        (self.producer)(body)
    }
}

impl fmt::Debug for Download {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Download")
            .field("filename", &self.filename)
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Default attachment headers for `filename`, with `extra` replacing any
/// default of the same name.
pub fn attachment_headers(filename: &str, extra: &[(String, String)]) -> Vec<(String, String)> {
    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', "\\\""));
    let mut headers = vec![
        ("Content-Type".to_owned(), DOWNLOAD_CONTENT_TYPE.to_owned()),
        ("Content-Disposition".to_owned(), disposition),
    ];
    for (name, value) in extra {
        match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}
