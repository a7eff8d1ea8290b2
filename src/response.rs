/// Per-host responses handed over by the request dispatcher
///
/// A batch is a list of `{addr, error?, payload?}` records. Collecting a
/// batch routes each host into the error map or the result map of a
/// `HostResults`, in the order the responses arrive.
use crate::aggregate::{HostError, HostResults};
use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};

/// Error recorded for a host that returned neither an error nor a payload
pub const NO_RESPONSE: &str = "no response received";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponse<P> {
    /// `name` or `name:port`
    pub addr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
}

impl<P> HostResponse<P> {
    pub fn ok(addr: impl Into<String>, payload: P) -> Self {
        HostResponse { addr: addr.into(), error: None, payload: Some(payload) }
    }

    pub fn failed(addr: impl Into<String>, error: impl Into<String>) -> Self {
        HostResponse { addr: addr.into(), error: Some(error.into()), payload: None }
    }
}

/// One batch of responses to the same request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponses<P> {
    #[serde(default = "Vec::new")]
    pub responses: Vec<HostResponse<P>>,
}

impl<P> Default for HostResponses<P> {
    fn default() -> Self {
        HostResponses { responses: Vec::new() }
    }
}

impl<P: Serialize> HostResponses<P> {
    /// Group the batch by outcome.
    ///
    /// An error takes precedence over a payload. Any malformed or repeated
    /// host address aborts the whole pass.
    pub fn collect(self) -> Result<HostResults<P>> {
        let mut results = HostResults::new();
        let total = self.responses.len();

        for resp in self.responses {
            match (resp.error, resp.payload) {
                (Some(err), _) => results.add_error(&resp.addr, HostError::new(err))?,
                (None, Some(payload)) => results.add_result(&resp.addr, payload)?,
                (None, None) => results.add_error(&resp.addr, HostError::new(NO_RESPONSE))?,
            }
        }

        debug!(
            "collected {} responses into {} error groups and {} result groups",
            total,
            results.errors.len(),
            results.results.len()
        );
        Ok(results)
    }
}
