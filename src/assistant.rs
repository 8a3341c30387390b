//! Optional commentary collaborator.
//!
//! An [`Assistant`] (for example an LLM client) may add free-text commentary
//! to an answer. Routing and aggregation never consult it, and a failing
//! assistant never fails the query.

use anyhow::Result;

pub trait Assistant {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Returns commentary on `answer`, which was produced for `query`.
    fn elaborate(&self, query: &str, answer: &str) -> Result<String>;
}
