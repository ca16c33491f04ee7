//! Submission of a completed application

use crate::identity::Identity;
use crate::state::AnswerSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Default duration of the simulated submission
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(2000);

/// Snapshot handed to the sink
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub answers: AnswerSet,
    pub identity: Option<Identity>,
}

/// Proof of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn issue() -> Self {
        Self {
            reference: Uuid::new_v4(),
            submitted_at: Utc::now(),
        }
    }

    /// Short reference shown to the applicant
    pub fn short_reference(&self) -> String {
        self.reference.simple().to_string()[..8].to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Submission failed: {0}")]
    Rejected(String),
    #[error("Submission was interrupted")]
    Interrupted,
}

/// Where completed applications go
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, application: Application) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Answers applications after a fixed delay without sending them anywhere.
///
/// Applications without the declaration accepted are rejected.
#[derive(Debug, Clone)]
pub struct SimulatedSubmission {
    delay: Duration,
}

impl SimulatedSubmission {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[cfg(test)]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedSubmission {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl SubmissionSink for SimulatedSubmission {
    async fn submit(&self, application: Application) -> Result<SubmissionReceipt, SubmissionError> {
        tokio::time::sleep(self.delay).await;
        if !application.answers.agree {
            tracing::warn!("Rejecting application without an accepted declaration");
            return Err(SubmissionError::Rejected(
                "the declaration was not accepted".to_string(),
            ));
        }
        let receipt = SubmissionReceipt::issue();
        tracing::info!(
            reference = %receipt.reference,
            applicant = application.identity.as_ref().map(|i| i.email.as_str()).unwrap_or("anonymous"),
            "Application accepted"
        );
        Ok(receipt)
    }
}
