//! Submission state machine
//!
//! `Idle → Submitting → {Succeeded, Failed}`. A started submission always
//! ends in a terminal state; it can never go back to `Idle`, and a second
//! submission cannot begin while one is in flight.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;
use viralsynth_common::{Error, Result};

/// Named states of one view's submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Submitting => "submitting",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One started submission
#[derive(Debug, Clone)]
pub struct Submission<Req> {
    pub id: Uuid,
    pub request: Req,
    pub started_at: DateTime<Utc>,
}

/// Point-in-time copy of the machine for rendering
#[derive(Debug, Clone)]
pub struct SubmissionSnapshot<Req, Resp> {
    pub phase: Phase,
    /// Most recent request, in flight or finished
    pub request: Option<Req>,
    pub started_at: Option<DateTime<Utc>>,
    /// Last successful result; kept while a newer submission is in flight
    pub result: Option<Arc<Resp>>,
    pub error: Option<String>,
}

impl<Req, Resp> SubmissionSnapshot<Req, Resp> {
    /// Whether the submit control must be disabled
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }
}

#[derive(Debug)]
pub struct SubmissionMachine<Req, Resp> {
    phase: Phase,
    latest: Option<Submission<Req>>,
    result: Option<Arc<Resp>>,
    error: Option<String>,
}

impl<Req, Resp> Default for SubmissionMachine<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> SubmissionMachine<Req, Resp> {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            latest: None,
            result: None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `Idle | Succeeded | Failed → Submitting`
    ///
    /// Rejected with [`Error::Busy`] while a submission is in flight. The
    /// previous result stays visible until the new outcome arrives.
    pub fn begin(&mut self, request: Req) -> Result<Uuid> {
        if self.phase == Phase::Submitting {
            return Err(Error::Busy(
                "a submission is already in progress".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        self.latest = Some(Submission {
            id,
            request,
            started_at: Utc::now(),
        });
        self.phase = Phase::Submitting;
        self.error = None;
        Ok(id)
    }

    /// `Submitting → Succeeded`
    pub fn succeed(&mut self, id: Uuid, result: Arc<Resp>) -> Result<()> {
        self.check_active(id, Phase::Succeeded)?;
        self.phase = Phase::Succeeded;
        self.result = Some(result);
        self.error = None;
        Ok(())
    }

    /// `Submitting → Failed`; a failed submission leaves no stored result
    pub fn fail(&mut self, id: Uuid, message: impl Into<String>) -> Result<()> {
        self.check_active(id, Phase::Failed)?;
        self.phase = Phase::Failed;
        self.result = None;
        self.error = Some(message.into());
        Ok(())
    }

    /// Clear a finished outcome back to `Idle`
    pub fn reset(&mut self) -> Result<()> {
        if self.phase == Phase::Submitting {
            return Err(self.transition_error(Phase::Idle));
        }
        self.phase = Phase::Idle;
        self.latest = None;
        self.result = None;
        self.error = None;
        Ok(())
    }

    /// Submission currently or most recently started
    pub fn latest(&self) -> Option<&Submission<Req>> {
        self.latest.as_ref()
    }

    fn check_active(&self, id: Uuid, to: Phase) -> Result<()> {
        let is_active = self.phase == Phase::Submitting
            && self.latest.as_ref().map(|s| s.id) == Some(id);
        if is_active {
            Ok(())
        } else {
            Err(self.transition_error(to))
        }
    }

    fn transition_error(&self, to: Phase) -> Error {
        Error::InvalidTransition {
            from: self.phase.to_string(),
            to: to.to_string(),
        }
    }
}

impl<Req: Clone, Resp> SubmissionMachine<Req, Resp> {
    pub fn snapshot(&self) -> SubmissionSnapshot<Req, Resp> {
        SubmissionSnapshot {
            phase: self.phase,
            request: self.latest.as_ref().map(|s| s.request.clone()),
            started_at: self.latest.as_ref().map(|s| s.started_at),
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }
}
