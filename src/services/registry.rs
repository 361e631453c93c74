use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::models::FormId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitting,
    Scheduled,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Scheduled => "scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("appointment already scheduled")]
    AlreadyScheduled,
    #[error("submission already in progress")]
    InProgress,
    #[error("scheduler registry lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
pub struct SchedulerRegistry {
    statuses: Mutex<HashMap<FormId, SubmissionStatus>>,
}

impl SchedulerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn statuses(&self) -> Result<MutexGuard<'_, HashMap<FormId, SubmissionStatus>>, ClaimError> {
        self.statuses.lock().map_err(|_| ClaimError::Poisoned)
    }

    pub fn status(&self, id: FormId) -> Result<Option<SubmissionStatus>, ClaimError> {
        Ok(self.statuses()?.get(&id).copied())
    }

    pub fn status_label(&self, id: FormId) -> Result<&'static str, ClaimError> {
        Ok(self
            .status(id)?
            .map(|s| s.as_str())
            .unwrap_or("unsubmitted"))
    }

    pub fn is_scheduled(&self, id: FormId) -> Result<bool, ClaimError> {
        Ok(self.status(id)? == Some(SubmissionStatus::Scheduled))
    }

    pub fn forget(&self, id: FormId) -> Result<(), ClaimError> {
        self.statuses()?.remove(&id);
        Ok(())
    }

    // The lock is released before side effects run; the claim holds the form until committed or dropped.
    pub fn begin_submission(&self, id: FormId) -> Result<SubmissionClaim<'_>, ClaimError> {
        let mut statuses = self.statuses()?;
        match statuses.get(&id) {
            Some(SubmissionStatus::Scheduled) => Err(ClaimError::AlreadyScheduled),
            Some(SubmissionStatus::Submitting) => Err(ClaimError::InProgress),
            None => {
                statuses.insert(id, SubmissionStatus::Submitting);
                Ok(SubmissionClaim {
                    registry: self,
                    id,
                    committed: false,
                })
            }
        }
    }
}

#[derive(Debug)]
pub struct SubmissionClaim<'a> {
    registry: &'a SchedulerRegistry,
    id: FormId,
    committed: bool,
}

impl SubmissionClaim<'_> {
    pub fn mark_scheduled(mut self) -> Result<(), ClaimError> {
        self.registry
            .statuses()?
            .insert(self.id, SubmissionStatus::Scheduled);
        self.committed = true;
        Ok(())
    }
}

impl Drop for SubmissionClaim<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Ok(mut statuses) = self.registry.statuses.lock() {
            if statuses.get(&self.id) == Some(&SubmissionStatus::Submitting) {
                statuses.remove(&self.id);
            }
        }
    }
}
