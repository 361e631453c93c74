use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub success: bool,
    pub info: String,
    pub next_step: String,
}

impl StepOutcome {
    pub fn ok(info: impl Into<String>, next_step: impl Into<String>) -> Self {
        Self {
            success: true,
            info: info.into(),
            next_step: next_step.into(),
        }
    }

    pub fn fail(info: impl Into<String>, next_step: impl Into<String>) -> Self {
        Self {
            success: false,
            info: info.into(),
            next_step: next_step.into(),
        }
    }

    pub fn application_error() -> Self {
        Self::fail("Error: an application error has occurred", "retry?")
    }

    pub fn describe(&self) -> String {
        if self.success {
            format!("info: {:?} Next step: {:?}", self.info, self.next_step)
        } else {
            format!("Error: {:?} Next step: {:?}", self.info, self.next_step)
        }
    }
}
