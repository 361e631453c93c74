use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::field::required_fields;
use crate::models::{Catalog, Command, Field, FieldKey, FieldValue, FormRecord, StepOutcome};
use crate::services::messaging::{confirmation_body, MessagingProvider};
use crate::services::registry::{ClaimError, SchedulerRegistry};
use crate::services::validation::{default_next_step, validate_field};

const ONE_KEY_AT_A_TIME: &str = "please input only one key at a time";

pub struct Intake<'a> {
    pub registry: &'a SchedulerRegistry,
    pub notifier: &'a dyn MessagingProvider,
    pub catalog: &'a Catalog,
    pub today: NaiveDate,
}

impl Intake<'_> {
    /// Applies one `{field: value}` pair, or runs the command it names.
    ///
    /// Malformed payloads and rejected values come back as failed outcomes.
    /// `Err` is reserved for internal faults.
    pub async fn validate_and_apply(
        &self,
        form: &mut FormRecord,
        payload: &Map<String, Value>,
    ) -> Result<StepOutcome, AppError> {
        let Some((key, value)) = payload.iter().next() else {
            return Ok(StepOutcome::fail("no keys found in payload", ONE_KEY_AT_A_TIME));
        };

        match FieldKey::resolve(key) {
            FieldKey::Command(command) => self.run_command(form, command).await,
            FieldKey::UnknownCommand(name) => Ok(StepOutcome::fail(
                format!("special field: {name} not found"),
                "please retry",
            )),
            _ if payload.len() > 1 => {
                let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
                Ok(StepOutcome::fail(
                    format!("multiple keys found: {keys:?}"),
                    ONE_KEY_AT_A_TIME,
                ))
            }
            FieldKey::Field(field) => Ok(self.apply_field(form, field, value)),
            FieldKey::Unknown(name) => Ok(StepOutcome::fail(format!("{name} not found"), "")),
        }
    }

    fn apply_field(&self, form: &mut FormRecord, field: Field, raw: &Value) -> StepOutcome {
        let value = match FieldValue::from_json(field, raw) {
            Ok(v) => v,
            Err(reason) => return StepOutcome::fail(reason, default_next_step()),
        };

        match validate_field(field, &value, self.today) {
            Ok(accepted) => {
                form.set(field, accepted.value);
                StepOutcome::ok(accepted.info, accepted.next_step)
            }
            Err(e) => StepOutcome::fail(e.to_string(), e.next_step()),
        }
    }

    async fn run_command(
        &self,
        form: &mut FormRecord,
        command: Command,
    ) -> Result<StepOutcome, AppError> {
        match command {
            Command::ShowNextStep => Ok(StepOutcome::ok(
                "seeing next step",
                "if any required fields are missing, ask the user for information.",
            )),
            Command::ShowAppointmentAvailability => {
                let slots = serde_json::to_string(self.catalog.slots())
                    .map_err(|e| AppError::Internal(e.to_string()))?;
                Ok(StepOutcome::ok(
                    format!("available appointments list: {slots}"),
                    "help the user pick out an appointment. Don't repeat verbatim, give important details like name and time.",
                ))
            }
            Command::ValidateAllAndSubmitIfValid => self.submit(form).await,
        }
    }

    async fn submit(&self, form: &mut FormRecord) -> Result<StepOutcome, AppError> {
        let claim = match self.registry.begin_submission(form.id()) {
            Ok(claim) => claim,
            Err(ClaimError::AlreadyScheduled) => {
                return Ok(StepOutcome::fail(
                    "This appointment has already been successfully submitted.",
                    "Tell the user their information was already submitted; nothing else is needed.",
                ))
            }
            Err(ClaimError::InProgress) => {
                return Ok(StepOutcome::fail(
                    "This appointment is currently being submitted.",
                    format!("wait a moment, then use {} again", Command::ValidateAllAndSubmitIfValid),
                ))
            }
            Err(e) => return Err(e.into()),
        };

        let errors = self.collect_errors(form);
        if !errors.is_empty() {
            tracing::debug!(form_id = %form.id(), count = errors.len(), "final validation failed");
            return Ok(StepOutcome::fail(
                format!("errors found: {}", errors.join("; ")),
                "Ask the user for information to fix the errors, don't end the call",
            ));
        }

        self.autofill(form);

        if form.flag(Field::SendText) == Some(true) {
            let to = form.text(Field::PatientPhoneNumber).unwrap_or_default();
            let body = confirmation_body(&form.details_text());
            if let Err(e) = self.notifier.send_message(to, &body).await {
                tracing::error!(form_id = %form.id(), error = %e, "failed to send confirmation text");
                return Ok(StepOutcome::fail("Could not send confirmation text", "please retry"));
            }
        }

        claim.mark_scheduled()?;
        tracing::info!(form_id = %form.id(), "appointment scheduled");

        Ok(StepOutcome::ok(
            "",
            "Tell the user \"Information successfully submitted. A confirmation text has been sent if the option was selected.\".",
        ))
    }

    fn collect_errors(&self, form: &FormRecord) -> Vec<String> {
        let mut errors: Vec<String> = required_fields()
            .filter(|f| !form.is_set(*f))
            .map(|f| format!("required field {f} is missing"))
            .collect();

        for field in Field::ALL {
            match form.get(field) {
                None if !field.is_required() => {}
                None => errors.push(format!("field {field} is required, ask the user for info.")),
                Some(value) => {
                    if let Err(e) = validate_field(field, value, self.today) {
                        errors.push(format!(
                            "field {field} with value {value} did not validate: {e}"
                        ));
                    }
                }
            }
        }
        errors
    }

    fn autofill(&self, form: &mut FormRecord) {
        let Some(slot) = form
            .text(Field::AppointmentId)
            .and_then(|id| self.catalog.find(id))
        else {
            return;
        };
        for (field, value) in slot.autofill_pairs() {
            if !form.is_set(field) {
                form.set(field, FieldValue::Text(value.to_string()));
            }
        }
    }
}
