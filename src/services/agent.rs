use crate::models::field::{helper_info, input_schema, required_fields};
use crate::models::Command;

pub const ACTION_NAME: &str = "submit_health_appointment_info";

const PROMPT_RULES: &str = r#"
Submit each piece of information separately, one field per call. If the caller gave several pieces of information at once, call the action once for each of them.

Fields starting with * are commands, not information to collect from the caller. Their input is ignored.

If the action succeeds, tell the caller the information was validated (do not say confirmed or scheduled).
If the action fails, tell the caller and work through the error with them.
If the action returns a next step, such as repeating the info back or spelling it out, do it unless the caller asks not to.

Don't say YYYY-MM-DD when referring to date of birth, say date of birth.

When spelling, say each letter followed by a period and a space, and say the word space for spaces. For example, Apple Pie becomes: A. p. p. l. e. space P. i. e.

If the caller says 'yeah' or 'uhh', they are starting a sentence; wait before replying.

Only mention that a field is required if it is listed as required. Optional fields can still be asked for; tell the caller they may skip them, and that giving them now saves time at the clinic.

Collect every required field of a stage before moving on to the next stage. Don't ask which appointment the caller wants until their name, reason for visit, and the rest of stage 1 are collected.
"#;

pub fn initial_message(clinic_name: &str) -> String {
    format!(
        "Hello, this line schedules appointments for {clinic_name}. Would you like to make an appointment?"
    )
}

pub fn prompt_preamble() -> String {
    let required: Vec<&str> = required_fields().map(|f| f.as_str()).collect();
    let availability = Command::ShowAppointmentAvailability;
    let submit = Command::ValidateAllAndSubmitIfValid;

    format!(
        "Help the caller schedule a doctor's appointment.\n\n\
         Collect the following fields from the caller: {schema}, and use {ACTION_NAME} each time information is given.\n\n\
         Stages and required fields: {stages}\n\
         Required fields: {required:?}\n\
         {PROMPT_RULES}\n\
         Get appointment options from {ACTION_NAME} with the field '{availability}', not from the caller; the caller only picks one from the list.\n\n\
         Keep running {ACTION_NAME} with the field '{submit}' and follow its steps until it succeeds. \
         Nothing is saved or submitted until it does, so never tell the caller the appointment is scheduled before then.",
        schema = input_schema()["properties"],
        stages = helper_info(),
    )
}
