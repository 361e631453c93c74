use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Leading character that marks a key as a command rather than a form field.
pub const SPECIAL_MARKER: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PatientName,
    PatientDob,
    InsuranceInfoPayerName,
    InsuranceInfoPayerId,
    ReferralToPhysician,
    ReasonForVisit,
    PatientAddress,
    PatientPhoneNumber,
    AppointmentNumber,
    AppointmentId,
    AppointmentPhysicianId,
    AppointmentPhysicianName,
    AppointmentTime,
    AppointmentAddress,
    SendText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
        }
    }
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::PatientName,
        Field::PatientDob,
        Field::InsuranceInfoPayerName,
        Field::InsuranceInfoPayerId,
        Field::ReferralToPhysician,
        Field::ReasonForVisit,
        Field::PatientAddress,
        Field::PatientPhoneNumber,
        Field::AppointmentNumber,
        Field::AppointmentId,
        Field::AppointmentPhysicianId,
        Field::AppointmentPhysicianName,
        Field::AppointmentTime,
        Field::AppointmentAddress,
        Field::SendText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PatientName => "patient_name",
            Field::PatientDob => "patient_dob",
            Field::InsuranceInfoPayerName => "insurance_info_payer_name",
            Field::InsuranceInfoPayerId => "insurance_info_payer_id",
            Field::ReferralToPhysician => "referral_to_physician",
            Field::ReasonForVisit => "reason_for_visit",
            Field::PatientAddress => "patient_address",
            Field::PatientPhoneNumber => "patient_phone_number",
            Field::AppointmentNumber => "appointment_number",
            Field::AppointmentId => "appointment_id",
            Field::AppointmentPhysicianId => "appointment_physician_id",
            Field::AppointmentPhysicianName => "appointment_physician_name",
            Field::AppointmentTime => "appointment_time",
            Field::AppointmentAddress => "appointment_address",
            Field::SendText => "send_text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::SendText => FieldType::Boolean,
            _ => FieldType::String,
        }
    }

    pub fn format(&self) -> Option<&'static str> {
        match self {
            Field::PatientDob => Some("date"),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Field::PatientName => "name of the patient",
            Field::PatientDob => "Date of birth for the patient.",
            Field::InsuranceInfoPayerName => {
                "insurance payer for patient. Examples include Aetna, Medicare Kaiser, etc"
            }
            Field::InsuranceInfoPayerId => "insurance payer id.",
            Field::ReferralToPhysician => {
                "The name of which doctor the patient has been referred to, if any."
            }
            Field::ReasonForVisit => "Why they are coming to visit.",
            Field::PatientAddress => "patient address.",
            Field::PatientPhoneNumber => "patient phone number.",
            Field::AppointmentNumber => "appointment number from the availability list.",
            Field::AppointmentId => {
                "appointment id. Before the first time asking for this information use *see_appointment_availability so that the user can know which appointment to pick."
            }
            Field::AppointmentPhysicianId => "appointment physician id.",
            Field::AppointmentPhysicianName => "appointment physician name.",
            Field::AppointmentTime => "appointment time.",
            Field::AppointmentAddress => "appointment address.",
            Field::SendText => "If a text should be sent.",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Field::PatientName
            | Field::PatientDob
            | Field::InsuranceInfoPayerName
            | Field::InsuranceInfoPayerId
            | Field::ReferralToPhysician
            | Field::ReasonForVisit
            | Field::PatientAddress
            | Field::PatientPhoneNumber => Stage::PatientInfo,
            Field::AppointmentNumber
            | Field::AppointmentId
            | Field::AppointmentPhysicianId
            | Field::AppointmentPhysicianName
            | Field::AppointmentTime
            | Field::AppointmentAddress => Stage::AppointmentSelection,
            Field::SendText => Stage::NotificationPreference,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Field::PatientName
                | Field::PatientDob
                | Field::ReasonForVisit
                | Field::PatientPhoneNumber
                | Field::AppointmentId
                | Field::SendText
        )
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PatientInfo,
    AppointmentSelection,
    NotificationPreference,
}

impl Stage {
    pub const ALL: [Stage; 3] = [
        Stage::PatientInfo,
        Stage::AppointmentSelection,
        Stage::NotificationPreference,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Stage::PatientInfo => 1,
            Stage::AppointmentSelection => 2,
            Stage::NotificationPreference => 3,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(move |f| f.stage() == *self)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields().filter(|f| f.is_required())
    }
}

pub fn required_fields() -> impl Iterator<Item = Field> {
    Stage::ALL.into_iter().flat_map(|s| s.required_fields().collect::<Vec<_>>())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ShowNextStep,
    ShowAppointmentAvailability,
    ValidateAllAndSubmitIfValid,
}

impl Command {
    pub const ALL: [Command; 3] = [
        Command::ShowNextStep,
        Command::ShowAppointmentAvailability,
        Command::ValidateAllAndSubmitIfValid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::ShowNextStep => "*see_next_step",
            Command::ShowAppointmentAvailability => "*see_appointment_availability",
            Command::ValidateAllAndSubmitIfValid => "*validate_all_and_submit_if_valid",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::ShowNextStep => "Input will be ignored, but returns the next step.",
            Command::ShowAppointmentAvailability => {
                "Input will be ignored, but returns a list of available physicians and times."
            }
            Command::ValidateAllAndSubmitIfValid => {
                "Input will be ignored, but returns if the appointment scheduling has been finished. Validates all fields, autofills fields if necessary, and submits if valid."
            }
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Field(Field),
    Command(Command),
    UnknownCommand(String),
    Unknown(String),
}

impl FieldKey {
    pub fn resolve(key: &str) -> Self {
        if key.starts_with(SPECIAL_MARKER) {
            return Command::ALL
                .into_iter()
                .find(|c| c.as_str() == key)
                .map(FieldKey::Command)
                .unwrap_or_else(|| FieldKey::UnknownCommand(key.to_string()));
        }
        Field::parse(key)
            .map(FieldKey::Field)
            .unwrap_or_else(|| FieldKey::Unknown(key.to_string()))
    }

    pub fn is_special(&self) -> bool {
        matches!(self, FieldKey::Command(_) | FieldKey::UnknownCommand(_))
    }
}

pub fn input_schema() -> Value {
    let mut properties = Map::new();
    for field in Field::ALL {
        let mut prop = json!({
            "type": field.field_type().as_str(),
            "description": field.description(),
        });
        if let Some(format) = field.format() {
            prop["format"] = json!(format);
        }
        properties.insert(field.as_str().to_string(), prop);
    }
    for command in Command::ALL {
        properties.insert(
            command.as_str().to_string(),
            json!({ "type": "string", "description": command.description() }),
        );
    }
    json!({ "type": "object", "properties": properties })
}

pub fn helper_info() -> Value {
    let mut info = Map::new();
    for stage in Stage::ALL {
        let n = stage.number();
        info.insert(
            format!("stage_{n}_fields"),
            json!(stage.fields().map(|f| f.as_str()).collect::<Vec<_>>()),
        );
        info.insert(
            format!("stage_{n}_required_fields"),
            json!(stage.required_fields().map(|f| f.as_str()).collect::<Vec<_>>()),
        );
    }
    Value::Object(info)
}
