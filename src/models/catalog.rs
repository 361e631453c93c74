use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::field::Field;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    pub appointment_number: String,
    pub appointment_id: String,
    pub appointment_physician_id: String,
    pub appointment_physician_name: String,
    pub appointment_time: String,
    pub appointment_address: String,
}

impl AppointmentSlot {
    pub fn autofill_pairs(&self) -> [(Field, &str); 6] {
        [
            (Field::AppointmentNumber, self.appointment_number.as_str()),
            (Field::AppointmentId, self.appointment_id.as_str()),
            (Field::AppointmentPhysicianId, self.appointment_physician_id.as_str()),
            (Field::AppointmentPhysicianName, self.appointment_physician_name.as_str()),
            (Field::AppointmentTime, self.appointment_time.as_str()),
            (Field::AppointmentAddress, self.appointment_address.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub slots: Vec<AppointmentSlot>,
}

impl Catalog {
    pub fn default_clinic() -> Self {
        let slot = |number: &str, id: &str, time: &str| AppointmentSlot {
            appointment_number: number.to_string(),
            appointment_id: id.to_string(),
            appointment_physician_id: "phys_id_124512".to_string(),
            appointment_physician_name: "Dr. Nickel Baker".to_string(),
            appointment_time: time.to_string(),
            appointment_address: "123 St Clinic, 123 123 St".to_string(),
        };
        Self {
            slots: vec![
                slot("1", "appt_id_155121", "2:00 PM Saturday July 20"),
                slot("2", "appt_id_128841", "3:00 PM Saturday July 20"),
                slot("3", "appt_id_166341", "4:00 PM Saturday July 20"),
            ],
        }
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let catalog: Catalog = serde_json::from_str(s)?;
        let mut seen = HashSet::new();
        for slot in &catalog.slots {
            if slot.appointment_id.trim().is_empty() {
                anyhow::bail!("appointment slot {} has an empty appointment_id", slot.appointment_number);
            }
            if !seen.insert(slot.appointment_id.as_str()) {
                anyhow::bail!("duplicate appointment_id: {}", slot.appointment_id);
            }
        }
        Ok(catalog)
    }

    pub fn slots(&self) -> &[AppointmentSlot] {
        &self.slots
    }

    pub fn find(&self, appointment_id: &str) -> Option<&AppointmentSlot> {
        self.slots.iter().find(|s| s.appointment_id == appointment_id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_clinic()
    }
}
