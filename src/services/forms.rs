use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, NaiveDateTime, Utc};

use crate::errors::AppError;
use crate::models::{FormId, FormRecord};

pub type SharedForm = Arc<tokio::sync::Mutex<FormRecord>>;

struct FormEntry {
    form: SharedForm,
    expires_at: NaiveDateTime,
}

// Forms whose call was never ended are dropped once idle past the ttl.
pub struct FormStore {
    forms: Mutex<HashMap<FormId, FormEntry>>,
    ttl: Duration,
}

impl FormStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            forms: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn forms(&self) -> Result<MutexGuard<'_, HashMap<FormId, FormEntry>>, AppError> {
        self.forms
            .lock()
            .map_err(|_| AppError::Internal("form store lock poisoned".to_string()))
    }

    pub fn create(&self) -> Result<FormId, AppError> {
        let form = FormRecord::new();
        let id = form.id();
        let entry = FormEntry {
            form: Arc::new(tokio::sync::Mutex::new(form)),
            expires_at: Utc::now().naive_utc() + self.ttl,
        };
        self.forms()?.insert(id, entry);
        Ok(id)
    }

    pub fn get(&self, id: FormId) -> Result<SharedForm, AppError> {
        let mut forms = self.forms()?;
        let entry = forms
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("form {id}")))?;
        entry.expires_at = Utc::now().naive_utc() + self.ttl;
        Ok(Arc::clone(&entry.form))
    }

    pub fn remove(&self, id: FormId) -> Result<(), AppError> {
        self.forms()?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("form {id}")))
    }

    pub fn sweep_expired(&self, now: NaiveDateTime) -> Result<Vec<FormId>, AppError> {
        let mut forms = self.forms()?;
        let expired: Vec<FormId> = forms
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in &expired {
            forms.remove(id);
        }
        Ok(expired)
    }

    pub fn len(&self) -> usize {
        self.forms.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
