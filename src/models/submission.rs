use serde::{Deserialize, Deserializer};

use crate::error::ClientError;

/// Names of the editable fields, in the order the form posts them.
pub const FIELD_NAMES: [&str; 11] = [
    "submission_date",
    "recruiter_firm",
    "client_name",
    "recruiter_name",
    "recruiter_contact",
    "position",
    "rate",
    "job_id",
    "interview_date",
    "follow_up_date",
    "notes",
];

/// One job-application record as the backend serves it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Submission {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub submission_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recruiter_firm: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recruiter_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recruiter_contact: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub position: String,
    #[serde(default)]
    pub rate: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_id: String,
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub follow_up_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The shared add/edit form's field values. Everything but `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionForm {
    pub submission_date: String,
    pub recruiter_firm: String,
    pub client_name: String,
    pub recruiter_name: String,
    pub recruiter_contact: String,
    pub position: String,
    pub rate: String,
    pub job_id: String,
    pub interview_date: String,
    pub follow_up_date: String,
    pub notes: String,
}

impl SubmissionForm {
    pub fn from_submission(sub: &Submission) -> Self {
        SubmissionForm {
            submission_date: sub.submission_date.clone(),
            recruiter_firm: sub.recruiter_firm.clone(),
            client_name: sub.client_name.clone(),
            recruiter_name: sub.recruiter_name.clone(),
            recruiter_contact: sub.recruiter_contact.clone(),
            position: sub.position.clone(),
            rate: sub.rate.clone().unwrap_or_default(),
            job_id: sub.job_id.clone(),
            interview_date: sub.interview_date.clone().unwrap_or_default(),
            follow_up_date: sub.follow_up_date.clone().unwrap_or_default(),
            notes: sub.notes.clone().unwrap_or_default(),
        }
    }

    fn slot(&mut self, name: &str) -> Option<&mut String> {
        let slot = match name {
            "submission_date" => &mut self.submission_date,
            "recruiter_firm" => &mut self.recruiter_firm,
            "client_name" => &mut self.client_name,
            "recruiter_name" => &mut self.recruiter_name,
            "recruiter_contact" => &mut self.recruiter_contact,
            "position" => &mut self.position,
            "rate" => &mut self.rate,
            "job_id" => &mut self.job_id,
            "interview_date" => &mut self.interview_date,
            "follow_up_date" => &mut self.follow_up_date,
            "notes" => &mut self.notes,
            _ => return None,
        };
        Some(slot)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "submission_date" => &self.submission_date,
            "recruiter_firm" => &self.recruiter_firm,
            "client_name" => &self.client_name,
            "recruiter_name" => &self.recruiter_name,
            "recruiter_contact" => &self.recruiter_contact,
            "position" => &self.position,
            "rate" => &self.rate,
            "job_id" => &self.job_id,
            "interview_date" => &self.interview_date,
            "follow_up_date" => &self.follow_up_date,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(value)
    }

    /// Set a field by its form name. Unknown names are rejected.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ClientError> {
        let slot = self
            .slot(name)
            .ok_or_else(|| ClientError::InvalidForm(format!("unknown field: {name}")))?;
        *slot = value.into();
        Ok(())
    }

    /// (name, value) pairs in posting order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        FIELD_NAMES
            .iter()
            .map(|name| (*name, self.get(name).unwrap_or_default().to_string()))
            .collect()
    }

    /// Multipart body with one text part per field, empty ones included.
    pub fn to_multipart(&self) -> reqwest::multipart::Form {
        self.pairs()
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            })
    }
}
