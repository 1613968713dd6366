use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LicenseClass {
        #[default]
        Full => "full",
        /// Learner permit (CBT certificate).
        Cbt => "cbt",
    }
}

/// Largest engine a learner-permit holder may ride, in cc.
pub const LEARNER_MAX_ENGINE_CC: i32 = 125;

impl LicenseClass {
    /// Engine size filter for availability searches; 0 means no limit.
    pub fn max_engine_cc(&self) -> i32 {
        match self {
            LicenseClass::Full => 0,
            LicenseClass::Cbt => LEARNER_MAX_ENGINE_CC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub license: LicenseClass,
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
}

/// Admin search over drivers. Text filters match anywhere, ignoring case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub license: Option<LicenseClass>,
}

impl DriverFilter {
    pub fn matches(&self, driver: &Driver) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        };
        contains(&driver.name, &self.name)
            && contains(&driver.email, &self.email)
            && self.license.is_none_or(|license| driver.license == license)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverInput {
    pub name: String,
    pub license: LicenseClass,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(name: &str, email: &str, license: LicenseClass) -> Driver {
        Driver {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            license,
            blocked: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn learner_limit() {
        assert_eq!(LicenseClass::Cbt.max_engine_cc(), 125);
        assert_eq!(LicenseClass::Full.max_engine_cc(), 0);
    }

    #[test]
    fn filter_ignores_case_and_combines() {
        let ada = driver("Ada Lovelace", "ada@example.com", LicenseClass::Cbt);

        assert!(DriverFilter::default().matches(&ada));
        assert!(
            DriverFilter {
                name: Some("LOVE".to_string()),
                ..Default::default()
            }
            .matches(&ada)
        );
        assert!(
            !DriverFilter {
                name: Some("love".to_string()),
                license: Some(LicenseClass::Full),
                ..Default::default()
            }
            .matches(&ada)
        );
        assert!(
            !DriverFilter {
                email: Some("grace@".to_string()),
                ..Default::default()
            }
            .matches(&ada)
        );
    }
}
