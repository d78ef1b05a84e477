use crate::catalog;
use crate::error::{Result, TrackerError};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Stakeholder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub id: String,
    pub name: String,
    pub functions: Vec<String>,
    pub team: String,
    pub department: String,
    pub added_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Fields of the add-stakeholder form, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakeholderForm {
    pub name: String,
    #[serde(default)]
    pub functions: Vec<String>,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub department: String,
}

impl StakeholderForm {
    /// Validate the form against the fixed option lists and build a stakeholder.
    pub fn into_stakeholder(self, added_by: &str) -> Result<Stakeholder> {
        let name = self.name.trim();
        if name.is_empty()
            || self.functions.is_empty()
            || self.team.trim().is_empty()
            || self.department.trim().is_empty()
        {
            return Err(TrackerError::InvalidInput(
                "stakeholder needs a name, at least one function, a team and a department"
                    .to_string(),
            ));
        }

        let mut functions: Vec<String> = Vec::with_capacity(self.functions.len());
        for f in &self.functions {
            let matched = catalog::match_option(catalog::FUNCTION_OPTIONS, f)
                .ok_or_else(|| TrackerError::InvalidInput(format!("unknown function '{f}'")))?;
            if !functions.iter().any(|existing| existing == matched) {
                functions.push(matched.to_string());
            }
        }
        let team = catalog::match_option(catalog::TEAM_OPTIONS, &self.team)
            .ok_or_else(|| TrackerError::InvalidInput(format!("unknown team '{}'", self.team)))?;
        let department = catalog::match_option(catalog::DEPARTMENT_OPTIONS, &self.department)
            .ok_or_else(|| {
                TrackerError::InvalidInput(format!("unknown department '{}'", self.department))
            })?;

        Ok(Stakeholder {
            id: short_id(9).to_lowercase(),
            name: name.to_string(),
            functions,
            team: team.to_string(),
            department: department.to_string(),
            added_by: added_by.to_string(),
            timestamp: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Requirement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub business_area: String,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub kpis: String,
    #[serde(default)]
    pub stakeholders: Vec<Stakeholder>,
    pub created_at: DateTime<Utc>,
}

/// Fields of the create-requirement form, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementForm {
    pub name: String,
    #[serde(default)]
    pub business_area: String,
    #[serde(default)]
    pub process: String,
    #[serde(default)]
    pub kpis: String,
    #[serde(default)]
    pub stakeholders: Vec<StakeholderForm>,
}

impl Requirement {
    /// Build a new requirement from the landing form with a fresh `REQ-` id.
    pub fn create(form: RequirementForm, added_by: &str) -> Result<Self> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(TrackerError::blocked("Please provide a requirement name"));
        }

        let business_area = resolve_optional(catalog::BUSINESS_AREA_OPTIONS, &form.business_area)
            .ok_or_else(|| {
                TrackerError::InvalidInput(format!("unknown business area '{}'", form.business_area))
            })?;
        let process = resolve_optional(catalog::PROCESS_OPTIONS, &form.process).ok_or_else(|| {
            TrackerError::InvalidInput(format!("unknown process '{}'", form.process))
        })?;

        let stakeholders = form
            .stakeholders
            .into_iter()
            .map(|s| s.into_stakeholder(added_by))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: format!("REQ-{}", short_id(6)),
            name: name.to_string(),
            business_area,
            process,
            kpis: form.kpis.trim().to_string(),
            stakeholders,
            created_at: Utc::now(),
        })
    }

    /// Look up an existing requirement. There is no backing store, so every
    /// well-formed id resolves to the same O2C record.
    pub fn lookup(id: &str) -> Result<Self> {
        let id = id.trim().to_uppercase();
        paths::validate_requirement_id(&id)?;
        Ok(Self {
            id,
            name: "O2C Enhancement".to_string(),
            business_area: "Sales".to_string(),
            process: "O2C".to_string(),
            kpis: "Improve order processing time by 40%".to_string(),
            stakeholders: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn add_stakeholder(&mut self, form: StakeholderForm, added_by: &str) -> Result<&Stakeholder> {
        let stakeholder = form.into_stakeholder(added_by)?;
        self.stakeholders.push(stakeholder);
        let last = self.stakeholders.len() - 1;
        Ok(&self.stakeholders[last])
    }

    pub fn remove_stakeholder(&mut self, id: &str) -> Result<Stakeholder> {
        let pos = self
            .stakeholders
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| TrackerError::StakeholderNotFound(id.to_string()))?;
        Ok(self.stakeholders.remove(pos))
    }
}

/// Empty input stays empty; anything else must match an option.
fn resolve_optional(options: &[&'static str], input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return Some(String::new());
    }
    catalog::match_option(options, input).map(str::to_string)
}

/// `len` uppercase hex characters from a fresh v4 uuid.
fn short_id(len: usize) -> String {
    let mut s = uuid::Uuid::new_v4().simple().to_string();
    s.truncate(len);
    s.to_uppercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stakeholder_form() -> StakeholderForm {
        StakeholderForm {
            name: "Jane Smith".to_string(),
            functions: vec!["POC – Coding".to_string(), "business owner".to_string()],
            team: "UI5 Frontend".to_string(),
            department: "SAP".to_string(),
        }
    }

    #[test]
    fn create_generates_req_id() {
        let form = RequirementForm {
            name: "X".to_string(),
            ..Default::default()
        };
        let req = Requirement::create(form, "Current User").unwrap();
        assert_eq!(req.name, "X");
        assert!(req.id.starts_with("REQ-"));
        assert_eq!(req.id.len(), 10);
        paths::validate_requirement_id(&req.id).unwrap();
    }

    #[test]
    fn create_without_name_is_blocked() {
        let form = RequirementForm {
            name: "   ".to_string(),
            ..Default::default()
        };
        let err = Requirement::create(form, "Current User").unwrap_err();
        assert!(matches!(err, TrackerError::GateBlocked(ref m) if m == "Please provide a requirement name"));
    }

    #[test]
    fn create_resolves_options() {
        let form = RequirementForm {
            name: "O2C Enhancement".to_string(),
            business_area: "supply chain".to_string(),
            process: "o2c".to_string(),
            kpis: "Improve order processing time by 40%".to_string(),
            stakeholders: vec![stakeholder_form()],
        };
        let req = Requirement::create(form, "Current User").unwrap();
        assert_eq!(req.business_area, "Supply Chain");
        assert_eq!(req.process, "O2C");
        assert_eq!(req.stakeholders.len(), 1);
        assert_eq!(
            req.stakeholders[0].functions,
            vec!["POC – Coding".to_string(), "Business Owner".to_string()]
        );
    }

    #[test]
    fn create_rejects_unknown_process() {
        let form = RequirementForm {
            name: "X".to_string(),
            process: "R2R".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Requirement::create(form, "Current User"),
            Err(TrackerError::InvalidInput(_))
        ));
    }

    #[test]
    fn lookup_returns_mock_record() {
        let req = Requirement::lookup("req-abc123").unwrap();
        assert_eq!(req.id, "REQ-ABC123");
        assert_eq!(req.name, "O2C Enhancement");
        assert_eq!(req.process, "O2C");
        assert!(req.stakeholders.is_empty());
    }

    #[test]
    fn lookup_rejects_malformed_id() {
        assert!(Requirement::lookup("ORDER-1").is_err());
    }

    #[test]
    fn stakeholder_requires_all_fields() {
        let mut form = stakeholder_form();
        form.functions.clear();
        assert!(form.into_stakeholder("Current User").is_err());

        let mut form = stakeholder_form();
        form.department = String::new();
        assert!(form.into_stakeholder("Current User").is_err());
    }

    #[test]
    fn add_and_remove_stakeholder() {
        let mut req = Requirement::lookup("REQ-ABC123").unwrap();
        let id = req
            .add_stakeholder(stakeholder_form(), "Current User")
            .unwrap()
            .id
            .clone();
        assert_eq!(req.stakeholders.len(), 1);
        assert_eq!(req.stakeholders[0].added_by, "Current User");

        let removed = req.remove_stakeholder(&id).unwrap();
        assert_eq!(removed.name, "Jane Smith");
        assert!(req.stakeholders.is_empty());
        assert!(matches!(
            req.remove_stakeholder(&id),
            Err(TrackerError::StakeholderNotFound(_))
        ));
    }
}
