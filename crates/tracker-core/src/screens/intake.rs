use super::Screen;
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_NO_INPUT: &str =
    "Add at least one input (Transcript/Notes/URL/Screenshots/Process Diagram) before generating BRD";
pub const MSG_BUSINESS_REVIEW: &str = "Complete Business Review before approval";
pub const MSG_NOT_GENERATED: &str = "Generate the BRD before approving or exporting it";
pub const MSG_ALREADY_APPROVED: &str = "BRD is already approved";

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    Transcript,
    Brd,
    Url,
    Screenshot,
    Diagram,
    Notes,
}

impl UploadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::Transcript => "transcript",
            UploadKind::Brd => "brd",
            UploadKind::Url => "url",
            UploadKind::Screenshot => "screenshot",
            UploadKind::Diagram => "diagram",
            UploadKind::Notes => "notes",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            UploadKind::Diagram => "png",
            UploadKind::Transcript => "doc",
            _ => "pdf",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UploadKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transcript" => Ok(UploadKind::Transcript),
            "brd" => Ok(UploadKind::Brd),
            "url" => Ok(UploadKind::Url),
            "screenshot" => Ok(UploadKind::Screenshot),
            "diagram" => Ok(UploadKind::Diagram),
            "notes" => Ok(UploadKind::Notes),
            _ => Err(TrackerError::InvalidInput(format!("unknown upload kind '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validation {
    #[serde(rename = "OK")]
    Ok,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub id: String,
    pub kind: UploadKind,
    pub name: String,
    pub owner: String,
    pub version: String,
    pub validation: Validation,
}

// ---------------------------------------------------------------------------
// BRD
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrdStatus {
    Draft,
    InReview,
    Approved,
}

impl fmt::Display for BrdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrdStatus::Draft => "Draft",
            BrdStatus::InReview => "In Review",
            BrdStatus::Approved => "Approved",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrdSections {
    pub epics: Vec<String>,
    pub user_stories: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub kpis: Vec<String>,
}

impl BrdSections {
    /// Canned output of the "Generate BRD (AI)" action.
    pub fn generated() -> Self {
        let v = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            epics: v(&[
                "Streamline order processing workflow",
                "Enhance customer communication touchpoints",
                "Improve inventory visibility",
            ]),
            user_stories: v(&[
                "As a sales rep, I want to create orders quickly so that I can serve customers efficiently",
                "As a warehouse manager, I want real-time inventory updates so that I can manage stock levels",
                "As a customer, I want order status notifications so that I can track my delivery",
            ]),
            acceptance_criteria: v(&[
                "Order creation time reduced by 40%",
                "Inventory sync latency < 5 seconds",
                "Email notifications sent within 1 minute of status change",
            ]),
            kpis: v(&[
                "Order processing time: Target < 2 minutes",
                "Customer satisfaction score: Target > 4.5/5",
                "Inventory accuracy: Target > 98%",
            ]),
        }
    }

    /// Section titles paired with their items, in display order.
    pub fn sections(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Epics", &self.epics),
            ("User Stories", &self.user_stories),
            ("Acceptance Criteria", &self.acceptance_criteria),
            ("KPIs", &self.kpis),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Review {
    Business,
    Functional,
    Final,
}

impl std::str::FromStr for Review {
    type Err = TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "business" => Ok(Review::Business),
            "functional" => Ok(Review::Functional),
            "final" => Ok(Review::Final),
            _ => Err(TrackerError::InvalidInput(format!("unknown review '{s}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviews {
    pub business: bool,
    pub functional: bool,
    #[serde(rename = "final")]
    pub final_approval: bool,
}

// ---------------------------------------------------------------------------
// IntakeScreen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeScreen {
    pub uploads: Vec<Upload>,
    #[serde(default)]
    upload_seq: u32,
    pub brd: Option<BrdSections>,
    pub brd_status: BrdStatus,
    pub reviews: Reviews,
}

impl Default for IntakeScreen {
    fn default() -> Self {
        Self {
            uploads: Vec::new(),
            upload_seq: 0,
            brd: None,
            brd_status: BrdStatus::Draft,
            reviews: Reviews::default(),
        }
    }
}

impl IntakeScreen {
    /// Stand-in for a file upload: records a validated input of `kind`.
    pub fn upload(&mut self, kind: UploadKind, owner: &str) -> Result<&Upload> {
        self.ensure_editable()?;
        self.upload_seq += 1;
        let upload = Upload {
            id: format!("U{}", self.upload_seq),
            kind,
            name: format!("{kind}_file_{}.{}", self.upload_seq, kind.extension()),
            owner: owner.to_string(),
            version: "v1.0".to_string(),
            validation: Validation::Ok,
        };
        self.uploads.push(upload);
        let last = self.uploads.len() - 1;
        Ok(&self.uploads[last])
    }

    pub fn remove_upload(&mut self, id: &str) -> Result<Upload> {
        self.ensure_editable()?;
        let pos = self
            .uploads
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| TrackerError::UploadNotFound(id.to_string()))?;
        Ok(self.uploads.remove(pos))
    }

    pub fn has_valid_input(&self) -> bool {
        self.uploads.iter().any(|u| u.validation == Validation::Ok)
    }

    pub fn generate_brd(&mut self) -> Result<&BrdSections> {
        self.ensure_editable()?;
        if !self.has_valid_input() {
            return Err(TrackerError::blocked(MSG_NO_INPUT));
        }
        self.brd_status = BrdStatus::Draft;
        Ok(&*self.brd.insert(BrdSections::generated()))
    }

    pub fn set_review(&mut self, review: Review, checked: bool) -> Result<()> {
        self.ensure_editable()?;
        match review {
            Review::Business => self.reviews.business = checked,
            Review::Functional => self.reviews.functional = checked,
            Review::Final => self.reviews.final_approval = checked,
        }
        if self.brd.is_some() && self.brd_status == BrdStatus::Draft && checked {
            self.brd_status = BrdStatus::InReview;
        }
        Ok(())
    }

    /// Mark the BRD approved. The caller advances the pipeline.
    pub fn approve(&mut self) -> Result<()> {
        self.advance_gate().map_err(TrackerError::blocked)?;
        self.brd_status = BrdStatus::Approved;
        Ok(())
    }

    // An approved BRD is frozen: inputs, reviews and the document itself.
    fn ensure_editable(&self) -> Result<()> {
        if self.brd_status == BrdStatus::Approved {
            return Err(TrackerError::blocked(MSG_ALREADY_APPROVED));
        }
        Ok(())
    }

    /// Render the generated BRD as Markdown (the Jira export stand-in).
    pub fn export_markdown(&self, requirement_id: &str, requirement_name: &str) -> Result<String> {
        let brd = self
            .brd
            .as_ref()
            .ok_or_else(|| TrackerError::blocked(MSG_NOT_GENERATED))?;
        let mut out = format!(
            "# BRD: {requirement_name}\n\nRequirement: {requirement_id}\nStatus: {}\n",
            self.brd_status
        );
        for (title, items) in brd.sections() {
            out.push_str(&format!("\n## {title}\n\n"));
            for item in items {
                out.push_str(&format!("- {item}\n"));
            }
        }
        Ok(out)
    }
}

impl Screen for IntakeScreen {
    fn stage(&self) -> Stage {
        Stage::IntakeBrd
    }

    fn advance_action(&self) -> &'static str {
        "Approve BRD"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        if self.brd_status == BrdStatus::Approved {
            return Err(MSG_ALREADY_APPROVED);
        }
        if self.brd.is_none() {
            return Err(MSG_NOT_GENERATED);
        }
        if !self.reviews.business {
            return Err(MSG_BUSINESS_REVIEW);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_names_follow_kind() {
        let mut s = IntakeScreen::default();
        assert_eq!(s.upload(UploadKind::Transcript, "Current User").unwrap().name, "transcript_file_1.doc");
        assert_eq!(s.upload(UploadKind::Diagram, "Current User").unwrap().name, "diagram_file_2.png");
        assert_eq!(s.upload(UploadKind::Notes, "Current User").unwrap().name, "notes_file_3.pdf");
        assert_eq!(s.uploads[0].version, "v1.0");
        assert_eq!(s.uploads[0].validation, Validation::Ok);
    }

    #[test]
    fn generate_requires_valid_input() {
        let mut s = IntakeScreen::default();
        let err = s.generate_brd().unwrap_err();
        assert!(matches!(err, TrackerError::GateBlocked(ref m) if m == MSG_NO_INPUT));
        assert!(s.brd.is_none());

        s.upload(UploadKind::Transcript, "Current User").unwrap();
        let brd = s.generate_brd().unwrap();
        let titles: Vec<_> = brd.sections().iter().map(|(t, _)| *t).collect();
        assert_eq!(titles, ["Epics", "User Stories", "Acceptance Criteria", "KPIs"]);
        assert_eq!(s.brd_status, BrdStatus::Draft);
    }

    #[test]
    fn removing_last_input_closes_generate() {
        let mut s = IntakeScreen::default();
        let id = s.upload(UploadKind::Url, "Current User").unwrap().id.clone();
        assert!(s.has_valid_input());
        s.remove_upload(&id).unwrap();
        assert!(!s.has_valid_input());
        assert!(s.remove_upload(&id).is_err());
    }

    #[test]
    fn approve_needs_business_review() {
        let mut s = IntakeScreen::default();
        s.upload(UploadKind::Notes, "Current User").unwrap();
        s.generate_brd().unwrap();

        s.set_review(Review::Functional, true).unwrap();
        s.set_review(Review::Final, true).unwrap();
        let err = s.approve().unwrap_err();
        assert!(matches!(err, TrackerError::GateBlocked(ref m) if m == MSG_BUSINESS_REVIEW));
        assert!(!s.gate().open);

        s.set_review(Review::Business, true).unwrap();
        assert!(s.gate().open);
        s.approve().unwrap();
        assert_eq!(s.brd_status, BrdStatus::Approved);
    }

    #[test]
    fn approved_brd_is_frozen() {
        let mut s = IntakeScreen::default();
        let id = s.upload(UploadKind::Transcript, "Current User").unwrap().id.clone();
        s.generate_brd().unwrap();
        s.set_review(Review::Business, true).unwrap();
        s.approve().unwrap();

        let blocked = |r: Result<()>| {
            matches!(r, Err(TrackerError::GateBlocked(ref m)) if m == MSG_ALREADY_APPROVED)
        };
        assert!(blocked(s.generate_brd().map(|_| ())));
        assert!(blocked(s.set_review(Review::Business, false)));
        assert!(blocked(s.upload(UploadKind::Notes, "Current User").map(|_| ())));
        assert!(blocked(s.remove_upload(&id).map(|_| ())));
        assert!(blocked(s.approve()));

        assert_eq!(s.brd_status, BrdStatus::Approved);
        assert!(s.reviews.business);
        assert_eq!(s.uploads.len(), 1);
        assert_eq!(s.gate().reason, Some(MSG_ALREADY_APPROVED));
    }

    #[test]
    fn export_renders_all_sections() {
        let mut s = IntakeScreen::default();
        assert!(s.export_markdown("REQ-1", "X").is_err());
        s.upload(UploadKind::Brd, "Current User").unwrap();
        s.generate_brd().unwrap();
        let md = s.export_markdown("REQ-ABC123", "O2C Enhancement").unwrap();
        assert!(md.starts_with("# BRD: O2C Enhancement"));
        assert!(md.contains("## Acceptance Criteria"));
        assert!(md.contains("- Inventory accuracy: Target > 98%"));
    }
}
