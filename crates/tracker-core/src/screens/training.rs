use super::{is_valid_url, Screen};
use crate::catalog::{self, AUDIENCE_OPTIONS};
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MSG_NOT_GENERATED: &str = "Generate training documents first";
pub const MSG_NO_AUDIENCE: &str = "Select at least one audience";
pub const MSG_ALREADY_PUBLISHED: &str = "Training documents are already published";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocKind {
    #[serde(rename = "How-to")]
    HowTo,
    #[serde(rename = "SOP")]
    Sop,
    #[serde(rename = "FAQ")]
    Faq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingDoc {
    pub id: String,
    pub kind: DocKind,
    pub title: String,
    pub audience: Vec<String>,
    pub version: String,
    pub author: String,
    pub last_updated: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub audience: Vec<String>,
    pub link: Option<String>,
    pub published_at: DateTime<Utc>,
}

fn doc(id: &str, kind: DocKind, title: &str, audience: &[&str], content: &str) -> TrainingDoc {
    TrainingDoc {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        audience: audience.iter().map(|s| s.to_string()).collect(),
        version: "v1.0".to_string(),
        author: "Training Team".to_string(),
        last_updated: "2025-12-16".to_string(),
        content: content.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingScreen {
    pub docs: Vec<TrainingDoc>,
    pub generated: bool,
    pub publication: Option<Publication>,
}

impl Default for TrainingScreen {
    fn default() -> Self {
        Self {
            docs: vec![
                doc(
                    "DOC-001",
                    DocKind::HowTo,
                    "How to Create an Order in the New System",
                    &["Sales", "Operations"],
                    "Step-by-step guide for creating orders...",
                ),
                doc(
                    "DOC-002",
                    DocKind::Sop,
                    "Order Approval Standard Operating Procedure",
                    &["Sales", "Operations"],
                    "Standard procedure for approving orders...",
                ),
                doc(
                    "DOC-003",
                    DocKind::Faq,
                    "Order Management FAQs",
                    &["Sales", "Operations", "IT"],
                    "Frequently asked questions...",
                ),
            ],
            generated: false,
            publication: None,
        }
    }
}

impl TrainingScreen {
    pub fn doc(&self, id: &str) -> Result<&TrainingDoc> {
        self.docs
            .iter()
            .find(|d| d.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| TrackerError::DocumentNotFound(id.to_string()))
    }

    pub fn generate(&mut self) -> &[TrainingDoc] {
        self.generated = true;
        &self.docs
    }

    /// Publish the generated documents to `audience`, optionally linking a
    /// hosted copy. The caller advances the pipeline.
    pub fn publish(&mut self, audience: &[String], link: Option<&str>) -> Result<&Publication> {
        self.advance_gate().map_err(TrackerError::blocked)?;

        let mut resolved: Vec<String> = Vec::new();
        for a in audience {
            let name = catalog::match_option(AUDIENCE_OPTIONS, a).ok_or_else(|| {
                TrackerError::InvalidInput(format!(
                    "unknown audience '{a}' (expected one of {})",
                    AUDIENCE_OPTIONS.join(", ")
                ))
            })?;
            if !resolved.iter().any(|r| r == name) {
                resolved.push(name.to_string());
            }
        }
        if resolved.is_empty() {
            return Err(TrackerError::blocked(MSG_NO_AUDIENCE));
        }

        let link = match link.map(str::trim).filter(|l| !l.is_empty()) {
            Some(l) if !is_valid_url(l) => {
                return Err(TrackerError::InvalidInput(format!(
                    "'{l}' is not a valid http(s) URL"
                )))
            }
            other => other.map(str::to_string),
        };

        Ok(&*self.publication.insert(Publication {
            audience: resolved,
            link,
            published_at: Utc::now(),
        }))
    }
}

impl Screen for TrainingScreen {
    fn stage(&self) -> Stage {
        Stage::Training
    }

    fn advance_action(&self) -> &'static str {
        "Publish"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        if !self.generated {
            return Err(MSG_NOT_GENERATED);
        }
        if self.publication.is_some() {
            return Err(MSG_ALREADY_PUBLISHED);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audience(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn publish_requires_generated_docs() {
        let mut s = TrainingScreen::default();
        let err = s.publish(&audience(&["Sales"]), None).unwrap_err();
        assert_eq!(err.to_string(), MSG_NOT_GENERATED);
        assert!(s.publication.is_none());
    }

    #[test]
    fn publish_validates_audience_and_link() {
        let mut s = TrainingScreen::default();
        assert_eq!(s.generate().len(), 3);

        assert!(matches!(
            s.publish(&[], None),
            Err(TrackerError::GateBlocked(ref m)) if m == MSG_NO_AUDIENCE
        ));
        assert!(s.publish(&audience(&["Finance"]), None).is_err());
        assert!(s.publish(&audience(&["IT"]), Some("intranet/training")).is_err());
        assert!(s.publication.is_none());

        let p = s
            .publish(&audience(&["sales", "IT", "Sales"]), Some("https://learn.example.com/o2c"))
            .unwrap();
        assert_eq!(p.audience, vec!["Sales", "IT"]);
        assert_eq!(p.link.as_deref(), Some("https://learn.example.com/o2c"));
        assert!(!s.gate().open);
    }

    #[test]
    fn blank_link_is_ignored() {
        let mut s = TrainingScreen::default();
        s.generate();
        let p = s.publish(&audience(&["Operations"]), Some("  ")).unwrap();
        assert!(p.link.is_none());
    }

    #[test]
    fn doc_lookup() {
        let s = TrainingScreen::default();
        assert_eq!(s.doc("doc-002").unwrap().kind, DocKind::Sop);
        assert!(s.doc("DOC-009").unwrap_err().is_not_found());
    }
}
