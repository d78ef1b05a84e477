use super::{is_valid_url, Screen};
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MSG_UI_APPROVED: &str = "UI design is already approved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignDoc {
    Functional,
    Technical,
    Ui,
}

impl DesignDoc {
    pub fn label(self) -> &'static str {
        match self {
            DesignDoc::Functional => "Functional Design",
            DesignDoc::Technical => "Technical Design",
            DesignDoc::Ui => "UI Prototype",
        }
    }
}

impl fmt::Display for DesignDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DesignDoc {
    type Err = TrackerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fd" | "functional" => Ok(DesignDoc::Functional),
            "td" | "technical" => Ok(DesignDoc::Technical),
            "ui" => Ok(DesignDoc::Ui),
            _ => Err(TrackerError::InvalidInput(format!(
                "unknown design document '{s}' (expected fd, td or ui)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    InReview,
    Approved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<String>,
}

fn section(title: &str, items: &[&str]) -> Section {
    Section {
        title: title.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

fn functional_sections() -> Vec<Section> {
    vec![
        section(
            "Screens",
            &[
                "Order Entry Screen – fields for customer, items, pricing",
                "Order Status Dashboard – list view with filters",
                "Order Details Screen – full order information with edit capability",
            ],
        ),
        section(
            "Fields",
            &[
                "Customer ID (required, autocomplete)",
                "Order Date (auto-populated, editable)",
                "Line Items (repeatable section)",
                "Total Amount (calculated)",
            ],
        ),
        section(
            "Validations",
            &[
                "Customer must exist in SAP master data",
                "Order total must be > 0",
                "Delivery date cannot be in the past",
            ],
        ),
        section(
            "Business Rules",
            &[
                "Orders over $10,000 require manager approval",
                "Discounts capped at 15% without special authorization",
                "Rush orders incur 10% surcharge",
            ],
        ),
        section(
            "Process Flow",
            &[
                "Sales rep creates order → System validates → Manager approves (if needed) → Order confirmed",
                "Customer notified via email",
                "Warehouse receives picking notification",
            ],
        ),
    ]
}

fn technical_sections() -> Vec<Section> {
    vec![
        section(
            "Data Objects",
            &[
                "ZORDER_HEADER – Custom table for order headers",
                "ZORDER_ITEM – Custom table for order line items",
                "Standard VBAK/VBAP for SAP sales order integration",
            ],
        ),
        section(
            "Services/APIs",
            &[
                "POST /api/orders/create – Create new order",
                "GET /api/orders/{id} – Retrieve order details",
                "PUT /api/orders/{id}/approve – Approve order",
                "GET /api/customers/search – Customer autocomplete",
            ],
        ),
        section(
            "UI Approach (Fiori/UI5)",
            &[
                "Use SAP Fiori Elements List Report + Object Page pattern",
                "Custom order entry screen built with UI5 controls",
                "Responsive design using sap.m library",
            ],
        ),
        section(
            "Server Logic (ABAP)",
            &[
                "Function module Z_CREATE_ORDER – order creation logic",
                "BAPI_SALESORDER_CREATEFROMDAT2 – SAP standard integration",
                "Enhancement spot for custom validations",
            ],
        ),
        section(
            "Security/Roles",
            &[
                "ZMCCAIN_SALES_REP – Create and view own orders",
                "ZMCCAIN_SALES_MGR – Approve orders, view all",
                "Authorization object Z_ORD_AUTH for field-level security",
            ],
        ),
        section(
            "Performance",
            &[
                "Database indexes on ZORDER_HEADER-ORDER_ID and CUSTOMER_ID",
                "OData batch requests for line items",
                "Lazy loading for order history lists",
            ],
        ),
    ]
}

/// Functional, technical and UI design documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignScreen {
    pub functional: DocStatus,
    pub technical: DocStatus,
    pub ui: DocStatus,
    pub functional_sections: Vec<Section>,
    pub technical_sections: Vec<Section>,
    pub figma_links: Vec<String>,
    pub notes: String,
}

impl Default for DesignScreen {
    fn default() -> Self {
        Self {
            functional: DocStatus::InReview,
            technical: DocStatus::InReview,
            ui: DocStatus::InReview,
            functional_sections: functional_sections(),
            technical_sections: technical_sections(),
            figma_links: vec![
                "https://figma.com/file/abc123/O2C-Wireframes".to_string(),
                "https://figma.com/file/def456/O2C-Final-Screens".to_string(),
            ],
            notes: "UI approach: Use Fiori elements with custom extensions for order entry. \
                    Consider mobile-first design for warehouse staff."
                .to_string(),
        }
    }
}

impl DesignScreen {
    pub fn status(&self, doc: DesignDoc) -> DocStatus {
        match doc {
            DesignDoc::Functional => self.functional,
            DesignDoc::Technical => self.technical,
            DesignDoc::Ui => self.ui,
        }
    }

    /// Approve one document. Approving twice is rejected.
    pub fn approve(&mut self, doc: DesignDoc) -> Result<()> {
        let slot = match doc {
            DesignDoc::Functional => &mut self.functional,
            DesignDoc::Technical => &mut self.technical,
            DesignDoc::Ui => &mut self.ui,
        };
        if *slot == DocStatus::Approved {
            return Err(TrackerError::GateBlocked(format!("{doc} is already approved")));
        }
        *slot = DocStatus::Approved;
        Ok(())
    }

    pub fn add_link(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !is_valid_url(url) {
            return Err(TrackerError::InvalidInput(format!(
                "'{url}' is not a valid http(s) URL"
            )));
        }
        self.figma_links.push(url.to_string());
        Ok(())
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }
}

impl Screen for DesignScreen {
    fn stage(&self) -> Stage {
        Stage::Design
    }

    fn advance_action(&self) -> &'static str {
        "Approve UI Prototype"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        match self.ui {
            DocStatus::InReview => Ok(()),
            DocStatus::Approved => Err(MSG_UI_APPROVED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_documents_are_in_review() {
        let d = DesignScreen::default();
        assert_eq!(d.status(DesignDoc::Functional), DocStatus::InReview);
        assert_eq!(d.functional_sections.len(), 5);
        assert_eq!(d.technical_sections.len(), 6);
        assert_eq!(d.technical_sections[1].title, "Services/APIs");
        assert_eq!(d.figma_links.len(), 2);
        assert!(d.gate().open);
    }

    #[test]
    fn approve_is_one_shot() {
        let mut d = DesignScreen::default();
        d.approve(DesignDoc::Technical).unwrap();
        assert_eq!(d.technical, DocStatus::Approved);
        assert!(matches!(
            d.approve(DesignDoc::Technical),
            Err(TrackerError::GateBlocked(_))
        ));
    }

    #[test]
    fn approving_ui_closes_gate() {
        let mut d = DesignScreen::default();
        d.approve(DesignDoc::Ui).unwrap();
        let gate = d.gate();
        assert!(!gate.open);
        assert_eq!(gate.reason, Some(MSG_UI_APPROVED));
    }

    #[test]
    fn links_must_be_urls() {
        let mut d = DesignScreen::default();
        assert!(d.add_link("not a link").is_err());
        d.add_link("https://figma.com/file/xyz/Mobile").unwrap();
        assert_eq!(d.figma_links.len(), 3);
    }

    #[test]
    fn doc_parses_short_names() {
        assert_eq!("fd".parse::<DesignDoc>().unwrap(), DesignDoc::Functional);
        assert_eq!("UI".parse::<DesignDoc>().unwrap(), DesignDoc::Ui);
        assert!("xd".parse::<DesignDoc>().is_err());
    }
}
