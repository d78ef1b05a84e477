use super::Screen;
use crate::error::{Result, TrackerError};
use crate::types::Stage;
use serde::{Deserialize, Serialize};

pub const MSG_NO_CASES: &str = "Generate or import cases before assigning reviewers";
pub const MSG_NOT_APPROVED: &str =
    "Reviewer approval required before generating test execution prompt";
pub const MSG_CASE_REQUIRED: &str = "Title and Expected Result are required";

const NEW_CASE_COVERAGE: u32 = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub title: String,
    pub preconditions: String,
    pub steps: String,
    pub expected_result: String,
    pub coverage: u32,
    pub process_step: String,
    pub acceptance_criteria: String,
    pub reviewer_comment: String,
}

/// Editor fields for a new case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseForm {
    pub title: String,
    pub preconditions: String,
    pub steps: String,
    pub expected_result: String,
    pub process_step: String,
    pub acceptance_criteria: String,
}

/// Partial update of an existing case. `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CasePatch {
    pub title: Option<String>,
    pub preconditions: Option<String>,
    pub steps: Option<String>,
    pub expected_result: Option<String>,
    pub process_step: Option<String>,
    pub acceptance_criteria: Option<String>,
}

fn mock_cases() -> Vec<TestCase> {
    let case = |id: &str, title: &str, pre: &str, steps: &str, expected: &str, coverage, step: &str, ac: &str| {
        TestCase {
            id: id.to_string(),
            title: title.to_string(),
            preconditions: pre.to_string(),
            steps: steps.to_string(),
            expected_result: expected.to_string(),
            coverage,
            process_step: step.to_string(),
            acceptance_criteria: ac.to_string(),
            reviewer_comment: String::new(),
        }
    };
    vec![
        case(
            "TC-001",
            "Create new order with valid customer",
            "User logged in as Sales Rep, Customer exists in system",
            "1. Navigate to Order Entry\n2. Enter customer ID\n3. Add line items\n4. Submit order",
            "Order created successfully, Order ID displayed, Email sent to customer",
            85,
            "Order Creation",
            "Order processing time < 2 minutes",
        ),
        case(
            "TC-002",
            "Create order with invalid customer",
            "User logged in as Sales Rep",
            "1. Navigate to Order Entry\n2. Enter invalid customer ID\n3. Attempt to submit",
            "Error message displayed: \"Customer not found\"",
            90,
            "Order Creation",
            "Proper validation error handling",
        ),
        case(
            "TC-003",
            "Order requires manager approval",
            "User logged in as Sales Rep, Order amount > $10,000",
            "1. Create order with amount > $10,000\n2. Submit order\n3. Check order status",
            "Order status = \"Pending Approval\", Manager notified",
            75,
            "Order Approval",
            "Manager approval workflow",
        ),
    ]
}

// ---------------------------------------------------------------------------
// TestSuiteScreen
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSuiteScreen {
    pub cases: Vec<TestCase>,
    pub generated: bool,
    pub reviewers_assigned: bool,
    pub approved: bool,
}

impl TestSuiteScreen {
    pub fn case_status(&self) -> &'static str {
        if self.approved {
            "Cases Approved"
        } else {
            "Cases In Review"
        }
    }

    /// Replace the case list with the generated mock cases.
    pub fn generate(&mut self) -> &[TestCase] {
        self.cases = mock_cases();
        self.generated = true;
        &self.cases
    }

    pub fn assign_reviewers(&mut self) -> Result<()> {
        if !self.generated {
            return Err(TrackerError::blocked(MSG_NO_CASES));
        }
        self.reviewers_assigned = true;
        Ok(())
    }

    pub fn approve(&mut self) -> Result<()> {
        if !self.reviewers_assigned {
            return Err(TrackerError::blocked(MSG_NOT_APPROVED));
        }
        self.approved = true;
        Ok(())
    }

    /// The test execution prompt handed to the automation tool.
    pub fn execution_prompt(&self, requirement_id: &str) -> Result<String> {
        self.advance_gate().map_err(TrackerError::blocked)?;
        let mut out = format!(
            "Execute the approved test suite for {requirement_id}.\n\
             Report pass/fail per step with evidence.\n"
        );
        for tc in &self.cases {
            out.push_str(&format!(
                "\n## {} {}\nPreconditions: {}\nSteps:\n{}\nExpected: {}\n",
                tc.id, tc.title, tc.preconditions, tc.steps, tc.expected_result
            ));
        }
        Ok(out)
    }

    pub fn add(&mut self, form: CaseForm) -> Result<&TestCase> {
        if form.title.trim().is_empty() || form.expected_result.trim().is_empty() {
            return Err(TrackerError::blocked(MSG_CASE_REQUIRED));
        }
        let id = self.next_id();
        self.cases.push(TestCase {
            id,
            title: form.title,
            preconditions: form.preconditions,
            steps: form.steps,
            expected_result: form.expected_result,
            coverage: NEW_CASE_COVERAGE,
            process_step: form.process_step,
            acceptance_criteria: form.acceptance_criteria,
            reviewer_comment: String::new(),
        });
        let last = self.cases.len() - 1;
        Ok(&self.cases[last])
    }

    pub fn edit(&mut self, id: &str, patch: CasePatch) -> Result<&TestCase> {
        let pos = self.position(id)?;
        let tc = &mut self.cases[pos];
        let title = patch.title.unwrap_or_else(|| tc.title.clone());
        let expected = patch
            .expected_result
            .unwrap_or_else(|| tc.expected_result.clone());
        if title.trim().is_empty() || expected.trim().is_empty() {
            return Err(TrackerError::blocked(MSG_CASE_REQUIRED));
        }
        tc.title = title;
        tc.expected_result = expected;
        if let Some(v) = patch.preconditions {
            tc.preconditions = v;
        }
        if let Some(v) = patch.steps {
            tc.steps = v;
        }
        if let Some(v) = patch.process_step {
            tc.process_step = v;
        }
        if let Some(v) = patch.acceptance_criteria {
            tc.acceptance_criteria = v;
        }
        Ok(tc)
    }

    pub fn duplicate(&mut self, id: &str) -> Result<&TestCase> {
        let pos = self.position(id)?;
        let mut copy = self.cases[pos].clone();
        copy.id = self.next_id();
        copy.title = format!("{} (Copy)", copy.title);
        self.cases.push(copy);
        let last = self.cases.len() - 1;
        Ok(&self.cases[last])
    }

    pub fn delete(&mut self, id: &str) -> Result<TestCase> {
        let pos = self.position(id)?;
        Ok(self.cases.remove(pos))
    }

    pub fn comment(&mut self, id: &str, comment: &str) -> Result<&TestCase> {
        let pos = self.position(id)?;
        self.cases[pos].reviewer_comment = comment.to_string();
        Ok(&self.cases[pos])
    }

    /// Mean coverage rounded half up; 0 for an empty suite.
    pub fn average_coverage(&self) -> u32 {
        let n = self.cases.len() as u32;
        if n == 0 {
            return 0;
        }
        let sum: u32 = self.cases.iter().map(|c| c.coverage).sum();
        (sum * 2 + n) / (n * 2)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.cases
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TrackerError::TestCaseNotFound(id.to_string()))
    }

    // Highest numeric suffix + 1, so ids stay unique after deletes.
    fn next_id(&self) -> String {
        let n = self
            .cases
            .iter()
            .filter_map(|c| c.id.strip_prefix("TC-")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("TC-{:03}", n + 1)
    }
}

impl Screen for TestSuiteScreen {
    fn stage(&self) -> Stage {
        Stage::TestSuite
    }

    fn advance_action(&self) -> &'static str {
        "Download Test Execution Prompt"
    }

    fn advance_gate(&self) -> std::result::Result<(), &'static str> {
        if !self.approved {
            return Err(MSG_NOT_APPROVED);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, expected: &str) -> CaseForm {
        CaseForm {
            title: title.to_string(),
            expected_result: expected.to_string(),
            ..CaseForm::default()
        }
    }

    #[test]
    fn approval_steps_run_in_order() {
        let mut s = TestSuiteScreen::default();
        assert!(matches!(s.assign_reviewers(), Err(TrackerError::GateBlocked(ref m)) if m == MSG_NO_CASES));
        assert!(matches!(s.approve(), Err(TrackerError::GateBlocked(ref m)) if m == MSG_NOT_APPROVED));
        assert!(!s.gate().open);

        assert_eq!(s.generate().len(), 3);
        s.assign_reviewers().unwrap();
        assert_eq!(s.case_status(), "Cases In Review");
        s.approve().unwrap();
        assert_eq!(s.case_status(), "Cases Approved");
        assert!(s.gate().open);

        let prompt = s.execution_prompt("REQ-ABC123").unwrap();
        assert!(prompt.contains("REQ-ABC123"));
        assert!(prompt.contains("## TC-003 Order requires manager approval"));
    }

    #[test]
    fn prompt_blocked_until_approved() {
        let mut s = TestSuiteScreen::default();
        s.generate();
        let err = s.execution_prompt("REQ-X").unwrap_err();
        assert_eq!(err.to_string(), MSG_NOT_APPROVED);
    }

    #[test]
    fn add_requires_title_and_expected() {
        let mut s = TestSuiteScreen::default();
        assert!(s.add(form("Only title", "")).is_err());
        assert!(s.add(form("", "Only expected")).is_err());
        let tc = s.add(form("Bulk order upload", "All rows imported")).unwrap();
        assert_eq!(tc.id, "TC-001");
        assert_eq!(tc.coverage, 70);
    }

    #[test]
    fn duplicate_and_delete_keep_ids_unique() {
        let mut s = TestSuiteScreen::default();
        s.generate();
        let copy = s.duplicate("TC-002").unwrap();
        assert_eq!(copy.id, "TC-004");
        assert_eq!(copy.title, "Create order with invalid customer (Copy)");
        s.delete("TC-001").unwrap();
        let tc = s.add(form("New", "Works")).unwrap();
        assert_eq!(tc.id, "TC-005");
        assert!(s.delete("TC-001").unwrap_err().is_not_found());
    }

    #[test]
    fn edit_patches_selected_fields() {
        let mut s = TestSuiteScreen::default();
        s.generate();
        let patch = CasePatch {
            steps: Some("1. Open app".to_string()),
            ..CasePatch::default()
        };
        let tc = s.edit("TC-001", patch).unwrap();
        assert_eq!(tc.steps, "1. Open app");
        assert_eq!(tc.title, "Create new order with valid customer");

        let clear = CasePatch {
            title: Some(" ".to_string()),
            ..CasePatch::default()
        };
        assert!(s.edit("TC-001", clear).is_err());
        s.comment("TC-001", "Add negative path").unwrap();
        assert_eq!(s.cases[0].reviewer_comment, "Add negative path");
    }

    #[test]
    fn average_coverage_rounds() {
        let mut s = TestSuiteScreen::default();
        assert_eq!(s.average_coverage(), 0);
        s.generate();
        // (85 + 90 + 75) / 3 = 83.33
        assert_eq!(s.average_coverage(), 83);
        s.add(form("t", "e")).unwrap();
        // 320 / 4 = 80
        assert_eq!(s.average_coverage(), 80);
    }
}
