use serde::{Deserialize, Serialize};

/// Documents and validations gathered for an STC claim.
///
/// The six required items gate eligibility. The advisory items default to
/// `false` when absent and only ever produce warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityChecklist {
    pub panels_validated: bool,
    pub inverter_validated: bool,
    pub electrical_certificate: bool,
    pub compliance_statement: bool,
    pub customer_declaration: bool,
    pub installation_photos: bool,
    #[serde(default)]
    pub serial_numbers_recorded: bool,
    #[serde(default)]
    pub network_approval_recorded: bool,
}

impl EligibilityChecklist {
    /// A checklist with every item, required and advisory, ticked.
    pub fn complete() -> Self {
        Self {
            panels_validated: true,
            inverter_validated: true,
            electrical_certificate: true,
            compliance_statement: true,
            customer_declaration: true,
            installation_photos: true,
            serial_numbers_recorded: true,
            network_approval_recorded: true,
        }
    }

    fn required_items(&self) -> [(bool, &'static str); 6] {
        [
            (
                self.panels_validated,
                "Panels not validated against the approved product list",
            ),
            (
                self.inverter_validated,
                "Inverter not validated against the approved product list",
            ),
            (
                self.electrical_certificate,
                "Electrical certificate of compliance not provided",
            ),
            (
                self.compliance_statement,
                "Installer compliance statement not provided",
            ),
            (
                self.customer_declaration,
                "Customer declaration not signed",
            ),
            (
                self.installation_photos,
                "Installation photos not uploaded",
            ),
        ]
    }

    fn advisory_items(&self) -> [(bool, &'static str); 2] {
        [
            (
                self.serial_numbers_recorded,
                "Panel and inverter serial numbers not recorded; the registry may request them",
            ),
            (
                self.network_approval_recorded,
                "Network connection approval not recorded",
            ),
        ]
    }
}

/// Outcome of [`validate_eligibility`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    /// One entry per unmet required item, in checklist order.
    pub missing_requirements: Vec<String>,
    pub warnings: Vec<String>,
}

/// Maps a checklist to an eligibility verdict.
///
/// Eligible iff every required item is ticked.
pub fn validate_eligibility(checklist: &EligibilityChecklist) -> EligibilityReport {
    let missing_requirements: Vec<String> = checklist
        .required_items()
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| (*msg).to_string())
        .collect();
    let warnings = checklist
        .advisory_items()
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| (*msg).to_string())
        .collect();

    EligibilityReport {
        eligible: missing_requirements.is_empty(),
        missing_requirements,
        warnings,
    }
}
