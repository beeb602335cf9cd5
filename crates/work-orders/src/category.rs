use serde::{Deserialize, Serialize};

use doorx_core::Enumeration;

use crate::priority::Priority;

/// Kind of maintenance service a work order needs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceCategory {
    Plumbing,
    Electrical,
    #[serde(rename = "HVAC")]
    Hvac,
    Appliance,
    PestControl,
    Cleaning,
    GeneralMaintenance,
}

impl Enumeration for ServiceCategory {
    const ALL: &'static [Self] = &[
        ServiceCategory::Plumbing,
        ServiceCategory::Electrical,
        ServiceCategory::Hvac,
        ServiceCategory::Appliance,
        ServiceCategory::PestControl,
        ServiceCategory::Cleaning,
        ServiceCategory::GeneralMaintenance,
    ];

    fn id(self) -> i32 {
        match self {
            ServiceCategory::Plumbing => 1,
            ServiceCategory::Electrical => 2,
            ServiceCategory::Hvac => 3,
            ServiceCategory::Appliance => 4,
            ServiceCategory::PestControl => 5,
            ServiceCategory::Cleaning => 6,
            ServiceCategory::GeneralMaintenance => 7,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ServiceCategory::Plumbing => "Plumbing",
            ServiceCategory::Electrical => "Electrical",
            ServiceCategory::Hvac => "HVAC",
            ServiceCategory::Appliance => "Appliance",
            ServiceCategory::PestControl => "PestControl",
            ServiceCategory::Cleaning => "Cleaning",
            ServiceCategory::GeneralMaintenance => "GeneralMaintenance",
        }
    }
}

impl ServiceCategory {
    pub fn description(self) -> &'static str {
        match self {
            ServiceCategory::Plumbing => {
                "Repairs and maintenance of water systems, pipes, faucets, and fixtures"
            }
            ServiceCategory::Electrical => "Electrical repairs, wiring, outlets, and lighting",
            ServiceCategory::Hvac => "Heating, ventilation, and air conditioning systems",
            ServiceCategory::Appliance => "Repair and maintenance of household appliances",
            ServiceCategory::PestControl => "Pest inspection and extermination services",
            ServiceCategory::Cleaning => "Professional cleaning services",
            ServiceCategory::GeneralMaintenance => "General repairs and maintenance work",
        }
    }

    /// Vendors must hold a certification for these categories.
    pub fn requires_certification(self) -> bool {
        matches!(
            self,
            ServiceCategory::Electrical | ServiceCategory::Hvac | ServiceCategory::PestControl
        )
    }

    /// Priority usually suggested for issues of this category.
    pub fn typical_priority(self) -> Priority {
        match self {
            ServiceCategory::Electrical | ServiceCategory::Hvac | ServiceCategory::Plumbing => {
                Priority::High
            }
            ServiceCategory::Cleaning => Priority::Low,
            ServiceCategory::PestControl
            | ServiceCategory::Appliance
            | ServiceCategory::GeneralMaintenance => Priority::Normal,
        }
    }
}

impl core::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
