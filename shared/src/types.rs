//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Inventory category an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Raw material (incoming wire rod)
    #[serde(rename = "RM")]
    Rm,
    /// Finished good (drawn/annealed wire)
    #[serde(rename = "FG")]
    Fg,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Rm => "RM",
            ItemCategory::Fg => "FG",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "RM" => Some(ItemCategory::Rm),
            "FG" => Some(ItemCategory::Fg),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a BOM conversion rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BomStatus {
    #[default]
    Active,
    Inactive,
}

impl BomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BomStatus::Active => "Active",
            BomStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(BomStatus::Active),
            "Inactive" => Some(BomStatus::Inactive),
            _ => None,
        }
    }
}

/// GST levy applied to an invoice
///
/// Intra-state supplies split the rate evenly into CGST + SGST; inter-state
/// supplies levy the whole rate as IGST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxTreatment {
    #[default]
    IntraState,
    InterState,
}

impl TaxTreatment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxTreatment::IntraState => "intra_state",
            TaxTreatment::InterState => "inter_state",
        }
    }
}
