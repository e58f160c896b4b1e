//! Conversion charge calculator
//!
//! Computes the material, annealing, and draw components of an outward
//! challan's value. All arithmetic stays in full-precision `Decimal`;
//! rounding happens only when amounts are presented.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Breakdown of charges for one conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    /// quantity * rate
    pub material: Decimal,
    /// annealing charge per unit * quantity * annealing count
    pub annealing: Decimal,
    /// draw charge per unit * quantity * draw pass count
    pub draw: Decimal,
    pub total: Decimal,
}

impl ChargeBreakdown {
    /// Copy with every component rounded to two decimal places, for display.
    pub fn rounded(&self) -> Self {
        Self {
            material: self.material.round_dp(2),
            annealing: self.annealing.round_dp(2),
            draw: self.draw.round_dp(2),
            total: self.total.round_dp(2),
        }
    }
}

/// Compute the charge breakdown for a conversion.
///
/// `annealing_charge` and `draw_charge` are the per-unit charges snapshotted
/// from the party's schedule; `annealing_count` and `draw_pass_count` are the
/// process parameters recorded on the challan.
pub fn compute_charges(
    quantity: Decimal,
    rate: Decimal,
    annealing_charge: Decimal,
    draw_charge: Decimal,
    annealing_count: i32,
    draw_pass_count: i32,
) -> ChargeBreakdown {
    let material = quantity * rate;
    let annealing = annealing_charge * quantity * Decimal::from(annealing_count);
    let draw = draw_charge * quantity * Decimal::from(draw_pass_count);

    ChargeBreakdown {
        material,
        annealing,
        draw,
        total: material + annealing + draw,
    }
}
