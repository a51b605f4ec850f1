//! # Rate Policy
//!
//! The single source of truth for the VAT → equivalence-surcharge mapping.
//!
//! Spanish pharmacies under the "recargo de equivalencia" regime pay a
//! fixed surcharge on top of each VAT rate. The pairing is set by law:
//!
//! | VAT  | Surcharge |
//! |------|-----------|
//! |  4%  |   0.5%    |
//! | 10%  |   1.4%    |
//! | 21%  |   5.2%    |
//!
//! Both the product form (defaulting the surcharge when a VAT rate is
//! picked) and any totals computation consult this table - there is no
//! second copy anywhere in the workspace.

use crate::types::TaxRate;

/// The VAT rates the backend accepts, in basis points.
pub const STANDARD_VAT_RATES_BPS: [u32; 3] = [400, 1000, 2100];

/// Statutory VAT → equivalence-surcharge pairs, in basis points.
const SURCHARGE_TABLE: [(u32, u32); 3] = [(400, 50), (1000, 140), (2100, 520)];

/// Returns the equivalence surcharge rate paired with a VAT rate.
///
/// Unknown VAT rates map to a zero surcharge, matching the backend's
/// behavior for products outside the standard set.
///
/// ## Example
/// ```rust
/// use farmalink_core::policy::equivalence_surcharge;
/// use farmalink_core::types::TaxRate;
///
/// let surcharge = equivalence_surcharge(TaxRate::from_bps(2100));
/// assert_eq!(surcharge.bps(), 520); // 21% VAT → 5.2% surcharge
/// ```
pub fn equivalence_surcharge(vat_rate: TaxRate) -> TaxRate {
    SURCHARGE_TABLE
        .iter()
        .find(|(vat, _)| *vat == vat_rate.bps())
        .map(|(_, surcharge)| TaxRate::from_bps(*surcharge))
        .unwrap_or_else(TaxRate::zero)
}

/// Checks whether a VAT rate belongs to the standard set.
pub fn is_standard_vat_rate(rate: TaxRate) -> bool {
    STANDARD_VAT_RATES_BPS.contains(&rate.bps())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statutory_pairs() {
        assert_eq!(equivalence_surcharge(TaxRate::from_bps(400)).bps(), 50);
        assert_eq!(equivalence_surcharge(TaxRate::from_bps(1000)).bps(), 140);
        assert_eq!(equivalence_surcharge(TaxRate::from_bps(2100)).bps(), 520);
    }

    #[test]
    fn test_unknown_rate_has_no_surcharge() {
        assert!(equivalence_surcharge(TaxRate::from_bps(0)).is_zero());
        assert!(equivalence_surcharge(TaxRate::from_bps(825)).is_zero());
    }

    #[test]
    fn test_standard_rate_membership() {
        assert!(is_standard_vat_rate(TaxRate::from_bps(2100)));
        assert!(!is_standard_vat_rate(TaxRate::from_bps(2000)));
    }
}
