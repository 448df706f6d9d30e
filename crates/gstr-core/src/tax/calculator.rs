//! GST split calculation.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::TaxError;
use crate::models::config::TaxConfig;
use crate::models::invoice::{TaxBreakdown, TaxRegime};

/// Splits a tax-inclusive invoice total into taxable value and GST components.
#[derive(Debug, Clone, Default)]
pub struct TaxCalculator {
    config: TaxConfig,
}

impl TaxCalculator {
    /// Create a calculator with the given rate and intra-state code.
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Regime for a recipient jurisdiction.
    ///
    /// An absent jurisdiction is taxed inter-state.
    pub fn regime(&self, jurisdiction_code: Option<&str>) -> TaxRegime {
        match jurisdiction_code {
            Some(code) if code == self.config.intra_state_code => TaxRegime::IntraState,
            _ => TaxRegime::InterState,
        }
    }

    /// Compute the tax breakdown of a tax-inclusive total.
    ///
    /// Every output has two fraction digits and
    /// `taxable_value + total_tax == total_amount` holds exactly. In the
    /// intra-state regime an odd cent in the tax is moved into the taxable
    /// value so that CGST and SGST stay equal.
    pub fn compute(
        &self,
        total_amount: Option<Decimal>,
        jurisdiction_code: Option<&str>,
    ) -> Result<TaxBreakdown, TaxError> {
        let total = round_currency(total_amount.ok_or(TaxError::MissingAmount)?);
        if total <= Decimal::ZERO {
            return Err(TaxError::NonPositiveAmount(total));
        }

        let divisor = Decimal::ONE + self.config.standard_rate;
        let mut taxable_value = round_currency(total / divisor);
        let mut total_tax = total - taxable_value;

        let zero = Decimal::new(0, 2);
        let regime = self.regime(jurisdiction_code);

        let breakdown = match regime {
            TaxRegime::IntraState => {
                let half = round_currency(total_tax / Decimal::TWO);
                if half * Decimal::TWO != total_tax {
                    total_tax = half * Decimal::TWO;
                    taxable_value = total - total_tax;
                }
                TaxBreakdown {
                    taxable_value,
                    cgst: half,
                    sgst: half,
                    igst: zero,
                    total_tax,
                }
            }
            TaxRegime::InterState => TaxBreakdown {
                taxable_value,
                cgst: zero,
                sgst: zero,
                igst: total_tax,
                total_tax,
            },
        };

        debug!(
            "Tax split of {} ({:?}): taxable {} + tax {}",
            total, regime, breakdown.taxable_value, breakdown.total_tax
        );

        Ok(breakdown)
    }
}

/// Round to paise, half away from zero. The result always has scale 2.
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn calculator() -> TaxCalculator {
        TaxCalculator::default()
    }

    #[test]
    fn test_intra_state_reference() {
        let breakdown = calculator().compute(Some(dec("1180.00")), Some("37")).unwrap();
        assert_eq!(
            breakdown,
            TaxBreakdown {
                taxable_value: dec("1000.00"),
                cgst: dec("90.00"),
                sgst: dec("90.00"),
                igst: Decimal::ZERO,
                total_tax: dec("180.00"),
            }
        );
    }

    #[test]
    fn test_inter_state_reference() {
        let breakdown = calculator().compute(Some(dec("1180.00")), Some("29")).unwrap();
        assert_eq!(breakdown.igst, dec("180.00"));
        assert_eq!(breakdown.cgst, Decimal::ZERO);
        assert_eq!(breakdown.sgst, Decimal::ZERO);
        assert_eq!(breakdown.taxable_value, dec("1000.00"));
    }

    #[test]
    fn test_absent_jurisdiction_is_inter_state() {
        let calc = calculator();
        assert_eq!(calc.regime(None), TaxRegime::InterState);

        let breakdown = calc.compute(Some(dec("1500.00")), None).unwrap();
        assert_eq!(breakdown.cgst, Decimal::ZERO);
        assert_eq!(breakdown.igst, breakdown.total_tax);
    }

    #[test]
    fn test_rounding_half_up() {
        // 100 / 1.18 = 84.7457... -> 84.75, tax 15.25
        let breakdown = calculator().compute(Some(dec("100.00")), Some("29")).unwrap();
        assert_eq!(breakdown.taxable_value, dec("84.75"));
        assert_eq!(breakdown.total_tax, dec("15.25"));
    }

    #[test]
    fn test_odd_cent_absorbed_into_taxable_value() {
        // 1500 / 1.18 = 1271.186... -> 1271.19, tax 228.81 splits as 114.41 + 114.41
        let breakdown = calculator().compute(Some(dec("1500.00")), Some("37")).unwrap();
        assert_eq!(breakdown.cgst, dec("114.41"));
        assert_eq!(breakdown.sgst, dec("114.41"));
        assert_eq!(breakdown.total_tax, dec("228.82"));
        assert_eq!(breakdown.taxable_value, dec("1271.18"));
        assert_eq!(breakdown.gross(), dec("1500.00"));
    }

    #[test]
    fn test_intra_state_invariants() {
        let calc = calculator();
        for cents in (1..=500_000i64).step_by(997) {
            let total = Decimal::new(cents, 2);
            let b = calc.compute(Some(total), Some("37")).unwrap();

            assert_eq!(b.cgst, b.sgst, "total {total}");
            assert_eq!(b.cgst + b.sgst, b.total_tax, "total {total}");
            assert_eq!(b.igst, Decimal::ZERO);
            assert_eq!(b.taxable_value + b.total_tax, total, "total {total}");
            assert_eq!(b.taxable_value.scale(), 2);
            assert_eq!(b.total_tax.scale(), 2);

            if total >= dec("100") {
                let expected_tax = b.taxable_value * dec("0.18");
                assert!((b.total_tax - expected_tax).abs() <= dec("0.02"), "total {total}");
            }
        }
    }

    #[test]
    fn test_inter_state_invariants() {
        let calc = calculator();
        for cents in (1..=500_000i64).step_by(991) {
            let total = Decimal::new(cents, 2);
            for code in [Some("29"), Some("07"), None] {
                let b = calc.compute(Some(total), code).unwrap();
                assert_eq!(b.igst, b.total_tax);
                assert_eq!(b.cgst, Decimal::ZERO);
                assert_eq!(b.sgst, Decimal::ZERO);
                assert_eq!(b.taxable_value + b.total_tax, total);
            }
        }
    }

    #[test]
    fn test_missing_amount() {
        assert_eq!(
            calculator().compute(None, Some("37")),
            Err(TaxError::MissingAmount)
        );
    }

    #[test]
    fn test_non_positive_amount() {
        let calc = calculator();
        assert_eq!(
            calc.compute(Some(Decimal::ZERO), Some("37")),
            Err(TaxError::NonPositiveAmount(Decimal::ZERO))
        );
        assert!(matches!(
            calc.compute(Some(dec("-50.00")), None),
            Err(TaxError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_configured_home_state_and_rate() {
        let calc = TaxCalculator::new(TaxConfig {
            standard_rate: dec("0.12"),
            intra_state_code: "29".to_string(),
        });
        let b = calc.compute(Some(dec("1120.00")), Some("29")).unwrap();
        assert_eq!(b.taxable_value, dec("1000.00"));
        assert_eq!(b.cgst, dec("60.00"));
        assert_eq!(calc.regime(Some("37")), TaxRegime::InterState);
    }

    #[test]
    fn test_input_rounded_to_paise() {
        let b = calculator().compute(Some(dec("1180.004")), Some("37")).unwrap();
        assert_eq!(b.gross(), dec("1180.00"));
    }
}
