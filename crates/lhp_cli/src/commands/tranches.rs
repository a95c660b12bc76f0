//! Tranches command implementation
//!
//! Survival probability and expected loss of each configured tranche.

use lhp_models::copula::{BaseCorrelationCurve, GaussianCopulaLhp};
use serde::Serialize;
use tracing::info;

use super::{batch, cell, render, OutputFormat};
use crate::config::CliConfig;
use crate::Result;

/// One tranche of the strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrancheRow {
    /// Attachment point
    pub attachment: f64,
    /// Detachment point
    pub detachment: f64,
    /// Survival probability at the flat correlation
    pub survival_probability: f64,
    /// Expected loss as a fraction of tranche notional
    pub expected_loss: f64,
    /// Survival probability under the base correlation curve, if configured
    pub base_correlation_survival: Option<f64>,
}

/// Evaluate every configured tranche.
pub fn evaluate(config: &CliConfig) -> Result<Vec<TrancheRow>> {
    let tranches: Vec<(f64, f64)> = config.tranches.iter().map(|&[k1, k2]| (k1, k2)).collect();
    let survivals = batch(config)?.tranche_survivals(&tranches);

    let curve = config
        .base_correlation
        .as_ref()
        .map(|c| BaseCorrelationCurve::new(&c.detachments, &c.betas))
        .transpose()?;
    let survs = config.portfolio.survival_vector();
    let recs = config.portfolio.recovery_vector();
    let model = GaussianCopulaLhp::reference();

    tranches
        .iter()
        .zip(survivals)
        .map(|(&(k1, k2), survival)| -> Result<TrancheRow> {
            let survival = survival?;
            let base_correlation_survival = curve
                .as_ref()
                .map(|curve| {
                    curve.tranche_survival(
                        &model,
                        k1,
                        k2,
                        config.portfolio.num_credits,
                        &survs,
                        &recs,
                    )
                })
                .transpose()?;
            Ok(TrancheRow {
                attachment: k1,
                detachment: k2,
                survival_probability: survival,
                expected_loss: 1.0 - survival,
                base_correlation_survival,
            })
        })
        .collect()
}

/// Run the tranches command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!("Pricing {} tranches at beta = {}", config.tranches.len(), config.beta);
    let rows = evaluate(config)?;

    render(format, &rows, |rows| {
        println!("\n┌────────────┬────────────┬──────────────┬──────────────┬──────────────┐");
        println!("│ K1         │ K2         │ Survival     │ Exp. loss    │ Base corr    │");
        println!("├────────────┼────────────┼──────────────┼──────────────┼──────────────┤");
        for row in rows {
            println!(
                "│ {:<10.4} │ {:<10.4} │ {:<12.10} │ {:<12.10} │ {:<12} │",
                row.attachment,
                row.detachment,
                row.survival_probability,
                row.expected_loss,
                cell(row.base_correlation_survival),
            );
        }
        println!("└────────────┴────────────┴──────────────┴──────────────┴──────────────┘");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseCorrelationConfig;
    use crate::CliError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_strip() {
        let rows = evaluate(&CliConfig::default()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_abs_diff_eq!(rows[0].survival_probability, 0.6176680648604107, epsilon = 1e-10);
        assert_abs_diff_eq!(rows[1].survival_probability, 0.9870675333274431, epsilon = 1e-10);
        for row in &rows {
            assert_eq!(row.expected_loss, 1.0 - row.survival_probability);
            assert!(row.base_correlation_survival.is_none());
        }
    }

    #[test]
    fn test_base_correlation_column() {
        let config = CliConfig {
            base_correlation: Some(BaseCorrelationConfig {
                detachments: vec![0.03, 0.07, 0.10],
                betas: vec![0.3, 0.3, 0.3],
            }),
            ..Default::default()
        };
        let rows = evaluate(&config).unwrap();
        for row in &rows[..3] {
            assert_eq!(row.base_correlation_survival, Some(row.survival_probability));
        }
    }

    #[test]
    fn test_unordered_tranche_fails() {
        let config = CliConfig {
            tranches: vec![[0.07, 0.03]],
            ..Default::default()
        };
        assert!(matches!(evaluate(&config), Err(CliError::Model(_))));
    }
}
