//! Grid command implementation
//!
//! Expected loss, loss CDF and loss density on the configured grid.

use serde::Serialize;
use tracing::{info, warn};

use super::{batch, cell, render, OutputFormat};
use crate::config::CliConfig;
use crate::Result;

/// One grid point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// Loss level
    pub k: f64,
    /// `E[min(L, k)]`
    pub expected_min_loss: Option<f64>,
    /// `P(L <= k)`
    pub cdf: Option<f64>,
    /// Closed-form loss density
    pub density: Option<f64>,
}

/// Evaluate the configured grid.
///
/// Sentinels and rejected densities become empty cells.
pub fn evaluate(config: &CliConfig) -> Result<Vec<GridRow>> {
    let ks = config.grid.points();
    let batch = batch(config)?;

    let el = batch.expected_min_losses(&ks);
    let cdf = batch.loss_cdf_grid(&ks);
    let density = batch.loss_density_grid(&ks);

    let rows = ks
        .iter()
        .zip(el)
        .zip(cdf)
        .zip(density)
        .map(|(((&k, el), cdf), density)| GridRow {
            k,
            expected_min_loss: el.value(),
            cdf: cdf.value(),
            density: density
                .map_err(|e| warn!("Density at k = {} rejected: {}", k, e))
                .ok(),
        })
        .collect();
    Ok(rows)
}

/// Run the grid command
pub fn run(config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!(
        "Evaluating {} grid points on [{}, {}]",
        config.grid.steps + 1,
        config.grid.start,
        config.grid.end
    );
    let rows = evaluate(config)?;

    render(format, &rows, |rows| {
        println!("\n┌────────────┬──────────────┬──────────────┬──────────────┐");
        println!("│ k          │ E[min(L,k)]  │ P(L <= k)    │ Density      │");
        println!("├────────────┼──────────────┼──────────────┼──────────────┤");
        for row in rows {
            println!(
                "│ {:<10.4} │ {:<12} │ {:<12} │ {:<12} │",
                row.k,
                cell(row.expected_min_loss),
                cell(row.cdf),
                cell(row.density),
            );
        }
        println!("└────────────┴──────────────┴──────────────┴──────────────┘");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_is_monotone() {
        let rows = evaluate(&CliConfig::default()).unwrap();
        assert_eq!(rows.len(), 30);
        for pair in rows.windows(2) {
            assert!(pair[1].cdf.unwrap() >= pair[0].cdf.unwrap());
            assert!(pair[1].expected_min_loss.unwrap() >= pair[0].expected_min_loss.unwrap());
        }
        assert!(rows.iter().all(|r| r.density.unwrap() >= 0.0));
    }

    #[test]
    fn test_invalid_beta_leaves_empty_cells() {
        let config = CliConfig {
            beta: 1.5,
            ..Default::default()
        };
        let rows = evaluate(&config).unwrap();
        assert!(rows
            .iter()
            .all(|r| r.cdf.is_none() && r.density.is_none() && r.expected_min_loss.is_none()));
    }
}
