//! # LHP Models (L2: Business Logic)
//!
//! Synthetic CDO tranche pricing with the one-factor Gaussian copula in the
//! large homogeneous portfolio limit.
//!
//! This crate provides:
//! - Portfolio aggregation of per-name survival probabilities and recoveries
//! - Expected tranche loss `E[min(L, k)]` and tranche survival probabilities
//! - Portfolio loss CDF and loss densities (finite difference, closed form,
//!   base correlation skew)
//! - Base correlation curves and parallel batch evaluation
//!
//! ## Example
//!
//! ```
//! use lhp_models::copula::{exp_min_lk, tr_surv_prob_lhp};
//!
//! let survs = vec![0.98; 125];
//! let recs = vec![0.4; 125];
//!
//! let equity = tr_surv_prob_lhp(0.0, 0.03, 125, &survs, &recs, 0.3).unwrap();
//! let el = exp_min_lk(0.03, 0.02, 0.4, 1.0, 0.3).value().unwrap();
//! assert!((equity - (1.0 - el / 0.03)).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Rayon-backed [`copula::TrancheBatch`]
//! - `serde`: Serialisation of result and portfolio types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod copula;
