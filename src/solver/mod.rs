//! Numerical solvers for the linear models
//!
//! - [`lbfgs`]: quasi-Newton minimizer for logistic regression
//! - [`dual_cd`]: dual coordinate descent for the squared-hinge linear SVM,
//!   with the shrinking heuristic in [`shrinking`]

pub mod dual_cd;
pub mod lbfgs;
pub mod shrinking;

pub use self::dual_cd::*;
pub use self::lbfgs::*;
pub use self::shrinking::ActiveSet;
