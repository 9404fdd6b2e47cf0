//! Data loading: CSV splits and the label decoder

pub mod csv;
pub mod labels;

pub use self::csv::*;
pub use self::labels::*;
