pub mod income;
pub mod regime;
pub mod slab;

pub use income::{compare, Change, Comparison, TaxInput, TaxResult};
pub use regime::FiscalYear;
