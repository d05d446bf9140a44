//! Table rendering for merged aggregation rows
//!
//! Rows are grouped by decomposition value, flattened back into a two-level
//! table and written with fixed-width columns:
//!
//! ```text
//! ROUTE       METRIC                    AVERAGE
//! headrootdir req.timers.getMetadata      33458
//! getrootdir  req.timers.getMetadata      19772
//! putobject   req.timers.getMetadata     135716
//! ```

/// Table shaping and rendering
pub mod table;

pub use table::{ReportOptions, TableEmitter};
