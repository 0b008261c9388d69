//! File formats at the edge of the engine.
//!
//! Two CSV shapes come in:
//!
//! ```text
//! raw composition               partition pages (one block per K)
//! ┌─────────────┬─────┬─────┐   ┌───┬───────┬────────┬─────┬────────────┐
//! │ Sample Name │ 0.5 │ 1.0 │   │ K │ Group │ Sample │ ... │ % explained│ ...
//! ├─────────────┼─────┼─────┤   ├───┼───────┼────────┼─────┼────────────┤
//! │ S1          │ 3.2 │ 1.1 │   │ 2 │ 1     │ S1     │ ... │ 41.250000  │ ...
//! └─────────────┴─────┴─────┘   └───┴───────┴────────┴─────┴────────────┘
//! ```
//!
//! and JSON goes out. Everything here is parsing; no metric is computed.

mod composition;
pub mod json;
mod pages;

pub use composition::{read_composition, read_composition_path};
pub use pages::{read_pages, read_pages_path, Page, PageSet};
