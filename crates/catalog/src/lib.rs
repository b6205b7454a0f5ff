//! # Catalog Crate
//!
//! Static content for the cultural zodiac: the ordered sign catalog and the
//! demo table of pre-baked readings.
//!
//! ## Main Components
//!
//! - **types**: wire-facing domain types (SignRecord, TasteInput, ResultRecord)
//! - **catalog**: load, validate and query the sign catalog
//! - **demo**: canonical demo keys and the exact-match demo table
//! - **error**: error types for loading
//!
//! ## Example Usage
//!
//! ```
//! use catalog::{Catalog, DemoTable, TasteInput};
//!
//! let catalog = Catalog::embedded()?;
//! let demos = DemoTable::embedded(&catalog)?;
//!
//! let inputs = vec![
//!     TasteInput::new("Street Fighter II", "game"),
//!     TasteInput::new("Blade Runner", "movie"),
//! ];
//! let reading = demos.lookup(&inputs).expect("golden path");
//! assert_eq!(reading.sign.name, "Abandoned Arcade Heartthrob");
//! # Ok::<(), catalog::CatalogError>(())
//! ```

pub mod catalog;
pub mod demo;
pub mod error;
pub mod types;

pub use catalog::Catalog;
pub use demo::{DemoTable, demo_key, demo_key_for, normalize_name};
pub use error::{CatalogError, Result};
pub use types::{ResultRecord, SignRecord, TasteInput, TasteTwin};
