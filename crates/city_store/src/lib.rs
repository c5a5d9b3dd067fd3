//! In-memory city store with CSV persistence
//!
//! The store keeps cities in file order and answers every query with a linear
//! scan. The codec reads and writes the six fixed columns without a header.

pub mod codec;
pub mod store;

pub use codec::{read_cities, write_cities, CSV_COLUMNS};
pub use store::CityStore;
