// talos_core/src/lib.rs

// This file defines the public modules of the library.
pub mod cost;
pub mod error;
pub mod messages;
pub mod model;
pub mod prelude;
pub mod types;
