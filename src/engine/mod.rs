//! The core engines: visibility filtering, force re-layout, hover focus,
//! and grouping state. Everything here operates on the shared `Graph`
//! in-process; only the layout engine writes node positions.

pub mod filter;
pub mod focus;
pub mod grouping;
pub mod layout;
