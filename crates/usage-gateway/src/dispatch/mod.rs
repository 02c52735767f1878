//! Request dispatch for the tracking route.

pub mod track;

pub use track::track;
