//! Real-time clock drivers

pub mod ds1307;

pub use ds1307::{Ds1307, Ds1307Error, DS1307_ADDRESS};
