/// Band-structure handling on top of the `.bands.gnu` reader
pub mod analysis;
pub mod segment;
