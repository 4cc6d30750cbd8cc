pub mod bands_gnu;
pub mod dos;
pub mod fermi;
pub mod general;
pub mod pdos;
pub mod source;
