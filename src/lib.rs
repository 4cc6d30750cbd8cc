/*!
Readers and plots for the text output of Quantum ESPRESSO post-processing:
total DOS from `dos.x`, projected DOS from `projwfc.x` and band structures
from `bands.x`.
*/
pub mod bands;
pub mod config;
pub mod dos;
pub mod error;
pub mod parser;
pub mod plot;
pub mod util;

#[cfg(test)]
mod test;

pub use error::{FormatError, QeError};
