//! Crossover detection over annotated price series

pub mod crossover;

pub use crossover::{CrossDirection, CrossRegister, CrossoverScanner, CrossoverState};
