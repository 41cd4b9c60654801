//! egui rendering.  Every function here reads `AppState` and mutates it
//! only through its filter and selection methods.

pub mod panels;
pub mod plot;
pub mod tables;
