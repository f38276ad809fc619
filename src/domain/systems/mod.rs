// Per-tick simulation systems.

pub mod balloons;
pub mod pointer;
