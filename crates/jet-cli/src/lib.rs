//! Library surface of the transpiler CLI (logging bootstrap).

pub mod logging;
