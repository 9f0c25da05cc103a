// Application layer: the concrete provider operations.

pub mod operations;
