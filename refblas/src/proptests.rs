//! Property-based tests for the numerical contracts of the kernels.
