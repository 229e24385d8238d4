//! Workspace tooling package. Hosts the pre-commit hook configuration; the
//! routing library lives in `crates/wheelway-lib`.
