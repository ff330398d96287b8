// src/exec/mod.rs

//! Installer process layer.
//!
//! - [`backend`] provides the `InstallerBackend` / `InstallerProcess` traits
//!   the runner is written against, which tests replace with a fake.
//! - [`script`] is the production backend: it launches the installer
//!   executable with `tokio::process::Command`, writes the answers to its
//!   stdin and merges stdout/stderr into one line stream.

pub mod backend;
pub mod script;

pub use backend::{answers_payload, InstallerBackend, InstallerProcess};
pub use script::ScriptInstaller;
