#![allow(dead_code)]

pub use installer_shim_test_utils::builders;
pub use installer_shim_test_utils::fake_installer;
pub use installer_shim_test_utils::{init_tracing, wait_for_completion, with_timeout};
