// Library surface for the session core, its collaborator seams, and the
// headless runtime used by the cli binary and integration tests.
pub mod app_dirs;
pub mod config;
pub mod record;
pub mod review;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod store;
pub mod typing_policy;
pub mod word;
