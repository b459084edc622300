//! The environment variables recognized by judge-fixture and its runner

/// The root directory of the file search if no other root is configured
pub const JUDGE_FIXTURE_ROOT: &str = "JUDGE_FIXTURE_ROOT";
/// The log filter of the runner binary in `env_logger` syntax
pub const JUDGE_FIXTURE_LOG: &str = "JUDGE_FIXTURE_LOG";
/// Set to `never` or `always` to control colored output
pub const JUDGE_FIXTURE_COLOR: &str = "JUDGE_FIXTURE_COLOR";

/// Used for colors if [`JUDGE_FIXTURE_COLOR`] is not set
pub const CARGO_TERM_COLOR: &str = "CARGO_TERM_COLOR";
