/// Configuration constants for the administrative API
pub mod api {
    use std::time::Duration;

    /// Credential exchange endpoint
    pub const LOGIN: &str = "login";

    /// Token liveness endpoint
    pub const TOKEN_INFO: &str = "token_info";

    /// TCP connect timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Whole-request timeout
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Configuration constants for named contexts
pub mod context {
    /// Config directory name (relative to HOME)
    pub const DIR_NAME: &str = ".nsctl";

    /// Config file name inside the config directory
    pub const FILE_NAME: &str = "config.yml";

    /// Environment variable overriding the config directory
    pub const DIR_ENV_VAR: &str = "NSCTL_CONFIG_DIR";

    /// Environment variable overriding the active context for one invocation
    pub const ENV_VAR: &str = "NSCTL_CONTEXT";

    /// Sub-directory holding one directory per context
    pub const CONTEXTS_DIR: &str = "contexts";
}

/// Configuration constants for the session cache
pub mod session {
    /// Cached bearer token file name (inside the context directory)
    pub const CACHE_FILE: &str = "jwt";

    /// Scheme prefix of the Authorization header value
    pub const BEARER_PREFIX: &str = "Bearer ";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "warn";

    /// Username sent on login when the context does not name one
    pub const USERNAME: &str = "token";
}
