#[cfg(test)]
mod tests {
    use pingback::{AppConfig, ConfigError};

    /// Malformed optional values are configuration errors, not silently
    /// replaced defaults. The two cases are probed sequentially within one
    /// test, since the environment is process-wide.
    #[test]
    fn malformed_values_are_fatal() {
        // Given
        unsafe { std::env::set_var(pingback::ENV_HOST, "broker") }

        // When the port is not a number
        unsafe { std::env::set_var(pingback::ENV_PORT, "not-a-port") }
        let result = AppConfig::from_env();

        // Then
        assert!(matches!(result, Err(ConfigError::MalformedPort(_))));

        // When the delay is not a duration
        unsafe {
            std::env::remove_var(pingback::ENV_PORT);
            std::env::set_var(pingback::ENV_WORK_DELAY, "soonish");
        }
        let result = AppConfig::from_env();

        // Then
        assert!(matches!(result, Err(ConfigError::MalformedWorkDelay(_))));
    }
}
