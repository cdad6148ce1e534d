#[cfg(test)]
mod tests {
    use pingback::AppConfig;

    /// The seed-message flag recognizes `"true"` case-insensitively; any
    /// other value, or absence, leaves it off. The casings are probed
    /// sequentially within one test, since the environment is process-wide.
    #[test]
    fn seed_flag_is_case_insensitive() {
        // Given
        unsafe { std::env::set_var(pingback::ENV_HOST, "broker") }

        for (raw, expected) in [
            ("true", true),
            ("TRUE", true),
            ("True", true),
            ("false", false),
            ("yes", false),
            ("1", false),
            ("", false),
        ] {
            // When
            unsafe { std::env::set_var(pingback::ENV_START_WITH_MESSAGE, raw) }
            let config = AppConfig::from_env().unwrap();

            // Then
            assert_eq!(
                config.start_with_message(),
                expected,
                "value '{}' should parse as {}",
                raw,
                expected,
            );
        }
    }
}
