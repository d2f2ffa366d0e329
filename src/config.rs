use std::env;

/// Process-wide configuration, built once at startup and injected into the
/// components that need it. Nothing reads these values from the environment
/// after construction.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: database_url_for_mode(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "9123".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

/// Test runs point at a dedicated database so suites can truncate tables
/// freely; every other mode uses `DATABASE_URL`.
fn database_url_for_mode() -> String {
    match env::var("RUN_MODE").as_deref() {
        Ok("test") => env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set"),
        _ => env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "config-test-secret");
        env::remove_var("RUN_MODE");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.jwt_secret, "config-test-secret");
        assert_eq!(config.server_port, 9123);
        assert_eq!(config.server_host, "127.0.0.1");

        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");

        let config = Config::from_env();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");

        env::set_var("RUN_MODE", "test");
        env::set_var("TEST_DATABASE_URL", "postgres://test-db");

        let config = Config::from_env();
        assert_eq!(config.database_url, "postgres://test-db");

        env::remove_var("RUN_MODE");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
    }
}
