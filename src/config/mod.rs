use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HS256 signing secret for bearer tokens.
    pub secret_key: String,
    /// Argon2 memory cost in KiB. Reduced under Test so suites stay fast.
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    pub hash_iterations: u32,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database name the Test environment swaps into the connection URL.
    pub name: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test_profile(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.port = v.parse().unwrap_or(self.port);
        }
        if let Ok(v) = env::var("HASH_MEMORY_KIB") {
            self.security.hash_memory_kib = v.parse().unwrap_or(self.security.hash_memory_kib);
        }
        if let Ok(v) = env::var("HASH_ITERATIONS") {
            self.security.hash_iterations = v.parse().unwrap_or(self.security.hash_iterations);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            port: 3001,
            security: SecurityConfig {
                secret_key: "secret-dev".to_string(),
                // Argon2id defaults
                hash_memory_kib: 19_456,
                hash_iterations: 2,
            },
            database: DatabaseConfig {
                name: "tea_time".to_string(),
                max_connections: 10,
            },
        }
    }

    fn test_profile() -> Self {
        Self {
            environment: Environment::Test,
            port: 3001,
            security: SecurityConfig {
                secret_key: "secret-dev".to_string(),
                // Minimum-strength params; the suite registers users on every
                // run and hashing speed matters more than resistance there.
                hash_memory_kib: 8,
                hash_iterations: 1,
            },
            database: DatabaseConfig {
                name: "tea_time_test".to_string(),
                max_connections: 5,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            port: 3001,
            security: SecurityConfig {
                secret_key: String::new(),
                hash_memory_kib: 19_456,
                hash_iterations: 2,
            },
            database: DatabaseConfig {
                name: "tea_time".to_string(),
                max_connections: 20,
            },
        }
    }

    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    /// Resolve the connection URL. `DATABASE_URL` (or a localhost default) is
    /// the base; under Test the database name in its path is always swapped
    /// for the test database so suites can never touch development data.
    pub fn database_url(&self) -> Result<String, url::ParseError> {
        let base = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/tea_time".to_string());

        if self.environment != Environment::Test {
            return Ok(base);
        }

        let mut url = url::Url::parse(&base)?;
        url.set_path(&format!("/{}", self.database.name));
        Ok(url.to_string())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
