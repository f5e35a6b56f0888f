//! Process configuration, read once at startup.

/// Deployment environment. Anything other than `production` counts as a
/// development environment and enables the payment-skip fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub environment: Environment,
}

impl AppConfig {
    /// Read configuration from the environment (`JWT_SECRET`, `HURE_ENV`).
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });
        let environment = Environment::from_name(
            &std::env::var("HURE_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        Self {
            jwt_secret,
            environment,
        }
    }

    pub fn skip_payment_enabled(&self) -> bool {
        self.environment != Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_production_disables_the_skip_path() {
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("PRODUCTION"), Environment::Production);
        assert_eq!(Environment::from_name("staging"), Environment::Development);
        assert_eq!(Environment::from_name(""), Environment::Development);

        let config = AppConfig {
            jwt_secret: "s".into(),
            environment: Environment::Production,
        };
        assert!(!config.skip_payment_enabled());
    }
}
