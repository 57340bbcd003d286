use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Espera máxima del loop sobre la cola antes de reintentar, en segundos.
    /// Es solo una salvaguarda de liveness: al vencer, el loop vuelve a esperar.
    pub queue_wait_secs: u64,

    /// Pausa entre reintentos cuando el sink no está conectado, en segundos
    pub reconnect_retry_secs: u64,
}

impl PlayerConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            queue_wait_secs: std::env::var("QUEUE_WAIT_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()?,
            reconnect_retry_secs: std::env::var("RECONNECT_RETRY_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates configuration values for correctness.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: All values are valid
    /// - `Err(anyhow::Error)`: Invalid configuration detected
    pub fn validate(&self) -> Result<()> {
        if self.queue_wait_secs == 0 {
            anyhow::bail!("Queue wait must be greater than 0 seconds");
        }

        if self.reconnect_retry_secs == 0 {
            anyhow::bail!("Reconnect retry must be greater than 0 seconds");
        }

        Ok(())
    }

    pub fn queue_wait(&self) -> Duration {
        Duration::from_secs(self.queue_wait_secs)
    }

    pub fn reconnect_retry(&self) -> Duration {
        Duration::from_secs(self.reconnect_retry_secs)
    }
}

/// Default configuration values.
///
/// Used as fallbacks when environment variables are not provided.
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            queue_wait_secs: 300, // 5 minutos entre housekeeping del loop
            reconnect_retry_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.queue_wait(), Duration::from_secs(300));
        assert_eq!(config.reconnect_retry(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let config = PlayerConfig {
            queue_wait_secs: 0,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = PlayerConfig {
            reconnect_retry_secs: 0,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
