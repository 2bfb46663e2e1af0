//! Serve command handler

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server, or only validates the configuration when `dry_run`
    /// is set.
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config).run().await.map_err(Into::into)
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}..{} connections, {}s query timeout",
            self.config.database.min_connections,
            self.config.database.max_connections,
            self.config.database.query_timeout
        );
        println!("✓ Logger level: {}", self.config.logger.level);
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
