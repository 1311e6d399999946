pub mod config {
    use gerenciador_core::RecordKind;
    use gerenciador_core::record::{TASK_NEAR_DUE_DAYS, WARRANTY_NEAR_DUE_DAYS};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_task_near_due_days")]
        pub task_near_due_days: i64,
        #[serde(default = "default_warranty_near_due_days")]
        pub warranty_near_due_days: i64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Returns the near-due window configured for the given kind.
        pub fn near_due_window(&self, kind: RecordKind) -> chrono::Duration {
            match kind {
                RecordKind::Task => chrono::Duration::days(self.task_near_due_days),
                RecordKind::Warranty => chrono::Duration::days(self.warranty_near_due_days),
            }
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_task_near_due_days() -> i64 {
        TASK_NEAR_DUE_DAYS
    }

    fn default_warranty_near_due_days() -> i64 {
        WARRANTY_NEAR_DUE_DAYS
    }
}
pub mod entities;
pub mod flash;
pub mod history;
pub mod record;
pub mod web;
