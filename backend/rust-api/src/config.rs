use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" | "in-memory" | "in_memory" => Ok(StoreBackend::Memory),
            other => Err(format!("Unknown store backend: {}", other)),
        }
    }
}

/// Gameplay tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub question_prompt: String,
    /// Client-side countdown per question.
    pub time_limit_seconds: u32,
    pub leaderboard_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            question_prompt: "Bu ürün hangisi?".to_string(),
            time_limit_seconds: 15,
            leaderboard_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub seed_path: Option<String>,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub game: GameConfig,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Root .env first (two levels up), then local .env
        let skip_root_env = env::var("SKIP_ROOT_ENV").is_ok();
        if skip_root_env {
            dotenvy::dotenv().ok();
        } else if dotenvy::from_path("../../.env").is_err() {
            dotenvy::dotenv().ok();
        }

        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // config/*.toml + ENV overrides (prefix: APP_)
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let store_backend = settings
            .get_string("store.backend")
            .or_else(|_| env::var("STORE_BACKEND"))
            .unwrap_or_else(|_| "mongo".to_string())
            .parse::<StoreBackend>()
            .map_err(config::ConfigError::Message)?;

        let mongo_uri = settings
            .get_string("database.mongo_uri")
            .or_else(|_| env::var("MONGO_URI"))
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mongo_database = settings
            .get_string("database.mongo_database")
            .or_else(|_| env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| "fitquiz".to_string());

        let seed_path = settings
            .get_string("store.seed_path")
            .or_else(|_| env::var("SEED_PATH"))
            .ok();

        let jwt_secret = match settings
            .get_string("auth.jwt_secret")
            .or_else(|_| env::var("JWT_SECRET"))
        {
            Ok(secret) => secret,
            Err(_) if env == "prod" => {
                return Err(config::ConfigError::Message(
                    "JWT_SECRET must be set in production".to_string(),
                ));
            }
            Err(_) => {
                tracing::warn!("Using default JWT_SECRET (dev mode only!)");
                "dev-secret-only-for-local-testing".to_string()
            }
        };

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        let defaults = GameConfig::default();
        let game = GameConfig {
            question_prompt: settings
                .get_string("game.question_prompt")
                .unwrap_or(defaults.question_prompt),
            time_limit_seconds: settings
                .get_int("game.time_limit_seconds")
                .ok()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.time_limit_seconds),
            leaderboard_limit: settings
                .get_int("game.leaderboard_limit")
                .ok()
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.leaderboard_limit),
        };

        Ok(Config {
            store_backend,
            mongo_uri,
            mongo_database,
            seed_path,
            jwt_secret,
            bind_addr,
            game,
        })
    }

    /// In-memory configuration with fixed secrets, for tests and local demos.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            mongo_uri: String::new(),
            mongo_database: String::new(),
            seed_path: None,
            jwt_secret: jwt_secret.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            game: GameConfig::default(),
        }
    }
}
