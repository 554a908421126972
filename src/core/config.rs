use std::env;

use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://frontend-alb-1505177366.us-east-1.elb.amazonaws.com",
    "http://localhost:5173",
    "http://localhost:3000",
];

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("SECRET_KEY must be set when MINIMOODLE_ENV is production")]
    MissingSecret,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    server: ServerSettings,
    api: ApiSettings,
    security: SecuritySettings,
    cors: CorsSettings,
    dynamodb: DynamoDbSettings,
    s3: S3Settings,
    uploads: UploadSettings,
    telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    pub(crate) host: String,
    pub(crate) port: u16,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiSettings {
    pub(crate) project_name: String,
    pub(crate) version: String,
    pub(crate) api_v1_str: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SecuritySettings {
    pub(crate) secret_key: String,
    pub(crate) access_token_expire_minutes: u64,
    pub(crate) algorithm: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CorsSettings {
    pub(crate) origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct DynamoDbSettings {
    pub(crate) region: String,
    pub(crate) endpoint: Option<String>,
    pub(crate) users_table: String,
    pub(crate) tasks_table: String,
    pub(crate) submissions_table: String,
    pub(crate) enrollments_table: String,
}

#[derive(Debug, Clone)]
pub(crate) struct S3Settings {
    pub(crate) endpoint: Option<String>,
    pub(crate) access_key: String,
    pub(crate) secret_key: String,
    pub(crate) bucket: String,
    pub(crate) region: String,
}

#[derive(Debug, Clone)]
pub(crate) struct UploadSettings {
    pub(crate) presigned_url_expire_seconds: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
    pub(crate) prometheus_enabled: bool,
}

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("MINIMOODLE_HOST", "0.0.0.0");
        let port = parse_u16("MINIMOODLE_PORT", env_or_default("MINIMOODLE_PORT", "8000"))?;

        let environment = env_or_default("MINIMOODLE_ENV", "development");
        let secret_key = env_or_default("SECRET_KEY", "");
        if secret_key.is_empty() && environment == "production" {
            return Err(ConfigError::MissingSecret);
        }
        let secret_key =
            if secret_key.is_empty() { "dev-only-secret".to_string() } else { secret_key };

        let access_token_expire_minutes = parse_u64(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            env_or_default("ACCESS_TOKEN_EXPIRE_MINUTES", "60"),
        )?;
        let algorithm = env_or_default("ALGORITHM", "HS256");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"));

        let aws_region = env_or_default("AWS_REGION", "us-east-1");
        let dynamodb = DynamoDbSettings {
            region: aws_region.clone(),
            endpoint: env_optional("DYNAMODB_ENDPOINT"),
            users_table: env_or_default("DYNAMODB_TABLE_USERS", "minimoodle-users"),
            tasks_table: env_or_default("DYNAMODB_TABLE_TASKS", "minimoodle-tasks"),
            submissions_table: env_or_default(
                "DYNAMODB_TABLE_SUBMISSIONS",
                "minimoodle-submissions",
            ),
            enrollments_table: env_or_default(
                "DYNAMODB_TABLE_ENROLLMENTS",
                "minimoodle-enrollments",
            ),
        };

        let s3 = S3Settings {
            endpoint: env_optional("S3_ENDPOINT"),
            access_key: env_or_default("S3_ACCESS_KEY", ""),
            secret_key: env_or_default("S3_SECRET_KEY", ""),
            bucket: env_or_default("S3_BUCKET_TASKS", "minimoodle-task-files"),
            region: env_or_default("S3_REGION", &aws_region),
        };

        let presigned_url_expire_seconds = parse_u64(
            "PRESIGNED_URL_EXPIRE_SECONDS",
            env_or_default("PRESIGNED_URL_EXPIRE_SECONDS", "3600"),
        )?;

        let log_level = env_or_default("MINIMOODLE_LOG_LEVEL", "info");
        let json = env_optional("MINIMOODLE_LOG_JSON").map(|v| parse_bool(&v)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|v| parse_bool(&v)).unwrap_or(false);

        Ok(Self {
            server: ServerSettings { host, port },
            api: ApiSettings {
                project_name: env_or_default("PROJECT_NAME", "Minimoodle API"),
                version: env_or_default("VERSION", env!("CARGO_PKG_VERSION")),
                api_v1_str: env_or_default("API_V1_STR", "/api/v1"),
            },
            security: SecuritySettings { secret_key, access_token_expire_minutes, algorithm },
            cors: CorsSettings { origins: cors_origins },
            dynamodb,
            s3,
            uploads: UploadSettings { presigned_url_expire_seconds },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        })
    }

    pub(crate) fn server(&self) -> &ServerSettings {
        &self.server
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn security(&self) -> &SecuritySettings {
        &self.security
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn dynamodb(&self) -> &DynamoDbSettings {
        &self.dynamodb
    }

    pub(crate) fn s3(&self) -> &S3Settings {
        &self.s3
    }

    pub(crate) fn uploads(&self) -> &UploadSettings {
        &self.uploads
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_u16(field: &'static str, value: String) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

fn parse_cors_origins(value: Option<String>) -> Vec<String> {
    let items: Vec<String> = value
        .map(|raw| {
            raw.split(',')
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        DEFAULT_CORS_ORIGINS.iter().map(|item| item.to_string()).collect()
    } else {
        items
    }
}
