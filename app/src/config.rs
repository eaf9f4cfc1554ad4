use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

pub struct Config {
    database_url: String,
    server_addr: SocketAddr,
    db_max_connections: u32,
    body_limit_bytes: u64,
    log_filter: String,
    trace_stdout: bool,
}

impl Config {
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn body_limit_bytes(&self) -> u64 {
        self.body_limit_bytes
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn trace_stdout(&self) -> bool {
        self.trace_stdout
    }
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} has an invalid value: {}", key, raw)),
        Err(_) => default,
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv::dotenv().ok();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let server_addr = var_or("SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)));
    let db_max_connections = var_or("DB_MAX_CONNECTIONS", 10);
    let body_limit_bytes = var_or("BODY_LIMIT_BYTES", 30 * 1024 * 1024);
    let log_filter = var_or("LOG_FILTER", "info".to_owned());
    let trace_stdout = var_or("TRACE_STDOUT", false);

    if db_max_connections == 0 {
        panic!("DB_MAX_CONNECTIONS must be positive");
    }

    Config {
        database_url,
        server_addr,
        db_max_connections,
        body_limit_bytes,
        log_filter,
        trace_stdout,
    }
});
