//! Engine configuration from environment variables

use std::env;

/// Configuration for the correlation engine and its runtime
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on retained traces (FIFO eviction past this)
    pub max_traces: usize,

    /// How many slowest traces a statistics query returns
    pub slowest_traces_limit: usize,

    /// Default trailing window for rolling rates (seconds)
    pub rolling_window_secs: u64,

    /// Largest rolling window a query may ask for (seconds); bounds how
    /// much untraced-activity history is kept in memory
    pub max_window_secs: u64,

    /// Channel buffer size for record ingestion (records)
    pub channel_buffer: usize,

    /// Engine summary publish interval in milliseconds
    pub summary_interval_ms: u64,

    /// Static topology seed: edges preloaded before any traffic arrives
    pub seed_edges: Vec<(String, String)>,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `TOPICFLOW_MAX_TRACES` (default: 1000)
    /// - `TOPICFLOW_SLOWEST_TRACES` (default: 5)
    /// - `TOPICFLOW_ROLLING_WINDOW_SECS` (default: 60)
    /// - `TOPICFLOW_MAX_WINDOW_SECS` (default: 900)
    /// - `TOPICFLOW_CHANNEL_BUFFER` (default: 10000)
    /// - `TOPICFLOW_SUMMARY_INTERVAL_MS` (default: 5000)
    /// - `TOPICFLOW_SEED_EDGES` (default: empty; format "src:dst,src:dst")
    pub fn from_env() -> Self {
        Self {
            max_traces: env::var("TOPICFLOW_MAX_TRACES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1_000usize)
                .max(1),

            slowest_traces_limit: env::var("TOPICFLOW_SLOWEST_TRACES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),

            rolling_window_secs: env::var("TOPICFLOW_ROLLING_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),

            max_window_secs: env::var("TOPICFLOW_MAX_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(900),

            channel_buffer: env::var("TOPICFLOW_CHANNEL_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000),

            summary_interval_ms: env::var("TOPICFLOW_SUMMARY_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5_000),

            seed_edges: env::var("TOPICFLOW_SEED_EDGES")
                .map(|raw| parse_seed_edges(&raw))
                .unwrap_or_default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traces: 1_000,
            slowest_traces_limit: 5,
            rolling_window_secs: 60,
            max_window_secs: 900,
            channel_buffer: 10_000,
            summary_interval_ms: 5_000,
            seed_edges: Vec::new(),
        }
    }
}

/// Parse a `"src:dst,src:dst"` seed list; malformed pairs are skipped
fn parse_seed_edges(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (src, dst) = pair.split_once(':')?;
            let (src, dst) = (src.trim(), dst.trim());
            if src.is_empty() || dst.is_empty() {
                None
            } else {
                Some((src.to_string(), dst.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Defaults and custom values exercised in one test: env vars are
        // process-global and parallel tests would race on them

        // Defaults when nothing is set
        env::remove_var("TOPICFLOW_MAX_TRACES");
        env::remove_var("TOPICFLOW_SLOWEST_TRACES");
        env::remove_var("TOPICFLOW_ROLLING_WINDOW_SECS");
        env::remove_var("TOPICFLOW_SEED_EDGES");

        let config = EngineConfig::from_env();
        assert_eq!(config.max_traces, 1_000);
        assert_eq!(config.slowest_traces_limit, 5);
        assert_eq!(config.rolling_window_secs, 60);
        assert_eq!(config.max_window_secs, 900);
        assert_eq!(config.channel_buffer, 10_000);
        assert_eq!(config.summary_interval_ms, 5_000);
        assert!(config.seed_edges.is_empty());

        // Custom values
        env::set_var("TOPICFLOW_MAX_TRACES", "50");
        env::set_var("TOPICFLOW_SLOWEST_TRACES", "3");
        env::set_var("TOPICFLOW_SEED_EDGES", "orders:billing, billing:shipping");

        let config = EngineConfig::from_env();
        assert_eq!(config.max_traces, 50);
        assert_eq!(config.slowest_traces_limit, 3);
        assert_eq!(
            config.seed_edges,
            vec![
                ("orders".to_string(), "billing".to_string()),
                ("billing".to_string(), "shipping".to_string()),
            ]
        );

        // Zero max_traces is clamped, unparseable values fall back
        env::set_var("TOPICFLOW_MAX_TRACES", "0");
        env::set_var("TOPICFLOW_SLOWEST_TRACES", "not-a-number");
        let config = EngineConfig::from_env();
        assert_eq!(config.max_traces, 1);
        assert_eq!(config.slowest_traces_limit, 5);

        // Cleanup
        env::remove_var("TOPICFLOW_MAX_TRACES");
        env::remove_var("TOPICFLOW_SLOWEST_TRACES");
        env::remove_var("TOPICFLOW_SEED_EDGES");
    }

    #[test]
    fn test_parse_seed_edges_skips_malformed() {
        let edges = parse_seed_edges("a:b,malformed,:c,d:,e:f");
        assert_eq!(
            edges,
            vec![
                ("a".to_string(), "b".to_string()),
                ("e".to_string(), "f".to_string()),
            ]
        );
    }
}
