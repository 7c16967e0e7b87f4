//! Logging setup for the Merlinfest binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter enables the workspace crates and the calling binary at
/// `default_log_level`. `RUST_LOG` overrides it entirely when set.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "merlinfest-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use merlinfest_shared::logger::setup_logger;
///
/// setup_logger("merlinfest-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default filter directive for the workspace crates and the binary.
fn default_filter(binary_name: &str, level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    format!(
        "merlinfest_shared={level},merlinfest_server={level},merlinfest_client={level},{binary_target}={level},tower_http={level}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_workspace_crates_and_binary() {
        // テスト項目: デフォルトフィルタがワークスペースのクレートとバイナリを含む
        // given (前提条件):
        let binary_name = "merlinfest-server";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果):
        assert!(filter.contains("merlinfest_server=info"));
        assert!(filter.contains("merlinfest_client=info"));
        assert!(filter.contains("merlinfest_shared=info"));
        assert!(filter.contains("merlinfest_server=info,merlinfest_client"));
        assert!(!filter.contains("merlinfest-server"));
    }
}
