//! Logging setup utilities for the Fanout relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose spans and events are enabled at the default level.
const WORKSPACE_CRATES: [&str; 2] = ["fanout_server", "fanout_shared"];

/// Build the default filter directive for the given binary and level.
///
/// Binary names use `-` while tracing targets use `_`, so the binary name is
/// normalized before it is used as a target.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, default_log_level))
        .collect();
    directives.push(format!(
        "{}={}",
        binary_name.replace('-', "_"),
        default_log_level
    ));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "fanout-tcp", "fanout-chat")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use fanout_shared::logger::setup_logger;
///
/// setup_logger("fanout-tcp", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_and_binary() {
        // テスト項目: デフォルトのフィルタがワークスペースのクレートとバイナリを含む
        // given (前提条件):
        let binary_name = "fanout-tcp";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            directive,
            "fanout_server=debug,fanout_shared=debug,fanout_tcp=debug"
        );
    }
}
