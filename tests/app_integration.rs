use goldrate::core::config::AppConfig;
use goldrate::core::transform::{DEFAULT_MARKUP, price_per_gram};
use goldrate::core::{QuoteSource, RateError, RateSettings};
use goldrate::{AppCommand, build_rate_cache};
use std::fs;
use tempfile::TempDir;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_goldapi(server: &MockServer, currency: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/XAU/{currency}")))
            .and(header("x-access-token", "integration-token"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
            providers:
              goldapi:
                base_url: {}
              metalpriceapi:
                base_url: {}
            request_timeout_secs: 2
            data_path: {}
        "#,
            base_url,
            base_url,
            dir.join("data").display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

fn settings(currency: &str) -> RateSettings {
    RateSettings::new("goldapi", "integration-token", currency)
}

#[test_log::test(tokio::test)]
async fn test_create_then_read_serves_from_database() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_goldapi(&server, "INR", 200, r#"{"price": 2500.0, "currency": "INR"}"#)
        .await;

    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &server.uri());
    let config = AppConfig::load_from_path(&config_path).unwrap();
    let cache = build_rate_cache(&config).unwrap();

    let created = cache.create(settings("inr")).await.unwrap();
    info!(?created, "Created gold rate");
    assert_eq!(created.quote, price_per_gram(2500.0, DEFAULT_MARKUP).unwrap());
    assert_eq!(created.base_currency, "INR");

    let read = cache.read().await.unwrap();
    assert_eq!(read.source, QuoteSource::Cache);
    assert_eq!(read.source.label(), "Database");
    assert_eq!(read.quote, created.quote);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_provider_outage_serves_stored_rate() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_goldapi(&server, "INR", 200, r#"{"price": 2000.0}"#).await;

    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &server.uri());
    let config = AppConfig::load_from_path(&config_path).unwrap();
    let cache = build_rate_cache(&config).unwrap();

    let created = cache.create(settings("INR")).await.unwrap();

    server.reset().await;
    test_utils::mount_goldapi(&server, "INR", 503, "upstream down").await;

    let refreshed = cache.refresh().await.unwrap();
    assert_eq!(refreshed.source, QuoteSource::ApiFailedServingCache);
    assert_eq!(refreshed.quote, created.quote);
    assert_eq!(refreshed.refreshed_at, created.refreshed_at);
    assert!(refreshed.warning.unwrap().contains("503"));

    let stored = cache.cached().await.unwrap();
    assert_eq!(stored.quote, created.quote);
}

#[test_log::test(tokio::test)]
async fn test_failed_create_leaves_nothing_behind() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_goldapi(&server, "INR", 401, r#"{"error": "Invalid API Key"}"#).await;

    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &server.uri());
    let config = AppConfig::load_from_path(&config_path).unwrap();
    let cache = build_rate_cache(&config).unwrap();

    let err = cache.create(settings("INR")).await.unwrap_err();
    assert!(matches!(err, RateError::RefreshFailed(_)));
    assert!(matches!(
        cache.cached().await.unwrap_err(),
        RateError::NotConfigured
    ));
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let server = wiremock::MockServer::start().await;
    test_utils::mount_goldapi(&server, "INR", 200, r#"{"price": 2500.0}"#).await;
    test_utils::mount_goldapi(&server, "USD", 200, r#"{"price": 2950.5}"#).await;

    let dir = TempDir::new().unwrap();
    let config_path = test_utils::write_config(dir.path(), &server.uri());
    let config_path = config_path.to_str().unwrap();

    let steps = [
        AppCommand::Create(settings("INR")),
        AppCommand::Show { cached: false },
        AppCommand::Show { cached: true },
        AppCommand::Update(settings("USD")),
        AppCommand::Refresh,
    ];
    for step in steps {
        let result = goldrate::run_command(step.clone(), Some(config_path), true).await;
        assert!(
            result.is_ok(),
            "Step {step:?} failed with: {:?}",
            result.err()
        );
    }

    // Create, update and refresh hit the provider; the reads do not
    assert_eq!(server.received_requests().await.unwrap().len(), 3);

    // A second create is rejected
    let result = goldrate::run_command(
        AppCommand::Create(settings("INR")),
        Some(config_path),
        false,
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("already exist")
    );
    assert!(fs::metadata(dir.path().join("data").join("store")).is_ok());
}
