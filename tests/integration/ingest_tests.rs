//! Integration tests for ingestion runs
//!
//! These tests use wiremock to stand in for the BCRA and Prefectura pages
//! and a temporary directory as the data store.

use indicadores::config::{FetchConfig, SourcesConfig};
use indicadores::indices::IndexKind;
use indicadores::source::{build_http_client, DocumentSource, FetchError, HttpFetcher, RetryPolicy};
use indicadores::{Category, DailyObservation, DataStore, IndicadoresError, Ingestor, RiversReport, StateTag};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BCRA_PAGE: &str = r#"<html><body>
<table>
  <tr><td>Descripción</td><td>Fecha</td><td>Valor</td></tr>
  <tr><td>Tipo de Cambio Minorista</td><td>05/01/2024</td><td>850,50</td></tr>
  <tr><td>Unidad de Valor Adquisitivo (UVA) (en pesos -con dos decimales-)</td><td>05/01/2024</td><td>1.234,56</td></tr>
  <tr><td>Unidad de Vivienda (UVI) (en pesos -con dos decimales-)</td><td>05/01/2024</td><td>1.012,34</td></tr>
</table>
</body></html>"#;

const RIOS_PAGE: &str = r#"<html><body>
<table>
  <thead><tr><th>Puerto</th><th>Río</th><th>Altura</th><th>Var.</th><th>Per.</th><th>Fecha</th><th>Estado</th></tr></thead>
  <tbody>
    <tr><th>ROSARIO</th><td>PARANA</td><td>3,25</td><td>-0,04</td><td>24 HS</td><td>25/JAN/26 - 0900</td><td>BAJA</td></tr>
    <tr><th>SANTA FE</th><td>PARANA</td><td>S/E</td><td>S/E</td><td>24 HS</td><td>25/JAN/26 - 0900</td><td>S/E</td></tr>
    <tr><th>PARANA</th><td>PARANA</td><td>S/E</td><td>S/E</td><td>24 HS</td><td>25/JAN/26 - 0900</td><td>S/E</td></tr>
    <tr><th>CONCORDIA</th><td>URUGUAY</td><td>5,10</td><td>0,20</td><td>24 HS</td><td>25/JAN/26 - 0800</td><td>CRECE</td></tr>
  </tbody>
</table>
</body></html>"#;

/// Fetcher with millisecond backoff so retry tests stay fast
fn test_fetcher(max_retries: u32) -> HttpFetcher {
    let client = build_http_client(&FetchConfig::default(), None).expect("client builds");
    HttpFetcher::new(client, RetryPolicy::new(max_retries, Duration::from_millis(5)))
}

fn test_sources(base_url: &str) -> SourcesConfig {
    SourcesConfig {
        rios_url: format!("{}/alturas", base_url),
        bcra_url: format!("{}/indicadores", base_url),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_retries_transient_status_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(html(BCRA_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(3);
    let body = fetcher
        .fetch_document(&format!("{}/indicadores", mock_server.uri()))
        .await
        .expect("third attempt succeeds");

    assert!(body.contains("Unidad de Valor Adquisitivo"));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(3);
    let result = fetcher
        .fetch_document(&format!("{}/indicadores", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alturas"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(2);
    let result = fetcher
        .fetch_document(&format!("{}/alturas", mock_server.uri()))
        .await;

    match result {
        Err(FetchError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeouts_are_retried_until_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(html(BCRA_PAGE).set_delay(Duration::from_millis(500)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .expect("client builds");
    let fetcher = HttpFetcher::new(client, RetryPolicy::new(2, Duration::from_millis(5)));
    let result = fetcher
        .fetch_document(&format!("{}/indicadores", mock_server.uri()))
        .await;

    match result {
        Err(FetchError::RetriesExhausted { attempts, last_failure, .. }) => {
            assert_eq!(attempts, 3);
            assert!(last_failure.contains("timeout"), "last failure: {}", last_failure);
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_fails_without_retry() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let fetcher = test_fetcher(3);
    let result = fetcher
        .fetch_document(&format!("http://127.0.0.1:{}/indicadores", port))
        .await;

    assert!(
        matches!(result, Err(FetchError::Connection { .. })),
        "expected Connection, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_index_ingestion_is_idempotent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(html(BCRA_PAGE))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = DataStore::new(dir.path());
    store
        .write_snapshot(
            Category::Uva,
            "2024-01-04",
            &[DailyObservation::new("04/01/2024", 1230.0)],
        )
        .unwrap();

    let ingestor = Ingestor::new(test_fetcher(1), store.clone(), test_sources(&mock_server.uri()));

    let first = ingestor.index(IndexKind::Uva).await.unwrap();
    assert_eq!(
        first.history_file,
        Some(dir.path().join("uva").join("2024-01-05.json"))
    );
    assert_eq!(first.records, 2);

    let second = ingestor.index(IndexKind::Uva).await.unwrap();
    assert_eq!(second.history_file, None);
    assert_eq!(second.records, 2);
    assert_eq!(store.history_files(Category::Uva).len(), 2);

    let latest: DailyObservation = store.read_latest(Category::Uva).unwrap().unwrap();
    assert_eq!(latest.fecha, "05/01/2024");
    assert_eq!(latest.valor.as_f64(), Some(1234.56));
    assert_eq!(
        latest.descripcion.as_deref(),
        Some("Unidad de Valor Adquisitivo (UVA)")
    );
}

#[tokio::test]
async fn test_uvi_row_selected() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(html(BCRA_PAGE))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = DataStore::new(dir.path());
    let ingestor = Ingestor::new(test_fetcher(1), store.clone(), test_sources(&mock_server.uri()));

    let report = ingestor.index(IndexKind::Uvi).await.unwrap();
    assert_eq!(report.category, Category::Uvi);
    assert_eq!(report.records, 1);

    let latest: DailyObservation = store.read_latest(Category::Uvi).unwrap().unwrap();
    assert_eq!(latest.valor.as_f64(), Some(1012.34));
}

#[tokio::test]
async fn test_rivers_ingestion_writes_report() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alturas"))
        .respond_with(html(RIOS_PAGE))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = DataStore::new(dir.path());
    let ingestor = Ingestor::new(test_fetcher(1), store.clone(), test_sources(&mock_server.uri()));

    let report = ingestor.rivers().await.unwrap();
    assert_eq!(report.records, 4);
    assert!(report.history_file.unwrap().is_file());

    let latest: RiversReport = store.read_latest(Category::Rios).unwrap().unwrap();
    assert_eq!(latest.source, "prefectura_naval_argentina");
    assert_eq!(latest.rivers.len(), 2);

    // two of three Paraná stations without state force the override
    let parana = latest.river("Paraná").unwrap();
    assert_eq!(parana.general_state, StateTag::SinEstado);
    assert_eq!(parana.summary.sin_estado, 2);
    assert_eq!(parana.summary.max_height_m, Some(3.25));

    let uruguay = latest.river("uruguay").unwrap();
    assert_eq!(uruguay.general_state, StateTag::Crece);
}

#[tokio::test]
async fn test_missing_table_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alturas"))
        .respond_with(html("<html><body><p>Sitio en mantenimiento</p></body></html>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let store = DataStore::new(dir.path());
    let ingestor = Ingestor::new(test_fetcher(1), store.clone(), test_sources(&mock_server.uri()));

    let result = ingestor.rivers().await;
    assert!(matches!(result, Err(IndicadoresError::TableNotFound { .. })));
    assert!(!store.latest_path(Category::Rios).exists());
}

#[tokio::test]
async fn test_unknown_indicator_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indicadores"))
        .respond_with(html(
            "<table><tr><td>Tasa BADLAR</td><td>05/01/2024</td><td>110,5</td></tr></table>",
        ))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let ingestor = Ingestor::new(
        test_fetcher(1),
        DataStore::new(dir.path()),
        test_sources(&mock_server.uri()),
    );

    let result = ingestor.index(IndexKind::Uva).await;
    assert!(matches!(
        result,
        Err(IndicadoresError::IndicatorNotFound { .. })
    ));
}
