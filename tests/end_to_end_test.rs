use async_trait::async_trait;
use ruprobe::http::HttpExecutor;
use ruprobe::notify::Notifier;
use ruprobe::parser::HttpFileParser;
use ruprobe::runner::{AlertEngine, Delivery, Verdict};
use ruprobe::status::StatusStore;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 记录所有告警消息的通知通道
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipients: &[String], message: &str) -> anyhow::Result<()> {
        assert!(!recipients.is_empty());
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }

    fn channel_type(&self) -> &str {
        "recording"
    }
}

fn engine(notifier: Arc<RecordingNotifier>) -> AlertEngine {
    AlertEngine::new(Arc::new(HttpExecutor::new().unwrap()))
        .with_notifier(notifier, vec!["ops@example.com".to_string()])
}

/// 测试完整流程：解析 → 执行 → 写入状态文件
#[tokio::test]
async fn test_check_alerts_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let http_file = temp_dir.path().join("checks.http");
    let status_file = temp_dir.path().join("checks.http.json");

    let content = format!(
        r#"
@base = {}
### body=OK
GET {{{{base}}}}/health

###
GET {{{{base}}}}/broken
"#,
        mock_server.uri()
    );
    fs::write(&http_file, content).unwrap();

    let summary = ruprobe::check_alerts(&http_file, &status_file).await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.up, 1);
    assert_eq!(summary.down, 1);
    assert_eq!(summary.transitions, 1);
    // 没有 smtp 配置，只记录状态不发送
    assert_eq!(summary.results[1].delivery, Delivery::Disabled);

    // 首次 up 不写入，首次 down 写入
    let saved = fs::read_to_string(&status_file).unwrap();
    assert_eq!(saved, r#"{"1":false}"#);
}

/// 测试状态文件为空时不写文件
#[tokio::test]
async fn test_check_alerts_all_up_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let http_file = temp_dir.path().join("checks.http");
    let status_file = temp_dir.path().join("checks.http.json");
    fs::write(&http_file, format!("###\nGET {}/\n", mock_server.uri())).unwrap();

    let summary = ruprobe::check_alerts(&http_file, &status_file).await.unwrap();
    assert_eq!(summary.up, 1);
    assert!(!status_file.exists());
}

/// 测试损坏的状态文件被当作空状态
#[tokio::test]
async fn test_check_alerts_with_corrupt_status_file() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let http_file = temp_dir.path().join("checks.http");
    let status_file = temp_dir.path().join("status.json");
    fs::write(&http_file, format!("###\nGET {}/\n", mock_server.uri())).unwrap();
    fs::write(&status_file, "{{{ garbage").unwrap();

    let summary = ruprobe::check_alerts(&http_file, &status_file).await.unwrap();
    assert_eq!(summary.transitions, 1);
    assert_eq!(fs::read_to_string(&status_file).unwrap(), r#"{"0":false}"#);
}

/// 测试文档读取失败是致命错误
#[tokio::test]
async fn test_check_alerts_missing_document() {
    let temp_dir = TempDir::new().unwrap();
    let result = ruprobe::check_alerts(
        temp_dir.path().join("missing.http"),
        temp_dir.path().join("missing.http.json"),
    )
    .await;
    assert!(result.is_err());
}

/// 测试连续两次运行只告警一次
#[tokio::test]
async fn test_repeated_runs_alert_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let content = format!(
        "###\nGET {uri}/down\n###\nGET {uri}/up\n",
        uri = mock_server.uri()
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(notifier.clone());

    let doc = HttpFileParser::parse_content(&content);
    let (store, first) = engine.run(doc.requests, StatusStore::new()).await;
    assert_eq!(first.transitions, 1);
    assert_eq!(notifier.messages().len(), 1);

    let doc = HttpFileParser::parse_content(&content);
    let (store, second) = engine.run(doc.requests, store).await;
    assert_eq!(second.transitions, 0);
    assert_eq!(notifier.messages().len(), 1);
    assert_eq!(store.get(0), Some(false));
    assert_eq!(store.get(1), None);
}

/// 测试 up → down → up 的完整告警序列
#[tokio::test]
async fn test_recovery_sequence() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ready"))
        .mount(&mock_server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(notifier.clone());
    let url = format!("{}/status", mock_server.uri());

    let mut store = StatusStore::new();
    store.set(0, true);

    // 期望的 body 不匹配 → down
    let doc = HttpFileParser::parse_content(&format!("### body=healthy\nGET {}\n", url));
    let (store, summary) = engine.run(doc.requests, store).await;
    assert_eq!(summary.results[0].verdict, Verdict::Down);
    assert_eq!(store.get(0), Some(false));

    // 期望改为 ready → up
    let doc = HttpFileParser::parse_content(&format!("### body=ready\nGET {}\n", url));
    let (store, summary) = engine.run(doc.requests, store).await;
    assert_eq!(summary.results[0].verdict, Verdict::Up);
    assert_eq!(store.get(0), Some(true));

    assert_eq!(
        notifier.messages(),
        vec![format!("GET {} is down", url), format!("GET {} is up", url)]
    );
}

/// 测试 header 和 body 被发送
#[tokio::test]
async fn test_request_headers_and_body_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(r#"{"user": "monitor"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string("token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let content = format!(
        r#"
### status=201&body=token
POST {}/api/login
Content-Type: application/json

{{"user": "monitor"}}
"#,
        mock_server.uri()
    );

    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(notifier.clone());
    let doc = HttpFileParser::parse_content(&content);
    let (store, summary) = engine.run(doc.requests, StatusStore::new()).await;

    assert_eq!(summary.up, 1);
    assert_eq!(summary.results[0].status, Some(201));
    assert!(store.is_empty());
    assert!(notifier.messages().is_empty());
}

/// 测试连接失败命中 ignore 列表时不告警
#[tokio::test]
async fn test_ignored_connection_failure() {
    // 端口 1 上没有服务
    let content = "### ignore=connect\nGET http://127.0.0.1:1/\n###\nGET http://127.0.0.1:1/\n";

    let notifier = Arc::new(RecordingNotifier::default());
    let engine = engine(notifier.clone());
    let doc = HttpFileParser::parse_content(content);

    let mut store = StatusStore::new();
    store.set(0, true);
    let (store, summary) = engine.run(doc.requests, store).await;

    assert_eq!(summary.results[0].verdict, Verdict::Ignored);
    assert_eq!(store.get(0), Some(true));

    assert_eq!(summary.results[1].verdict, Verdict::Down);
    assert_eq!(store.get(1), Some(false));

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("GET http://127.0.0.1:1/ is down\n - request failed:"));
}

/// 测试真实超时命中 ignore=timeout 时不告警也不改状态
#[tokio::test]
async fn test_ignored_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let executor = HttpExecutor::with_timeout(Duration::from_millis(100)).unwrap();
    let engine = AlertEngine::new(Arc::new(executor))
        .with_notifier(notifier.clone(), vec!["ops@example.com".to_string()]);

    let content = format!("### ignore=timeout\nGET {}/slow\n", mock_server.uri());
    let doc = HttpFileParser::parse_content(&content);

    let mut store = StatusStore::new();
    store.set(0, true);
    let (store, summary) = engine.run(doc.requests, store).await;

    assert_eq!(summary.results[0].verdict, Verdict::Ignored);
    assert!(summary.results[0].error.as_deref().is_some_and(|e| e.contains("timeout")));
    assert_eq!(summary.transitions, 0);
    assert_eq!(store.get(0), Some(true));
    assert_eq!(store.len(), 1);
    assert!(notifier.messages().is_empty());
}
