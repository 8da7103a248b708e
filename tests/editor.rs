use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use article_editor::{
    api::{ArticleClient, HttpTransport, ResourceLayout},
    config::ApiConfig,
    content::{BlockId, BlockKind, BlockPatch},
    editor::{ArticleEditor, BlockStatus, SaveSummary},
    error::{ApiError, Error},
};

/// 服务端收到的一次请求
#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    body: Option<Value>,
    auth: Option<String>,
}

/// 进程内的假后端，记录所有请求
struct MockBackend {
    requests: Mutex<Vec<Recorded>>,
    next_id: AtomicU64,
}

async fn handle(
    State(backend): State<Arc<MockBackend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    backend.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).ok(),
        auth: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (Method::PUT, ["api", "articles", "broken"]) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "db down"})),
        )
            .into_response(),
        (Method::GET, ["api", "articles", "a1"]) => Json(json!({
            "success": true,
            "data": {
                "title": "Journaling basics",
                "category": {"text": "Self-help"},
                "intro": "Start small.",
                "readTime": "4",
                "author": "Mia",
                "headerImage": null
            }
        }))
        .into_response(),
        (Method::GET, ["api", "articles", "a1", "blocks"]) => Json(json!({
            "success": true,
            "data": [
                {"id": 1, "type": "section", "title": "Why", "content": "It helps.", "order": 0},
                {"id": 2, "type": "image", "src": "https://cdn/j.png", "altText": "notebook", "order": 1},
                {"id": 3, "type": "bullet-list", "title": "Try", "items": ["", "Gratitude"], "order": 2},
                {"id": 4, "type": "link", "title": "More", "url": "https://example.org", "description": "", "order": 3}
            ]
        }))
        .into_response(),
        (Method::GET, ["api", "articles", ..]) => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "no such article"})),
        )
            .into_response(),
        (Method::POST, ["api", "articles", _, "blocks", _]) => {
            let n = backend.next_id.fetch_add(1, Ordering::Relaxed);
            Json(json!({"success": true, "data": {"id": format!("srv-{n}")}})).into_response()
        }
        (Method::PUT, ["api", "articles", ..]) => Json(json!({"success": true})).into_response(),
        (Method::DELETE, ["api", "articles", _, "blocks", _, _]) => {
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

struct TestApp {
    backend: Arc<MockBackend>,
    addr: SocketAddr,
}

impl TestApp {
    async fn new() -> Self {
        let backend = Arc::new(MockBackend {
            requests: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(42),
        });
        let router = Router::new()
            .fallback(handle)
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("绑定端口失败");
        let addr = listener.local_addr().expect("获取地址失败");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server 失败");
        });

        Self { backend, addr }
    }

    fn client(&self, layout: ResourceLayout) -> ArticleClient<HttpTransport> {
        let transport = HttpTransport::new(&ApiConfig {
            base_url: format!("http://{}/", self.addr),
            token: Some("s3cret".to_string()),
        })
        .expect("创建 transport 失败");
        ArticleClient::new(transport, layout)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.lock().unwrap().clone()
    }

    fn block_requests(&self) -> Vec<(Method, String)> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.contains("/blocks/"))
            .map(|r| (r.method, r.path))
            .collect()
    }
}

#[tokio::test]
async fn test_created_block_is_updated_on_next_save() {
    let app = TestApp::new().await;
    let mut editor = ArticleEditor::new(app.client(ResourceLayout::Uniform), "a9");

    let id = editor.document_mut().append(BlockKind::Link).id().clone();
    editor.document_mut().update(
        &id,
        BlockPatch::new()
            .title("Crisis line")
            .url("https://example.org/help"),
    );

    let report = editor.save().await.expect("第一次保存失败");
    assert_eq!(
        report.outcomes[0].status,
        BlockStatus::Created {
            id: "srv-42".to_string()
        }
    );

    editor.save().await.expect("第二次保存失败");

    assert_eq!(
        app.block_requests(),
        vec![
            (Method::POST, "/api/articles/a9/blocks/links".to_string()),
            (Method::PUT, "/api/articles/a9/blocks/links/srv-42".to_string()),
        ]
    );

    let requests = app.requests();
    assert!(
        requests
            .iter()
            .all(|r| r.auth.as_deref() == Some("Bearer s3cret")),
        "所有请求都应带 token"
    );
    let created = requests[1].body.clone().expect("缺少请求体");
    assert_eq!(created["type"], json!("link"));
    assert_eq!(created["order"], json!(0));
}

#[tokio::test]
async fn test_load_then_save_legacy_layout() {
    let app = TestApp::new().await;
    let mut editor = ArticleEditor::open(app.client(ResourceLayout::Legacy), "a1").await;

    let meta = editor.metadata();
    assert_eq!(meta.title, "Journaling basics");
    assert_eq!(meta.category, "Self-help");
    assert_eq!(meta.description, "Start small.");
    assert_eq!(meta.author, "Mia");
    assert_eq!(meta.read_time_minutes(), 4);
    assert_eq!(editor.document().len(), 4);
    assert_eq!(
        editor.document().blocks()[1].id(),
        &BlockId::Persisted("2".to_string())
    );

    let report = editor.save().await.expect("保存失败");
    assert_eq!(report.summary(), SaveSummary::Success);

    let saves: Vec<(String, Value)> = app
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT && r.path.contains("/blocks/"))
        .map(|r| (r.path, r.body.expect("缺少请求体")["order"].clone()))
        .collect();
    assert_eq!(
        saves,
        vec![
            ("/api/articles/a1/blocks/images/2".to_string(), json!(1)),
            ("/api/articles/a1/blocks/links/4".to_string(), json!(3)),
        ]
    );

    let metadata_put = app
        .requests()
        .into_iter()
        .find(|r| r.method == Method::PUT && r.path == "/api/articles/a1")
        .and_then(|r| r.body)
        .expect("缺少元数据请求");
    assert_eq!(metadata_put["headerImage"], json!(""));
    assert_eq!(metadata_put["readTime"], json!(4));
}

#[tokio::test]
async fn test_uniform_layout_saves_every_block() {
    let app = TestApp::new().await;
    let mut editor = ArticleEditor::open(app.client(ResourceLayout::Uniform), "a1").await;

    editor.save().await.expect("保存失败");

    let list = app
        .requests()
        .into_iter()
        .find(|r| r.path == "/api/articles/a1/blocks/bullet-lists/3")
        .expect("bullet-list 应该被保存");
    let body = list.body.expect("缺少请求体");
    assert_eq!(body["items"], json!(["", "Gratitude"]));
    assert_eq!(body["order"], json!(2));
    assert_eq!(app.block_requests().len(), 4);
}

#[tokio::test]
async fn test_metadata_failure_skips_blocks() {
    let app = TestApp::new().await;
    let mut editor = ArticleEditor::new(app.client(ResourceLayout::Uniform), "broken");
    editor.document_mut().append(BlockKind::Reflection);

    match editor.save().await {
        Err(Error::ApiError(ApiError::Status { status, message })) => {
            assert_eq!(status, 500);
            assert_eq!(message, "db down");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(app.block_requests().is_empty());
}

#[tokio::test]
async fn test_missing_article_opens_empty() {
    let app = TestApp::new().await;
    let editor = ArticleEditor::open(app.client(ResourceLayout::Uniform), "gone").await;

    assert!(editor.metadata().title.is_empty());
    assert!(editor.document().is_empty());
}

#[tokio::test]
async fn test_delete_block() {
    let app = TestApp::new().await;
    let mut editor = ArticleEditor::open(app.client(ResourceLayout::Legacy), "a1").await;
    let image = BlockId::parse("2");

    editor.delete_block(&image).await.expect("删除失败");
    assert!(editor.document().get(&image).is_none());
    assert_eq!(editor.document().len(), 3);

    // legacy 布局下 section 没有对应资源
    assert!(matches!(
        editor.delete_block(&BlockId::parse("1")).await,
        Err(Error::Unroutable(BlockKind::Section))
    ));
    assert_eq!(
        app.block_requests(),
        vec![(Method::DELETE, "/api/articles/a1/blocks/images/2".to_string())]
    );
}
