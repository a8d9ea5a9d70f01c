use std::io::Write;

use storage::http::HttpQuestionSource;
use storage::json::JsonFileSource;
use storage::{BankLocation, QuestionSource, Storage, StorageError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const BANK: &str = r#"[
    {
        "text": "Which keyword declares an immutable binding?",
        "options": [
            {"text": "let", "correct": true},
            {"text": "mut"},
            {"text": "static"}
        ],
        "category": "Basics"
    },
    {
        "text": "Which trait enables `?` on a custom error?",
        "options": [
            {"text": "From", "correct": true},
            {"text": "Into"}
        ],
        "categoria": "Errors",
        "sustento": "The `?` operator converts via From."
    }
]"#;

fn write_bank(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write bank");
    file
}

#[tokio::test]
async fn json_file_source_loads_bank() {
    let file = write_bank(BANK);
    let source = JsonFileSource::new(file.path());

    let questions = source.load_questions().await.expect("load");
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].category(), Some("Basics"));
    assert_eq!(questions[1].category(), Some("Errors"));
    assert_eq!(
        questions[1].rationale(),
        Some("The `?` operator converts via From.")
    );
}

#[tokio::test]
async fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = JsonFileSource::new(dir.path().join("preguntas.json"));

    let err = source.load_questions().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn storage_from_file_location_uses_json_source() {
    let file = write_bank(BANK);
    let location = BankLocation::parse(&file.path().display().to_string()).expect("location");
    let storage = Storage::from_location(&location);

    let questions = storage.questions.load_questions().await.expect("load");
    assert_eq!(questions.len(), 2);
}

async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = [0_u8; 1024];
        let _ = socket.read(&mut buf).await;
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
    });
    format!("http://{addr}/preguntas.json")
}

fn http_source(url: &str) -> HttpQuestionSource {
    let BankLocation::Http(url) = BankLocation::parse(url).expect("location") else {
        panic!("expected an http location");
    };
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client");
    HttpQuestionSource::with_client(client, url)
}

#[tokio::test]
async fn http_source_fetches_bank() {
    let url = serve_once("HTTP/1.1 200 OK", BANK).await;
    let source = http_source(&url);

    let questions = source.load_questions().await.expect("fetch");
    assert_eq!(questions.len(), 2);
    assert!(questions[0].options()[0].is_correct());
}

#[tokio::test]
async fn http_source_maps_missing_resource() {
    let url = serve_once("HTTP/1.1 404 Not Found", "").await;
    let source = http_source(&url);

    let err = source.load_questions().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn http_source_reports_server_errors() {
    let url = serve_once("HTTP/1.1 500 Internal Server Error", "").await;
    let source = http_source(&url);

    let err = source.load_questions().await.unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
}

#[tokio::test]
async fn bundled_demo_bank_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/preguntas.json");
    let questions = JsonFileSource::new(path).load_questions().await.unwrap();

    assert_eq!(questions.len(), 6);
    assert!(questions.iter().all(|q| q.correct_count() == 1));
    assert_eq!(questions[3].category(), Some("Networking"));
    assert!(questions[3].rationale().is_some());
    assert_eq!(questions[4].category(), None);
}
