use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookmanager::{db, server};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    server::build_router(db)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create_book(app: &Router, isbn: &str, title: &str, genres: &[&str]) {
    let (status, _) = call(
        app,
        "POST",
        "/books",
        Some(json!({
            "isbn": isbn,
            "title": title,
            "author": "Author",
            "metadata": { "genres": genres }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_collection(app: &Router, name: &str) -> i64 {
    let (status, body) = call(app, "POST", "/collections", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("collection id is an integer")
}

#[tokio::test]
async fn test_book_crud() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/books",
        Some(json!({
            "isbn": "A",
            "title": "T",
            "author": "Au",
            "description": "A story",
            "published_year": 1965,
            "metadata": { "genres": ["scifi"] }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isbn"], "A");
    assert_eq!(body["title"], "T");
    assert_eq!(body["author"], "Au");
    assert_eq!(body["published_year"], 1965);
    assert_eq!(body["metadata"]["genres"], json!(["scifi"]));
    assert!(!body["created_at"].as_str().unwrap().is_empty());
    assert!(body["deleted_at"].is_null());

    let (status, body) = call(&app, "GET", "/books/A", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "T");
    assert_eq!(body["collections"], json!([]));

    let (status, body) = call(
        &app,
        "PUT",
        "/books/A",
        Some(json!({ "isbn": "A", "title": "T2", "author": "Au" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "T2");

    let (status, _) = call(&app, "DELETE", "/books/A", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, "GET", "/books/A", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["field"], "isbn");

    let (status, body) = call(&app, "GET", "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_book_reports_missing_fields() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/books",
        Some(json!({ "isbn": "", "title": "T", "author": "Au" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "errors": [{ "field": "isbn", "message": "required" }] })
    );

    let (status, body) = call(&app, "POST", "/books", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["isbn", "title", "author"]);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_isbn_is_rejected() {
    let app = setup_app().await;
    create_book(&app, "A", "T", &[]).await;

    let (status, body) = call(
        &app,
        "POST",
        "/books",
        Some(json!({ "isbn": "A", "title": "Other", "author": "Au" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "isbn");
}

#[tokio::test]
async fn test_padded_isbn_is_stored_trimmed() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/books",
        Some(json!({ "isbn": " C ", "title": " Dune ", "author": "Au" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isbn"], "C");
    assert_eq!(body["title"], "Dune");

    let (status, _) = call(&app, "GET", "/books/C", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_books_filters() {
    let app = setup_app().await;
    create_book(&app, "A", "Dune", &["scifi"]).await;
    create_book(&app, "B", "Emma", &["romance"]).await;
    create_book(&app, "C", "Dune", &["classic", "scifi"]).await;

    let (status, body) = call(&app, "GET", "/books?title=Dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = call(&app, "GET", "/books?genres=romance,classic", None).await;
    let mut isbns: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["isbn"].as_str().unwrap())
        .collect();
    isbns.sort();
    assert_eq!(isbns, vec!["B", "C"]);

    let (_, body) = call(&app, "GET", "/books?title=Dune&genres=classic", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["isbn"], "C");

    let (status, body) = call(
        &app,
        "POST",
        "/books",
        Some(json!({
            "isbn": "D",
            "title": "Persuasion",
            "author": "Jane Austen",
            "description": "Second chances"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (_, body) = call(
        &app,
        "GET",
        "/books?author=Jane%20Austen&description=Second%20chances",
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["isbn"], "D");

    let (_, body) = call(&app, "GET", "/books?isbn=B&author=", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["isbn"], "B");

    let (_, body) = call(&app, "GET", "/books?author=Jane&description=Second%20chances", None).await;
    assert_eq!(body, json!([]));

    let (status, _) = call(&app, "GET", "/books?published=soon", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collection_membership_flow() {
    let app = setup_app().await;
    create_book(&app, "A", "T", &[]).await;
    let id = create_collection(&app, "c1").await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/collections/{id}/addbooks"),
        Some(json!({ "books_to_add": ["A"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!(["A"]));

    // Adding again changes nothing
    let (status, body) = call(
        &app,
        "POST",
        &format!("/collections/{id}/addbooks"),
        Some(json!({ "books_to_add": ["A"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!([]));
    assert_eq!(body["unchanged"], json!(["A"]));

    let (status, body) = call(&app, "GET", &format!("/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_books"], 1);
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"][0]["isbn"], "A");

    let (_, body) = call(&app, "GET", "/books/A", None).await;
    assert_eq!(body["collections"][0]["id"], id);

    let (_, body) = call(&app, "GET", "/collections", None).await;
    assert_eq!(body[0]["total_books"], 1);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/collections/{id}/removebooks"),
        Some(json!({ "books_to_remove": ["A", "Z"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!(["A"]));
    assert_eq!(body["unchanged"], json!(["Z"]));

    let (_, body) = call(&app, "GET", &format!("/collections/{id}"), None).await;
    assert_eq!(body["total_books"], 0);
}

#[tokio::test]
async fn test_add_unknown_book_changes_nothing() {
    let app = setup_app().await;
    create_book(&app, "A", "T", &[]).await;
    let id = create_collection(&app, "c1").await;

    let (status, body) = call(
        &app,
        "POST",
        &format!("/collections/{id}/addbooks"),
        Some(json!({ "books_to_add": ["A", "B"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["errors"][0]["message"].as_str().unwrap().contains("\"B\""));

    let (_, body) = call(&app, "GET", &format!("/collections/{id}"), None).await;
    assert_eq!(body["total_books"], 0);
}

#[tokio::test]
async fn test_membership_errors() {
    let app = setup_app().await;

    let (status, body) = call(
        &app,
        "POST",
        "/collections/abc/addbooks",
        Some(json!({ "books_to_add": ["A"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "collection_id");

    let (status, _) = call(
        &app,
        "POST",
        "/collections/42/addbooks",
        Some(json!({ "books_to_add": ["A"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "GET", "/collections/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_collection_is_gone() {
    let app = setup_app().await;
    let id = create_collection(&app, "c1").await;

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/collections/{id}"),
        Some(json!({ "name": "renamed", "description": "d" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "renamed");

    let (status, _) = call(&app, "DELETE", &format!("/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "GET", &format!("/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "DELETE", &format!("/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, "GET", "/collections", None).await;
    assert_eq!(body, json!([]));
}
