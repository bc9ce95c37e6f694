//! Shared fixtures for command tests: a stand-in backend on a local port.

use axum::Router;
use folio_client::{ApiClient, ClientConfig};
use serde_json::{json, Value};

use crate::state::CatalogState;

/// Serves `router` on an ephemeral port and returns an API client for it.
pub(crate) async fn serve(router: Router) -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let mut config = ClientConfig::default();
    config.backend.url = format!("http://{addr}");
    ApiClient::new(&config).unwrap()
}

pub(crate) async fn serve_catalog(router: Router) -> CatalogState {
    CatalogState::with_client(serve(router).await)
}

/// Backend JSON for a book.
pub(crate) fn book_json(id: i64, title: &str, price: f64, rating: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "author": format!("Author {id}"),
        "author_bio": format!("Author of {title}."),
        "short_description": format!("{title} in brief."),
        "description": format!("{title} at length."),
        "image": format!("https://img.example.com/{id}.jpg"),
        "price": price,
        "rating": rating,
        "featured": true
    })
}
