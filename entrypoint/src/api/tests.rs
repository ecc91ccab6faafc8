use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use common::{
    product::{NewProduct, ScrapedProduct},
    utils::get_current_time,
};
use crawler::unprotected::CrawlerOptions;
use mongodb_connector::{memory_store::MemoryStore, traits::ProductStore};
use retailers::retailers::flipkart::Flipkart;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::{ServerState, routes::build_router};

struct TestApp {
    router: Router,
    db: Arc<MemoryStore>,
    server: MockServer,
}

impl TestApp {
    async fn new() -> Self {
        let server = MockServer::start().await;
        let db = Arc::new(MemoryStore::new());

        let state = Arc::new(ServerState {
            db: db.clone(),
            retailer: Arc::new(Flipkart::new(CrawlerOptions::default()).unwrap()),
        });

        Self {
            router: build_router(state, Vec::new()),
            db,
            server,
        }
    }

    fn page_url(&self, page: &str) -> String {
        format!("{}{}", self.server.uri(), page)
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn create(&self, page: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/products",
            Some(json!({ "url": self.page_url(page) })),
        )
        .await
    }
}

fn product_page(title: &str, price: &str) -> String {
    format!(
        r#"<html><body>
            <span class="B_NuCI">{title}</span>
            <div class="_30jeq3 _16Jk6d">{price}</div>
            <span class="_2_R_DZ">1,024 Ratings &amp; 96 Reviews</span>
            <div class="_1mXcCf">Product description</div>
        </body></html>"#
    )
}

async fn mount_page(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn seed(db: &MemoryStore, title: &str, price: f64) {
    let scraped = ScrapedProduct {
        title: title.into(),
        description: String::new(),
        price,
        reviews: String::new(),
        total_purchases: String::new(),
    };

    db.create(NewProduct::from_scrape(
        "http://example.test/seed",
        scraped,
        get_current_time(),
    ))
    .await
    .unwrap();
}

fn titles(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|product| product["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn create_scrapes_and_stores_product() {
    let app = TestApp::new().await;
    mount_page(&app.server, "/p1", product_page("Widget", "₹1,999")).await;

    let before = get_current_time();
    let (status, body) = app.create("/p1").await;
    let after = get_current_time();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["url"], json!(app.page_url("/p1")));
    assert_eq!(body["title"], json!("Widget"));
    assert_eq!(body["description"], json!("Product description"));
    assert_eq!(body["reviews"], json!("96 Reviews"));
    assert_eq!(body["totalPurchases"], json!("1,024 Ratings"));
    assert_eq!(body["currentPrice"].as_f64(), Some(1999.0));

    let history = body["priceHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["price"], body["currentPrice"]);

    let date: DateTime<Utc> = history[0]["date"].as_str().unwrap().parse().unwrap();
    assert!(before <= date && date <= after);

    let stored = app
        .db
        .get_by_id(body["_id"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(serde_json::to_value(&stored).unwrap(), body);
}

#[tokio::test]
async fn create_with_failed_fetch_is_500() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let (status, body) = app.create("/p1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error fetching product details" }));
    assert!(app.db.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_without_price_is_500_and_stores_nothing() {
    let app = TestApp::new().await;
    mount_page(&app.server, "/p1", product_page("Widget", "Currently unavailable")).await;

    let (status, _) = app.create("/p1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.db.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_ignores_extra_body_fields() {
    let app = TestApp::new().await;
    mount_page(&app.server, "/p1", product_page("Widget", "₹10")).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/products",
            Some(json!({ "url": app.page_url("/p1"), "note": "x" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], json!("Widget"));
    assert!(body.get("note").is_none());
}

#[tokio::test]
async fn create_with_bad_body_is_400() {
    let app = TestApp::new().await;

    for payload in [json!({ "url": "" }), json!({}), json!({ "link": "x" })] {
        let (status, body) = app
            .send(Method::POST, "/api/products", Some(payload))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Invalid request" }));
    }
}

#[tokio::test]
async fn recheck_appends_new_price() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(product_page("Widget", "₹1,999")),
        )
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    mount_page(&app.server, "/p1", product_page("Widget", "₹1,799")).await;

    let (_, created) = app.create("/p1").await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = app
        .send(Method::POST, &format!("/api/products/{id}/recheck"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], created["_id"]);
    assert_eq!(body["currentPrice"].as_f64(), Some(1799.0));

    let history = body["priceHistory"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], created["priceHistory"][0]);
    assert_eq!(history[1]["price"].as_f64(), Some(1799.0));
}

#[tokio::test]
async fn recheck_unknown_id_is_404_without_mutation() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(product_page("Widget", "₹10")),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    app.create("/p1").await;

    for id in ["000000000000000000000000", "not-an-id"] {
        let (status, body) = app
            .send(Method::POST, &format!("/api/products/{id}/recheck"), None)
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Product not found" }));
    }

    let products = app.db.list_all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price_history.len(), 1);
}

#[tokio::test]
async fn recheck_with_failed_fetch_keeps_history() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(product_page("Widget", "₹10")),
        )
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.server)
        .await;

    let (_, created) = app.create("/p1").await;
    let id = created["_id"].as_str().unwrap();

    let (status, _) = app
        .send(Method::POST, &format!("/api/products/{id}/recheck"), None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let stored = app.db.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.price_history.len(), 1);
    assert_eq!(stored.current_price, 10.0);
}

#[tokio::test]
async fn concurrent_rechecks_each_append_once() {
    let app = TestApp::new().await;
    mount_page(&app.server, "/p1", product_page("Widget", "₹10")).await;

    let (_, created) = app.create("/p1").await;
    let id = created["_id"].as_str().unwrap().to_string();

    let mut handles = Vec::new();

    for _ in 0..5 {
        let router = app.router.clone();
        let uri = format!("/api/products/{id}/recheck");

        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::empty())
                .unwrap();

            router.oneshot(request).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let stored = app.db.get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.price_history.len(), 6);
    assert_eq!(stored.current_price, stored.latest_entry().unwrap().price);
}

#[tokio::test]
async fn list_returns_every_product() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    seed(&app.db, "iPhone 13", 150.0).await;
    seed(&app.db, "Galaxy S21", 120.0).await;

    let (status, body) = app.send(Method::GET, "/api/products", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["iPhone 13", "Galaxy S21"]);
}

#[tokio::test]
async fn search_filters_by_title_and_price() {
    let app = TestApp::new().await;

    for (title, price) in [
        ("iPhone 13", 150.0),
        ("iPhone 15", 250.0),
        ("Galaxy S21", 100.0),
        ("Pixel 8", 200.0),
    ] {
        seed(&app.db, title, price).await;
    }

    let (status, body) = app
        .send(Method::GET, "/api/products/search?title=phone", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["iPhone 13", "iPhone 15"]);

    let (_, body) = app
        .send(
            Method::GET,
            "/api/products/search?minPrice=100&maxPrice=200",
            None,
        )
        .await;
    assert_eq!(titles(&body), ["iPhone 13", "Galaxy S21", "Pixel 8"]);

    let (_, body) = app
        .send(
            Method::GET,
            "/api/products/search?title=PHONE&minPrice=100&maxPrice=200",
            None,
        )
        .await;
    assert_eq!(titles(&body), ["iPhone 13"]);

    let (_, body) = app
        .send(Method::GET, "/api/products/search?maxPrice=120", None)
        .await;
    assert_eq!(titles(&body), ["Galaxy S21"]);

    let (_, body) = app.send(Method::GET, "/api/products/search", None).await;
    assert_eq!(titles(&body).len(), 4);

    let (_, body) = app
        .send(Method::GET, "/api/products/search?title=nokia", None)
        .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn search_ignores_unknown_and_repeated_params() {
    let app = TestApp::new().await;

    for (title, price) in [("iPhone 13", 150.0), ("Galaxy S21", 100.0)] {
        seed(&app.db, title, price).await;
    }

    let (status, body) = app
        .send(
            Method::GET,
            "/api/products/search?title=phone&_=1700000000",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["iPhone 13"]);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/products/search?title=galaxy&title=iphone",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Galaxy S21"]);
}

#[tokio::test]
async fn search_with_invalid_price_is_400() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/api/products/search?minPrice=cheap", None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid request" }));
}
