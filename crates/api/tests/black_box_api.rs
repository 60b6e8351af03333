use reqwest::StatusCode;
use serde_json::json;

use amara_api::app::{self, ServicesConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod, in-memory backends), bound to an
        // ephemeral port.
        let app = app::build_app(ServicesConfig::default())
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Resolve a seeded attribute id by dimension key and code.
async fn lookup_id(client: &reqwest::Client, base_url: &str, dimension: &str, code: &str) -> String {
    let items: serde_json::Value = client
        .get(format!("{base_url}/lookups/{dimension}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    items
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["code"] == code)
        .unwrap_or_else(|| panic!("no {code} in {dimension}"))["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Request body whose selection resolves to codes `0 B S F X S S`.
async fn bangle_body(client: &reqwest::Client, base_url: &str, name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "description": "Plain silver bangle",
        "face_value_id": lookup_id(client, base_url, "face_value", "0").await,
        "category_id": lookup_id(client, base_url, "category", "B").await,
        "material_id": lookup_id(client, base_url, "material", "S").await,
        "motif_id": lookup_id(client, base_url, "motif", "F").await,
        "finding_id": lookup_id(client, base_url, "finding", "X").await,
        "locking_id": lookup_id(client, base_url, "locking", "S").await,
        "size_id": lookup_id(client, base_url, "size", "S").await,
    })
}

#[tokio::test]
async fn health_endpoint_responds() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_lookup_dimension_is_404() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/lookups/colour", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lookup_codes_are_stored_uppercase() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/lookups/motif", srv.base_url))
        .json(&json!({"name": "Wave", "code": "w"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["code"], "W");

    // Duplicate code within the dimension conflicts.
    let res = client
        .post(format!("{}/lookups/motif", srv.base_url))
        .json(&json!({"name": "Whirl", "code": "W"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn preview_is_stable_until_a_creation_intervenes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let body = bangle_body(&client, &srv.base_url, "Bangle").await;

    let preview = |client: reqwest::Client, url: String, body: serde_json::Value| async move {
        let res = client.post(format!("{url}/sku/preview")).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json::<serde_json::Value>().await.unwrap()
    };

    let first = preview(client.clone(), srv.base_url.clone(), body.clone()).await;
    assert_eq!(first["prefix"], "0BSFXSS");
    assert_eq!(first["suffix"], "000");
    assert_eq!(first["full_sku"], "0BSFXSS000");
    assert_eq!(first["next_sequence"], 0);
    assert_eq!(first["codes"], json!(["0", "B", "S", "F", "X", "S", "S"]));

    // Determinism: no intervening creation, identical response.
    let second = preview(client.clone(), srv.base_url.clone(), body.clone()).await;
    assert_eq!(first, second);

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let third = preview(client, srv.base_url.clone(), body).await;
    assert_eq!(third["next_sequence"], 1);
    assert_eq!(third["full_sku"], "0BSFXSS001");
}

#[tokio::test]
async fn creation_assigns_sequential_skus() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let body = bangle_body(&client, &srv.base_url, "Bangle").await;

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let first: serde_json::Value = res.json().await.unwrap();
    assert_eq!(first["sku"], "0BSFXSS000");
    assert_eq!(first["sequence_num"], 0);
    assert_eq!(first["is_active"], true);

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    let second: serde_json::Value = res.json().await.unwrap();
    assert_eq!(second["sku"], "0BSFXSS001");

    // The created product is readable by id.
    let id = first["id"].as_str().unwrap();
    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched["sku"], "0BSFXSS000");
}

#[tokio::test]
async fn unknown_material_previews_as_placeholder_but_rejects_creation() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let mut body = bangle_body(&client, &srv.base_url, "Bangle").await;
    body["material_id"] = json!("00000000-0000-7000-8000-000000000000");

    let res = client
        .post(format!("{}/sku/preview", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let preview: serde_json::Value = res.json().await.unwrap();
    assert_eq!(preview["prefix"], "0B?FXSS");
    assert_eq!(preview["codes"][2], "?");

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "unknown_attribute");

    // Nothing was created and no sequence number was consumed.
    let listed: serde_json::Value = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["items"], json!([]));
}

#[tokio::test]
async fn concurrent_creations_issue_distinct_contiguous_skus() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let body = bangle_body(&client, &srv.base_url, "Bangle").await;

    let mut handles = Vec::new();
    for i in 0..12 {
        let client = client.clone();
        let url = format!("{}/products", srv.base_url);
        let mut body = body.clone();
        body["name"] = json!(format!("Bangle {i}"));
        handles.push(tokio::spawn(async move {
            let res = client.post(url).json(&body).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
            res.json::<serde_json::Value>().await.unwrap()["sku"]
                .as_str()
                .unwrap()
                .to_string()
        }));
    }

    let mut skus = Vec::new();
    for handle in handles {
        skus.push(handle.await.unwrap());
    }
    skus.sort();
    let expected: Vec<String> = (0..12).map(|n| format!("0BSFXSS{:03}", n)).collect();
    assert_eq!(skus, expected);
}

#[tokio::test]
async fn deactivation_is_soft_and_never_frees_the_sku() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let body = bangle_body(&client, &srv.base_url, "Bangle").await;

    let created: serde_json::Value = client
        .post(format!("{}/products", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let res = client
        .post(format!("{}/products/{}/deactivate", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deactivated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(deactivated["is_active"], false);
    assert_eq!(deactivated["sku"], "0BSFXSS000");

    // The deactivated product's number stays consumed.
    let next: serde_json::Value = client
        .post(format!("{}/products", srv.base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(next["sku"], "0BSFXSS001");
}

#[tokio::test]
async fn product_id_parsing_and_missing_products() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/products/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(format!(
            "{}/products/00000000-0000-7000-8000-000000000000",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
