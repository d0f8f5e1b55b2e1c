mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::TestApp;

#[tokio::test]
async fn root_lists_every_entry_point() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(res.cache_control(), Some("public, max-age=86400, must-revalidate"));

    let links = res.body["data"]["_links"].as_object().expect("links object");
    let mut rels: Vec<&str> = links.keys().map(String::as_str).collect();
    rels.sort_unstable();
    assert_eq!(
        rels,
        [
            "admin_login",
            "client_login",
            "client_profile",
            "client_users",
            "documentation",
            "product_detail",
            "products",
            "self"
        ]
    );
    assert_eq!(res.link("documentation"), Some("/api/doc.json"));
    assert_eq!(res.link("product_detail"), Some("/api/products/{id}"));
    assert_eq!(res.body["data"]["_links"]["admin_login"]["method"], "POST");
    // GET links carry no method field
    assert!(res.body["data"]["_links"]["self"].get("method").is_none());
    Ok(())
}

#[tokio::test]
async fn status_is_operational_and_private() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/status", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["status"], "operational");
    assert!(res.body["data"]["timestamp"].is_string());
    assert_eq!(res.cache_control(), Some("private, max-age=0"));
    assert_eq!(res.link("self"), Some("/api/status"));
    assert_eq!(res.link("root"), Some("/api"));
    Ok(())
}

#[tokio::test]
async fn public_base_url_prefixes_links() -> Result<()> {
    let mut config = bilemo_api::config::AppConfig::development();
    config.server.public_base_url = "https://api.bilemo.test".to_string();
    let app = TestApp::with_config(config);

    let res = app.get("/api/status", None).await?;
    assert_eq!(res.link("self"), Some("https://api.bilemo.test/api/status"));
    Ok(())
}

#[tokio::test]
async fn openapi_document_describes_the_api() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/doc.json", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["openapi"].as_str().is_some_and(|v| v.starts_with("3.")));
    assert_eq!(res.body["info"]["title"], "BileMo API");
    assert_eq!(res.body["info"]["version"], env!("CARGO_PKG_VERSION"));

    let paths = &res.body["paths"];
    assert!(paths["/api/products"]["get"].is_object());
    assert!(paths["/api/clients/users"]["post"]["requestBody"].is_object());
    assert_eq!(
        paths["/api/clients/users/{userId}"]["delete"]["security"][0]["bearer_auth"],
        serde_json::json!([])
    );
    assert_eq!(res.body["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
    assert!(res.body["components"]["schemas"]["ProductView"]["properties"]["imageUrl"].is_object());
    Ok(())
}
