mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::Value;

use common::TestApp;

#[tokio::test]
async fn first_page_links_forward_only() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.cache_control(), Some("public, max-age=3600, must-revalidate"));

    let data = &res.body["data"];
    assert_eq!(data["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(data["pagination"]["page"], 1);
    assert_eq!(data["pagination"]["limit"], 10);
    assert_eq!(data["pagination"]["total"], 20);
    assert_eq!(data["pagination"]["pages"], 2);

    assert_eq!(res.link("self"), Some("/api/products?sort=id&order=ASC&page=1&limit=10"));
    assert_eq!(res.link("next"), Some("/api/products?sort=id&order=ASC&page=2&limit=10"));
    assert_eq!(res.link("last"), Some("/api/products?sort=id&order=ASC&page=2&limit=10"));
    assert!(res.link("prev").is_none());
    assert!(res.link("first").is_none());
    Ok(())
}

#[tokio::test]
async fn items_carry_only_a_self_link() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products?limit=2", None).await?;

    let first = &res.body["data"]["items"][0];
    assert_eq!(first["id"], 1);
    assert!(first["imageUrl"].is_string());
    let links = first["_links"].as_object().expect("item links");
    assert_eq!(links.len(), 1);
    assert_eq!(links["self"]["href"], "/api/products/1");
    assert_eq!(links["self"]["title"], first["name"]);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty_but_well_formed() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products?page=3&limit=10", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    let data = &res.body["data"];
    assert_eq!(data["items"], Value::Array(vec![]));
    assert_eq!(data["pagination"]["page"], 3);
    assert_eq!(data["pagination"]["pages"], 2);
    assert!(res.link("first").is_some());
    assert!(res.link("prev").is_some());
    assert!(res.link("next").is_none());
    Ok(())
}

#[tokio::test]
async fn page_near_integer_limit_is_empty() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products?page=1152921504606846977&limit=16", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    let data = &res.body["data"];
    assert_eq!(data["items"], Value::Array(vec![]));
    assert_eq!(data["pagination"]["page"], 1_152_921_504_606_846_977u64);
    assert_eq!(data["pagination"]["pages"], 2);
    assert_eq!(
        res.link("prev"),
        Some("/api/products?sort=id&order=ASC&page=1152921504606846976&limit=16")
    );
    assert!(res.link("next").is_none());
    Ok(())
}

#[tokio::test]
async fn sorts_by_price_descending() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products?sort=price&order=desc&limit=20", None).await?;

    let prices: Vec<f64> = res.body["data"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|item| item["price"].as_f64().expect("numeric price"))
        .collect();
    assert_eq!(prices.len(), 20);
    assert!(prices.windows(2).all(|w| w[0] >= w[1]), "not descending: {:?}", prices);
    assert_eq!(res.link("self"), Some("/api/products?sort=price&order=DESC&page=1&limit=20"));
    Ok(())
}

#[tokio::test]
async fn invalid_parameters_are_normalized() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products?page=-2&limit=1000&sort=password&order=up", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["pagination"]["page"], 1);
    assert_eq!(res.body["data"]["pagination"]["limit"], 100);
    assert_eq!(res.link("self"), Some("/api/products?sort=id&order=ASC&page=1&limit=100"));
    Ok(())
}

#[tokio::test]
async fn shows_a_product_with_its_links() -> Result<()> {
    let app = TestApp::new();
    let res = app.get("/api/products/5", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["id"], 5);
    assert_eq!(res.link("self"), Some("/api/products/5"));
    assert_eq!(res.link("list"), Some("/api/products"));
    assert!(res.link("update").is_none());
    Ok(())
}

#[tokio::test]
async fn missing_product_points_back_to_the_list() -> Result<()> {
    let app = TestApp::new();

    for uri in ["/api/products/999", "/api/products/abc"] {
        let res = app.get(uri, None).await?;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(res.body["success"], false);
        assert_eq!(res.body["message"], "Product not found");

        let links = res.body["_links"].as_object().expect("links");
        assert_eq!(links.len(), 1);
        assert_eq!(links["list"]["href"], "/api/products");
        assert_eq!(links["list"]["title"], "Back to the products list");
    }
    Ok(())
}
