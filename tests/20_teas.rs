mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_and_fetch_round_trip() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let token =
        common::register_user(&client, &server.base_url, &common::unique("creator")).await?;

    let mut body = common::sample_tea();
    body["is_my_tea"] = json!(true);
    body["is_on_wish_list"] = json!(false);

    let res = client
        .post(format!("{}/teas/new", server.base_url))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let tea = &created["tea"];
    assert!(tea["id"].is_i64());
    assert_eq!(tea["title"], "English Black Tea");
    assert_eq!(tea["brand"], "PG TIPS");
    assert_eq!(tea["organic"], false);
    assert_eq!(tea["brew_time"], 3);
    assert_eq!(tea["brew_temp"], 100);
    let tea_id = tea["id"].as_i64().unwrap();

    // the stored row reads back exactly
    let res = client
        .get(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = res.json::<Value>().await?;
    assert_eq!(fetched["tea"], created["tea"]);

    // creating with is_my_tea places the tea on "My Teas" and not the wish list
    let res = client
        .get(format!("{}/teas/my-teas", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let my_teas = res.json::<Value>().await?;
    assert!(my_teas["teas"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"].as_i64() == Some(tea_id)));

    let res = client
        .get(format!("{}/teas/wish-list", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    let wish_list = res.json::<Value>().await?;
    assert!(!wish_list["teas"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"].as_i64() == Some(tea_id)));

    Ok(())
}

#[tokio::test]
async fn lists_require_login() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/teas/my-teas", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/teas/wish-list", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn only_owners_reach_a_tea() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let owner = common::register_user(&client, &server.base_url, &common::unique("owner")).await?;
    let other = common::register_user(&client, &server.base_url, &common::unique("other")).await?;

    let tea_id = common::create_tea(&client, &server.base_url, &owner, true).await?;

    let res = client
        .get(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&other)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"]["status"], 401);

    // same for mutation
    let res = client
        .patch(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&other)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn partial_update_preserves_other_fields() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let token =
        common::register_user(&client, &server.base_url, &common::unique("updater")).await?;
    let tea_id = common::create_tea(&client, &server.base_url, &token, true).await?;

    let res = client
        .patch(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&token)
        .json(&json!({ "title": "Updated Tea Title" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["tea"]["title"], "Updated Tea Title");
    assert_eq!(body["tea"]["brand"], "PG TIPS");
    assert_eq!(body["tea"]["brew_temp"], 100);

    Ok(())
}

#[tokio::test]
async fn empty_update_is_a_bad_request() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let token = common::register_user(&client, &server.base_url, &common::unique("empty")).await?;
    let tea_id = common::create_tea(&client, &server.base_url, &token, true).await?;

    let res = client
        .patch(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"]["status"], 400);

    Ok(())
}

#[tokio::test]
async fn deleting_a_tea_revokes_access() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let token =
        common::register_user(&client, &server.base_url, &common::unique("deleter")).await?;
    let tea_id = common::create_tea(&client, &server.base_url, &token, true).await?;

    let res = client
        .delete(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["deleted"].as_i64(), Some(tea_id));

    // the relationship cascaded away with the tea, so the ownership guard
    // now rejects the caller
    let res = client
        .get(format!("{}/teas/{}", server.base_url, tea_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
