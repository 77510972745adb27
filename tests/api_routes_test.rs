mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::{send_multipart, send_request, test_app, Multipart, TestApp};

async fn create_game(app: &TestApp, game_id: &str, serial: i64) -> (StatusCode, Value) {
    send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/games",
        Multipart::new()
            .text("title", &format!("Game {}", game_id))
            .text("gameId", game_id)
            .text("serialNumber", &serial.to_string())
            .image("image"),
    )
    .await
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app().await;

    let (status, response) = send_request(&app.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert!(response["version"].is_string());

    let (status, response) = send_request(&app.router, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ready");
}

#[tokio::test]
async fn test_create_without_image_persists_nothing() {
    let app = test_app().await;

    let (status, response) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/games",
        Multipart::new()
            .text("title", "Crash")
            .text("gameId", "1001")
            .text("serialNumber", "1"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "image file is required");
    assert_eq!(app.count_rows("games").await, 0);
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_non_image_upload_is_rejected() {
    let app = test_app().await;

    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/promotions",
        Multipart::new()
            .text("titleBn", "অফার")
            .text("titleEn", "Offer")
            .text("descBn", "বিবরণ")
            .text("descEn", "Details")
            .file("image", "notes.txt", "text/plain", b"just some text"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count_rows("promotions").await, 0);
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_duplicate_game_id_keeps_first_row_and_cleans_upload() {
    let app = test_app().await;

    let (status, first) = create_game(&app, "1001", 1).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.upload_files().len(), 1);

    let (status, response) = create_game(&app, "1001", 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "game_id already exists");

    let (status, response) = create_game(&app, "1002", 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "serial_number already exists");

    // Rejected uploads were rolled back
    assert_eq!(app.upload_files().len(), 1);
    assert_eq!(app.count_rows("games").await, 1);

    let id = first["data"]["id"].as_str().unwrap();
    let (_, stored) =
        send_request(&app.router, Method::GET, &format!("/api/v1/games/{}", id), None).await;
    assert_eq!(stored["data"], first["data"]);
}

#[tokio::test]
async fn test_uploaded_image_is_served_and_deleted_with_row() {
    let app = test_app().await;

    let (_, created) = create_game(&app, "2001", 5).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let image_url = created["data"]["imageUrl"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".gif"));

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(&image_url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, response) =
        send_request(&app.router, Method::DELETE, &format!("/api/v1/games/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["id"], id.as_str());
    assert!(!app.upload_exists(&image_url));

    let (status, _) =
        send_request(&app.router, Method::DELETE, &format!("/api/v1/games/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_replaces_image_and_deletes_old_file() {
    let app = test_app().await;

    let (_, created) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/payment-methods",
        Multipart::new().text("name", "bKash").image("image"),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let old_image = created["data"]["imageUrl"].as_str().unwrap().to_string();

    let (status, updated) = send_multipart(
        &app.router,
        Method::PUT,
        &format!("/api/v1/payment-methods/{}", id),
        Multipart::new().text("name", "Nagad").image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Nagad");
    let new_image = updated["data"]["imageUrl"].as_str().unwrap();
    assert_ne!(new_image, old_image);
    assert!(app.upload_exists(new_image));
    assert!(!app.upload_exists(&old_image));

    // Unknown id: 404 and the freshly written file is removed again
    let (status, _) = send_multipart(
        &app.router,
        Method::PUT,
        &format!("/api/v1/payment-methods/{}", Uuid::new_v4()),
        Multipart::new().image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.upload_files().len(), 1);
}

#[tokio::test]
async fn test_status_toggle_filters_public_listing() {
    let app = test_app().await;

    let (_, created) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/floating-socials",
        Multipart::new()
            .text("name", "WhatsApp")
            .text("linkUrl", "https://wa.me/8801000000000")
            .text("order", "2")
            .image("image"),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["isActive"], true);

    // No body flips the flag
    let (status, toggled) = send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/floating-socials/{}/status", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["data"]["isActive"], false);

    let (_, public) =
        send_request(&app.router, Method::GET, "/api/v1/floating-socials", None).await;
    assert!(public["data"].as_array().unwrap().is_empty());
    let (_, admin) =
        send_request(&app.router, Method::GET, "/api/v1/floating-socials/admin", None).await;
    assert_eq!(admin["data"].as_array().unwrap().len(), 1);

    let (_, set) = send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/floating-socials/{}/status", id),
        Some(json!({"isActive": true})),
    )
    .await;
    assert_eq!(set["data"]["isActive"], true);
}

#[tokio::test]
async fn test_floating_social_requires_http_link() {
    let app = test_app().await;

    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/floating-socials",
        Multipart::new()
            .text("name", "Bad")
            .text("linkUrl", "javascript:alert(1)")
            .image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_banner_kinds_are_isolated() {
    let app = test_app().await;

    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/sliders",
        Multipart::new().image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, sliders) = send_request(&app.router, Method::GET, "/api/v1/sliders", None).await;
    let (_, sliders2) = send_request(&app.router, Method::GET, "/api/v1/sliders2", None).await;
    let (_, providers) = send_request(&app.router, Method::GET, "/api/v1/providers", None).await;

    assert_eq!(sliders["data"].as_array().unwrap().len(), 1);
    assert_eq!(sliders["data"][0]["kind"], "slider");
    assert!(sliders2["data"].as_array().unwrap().is_empty());
    assert!(providers["data"].as_array().unwrap().is_empty());

    // A slider id is unknown under another mount point
    let id = sliders["data"][0]["id"].as_str().unwrap();
    let (status, _) = send_request(
        &app.router,
        Method::GET,
        &format!("/api/v1/providers/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_withdraw_method_custom_fields() {
    let app = test_app().await;

    let (status, created) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/withdraw-methods",
        Multipart::new()
            .text("methodNameEn", "bKash")
            .text("methodNameBn", "বিকাশ")
            .text(
                "customFields",
                r#"[{"label":"Account number","type":"tel","required":true}]"#,
            )
            .image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["methodName"]["en"], "bKash");
    assert_eq!(created["data"]["customFields"][0]["type"], "tel");
    assert_eq!(created["data"]["customFields"][0]["required"], true);

    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/withdraw-methods",
        Multipart::new()
            .text("methodNameEn", "Nagad")
            .text("methodNameBn", "নগদ")
            .text("customFields", "not json")
            .image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.upload_files().len(), 1);
}

#[tokio::test]
async fn test_withdraw_method_custom_fields_keep_admin_schema() {
    let app = test_app().await;
    let fields = json!([
        {"label": "Bank", "type": "select", "options": ["A", "B"]},
        {"label": "PIN", "type": "number", "minLength": 4}
    ]);

    let (status, created) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/withdraw-methods",
        Multipart::new()
            .text("methodNameEn", "Bank transfer")
            .text("methodNameBn", "ব্যাংক")
            .text("customFields", &fields.to_string())
            .image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_request(
        &app.router,
        Method::GET,
        &format!("/api/v1/withdraw-methods/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["customFields"], fields);

    let (status, _) = send_multipart(
        &app.router,
        Method::PUT,
        &format!("/api/v1/withdraw-methods/{}", id),
        Multipart::new().text("customFields", r#"[{"label":"","type":"text"}]"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_and_unknown_ids() {
    let app = test_app().await;

    let (status, _) =
        send_request(&app.router, Method::GET, "/api/v1/promotions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, response) = send_request(
        &app.router,
        Method::GET,
        &format!("/api/v1/promotions/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn test_notice_latest_active() {
    let app = test_app().await;

    let (status, response) = send_request(&app.router, Method::GET, "/api/v1/notices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["textEn"], "");
    assert!(response["data"]["id"].is_null());

    for text in ["first", "second"] {
        let (status, _) = send_request(
            &app.router,
            Method::POST,
            "/api/v1/notices",
            Some(json!({"textEn": text, "textBn": text})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, response) = send_request(&app.router, Method::GET, "/api/v1/notices", None).await;
    assert_eq!(response["data"]["textEn"], "second");

    let id = response["data"]["id"].as_str().unwrap().to_string();
    send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/notices/{}/status", id),
        Some(json!({"isActive": false})),
    )
    .await;

    let (_, response) = send_request(&app.router, Method::GET, "/api/v1/notices", None).await;
    assert_eq!(response["data"]["textEn"], "first");

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/notices",
        Some(json!({"textEn": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_site_config_activation_keeps_one_active() {
    let app = test_app().await;

    let (_, response) = send_request(&app.router, Method::GET, "/api/v1/site-configs", None).await;
    assert_eq!(response["data"]["siteTitle"], "My Gaming Site");

    let (status, first) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/site-configs",
        Multipart::new()
            .text("siteTitle", "First")
            .text("isActive", "true")
            .image("favicon"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, second) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/site-configs",
        Multipart::new()
            .text("siteTitle", "Second")
            .text("isActive", "true"),
    )
    .await;
    assert!(second["data"]["faviconUrl"].is_null());

    let (_, active) = send_request(&app.router, Method::GET, "/api/v1/site-configs", None).await;
    assert_eq!(active["data"]["siteTitle"], "Second");

    let first_id = first["data"]["id"].as_str().unwrap();
    let (status, _) = send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/site-configs/{}/activate", first_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, active) = send_request(&app.router, Method::GET, "/api/v1/site-configs", None).await;
    assert_eq!(active["data"]["siteTitle"], "First");
    assert!(active["data"]["faviconUrl"].is_string());

    let active_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM site_configs WHERE is_active = 1")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(active_rows, 1);

    let (status, _) = send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/site-configs/{}/activate", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_game_history_pagination_and_status() {
    let app = test_app().await;

    for (username, provider) in [("p1", "JILI"), ("p1", "PG"), ("p2", "JILI")] {
        let (status, _) = send_request(
            &app.router,
            Method::POST,
            "/api/v1/game-history",
            Some(json!({
                "username": username,
                "providerCode": provider,
                "gameCode": "crash-01",
                "betType": "bet",
                "amount": 20,
                "betDetails": {"round": 7}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send_request(
        &app.router,
        Method::GET,
        "/api/v1/game-history?username=p1&page=1&limit=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"]["total"], 2);
    assert_eq!(page["data"]["totalPages"], 2);
    assert_eq!(page["data"]["hasNext"], true);
    let items = page["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["providerCode"], "PG");
    assert_eq!(items[0]["betDetails"]["round"], 7);

    let (_, filtered) = send_request(
        &app.router,
        Method::GET,
        "/api/v1/game-history?provider_code=JILI",
        None,
    )
    .await;
    assert_eq!(filtered["data"]["total"], 2);

    // Any status may follow any other
    let id = items[0]["id"].as_str().unwrap();
    for next in ["won", "pending", "cancelled"] {
        let (status, updated) = send_request(
            &app.router,
            Method::PATCH,
            &format!("/api/v1/game-history/{}/status", id),
            Some(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["status"], next);
    }

    let (status, _) = send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/game-history/{}/status", id),
        Some(json!({"status": "void"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_request(
        &app.router,
        Method::GET,
        "/api/v1/game-history?limit=1000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_summary_counts() {
    let app = test_app().await;

    create_game(&app, "1", 1).await;
    let (_, second) = create_game(&app, "2", 2).await;
    let id = second["data"]["id"].as_str().unwrap();
    send_request(
        &app.router,
        Method::PATCH,
        &format!("/api/v1/games/{}/status", id),
        Some(json!({"isActive": false})),
    )
    .await;
    send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/providers",
        Multipart::new().image("image"),
    )
    .await;

    let (status, summary) =
        send_request(&app.router, Method::GET, "/api/v1/dashboard/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["data"]["totalGames"], 2);
    assert_eq!(summary["data"]["activeGames"], 1);
    assert_eq!(summary["data"]["providers"], 1);
    assert_eq!(summary["data"]["sliders"], 0);
    assert_eq!(summary["data"]["pendingBets"], 0);
}

#[tokio::test]
async fn test_game_status_filter() {
    let app = test_app().await;

    create_game(&app, "10", 10).await;
    let (_, hidden) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/games",
        Multipart::new()
            .text("title", "Hidden")
            .text("gameId", "11")
            .text("serialNumber", "11")
            .text("status", "false")
            .image("image"),
    )
    .await;
    assert_eq!(hidden["data"]["status"], false);

    let (_, active) =
        send_request(&app.router, Method::GET, "/api/v1/games?status=true", None).await;
    let active = active["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["gameId"], "10");

    let (_, all) = send_request(&app.router, Method::GET, "/api/v1/games/admin", None).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let (_, disabled) =
        send_request(&app.router, Method::GET, "/api/v1/games?status=false", None).await;
    let disabled = disabled["data"].as_array().unwrap();
    assert_eq!(disabled.len(), 1);
    assert_eq!(disabled[0]["gameId"], "11");
}

#[tokio::test]
async fn test_game_lobby_hides_disabled_games_by_default() {
    let app = test_app().await;

    create_game(&app, "30", 2).await;
    create_game(&app, "31", 1).await;
    send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/games",
        Multipart::new()
            .text("title", "Maintenance")
            .text("gameId", "32")
            .text("serialNumber", "3")
            .text("status", "false")
            .image("image"),
    )
    .await;

    let (status, lobby) = send_request(&app.router, Method::GET, "/api/v1/games", None).await;
    assert_eq!(status, StatusCode::OK);
    let lobby = lobby["data"].as_array().unwrap();
    let ids: Vec<&str> = lobby.iter().map(|g| g["gameId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["31", "30"]);
}
