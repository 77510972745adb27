mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{send_multipart, send_request, test_app, test_app_on_disk, Multipart};

#[tokio::test]
async fn test_get_returns_defaults_without_writing() {
    let app = test_app().await;

    let (status, response) =
        send_request(&app.router, Method::GET, "/api/v1/settings/navbar", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["backgroundColor"], "#1a1a2e");
    assert_eq!(response["data"]["sticky"], true);

    assert_eq!(app.count_rows("settings_documents").await, 0);
}

#[tokio::test]
async fn test_post_then_get_round_trips_submitted_values() {
    let app = test_app().await;

    let (status, _) = send_request(
        &app.router,
        Method::POST,
        "/api/v1/settings/theme",
        Some(json!({"primaryColor": "#ff0000", "darkMode": false, "borderRadius": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, response) =
        send_request(&app.router, Method::GET, "/api/v1/settings/theme", None).await;
    let theme = &response["data"];
    assert_eq!(theme["primaryColor"], "#ff0000");
    assert_eq!(theme["darkMode"], false);
    assert_eq!(theme["borderRadius"], 4);
    // untouched fields keep their defaults
    assert_eq!(theme["accentColor"], "#22c55e");

    send_request(
        &app.router,
        Method::POST,
        "/api/v1/settings/theme",
        Some(json!({"accentColor": "#000"})),
    )
    .await;
    let (_, response) =
        send_request(&app.router, Method::GET, "/api/v1/settings/theme", None).await;
    assert_eq!(response["data"]["primaryColor"], "#ff0000");
    assert_eq!(response["data"]["accentColor"], "#000");
}

#[tokio::test]
async fn test_invalid_settings_are_rejected() {
    let app = test_app().await;

    for body in [
        json!({"unknownField": 1}),
        json!({"textColor": "red"}),
        json!({"fontSize": 2}),
        json!({"sticky": "yes"}),
    ] {
        let (status, response) = send_request(
            &app.router,
            Method::POST,
            "/api/v1/settings/navbar",
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["success"], false);
    }

    assert_eq!(app.count_rows("settings_documents").await, 0);
}

#[tokio::test]
async fn test_concurrent_first_saves_create_one_document() {
    let app = test_app_on_disk(4).await;

    let saves = (0..8).map(|i| {
        let router = app.router.clone();
        async move {
            send_request(
                &router,
                Method::POST,
                "/api/v1/settings/bottom-navbar",
                Some(json!({"fontSize": 10 + i})),
            )
            .await
        }
    });
    for (status, _) in futures::future::join_all(saves).await {
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.count_rows("settings_documents").await, 1);
}

#[tokio::test]
async fn test_logo_partial_update_replaces_only_uploaded_fields() {
    let app = test_app().await;

    let (status, response) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/logo",
        Multipart::new().image("mainLogo").image("favicon"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let main_logo = response["data"]["mainLogo"].as_str().unwrap().to_string();
    let favicon = response["data"]["favicon"].as_str().unwrap().to_string();
    assert!(response["data"]["mobileLogo"].is_null());

    let (status, response) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/logo",
        Multipart::new().image("mainLogo"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_main_logo = response["data"]["mainLogo"].as_str().unwrap();

    assert_ne!(new_main_logo, main_logo);
    assert_eq!(response["data"]["favicon"], favicon.as_str());
    assert!(!app.upload_exists(&main_logo));
    assert!(app.upload_exists(new_main_logo));
    assert!(app.upload_exists(&favicon));
}

#[tokio::test]
async fn test_footer_text_and_social_links() {
    let app = test_app().await;

    let (status, response) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/footer",
        Multipart::new()
            .text("copyrightText", "© 2024 Site")
            .image("licenseImage"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["copyrightText"], "© 2024 Site");
    assert!(response["data"]["licenseImage"].is_string());

    // Missing link URL: rejected with nothing left on disk
    let files_before = app.upload_files();
    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/footer/social-links",
        Multipart::new().image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.upload_files(), files_before);

    let (status, response) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/footer/social-links",
        Multipart::new()
            .text("linkUrl", "https://t.me/site")
            .image("image"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let links = response["data"]["socialLinks"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(response["data"]["copyrightText"], "© 2024 Site");
    let link_id = links[0]["id"].as_str().unwrap().to_string();
    let link_image = links[0]["imageUrl"].as_str().unwrap().to_string();
    assert!(app.upload_exists(&link_image));

    let (status, response) = send_request(
        &app.router,
        Method::DELETE,
        &format!("/api/v1/footer/social-links/{}", link_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["id"], link_id.as_str());
    assert!(!app.upload_exists(&link_image));

    let (status, _) = send_request(
        &app.router,
        Method::DELETE,
        &format!("/api/v1/footer/social-links/{}", link_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_footer_text_can_be_cleared() {
    let app = test_app().await;

    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/footer",
        Multipart::new()
            .text("description", "Old text")
            .text("copyrightText", "© Site"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/footer",
        Multipart::new().text("description", ""),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["description"], "");
    assert_eq!(response["data"]["copyrightText"], "© Site");

    let (_, response) = send_request(&app.router, Method::GET, "/api/v1/footer", None).await;
    assert_eq!(response["data"]["description"], "");

    // Colors still have to be valid
    let (status, _) = send_multipart(
        &app.router,
        Method::POST,
        "/api/v1/footer",
        Multipart::new().text("textColor", ""),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_logo_saves_keep_only_the_current_file() {
    let app = test_app_on_disk(4).await;

    let saves = (0..6).map(|_| {
        let router = app.router.clone();
        async move {
            send_multipart(
                &router,
                Method::POST,
                "/api/v1/logo",
                Multipart::new().image("mainLogo"),
            )
            .await
        }
    });
    for (status, _) in futures::future::join_all(saves).await {
        assert_eq!(status, StatusCode::OK);
    }

    let (_, response) = send_request(&app.router, Method::GET, "/api/v1/logo", None).await;
    let main_logo = response["data"]["mainLogo"].as_str().unwrap().to_string();
    assert!(app.upload_exists(&main_logo));
    assert_eq!(app.upload_files().len(), 1);
    assert_eq!(app.count_rows("settings_documents").await, 1);
}
