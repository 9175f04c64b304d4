use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::cookie::Key;
use actix_web::test as actix_test;
use actix_web::{
    App,
    http::{StatusCode, header},
    web,
};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use makler_roster::domain::makler::Makler;
use makler_roster::domain::types::MaklerId;
use makler_roster::repository::{HttpRosterRepository, StaticCredentials};
use makler_roster::routes::{alert_level_to_str, configure};
use makler_roster::services::persistence::SharedRoster;
use makler_roster::services::roster::RosterController;
use serde_json::{Value, json};
use tera::Tera;

fn roster_with(ids: &[i64], token: Option<&str>) -> web::Data<SharedRoster> {
    let credentials = Arc::new(StaticCredentials::new(token.map(str::to_string)));
    let mut controller = RosterController::new(credentials);
    if !ids.is_empty() {
        let records = ids
            .iter()
            .map(|id| Makler::new(MaklerId::new(*id).unwrap(), format!("Makler #{id}")))
            .collect();
        controller.complete_load(Ok(records)).unwrap();
    }
    web::Data::new(Mutex::new(controller))
}

fn unreachable_repo() -> web::Data<HttpRosterRepository> {
    let repo = HttpRosterRepository::new(
        "http://127.0.0.1:9/api/v1/makler/",
        "http://127.0.0.1:9/api/v1/makler/positions/",
        Duration::from_millis(200),
    )
    .expect("client builds");
    web::Data::new(repo)
}

fn flash_framework() -> FlashMessagesFramework {
    let store = CookieMessageStore::builder(Key::generate()).build();
    FlashMessagesFramework::builder(store).build()
}

fn row_ids(body: &Value) -> Vec<i64> {
    body["rows"]
        .as_array()
        .expect("rows array")
        .iter()
        .map(|row| row["id"].as_i64().expect("numeric id"))
        .collect()
}

fn over_body(target_index: usize, pointer_y: f64) -> Value {
    json!({
        "target_index": target_index,
        "pointer_y": pointer_y,
        "target_top": pointer_y - 10.0,
        "target_height": 40.0,
        "container_top": 0.0,
        "client_height": 500.0,
        "scroll_height": 1500.0,
        "scroll_top": 200.0
    })
}

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn drag_api_moves_rows_and_scrolls() {
    let roster = roster_with(&[1, 2, 3], Some("token"));
    let app = actix_test::init_service(
        App::new()
            .app_data(roster.clone())
            .configure(configure),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/start")
        .set_json(json!({"index": 2}))
        .to_request();
    let started: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(started["rows"][2]["dragging"], json!(true));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/over")
        .set_json(over_body(0, 480.0))
        .to_request();
    let moved: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(moved["moved"], json!(true));
    assert_eq!(moved["dirty"], json!(true));
    assert_eq!(row_ids(&moved), vec![3, 1, 2]);
    assert!(moved["scroll_top"].as_f64().unwrap() > 200.0);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/end")
        .to_request();
    let ended: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(ended["rows"][0]["dragging"], json!(false));
    assert_eq!(ended["rows"][0]["indicator"], Value::Null);
}

#[actix_web::test]
async fn pointer_past_the_container_edge_scrolls_without_moving() {
    let roster = roster_with(&[1, 2, 3], Some("token"));
    let app = actix_test::init_service(
        App::new()
            .app_data(roster.clone())
            .configure(configure),
    )
    .await;
    let scroll_body = json!({
        "pointer_y": 900.0,
        "container_top": 0.0,
        "client_height": 500.0,
        "scroll_height": 1500.0,
        "scroll_top": 200.0
    });

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/scroll")
        .set_json(scroll_body.clone())
        .to_request();
    let idle: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(idle["scrolled"], json!(false));
    assert_eq!(idle["scroll_top"], json!(200.0));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/start")
        .set_json(json!({"index": 0}))
        .to_request();
    actix_test::call_service(&app, req).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/scroll")
        .set_json(scroll_body)
        .to_request();
    let scrolled: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(scrolled["scrolled"], json!(true));
    assert_eq!(scrolled["scroll_top"], json!(260.0));
    assert!(!roster.lock().unwrap().is_dirty());
}

#[actix_web::test]
async fn drag_start_rejects_missing_rows() {
    let roster = roster_with(&[1], Some("token"));
    let app = actix_test::init_service(
        App::new()
            .app_data(roster.clone())
            .configure(configure),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/start")
        .set_json(json!({"index": 4}))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn drag_over_rejects_negative_geometry() {
    let roster = roster_with(&[1, 2], Some("token"));
    let app = actix_test::init_service(
        App::new()
            .app_data(roster.clone())
            .configure(configure),
    )
    .await;
    let mut body = over_body(1, 100.0);
    body["client_height"] = json!(-10.0);

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/makler/drag/over")
        .set_json(body)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn roster_page_renders_rows() {
    let roster = roster_with(&[7, 9], Some("token"));
    let tera = Tera::new("templates/**/*").expect("templates parse");
    let app = actix_test::init_service(
        App::new()
            .wrap(flash_framework())
            .app_data(roster.clone())
            .app_data(web::Data::new(tera))
            .configure(configure),
    )
    .await;

    let req = actix_test::TestRequest::get().uri("/makler").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = actix_test::read_body(resp).await;
    let html = std::str::from_utf8(&body).expect("utf-8 page");
    assert!(html.contains("Makler #7"));
    assert!(html.contains("Makler #9"));
    assert!(!html.contains("/makler/save"));
}

#[actix_web::test]
async fn roster_page_script_keeps_the_dragged_row_attached() {
    let roster = roster_with(&[1, 2], Some("token"));
    let tera = Tera::new("templates/**/*").expect("templates parse");
    let app = actix_test::init_service(
        App::new()
            .wrap(flash_framework())
            .app_data(roster.clone())
            .app_data(web::Data::new(tera))
            .configure(configure),
    )
    .await;

    let req = actix_test::TestRequest::get().uri("/makler").to_request();
    let body = actix_test::call_and_read_body(&app, req).await;
    let html = std::str::from_utf8(&body).expect("utf-8 page");

    assert!(!html.contains("innerHTML"));
    assert!(html.contains(r#"document.addEventListener("dragend""#));
    assert!(html.contains(r#"document.addEventListener("dragover""#));
    assert!(html.contains("/api/v1/makler/drag/scroll"));
}

#[actix_web::test]
async fn load_without_token_redirects_back() {
    let roster = roster_with(&[], None);
    let app = actix_test::init_service(
        App::new()
            .wrap(flash_framework())
            .app_data(roster.clone())
            .app_data(unreachable_repo())
            .configure(configure),
    )
    .await;

    let req = actix_test::TestRequest::post().uri("/makler/load").to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/makler");
    assert!(roster.lock().unwrap().current().is_empty());
}

#[actix_web::test]
async fn save_of_clean_roster_does_not_call_the_service() {
    let roster = roster_with(&[1, 2], Some("token"));
    let app = actix_test::init_service(
        App::new()
            .wrap(flash_framework())
            .app_data(roster.clone())
            .app_data(unreachable_repo())
            .configure(configure),
    )
    .await;

    let req = actix_test::TestRequest::post().uri("/makler/save").to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(!roster.lock().unwrap().is_busy());
}
