use actix_web::{
    http::{header::ContentType, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use chrono::{Days, Utc};
use espresso_engine::{db_types::Drink, traits::DrinkApiError, MenuApi};
use serde_json::json;

use super::{
    helpers::{assert_error_envelope, issue_token, send_request, with_bearer},
    mocks::{matcha, water, MockDrinkManager},
};
use crate::routes::{CreateDrinkRoute, DeleteDrinkRoute, DrinksDetailRoute, DrinksRoute, UpdateDrinkRoute};

fn staff_token(permission: &str) -> String {
    issue_token("barista@espresso.test", Some(&[permission]), Utc::now() + Days::new(1))
}

fn add_menu(cfg: &mut ServiceConfig, db: MockDrinkManager) {
    cfg.app_data(web::Data::new(MenuApi::new(db)));
}

//----------------------------------------------   GET /drinks  ------------------------------------------------

fn configure_public_menu(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().times(1).returning(|| Ok(vec![water(), matcha()]));
    cfg.service(DrinksRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn public_menu_needs_no_token_and_hides_ingredient_names() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), configure_public_menu).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["drinks"].as_array().unwrap().len(), 2);
    for drink in json["drinks"].as_array().unwrap() {
        for ingredient in drink["recipe"].as_array().unwrap() {
            assert!(ingredient.get("name").is_none(), "short form must not expose names: {body}");
            assert!(ingredient.get("color").is_some());
            assert!(ingredient.get("parts").is_some());
        }
    }
}

fn configure_public_menu_failing(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().times(1).returning(|| Err(DrinkApiError::DatabaseError("disk on fire".to_string())));
    cfg.service(DrinksRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn public_menu_store_failure_is_a_bad_request() {
    let (status, body) = send_request(TestRequest::get().uri("/drinks"), configure_public_menu_failing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, status, None);
}

//----------------------------------------------   GET /drinks-detail  -----------------------------------------

fn configure_detail(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drinks().times(1).returning(|| Ok(vec![water()]));
    cfg.service(DrinksDetailRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn detailed_menu_returns_the_long_form() {
    let token = staff_token("get:drinks-detail");
    let (status, body) =
        send_request(with_bearer(TestRequest::get().uri("/drinks-detail"), &token), configure_detail).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["drinks"][0]["recipe"][0]["name"], json!("water"));
}

//----------------------------------------------   POST /drinks  -----------------------------------------------

fn configure_create(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink()
        .withf(|drink| drink.title == "Water" && drink.recipe.len() == 1)
        .times(1)
        .returning(|_| Ok(water()));
    cfg.service(CreateDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn create_drink_returns_the_new_record_in_long_form() {
    let token = staff_token("post:drinks");
    let req = with_bearer(TestRequest::post().uri("/drinks"), &token)
        .set_json(json!({"title": "Water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]}));
    let (status, body) = send_request(req, configure_create).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["drinks"].as_array().unwrap().len(), 1);
    assert_eq!(json["drinks"][0]["title"], json!("Water"));
    assert_eq!(json["drinks"][0]["recipe"][0]["name"], json!("water"));
}

fn configure_create_untouched(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink().never();
    cfg.service(CreateDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn create_without_title_is_unprocessable() {
    let token = staff_token("post:drinks");
    let req = with_bearer(TestRequest::post().uri("/drinks"), &token)
        .set_json(json!({"recipe": [{"name": "water", "color": "blue", "parts": 1}]}));
    let (status, body) = send_request(req, configure_create_untouched).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body, status, None);
}

#[actix_web::test]
async fn create_with_empty_recipe_is_unprocessable() {
    let token = staff_token("post:drinks");
    let req = with_bearer(TestRequest::post().uri("/drinks"), &token)
        .set_json(json!({"title": "Water", "recipe": []}));
    let (status, body) = send_request(req, configure_create_untouched).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body, status, None);
}

#[actix_web::test]
async fn create_with_malformed_body_is_a_bad_request() {
    let token = staff_token("post:drinks");
    let req = with_bearer(TestRequest::post().uri("/drinks"), &token)
        .insert_header(ContentType::json())
        .set_payload("{not json");
    let (status, body) = send_request(req, configure_create_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, status, None);
}

fn configure_create_duplicate(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_insert_drink()
        .times(1)
        .returning(|drink| Err(DrinkApiError::TitleExists(drink.title)));
    cfg.service(CreateDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn create_with_duplicate_title_is_unprocessable() {
    let token = staff_token("post:drinks");
    let req = with_bearer(TestRequest::post().uri("/drinks"), &token)
        .set_json(json!({"title": "Water", "recipe": [{"name": "water", "color": "blue", "parts": 1}]}));
    let (status, body) = send_request(req, configure_create_duplicate).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body, status, None);
}

//----------------------------------------------   PATCH /drinks/{id}  -----------------------------------------

fn configure_update(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().withf(|id| *id == 1).times(1).returning(|_| Ok(Some(water())));
    db.expect_update_drink()
        .withf(|id, update| {
            *id == 1 && update.title.as_deref() == Some("Sparkling Water") && update.recipe.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(Drink { title: "Sparkling Water".to_string(), ..water() }));
    cfg.service(UpdateDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn patch_changes_only_the_title() {
    let token = staff_token("patch:drinks");
    let req = with_bearer(TestRequest::patch().uri("/drinks/1"), &token)
        .set_json(json!({"title": "Sparkling Water"}));
    let (status, body) = send_request(req, configure_update).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["drinks"][0]["title"], json!("Sparkling Water"));
    // The recipe is untouched by a title-only patch.
    assert_eq!(json["drinks"][0]["recipe"][0]["name"], json!("water"));
}

fn configure_update_empty(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().withf(|id| *id == 1).times(1).returning(|_| Ok(Some(water())));
    db.expect_update_drink().never();
    cfg.service(UpdateDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn patch_with_an_empty_body_is_a_no_op() {
    let token = staff_token("patch:drinks");
    let req = with_bearer(TestRequest::patch().uri("/drinks/1"), &token).set_json(json!({}));
    let (status, body) = send_request(req, configure_update_empty).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["drinks"][0]["title"], json!("Water"));
}

fn configure_update_missing(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().times(1).returning(|_| Ok(None));
    db.expect_update_drink().never();
    cfg.service(UpdateDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn patch_of_a_missing_drink_is_not_found_and_mutates_nothing() {
    let token = staff_token("patch:drinks");
    let req = with_bearer(TestRequest::patch().uri("/drinks/999"), &token)
        .set_json(json!({"title": "Ghost"}));
    let (status, body) = send_request(req, configure_update_missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body, status, None);
}

//----------------------------------------------   DELETE /drinks/{id}  ----------------------------------------

fn configure_delete(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().withf(|id| *id == 1).times(1).returning(|_| Ok(Some(water())));
    db.expect_delete_drink().withf(|id| *id == 1).times(1).returning(|_| Ok(()));
    cfg.service(DeleteDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn delete_returns_the_deleted_id() {
    let token = staff_token("delete:drinks");
    let (status, body) =
        send_request(with_bearer(TestRequest::delete().uri("/drinks/1"), &token), configure_delete).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json, json!({"success": true, "delete": 1}));
}

fn configure_delete_missing(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().times(1).returning(|_| Ok(None));
    db.expect_delete_drink().never();
    cfg.service(DeleteDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn delete_of_a_missing_drink_is_not_found() {
    let token = staff_token("delete:drinks");
    let (status, body) =
        send_request(with_bearer(TestRequest::delete().uri("/drinks/999"), &token), configure_delete_missing).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body, status, None);
}

fn configure_delete_failing(cfg: &mut ServiceConfig) {
    let mut db = MockDrinkManager::new();
    db.expect_fetch_drink().times(1).returning(|_| Ok(Some(water())));
    db.expect_delete_drink()
        .times(1)
        .returning(|_| Err(DrinkApiError::DatabaseError("disk on fire".to_string())));
    cfg.service(DeleteDrinkRoute::<MockDrinkManager>::new());
    add_menu(cfg, db);
}

#[actix_web::test]
async fn delete_store_failure_is_unprocessable() {
    let token = staff_token("delete:drinks");
    let (status, body) =
        send_request(with_bearer(TestRequest::delete().uri("/drinks/1"), &token), configure_delete_failing).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body, status, None);
}
