//! Pagination and listing-context behavior over HTTP: fixed pages of 10,
//! lenient page-number handling, and strict group isolation.

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use yatube::db::MemStore;
use yatube::handlers;

/// 13 posts by "auth", all in the "test-slug" group; a second group stays
/// empty.
async fn seeded_store() -> Arc<MemStore> {
    let store = Arc::new(MemStore::new());
    let author = common::user(&store, "auth").await;
    let group = common::group(&store, "Test group", "test-slug").await;
    common::group(&store, "Second group", "test-slug-2").await;
    for i in 0..13 {
        common::post(&store, &author, Some(&group), &format!("Test post text {i}")).await;
    }
    store
}

#[actix_web::test]
async fn first_page_holds_ten_posts_on_every_listing() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    for path in ["/", "/group/test-slug/", "/profile/auth/"] {
        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri(path).to_request()).await;
        let body = String::from_utf8_lossy(&body);
        assert_eq!(common::count_post_cards(&body), 10, "{path}");
        assert!(body.contains("Page 1 of 2"), "{path}");
    }
}

#[actix_web::test]
async fn second_page_holds_the_remaining_three_posts() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    for path in [
        "/?page=2",
        "/group/test-slug/?page=2",
        "/profile/auth/?page=2",
    ] {
        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri(path).to_request()).await;
        let body = String::from_utf8_lossy(&body);
        assert_eq!(common::count_post_cards(&body), 3, "{path}");
        assert!(body.contains("Page 2 of 2"), "{path}");
    }
}

#[actix_web::test]
async fn page_past_the_end_falls_back_to_the_last_page() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get().uri("/?page=99").to_request(),
    )
    .await;
    let body = String::from_utf8_lossy(&body);
    assert_eq!(common::count_post_cards(&body), 3);
    assert!(body.contains("Page 2 of 2"));
}

#[actix_web::test]
async fn garbage_page_parameter_falls_back_to_the_first_page() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    let body = test::call_and_read_body(
        &app,
        test::TestRequest::get().uri("/?page=abc").to_request(),
    )
    .await;
    let body = String::from_utf8_lossy(&body);
    assert_eq!(common::count_post_cards(&body), 10);
    assert!(body.contains("Page 1 of 2"));
}

#[actix_web::test]
async fn a_post_never_leaks_into_another_group_listing() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/group/test-slug-2/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert_eq!(common::count_post_cards(&body), 0);
    assert!(!body.contains("Test post text"));
}

#[actix_web::test]
async fn newest_post_appears_on_the_first_page() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    for path in ["/", "/group/test-slug/", "/profile/auth/"] {
        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri(path).to_request()).await;
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("Test post text 12"), "{path}");
        assert!(!body.contains("Test post text 0"), "{path}");
    }
}

#[actix_web::test]
async fn post_detail_exposes_text_group_and_author() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(common::state(store))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await;

    let body =
        test::call_and_read_body(&app, test::TestRequest::get().uri("/posts/1/").to_request())
            .await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Test post text 0"));
    assert!(body.contains("Test group"));
    assert!(body.contains("auth"));
}
