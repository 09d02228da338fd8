use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use rating_recommender::{
    api::{create_router, AppState},
    config::Config,
    models::{Dataset, Item, ItemDetails, RatingTriple, User},
    store::RatingStore,
};

fn movie(id: i64, title: &str, genre: &str) -> Item {
    Item::new(
        id,
        title,
        ItemDetails::Movie {
            genre: genre.to_string(),
            imdb_id: None,
            tmdb_id: None,
            tags: vec![],
        },
    )
}

fn create_test_server() -> TestServer {
    let dataset = Dataset {
        users: vec![User::new(1), User::new(2), User::new(3), User::new(4)],
        items: vec![
            movie(10, "Toy Story (1995)", "Adventure"),
            movie(20, "Jumanji (1995)", "Adventure"),
            movie(30, "Heat (1995)", "Action"),
            movie(40, "Sabrina (1995)", "Comedy"),
        ],
        ratings: vec![
            RatingTriple::new(1, 10, 5.0),
            RatingTriple::new(2, 10, 5.0),
            RatingTriple::new(2, 20, 4.0),
            RatingTriple::new(2, 30, 2.0),
            RatingTriple::new(3, 10, 4.0),
            RatingTriple::new(3, 20, 5.0),
            RatingTriple::new(3, 30, 1.0),
            RatingTriple::new(4, 20, 3.0),
            RatingTriple::new(4, 30, 2.0),
            RatingTriple::new(4, 40, 4.0),
        ],
    };

    let config = Config {
        min_votes: 3,
        neighbors: 2,
        default_n: 5,
        ..Config::default()
    };

    let state = AppState::new(RatingStore::build(dataset), config);
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_stats() {
    let server = create_test_server();
    let response = server.get("/stats").await;
    response.assert_status_ok();
    let stats: Value = response.json();
    assert_eq!(stats["users"], 4);
    assert_eq!(stats["items"], 4);
    assert_eq!(stats["ratings"], 10);
}

#[tokio::test]
async fn test_get_user_and_item() {
    let server = create_test_server();

    let response = server.get("/users/2").await;
    response.assert_status_ok();
    let user: Value = response.json();
    assert_eq!(user["id"], 2);

    let response = server.get("/items/30").await;
    response.assert_status_ok();
    let item: Value = response.json();
    assert_eq!(item["title"], "Heat (1995)");
    assert_eq!(item["category"], "movie");

    server.get("/users/99").await.assert_status(StatusCode::NOT_FOUND);
    server.get("/items/99").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_popular_recommendations() {
    let server = create_test_server();

    let response = server
        .get("/users/1/recommendations")
        .add_query_param("strategy", "popular")
        .await;
    response.assert_status_ok();

    // Only items 20 and 30 have at least 3 votes; user 1 already rated item 10
    let recs: Vec<Value> = response.json();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["rank"], 1);
    assert_eq!(recs[0]["item"]["id"], 20);
    assert_eq!(recs[1]["item"]["id"], 30);
    assert!(recs[0]["score"].as_f64().unwrap() > recs[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_collaborative_recommendations() {
    let server = create_test_server();

    let response = server
        .get("/users/1/recommendations")
        .add_query_param("strategy", "collaborative")
        .add_query_param("n", 2)
        .await;
    response.assert_status_ok();

    let recs: Vec<Value> = response.json();
    assert_eq!(recs.len(), 2);
    assert!(recs.iter().all(|r| r["item"]["id"] != 10));
    assert!(recs[0]["score"].as_f64().unwrap() >= recs[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let server = create_test_server();
    let response = server.get("/users/77/recommendations").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("77"));
}

#[tokio::test]
async fn test_invalid_parameters_are_400() {
    let server = create_test_server();

    server
        .get("/users/1/recommendations")
        .add_query_param("strategy", "random")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/users/1/recommendations")
        .add_query_param("n", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/users/1/recommendations")
        .add_query_param("strategy", "collaborative")
        .add_query_param("k", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get("/users/1/recommendations")
        .add_query_param("min_votes", 0)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert_eq!(header.to_str().unwrap().len(), 36);
}
