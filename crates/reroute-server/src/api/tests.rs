use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use reroute_core::{ConsoleEngine, Flight, FlightPhase, FlightStatus, GeoPoint, ScenarioId};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn flight(id: &str, destination: &str, speed_kts: f64, altitude: f64) -> Flight {
    let at = GeoPoint::new(40.0, -90.0);
    Flight {
        id: id.to_string(),
        callsign: id.to_string(),
        origin: "KORD".to_string(),
        origin_name: None,
        destination: destination.to_string(),
        destination_name: None,
        status: FlightStatus::Enroute,
        phase: FlightPhase::Cruise,
        altitude,
        base_altitude: altitude,
        speed_kts,
        latitude: at.lat,
        longitude: at.lon,
        risk_score: 0.3,
        is_emergency: false,
        frozen: false,
        path: vec![at, at],
        progress: 0.0,
        route: Some(format!("KORD DCT {destination}")),
    }
}

fn setup_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::default();
    let engine = ConsoleEngine::with_flights(
        config.engine.clone(),
        ScenarioId::Runway,
        vec![
            flight("HOT1", "KJFK", 450.0, 15_000.0),
            flight("COOL1", "KSFO", 360.0, 35_000.0),
        ],
    );
    let state = Arc::new(AppState::with_engine(engine, config));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn health_and_snapshot() {
    let (app, _state) = setup_app();

    let res = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.oneshot(get("/v1/snapshot")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["scenario"], "runway");
    assert_eq!(body["approval"], "open");
    assert_eq!(body["summary"]["totalFlights"], 2);
    assert_eq!(body["flights"].as_array().unwrap().len(), 2);
    assert_eq!(body["conditions"][0]["type"], "runway");
}

#[tokio::test]
async fn proposals_listed_for_high_risk_only() {
    let (app, _state) = setup_app();

    let res = app.oneshot(get("/v1/proposals")).await.unwrap();
    let body = read_json(res).await;
    let proposals = body.as_array().unwrap();
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0]["id"], "prop-HOT1");
    assert_eq!(proposals[0]["riskBefore"], 1.0);
    assert_eq!(proposals[0]["riskAfter"], 0.4);
    assert_eq!(proposals[0]["proposedRoute"], "KORD DCT RWYALT DCT KJFK");
}

#[tokio::test]
async fn approve_all_locks_session() {
    let (app, state) = setup_app();

    let res = app.clone().oneshot(post_empty("/v1/proposals/approve")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["applied"].as_array().unwrap().len(), 1);
    assert_eq!(body["snapshot"]["approval"], "locked");
    assert!(body["snapshot"]["proposals"].as_array().unwrap().is_empty());

    assert!(state.engine().flight("HOT1").unwrap().frozen);

    let res = app.clone().oneshot(post_empty("/v1/proposals/approve")).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.oneshot(get("/v1/approvals")).await.unwrap();
    let body = read_json(res).await;
    assert_eq!(body[0]["flightId"], "HOT1");
    assert_eq!(body[0]["applied"], true);
}

#[tokio::test]
async fn approve_with_nothing_open_is_conflict() {
    let (app, _state) = setup_app();
    let res = app
        .clone()
        .oneshot(post_json("/v1/scenario", json!({ "id": "wx" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["scenario"], "wx");
    assert!(body["proposals"].as_array().unwrap().is_empty());

    let res = app.oneshot(post_empty("/v1/proposals/approve")).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_scenario_is_bad_request() {
    let (app, state) = setup_app();
    let res = app
        .oneshot(post_json("/v1/scenario", json!({ "id": "volcano" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.engine().scenario(), ScenarioId::Runway);
}

#[tokio::test]
async fn reject_removes_proposal() {
    let (app, state) = setup_app();

    let res = app
        .clone()
        .oneshot(post_empty("/v1/proposals/prop-HOT1/reject"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(state.engine().proposals().is_empty());
    assert!(!state.engine().flight("HOT1").unwrap().frozen);

    let res = app
        .oneshot(post_empty("/v1/proposals/prop-HOT1/reject"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ingest_replaces_fleet() {
    let (app, state) = setup_app();
    let feed = json!({
        "data": [{
            "flight_status": "active",
            "departure": { "iata": "LAX", "icao": "KLAX" },
            "arrival": { "iata": "JFK", "icao": "KJFK" },
            "flight": { "iata": "AA100", "icao": "AAL100" },
            "live": {
                "latitude": 38.0,
                "longitude": -104.0,
                "altitude": 10000.0,
                "speed_horizontal": 800.0
            }
        }]
    });

    let res = app
        .clone()
        .oneshot(post_json("/v1/ingest?provider=aviationstack", feed))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body = read_json(res).await;
    assert_eq!(body["provider"], "aviationstack");
    assert_eq!(body["flights"], 10);
    assert_eq!(state.engine().flights().len(), 10);

    let res = app
        .oneshot(post_json("/v1/ingest?provider=opensky", json!([])))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scenario_catalog() {
    let (app, _state) = setup_app();
    let res = app.oneshot(get("/v1/scenarios")).await.unwrap();
    let body = read_json(res).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["wx", "runway", "staffing"]);
}

#[tokio::test]
async fn mutations_are_broadcast() {
    let (app, state) = setup_app();
    let mut rx = state.tx.subscribe();

    app.oneshot(post_json("/v1/scenario", json!({ "id": "staffing" })))
        .await
        .unwrap();

    let payload = rx.try_recv().expect("snapshot broadcast");
    let snapshot: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(snapshot["scenario"], "staffing");
}
