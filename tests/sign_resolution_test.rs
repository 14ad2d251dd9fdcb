use httpmock::prelude::*;
use natal_signs::{
    normalize, AstrologyApiClient, ChartError, SignPlacement, SignResolution, SignResolver,
    SignSource, ZodiacSign,
};
use std::time::Duration;

fn client(url: String) -> AstrologyApiClient {
    AstrologyApiClient::new(url, Duration::from_secs(2)).unwrap()
}

fn structured_input() -> serde_json::Value {
    serde_json::json!({
        "dateOfBirth": "1990-06-15",
        "geo": {"latitude": 40.7, "longitude": -74.0}
    })
}

#[tokio::test]
async fn test_api_placements_are_used() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/planets/tropical");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "planets": [
                    {"name": "Sun", "sign": "Gemini", "fullDegree": 84.1},
                    {"name": "Moon", "sign": "Aquarius", "fullDegree": 312.5},
                    {"name": "Mercury", "sign": "Gemini"}
                ]
            }));
    });

    let record = normalize(&structured_input()).unwrap();
    let resolver = SignResolver::new(client(server.url("/planets/tropical")));
    let placement = SignPlacement::from(resolver.resolve(&record).await);

    api_mock.assert();
    assert_eq!(placement.source, SignSource::Api);
    assert_eq!(placement.sun_sign, Some(ZodiacSign::Gemini));
    assert_eq!(placement.moon_sign, Some(ZodiacSign::Aquarius));
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/planets/tropical");
        then.status(500);
    });

    let record = normalize(&structured_input()).unwrap();
    let resolver = SignResolver::new(client(server.url("/planets/tropical")));
    let resolution = resolver.resolve(&record).await;

    // 只嘗試一次，不重試
    api_mock.assert_hits(1);
    assert_eq!(
        resolution,
        SignResolution::Fallback {
            sun_sign: ZodiacSign::Gemini,
            moon_sign: ZodiacSign::Capricorn,
        }
    );
}

#[tokio::test]
async fn test_empty_planet_list_falls_back() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/planets/tropical");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"planets": []}));
    });

    let record = normalize(&structured_input()).unwrap();
    let resolver = SignResolver::new(client(server.url("/planets/tropical")));
    assert_eq!(resolver.resolve(&record).await.source(), SignSource::Fallback);
}

#[tokio::test]
async fn test_unreachable_api_never_fails() {
    let record = normalize(&structured_input()).unwrap();
    let resolver = SignResolver::new(client("http://127.0.0.1:1/planets/tropical".to_string()));

    let placement = SignPlacement::from(resolver.resolve(&record).await);
    assert_eq!(placement.source, SignSource::Fallback);
    assert!(placement.sun_sign.is_some());
    assert!(placement.moon_sign.is_some());

    let again = SignPlacement::from(resolver.resolve(&record).await);
    assert_eq!(placement, again);
}

#[tokio::test]
async fn test_missing_lat_fails_before_api_call() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/planets/tropical");
        then.status(200).json_body(serde_json::json!({"planets": []}));
    });

    let raw = serde_json::json!({"day": 15, "month": 6, "year": 1990, "hour": 12, "min": 0, "lon": -74.0});
    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, ChartError::Normalization { .. }));

    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_out_of_range_hour_resolves_to_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/planets/tropical");
        then.status(503);
    });

    let raw = serde_json::json!({"day": 15, "month": 6, "year": 1990, "hour": 24, "min": 0, "lat": 0, "lon": 0});
    let record = normalize(&raw).unwrap();
    let resolver = SignResolver::new(client(server.url("/planets/tropical")));

    let placement = SignPlacement::from(resolver.resolve(&record).await);
    assert_eq!(placement, SignPlacement::unresolved());
}
