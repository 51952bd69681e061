mod common;

use common::{StubResponse, StubServer};
use nettleie::NettleieError;
use nettleie::config::{ApiConfig, CredentialsConfig, HttpConfig};
use nettleie::http::HttpExecutor;
use nettleie::tariff::{TariffClient, view};
use serde_json::json;

fn credentials() -> CredentialsConfig {
    CredentialsConfig {
        customer_id: "123456".to_string(),
        metering_point_id: "707057500012345678".to_string(),
    }
}

fn client_for(server: &StubServer) -> TariffClient {
    let api = ApiConfig {
        auth_url: format!("{}/Auth/Generate", server.url),
        tariffs_url: format!("{}/TariffQuery/MeteringPointsGridTariffs", server.url),
    };
    let http = HttpConfig {
        timeout_secs: 5,
        max_attempts: 1,
        backoff_base_ms: 10,
    };
    TariffClient::new(credentials(), &api, HttpExecutor::new(&http).unwrap())
}

fn sample_document() -> serde_json::Value {
    json!({
        "gridTariffCollections": [{
            "meteringPointsAndPriceLevels": [
                {"currentFixedPriceLevel": {"id": "lvl_A"}}
            ],
            "gridTariff": {
                "tariffPrice": {
                    "priceInfo": {
                        "fixedPrices": [{
                            "priceLevels": [{
                                "monthlyTotal": 340.0,
                                "monthlyTotalExVat": 272.0,
                                "monthlyExTaxes": 250.0,
                                "monthlyTaxes": 90.0,
                                "monthlyUnitOfMeasure": "kr/mnd"
                            }]
                        }]
                    },
                    "hours": [
                        {"shortName": "10-11", "energyPrice": {"total": 0.55, "totalExVat": 0.44}}
                    ]
                }
            }
        }]
    })
}

#[tokio::test]
async fn fetch_data_runs_the_two_call_protocol() {
    let server = StubServer::spawn(vec![
        StubResponse::Json(json!({"apiKey": "k1"})),
        StubResponse::Json(sample_document()),
    ])
    .await;

    let snapshot = client_for(&server).fetch_data().await.unwrap();

    assert_eq!(server.hits(), 2);
    assert_eq!(view::current_price_level(&snapshot), Some("lvl_A"));
    assert_eq!(view::price_at_hour(&snapshot, 10), Some(0.55));
    let map = view::hourly_map(&snapshot);
    assert_eq!(map.len(), 1);
    assert_eq!(map["10-11"].total, Some(0.55));
    assert_eq!(map["10-11"].total_ex_vat, Some(0.44));

    let requests = server.requests();
    // Auth call carries the credentials
    assert!(requests[0].contains("customerId"));
    assert!(requests[0].contains("123456"));
    assert!(requests[0].contains("meteringPointId"));

    // Tariff call carries the fresh api key and the same-instant window
    let tariff_request = &requests[1];
    assert!(tariff_request.to_lowercase().contains("x-api-key: k1"));
    assert!(tariff_request.contains("\"range\":\"today\""));
    assert!(tariff_request.contains("707057500012345678"));
    let body_start = tariff_request.find("\r\n\r\n").unwrap() + 4;
    let body: serde_json::Value = serde_json::from_str(&tariff_request[body_start..]).unwrap();
    assert_eq!(body["startTime"], body["endTime"]);
    // Whole-second ISO-8601 local timestamp, e.g. 2025-03-07T14:03:05
    assert_eq!(body["startTime"].as_str().unwrap().len(), 19);
}

#[tokio::test]
async fn missing_api_key_is_a_parse_failure() {
    let server = StubServer::spawn(vec![StubResponse::Json(json!({"message": "ok"}))]).await;

    let result = client_for(&server).fetch_data().await;
    assert!(matches!(result, Err(NettleieError::Parse { .. })));
    // The tariff endpoint is never queried without a key
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn auth_failure_propagates_as_fetch_failure() {
    let server = StubServer::spawn(vec![StubResponse::Status(401)]).await;

    let result = client_for(&server).fetch_data().await;
    assert!(matches!(result, Err(NettleieError::Network { .. })));
    assert_eq!(server.hits(), 1);
}
