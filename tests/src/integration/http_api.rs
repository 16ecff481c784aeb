//! # REST Contract
//!
//! Drives the assembled router in-process with `tower::ServiceExt::oneshot`:
//! the full middleware stack, authentication on `/api`, role gates, the
//! `{code, message}` error body and the populated read views.

#[cfg(test)]
mod tests {
    use crate::integration::support::{battery_body, shipment_body, TestFleet};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use fleet_runtime::FleetConfig;
    use fleet_types::Role;
    use serde_json::json;

    // =========================================================================
    // PUBLIC ENDPOINTS
    // =========================================================================

    #[tokio::test]
    async fn test_public_endpoints_need_no_token() {
        let fleet = TestFleet::new();

        let (status, body) = fleet.call(Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Fleet manager API is running"));

        let (status, body) = fleet.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_metrics_count_served_requests() {
        let fleet = TestFleet::new();
        fleet.call(Method::GET, "/health", None, None).await;

        let (status, body) = fleet.call(Method::GET, "/metrics", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let text = body.as_str().unwrap();
        assert!(text.contains("fleet_http_requests_total"));
    }

    // =========================================================================
    // AUTHENTICATION AND ROLES
    // =========================================================================

    #[tokio::test]
    async fn test_api_requires_credentials() {
        let fleet = TestFleet::new();

        let (status, body) = fleet.call(Method::GET, "/api/batteries", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _) = fleet
            .call(Method::GET, "/api/batteries", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_cookie_authenticates() {
        let fleet = TestFleet::new();
        let (_, token) = fleet.login(Role::Operator);

        let request = Request::builder()
            .uri("/api/batteries")
            .header(header::COOKIE, format!("theme=dark; jwt={token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = fleet.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_role_gates() {
        let fleet = TestFleet::new();
        let (_, operator) = fleet.login(Role::Operator);
        let (_, manager) = fleet.login(Role::Manager);
        let (_, admin) = fleet.login(Role::Admin);

        let (status, body) = fleet
            .call(Method::POST, "/api/batteries", Some(&operator), Some(battery_body("BAT-1")))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "PERMISSION_DENIED");

        let (status, created) = fleet
            .call(Method::POST, "/api/batteries", Some(&manager), Some(battery_body("BAT-1")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/batteries/{}", created["id"].as_str().unwrap());

        let (status, _) = fleet.call(Method::DELETE, &uri, Some(&manager), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = fleet.call(Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Battery removed");

        let (status, _) = fleet.call(Method::GET, "/api/users", Some(&manager), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, users) = fleet.call(Method::GET, "/api/users", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(users.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_profile_returns_caller() {
        let fleet = TestFleet::new();
        let (id, token) = fleet.login(Role::Operator);

        let (status, body) = fleet
            .call(Method::GET, "/api/users/profile", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["role"], "operator");
    }

    #[tokio::test]
    async fn test_profile_edit_keeps_role() {
        let fleet = TestFleet::new();
        let (id, token) = fleet.login(Role::Operator);
        let body = json!({ "name": "Ada Byron", "email": "Ada@Fleet.Test", "role": "admin" });

        let (status, updated) = fleet
            .call(Method::PUT, "/api/users/profile", Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id.to_string());
        assert_eq!(updated["name"], "Ada Byron");
        assert_eq!(updated["email"], "ada@fleet.test");
        assert_eq!(updated["role"], "operator");

        let (_, profile) = fleet
            .call(Method::GET, "/api/users/profile", Some(&token), None)
            .await;
        assert_eq!(profile["name"], "Ada Byron");
        assert_eq!(profile["role"], "operator");
    }

    // =========================================================================
    // BATTERIES
    // =========================================================================

    #[tokio::test]
    async fn test_battery_errors_map_to_codes() {
        let fleet = TestFleet::new();
        let (_, manager) = fleet.login(Role::Manager);

        let (status, created) = fleet
            .call(Method::POST, "/api/batteries", Some(&manager), Some(battery_body("BAT-1")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Available");
        assert_eq!(created["ageYears"], 2);

        let (status, body) = fleet
            .call(Method::POST, "/api/batteries", Some(&manager), Some(battery_body("BAT-1")))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_KEY");
        assert!(body["message"].as_str().unwrap().contains("BAT-1"));

        let missing = format!("/api/batteries/{}", fleet_types::new_entity_id());
        let (status, body) = fleet.call(Method::GET, &missing, Some(&manager), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, body) = fleet
            .call(Method::GET, "/api/batteries/not-an-id", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/batteries")
            .header(header::AUTHORIZATION, format!("Bearer {manager}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"serialNumber\": "))
            .unwrap();
        let (status, body) = fleet.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_operator_updates_charge_within_bounds() {
        let fleet = TestFleet::new();
        let battery = fleet.battery("BAT-1");
        let (_, operator) = fleet.login(Role::Operator);
        let uri = format!("/api/batteries/{}/charge", battery.id);

        let (status, body) = fleet
            .call(Method::PUT, &uri, Some(&operator), Some(json!({ "currentCharge": 42.5 })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["currentCharge"], 42.5);

        let (status, body) = fleet
            .call(Method::PUT, &uri, Some(&operator), Some(json!({ "currentCharge": 150 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");

        let (status, _) = fleet
            .call(Method::PUT, &uri, Some(&operator), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_battery_list_filters_and_pages() {
        let fleet = TestFleet::new();
        for n in 0..12 {
            fleet.battery(&format!("BAT-{n:02}"));
        }
        let (_, operator) = fleet.login(Role::Operator);

        let (status, body) = fleet
            .call(Method::GET, "/api/batteries?pageNumber=2", Some(&operator), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 2);
        assert_eq!(body["pages"], 2);
        assert_eq!(body["total"], 12);
        assert_eq!(body["batteries"].as_array().unwrap().len(), 2);

        let (status, body) = fleet
            .call(Method::GET, "/api/batteries?keyword=bat-07", Some(&operator), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);

        let (status, body) = fleet
            .call(Method::GET, "/api/batteries?status=Exploded", Some(&operator), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
    }

    #[tokio::test]
    async fn test_battery_read_embeds_its_shipment() {
        let fleet = TestFleet::new();
        let battery = fleet.battery("BAT-1");
        let shipment = fleet.shipment("SHP-1", &[battery.id]);
        let (_, operator) = fleet.login(Role::Operator);

        let (status, body) = fleet
            .call(Method::GET, &format!("/api/batteries/{}", battery.id), Some(&operator), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "In Transit");
        assert_eq!(body["shipment"]["id"], shipment.id.to_string());
        assert_eq!(body["shipment"]["shipmentNumber"], "SHP-1");
    }

    // =========================================================================
    // SHIPMENTS
    // =========================================================================

    #[tokio::test]
    async fn test_shipment_create_and_populated_read() {
        let fleet = TestFleet::new();
        let battery = fleet.battery("BAT-1");
        let (manager_id, manager) = fleet.login(Role::Manager);

        let mut body = shipment_body("SHP-1", &[battery.id]);
        body["assignedTo"] = json!(manager_id);
        let (status, created) = fleet
            .call(Method::POST, "/api/shipments", Some(&manager), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Preparing");
        assert_eq!(created["batteryCount"], 1);
        assert_eq!(created["durationDays"], 3);
        assert_eq!(created["statusUpdates"][0]["updatedBy"], manager_id.to_string());

        let uri = format!("/api/shipments/{}", created["id"].as_str().unwrap());
        let (status, fetched) = fleet.call(Method::GET, &uri, Some(&manager), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["batteries"][0]["serialNumber"], "BAT-1");
        assert_eq!(fetched["batteries"][0]["status"], "In Transit");
        assert_eq!(fetched["assignedTo"]["id"], manager_id.to_string());
        assert_eq!(fetched["assignedTo"]["name"], "manager user");
        assert_eq!(fetched["statusUpdates"][0]["updatedBy"]["id"], manager_id.to_string());
        assert_eq!(fetched["statusUpdates"][0]["updatedBy"]["name"], "manager user");

        let (status, page) = fleet
            .call(Method::GET, "/api/shipments", Some(&manager), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let row = &page["shipments"][0];
        assert_eq!(row["assignedTo"]["name"], "manager user");
        assert_eq!(row["batteries"][0], battery.id.to_string());
    }

    #[tokio::test]
    async fn test_edit_form_body_clears_blank_fields() {
        let fleet = TestFleet::new();
        let battery = fleet.battery("BAT-1");
        let (_, manager) = fleet.login(Role::Manager);
        let mut body = shipment_body("SHP-1", &[battery.id]);
        body["trackingNumber"] = json!("TRK-1");
        let (_, created) = fleet
            .call(Method::POST, "/api/shipments", Some(&manager), Some(body))
            .await;
        let uri = format!("/api/shipments/{}", created["id"].as_str().unwrap());

        let form = json!({
            "shipmentNumber": "SHP-1",
            "origin": "Dock A",
            "destination": "Dock B",
            "departureDate": "2024-06-03",
            "estimatedArrival": "2024-06-06",
            "status": "In Transit",
            "carrier": "Northbound Freight",
            "trackingNumber": "",
            "batteries": [battery.id],
            "currentLocation": "Dock A",
            "specialInstructions": "",
            "hazardClass": "Class 9",
            "customsInformation": "",
            "assignedTo": "",
        });
        let (status, updated) = fleet
            .call(Method::PUT, &uri, Some(&manager), Some(form))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "In Transit");
        assert!(updated.get("trackingNumber").is_none());
        assert!(updated["assignedTo"].is_null());
        assert_eq!(updated["batteries"][0], battery.id.to_string());
    }

    #[tokio::test]
    async fn test_shipment_transition_through_http() {
        let fleet = TestFleet::new();
        let battery = fleet.battery("BAT-1");
        let shipment = fleet.shipment("SHP-1", &[battery.id]);
        let (manager_id, manager) = fleet.login(Role::Manager);
        let (_, operator) = fleet.login(Role::Operator);
        let uri = format!("/api/shipments/{}", shipment.id);
        let delivered = json!({ "status": "Delivered", "currentLocation": "Dock B" });

        let (status, _) = fleet
            .call(Method::PUT, &uri, Some(&operator), Some(delivered.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = fleet
            .call(Method::PUT, &uri, Some(&manager), Some(delivered))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Delivered");
        assert_eq!(body["statusUpdates"][1]["updatedBy"], manager_id.to_string());
        assert!(body["actualArrival"].is_string());

        let (_, battery) = fleet
            .call(Method::GET, &format!("/api/batteries/{}", battery.id), Some(&operator), None)
            .await;
        assert_eq!(battery["status"], "Available");
        assert_eq!(battery["location"], "Dock B");
    }

    #[tokio::test]
    async fn test_strict_transitions_reject_with_code() {
        let mut config = FleetConfig::default();
        config.lifecycle.strict_transitions = true;
        let fleet = TestFleet::with_config(config);
        let shipment = fleet.shipment("SHP-1", &[]);
        let (_, manager) = fleet.login(Role::Manager);

        let (status, body) = fleet
            .call(
                Method::PUT,
                &format!("/api/shipments/{}", shipment.id),
                Some(&manager),
                Some(json!({ "status": "Delivered" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_environmental_log_and_alert_list() {
        let fleet = TestFleet::new();
        let shipment = fleet.shipment("SHP-1", &[]);
        let (_, operator) = fleet.login(Role::Operator);
        let uri = format!("/api/shipments/{}/logs", shipment.id);

        let (status, body) = fleet
            .call(
                Method::POST,
                &uri,
                Some(&operator),
                Some(json!({ "type": "temperature", "value": 50 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "temperature log added");
        assert_eq!(body["isAlert"], true);
        assert_eq!(body["log"]["value"], 50.0);

        let (status, body) = fleet
            .call(
                Method::POST,
                &uri,
                Some(&operator),
                Some(json!({ "type": "pressure", "value": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");

        let (status, alerts) = fleet
            .call(Method::GET, "/api/shipments/alerts", Some(&operator), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(alerts[0]["shipmentNumber"], "SHP-1");
        assert_eq!(alerts[0]["alertCount"], 1);
    }

    #[tokio::test]
    async fn test_deleted_member_disappears_from_shipment_read() {
        let fleet = TestFleet::new();
        let b1 = fleet.battery("BAT-1");
        let b2 = fleet.battery("BAT-2");
        let shipment = fleet.shipment("SHP-1", &[b1.id, b2.id]);
        let (_, admin) = fleet.login(Role::Admin);

        let (status, _) = fleet
            .call(Method::DELETE, &format!("/api/batteries/{}", b1.id), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = fleet
            .call(Method::GET, &format!("/api/shipments/{}", shipment.id), Some(&admin), None)
            .await;
        assert_eq!(body["batteryCount"], 1);
        assert_eq!(body["batteries"][0]["id"], b2.id.to_string());
    }

    // =========================================================================
    // USERS
    // =========================================================================

    #[tokio::test]
    async fn test_admin_manages_users() {
        let fleet = TestFleet::new();
        let (_, admin) = fleet.login(Role::Admin);
        let body = json!({ "name": "Grace", "email": "grace@fleet.test", "role": "manager" });

        let (status, created) = fleet
            .call(Method::POST, "/api/users", Some(&admin), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["role"], "manager");

        let (status, dup) = fleet
            .call(Method::POST, "/api/users", Some(&admin), Some(body))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(dup["code"], "DUPLICATE_KEY");

        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());
        let (status, updated) = fleet
            .call(Method::PUT, &uri, Some(&admin), Some(json!({ "role": "operator" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["role"], "operator");

        let (status, _) = fleet.call(Method::DELETE, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = fleet.call(Method::GET, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
