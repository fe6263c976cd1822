#[cfg(test)]
mod tests {
    use base64::Engine;
    use hyperswitch_masking::Secret;

    use super::super::*;
    use crate::{errors::ErrorKind, types::MinorUnit};

    fn test_auth() -> PhonepeAuthType {
        PhonepeAuthType::new("M1", "S1", 1).unwrap()
    }

    fn test_connector() -> Phonepe {
        Phonepe::new(test_auth(), Environment::Sandbox, &HttpOptions::default()).unwrap()
    }

    fn test_transaction() -> transformers::PhonepeTransactionData {
        transformers::PhonepeTransactionData {
            merchant_transaction_id: "T1".to_string(),
            merchant_user_id: Secret::new("U1".to_string()),
            name: None,
            amount: MinorUnit::new(10000),
            redirect_url: "http://localhost:3000/success".to_string(),
            redirect_mode: "REDIRECT".to_string(),
            callback_url: None,
            mobile_number: Secret::new("9999999999".to_string()),
            payment_instrument: transformers::PhonepePaymentInstrument::PayPage,
        }
    }

    fn checksum_shape(checksum: &str) -> bool {
        regex::Regex::new(r"^[0-9a-f]{64}###\d+$")
            .unwrap()
            .is_match(checksum)
    }

    fn phonepe_config(base_url: Option<&str>) -> PhonepeConnectorConfig {
        PhonepeConnectorConfig {
            merchant_id: Secret::new("M1".to_string()),
            salt_key: Secret::new("S1".to_string()),
            key_index: 1,
            environment: Environment::Sandbox,
            base_url: base_url.map(str::to_string),
        }
    }

    #[test]
    fn test_from_config_rejects_invalid_base_url() {
        for base_url in ["not a url", "ftp://example.com/pg/v1"] {
            let config = phonepe_config(Some(base_url));
            let err = Phonepe::from_config(&config, &HttpOptions::default()).unwrap_err();
            assert_eq!(err.current_context().kind(), ErrorKind::Config);
        }

        let connector = Phonepe::from_config(
            &phonepe_config(Some("http://127.0.0.1:8080/pg/v1/")),
            &HttpOptions::default(),
        )
        .unwrap();
        assert_eq!(connector.base_url(), "http://127.0.0.1:8080/pg/v1");
    }

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(
            resolve_base_url("SANDBOX").unwrap(),
            "https://api-preprod.phonepe.com/apis/pg-sandbox/pg/v1"
        );
        assert_eq!(
            resolve_base_url("PRODUCTION").unwrap(),
            "https://api.phonepe.com/apis/hermes/pg/v1"
        );
        assert_eq!(resolve_base_url("dev").unwrap(), constants::SANDBOX_BASE_URL);
        assert_eq!(resolve_base_url("Prod").unwrap(), constants::PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_resolve_base_url_rejects_unknown_environment() {
        let err = resolve_base_url("STAGING").unwrap_err();
        assert_eq!(err.current_context().kind(), ErrorKind::Config);
        assert!(matches!(
            err.current_context(),
            errors::ConnectorError::InvalidEnvironment(env) if env == "STAGING"
        ));
        assert!(resolve_base_url("").is_err());
    }

    #[test]
    fn test_status_checksum_fixed_vector() {
        let envelope = test_connector().build_status_check_request("T1").unwrap();
        assert_eq!(envelope.api_path, "/pg/v1/status/M1/T1");
        assert!(envelope.base64_payload.is_empty());
        // sha256("" + "/pg/v1/status/M1/T1" + "S1")
        assert_eq!(
            envelope.checksum,
            "9ea83cc97404fbb5b5108bb104952fa8e4cfda0b3cee3b918d55c23d7db7accd###1"
        );
    }

    #[test]
    fn test_payment_checksum_fixed_vector() {
        let transaction = serde_json::json!({});
        let envelope = test_connector()
            .build_payment_request(&transaction)
            .unwrap();
        assert_eq!(envelope.base64_payload, "eyJtZXJjaGFudElkIjoiTTEifQ==");
        assert_eq!(
            envelope.checksum,
            "4c76d9005dfbd1418ca45123c174764ed10ccf93a102645706b41be7c508f050###1"
        );
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let connector = test_connector();
        let first = connector.build_payment_request(&test_transaction()).unwrap();
        let second = connector.build_payment_request(&test_transaction()).unwrap();
        assert_eq!(first, second);
        assert!(checksum_shape(&first.checksum));
    }

    #[test]
    fn test_checksum_carries_key_index() {
        let auth = PhonepeAuthType::new("M1", "S1", 7).unwrap();
        let envelope = SignedEnvelope::try_for_status(&auth, "T1").unwrap();
        assert!(envelope.checksum.ends_with("###7"));
        assert!(checksum_shape(&envelope.checksum));
        // key index is appended, not hashed
        assert_eq!(
            envelope.checksum.split("###").next(),
            test_connector()
                .build_status_check_request("T1")
                .unwrap()
                .checksum
                .split("###")
                .next()
        );
    }

    #[test]
    fn test_payment_payload_round_trips_transaction_fields() {
        let envelope = test_connector()
            .build_payment_request(&test_transaction())
            .unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&envelope.base64_payload)
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(payload["merchantId"], "M1");
        assert_eq!(payload["merchantTransactionId"], "T1");
        assert_eq!(payload["merchantUserId"], "U1");
        assert_eq!(payload["amount"], 10000);
        assert_eq!(payload["redirectUrl"], "http://localhost:3000/success");
        assert_eq!(payload["redirectMode"], "REDIRECT");
        assert_eq!(payload["mobileNumber"], "9999999999");
        assert_eq!(payload["paymentInstrument"]["type"], "PAY_PAGE");
        assert!(payload.get("name").is_none());
        assert!(payload.get("callbackUrl").is_none());
    }

    #[test]
    fn test_payment_instrument_variants_serialize_with_type_tag() {
        let intent = serde_json::to_value(transformers::PhonepePaymentInstrument::UpiIntent {
            target_app: Some("com.phonepe.app".to_string()),
        })
        .unwrap();
        assert_eq!(
            intent,
            serde_json::json!({"type": "UPI_INTENT", "targetApp": "com.phonepe.app"})
        );

        let collect = transformers::PhonepePaymentInstrument::UpiCollect {
            vpa: Secret::new("test@ybl".to_string()),
        };
        assert_eq!(collect.instrument_type(), constants::UPI_COLLECT);
        assert_eq!(
            serde_json::to_value(&collect).unwrap(),
            serde_json::json!({"type": "UPI_COLLECT", "vpa": "test@ybl"})
        );

        assert_eq!(
            serde_json::to_value(transformers::PhonepePaymentInstrument::UpiQr).unwrap(),
            serde_json::json!({"type": "UPI_QR"})
        );
    }

    #[test]
    fn test_non_object_transaction_is_a_serialization_error() {
        let err = test_connector()
            .build_payment_request(&vec![1, 2, 3])
            .unwrap_err();
        assert_eq!(err.current_context().kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_non_string_map_keys_are_a_serialization_error() {
        let mut transaction = std::collections::HashMap::new();
        transaction.insert(vec![1u8], "value");
        let err = test_connector()
            .build_payment_request(&transaction)
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ConnectorError::RequestEncodingFailed
        ));
    }

    #[test]
    fn test_empty_transaction_id_is_rejected() {
        let err = test_connector().build_status_check_request("  ").unwrap_err();
        assert_eq!(err.current_context().kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_transaction_id_outside_url_safe_set_is_rejected() {
        let connector = test_connector();
        for merchant_transaction_id in ["T1#x", "T 1", "A/B", "T1?x=1"] {
            let err = connector
                .build_status_check_request(merchant_transaction_id)
                .unwrap_err();
            assert!(matches!(
                err.current_context(),
                errors::ConnectorError::RequestEncodingFailed
            ));
            assert!(connector.get_status_request(merchant_transaction_id).is_err());
        }

        let longest = "A".repeat(constants::MAX_TRANSACTION_ID_LENGTH);
        assert!(connector.build_status_check_request(&longest).is_ok());
        let too_long = "A".repeat(constants::MAX_TRANSACTION_ID_LENGTH + 1);
        assert_eq!(
            connector
                .build_status_check_request(&too_long)
                .unwrap_err()
                .current_context()
                .kind(),
            ErrorKind::Serialization
        );
        assert!(connector.build_status_check_request("MT_78-50").is_ok());
    }

    #[test]
    fn test_configured_merchant_id_overrides_transaction_value() {
        let envelope = test_connector()
            .build_payment_request(&serde_json::json!({"merchantId": "X", "amount": 100}))
            .unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&envelope.base64_payload)
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(payload, serde_json::json!({"amount": 100, "merchantId": "M1"}));
    }

    #[test]
    fn test_missing_credentials() {
        let err = PhonepeAuthType::new("", "S1", 1).unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ConnectorError::MissingRequiredConfig {
                field_name: "merchant_id"
            }
        ));
        let err = PhonepeAuthType::new("M1", "", 1).unwrap_err();
        assert_eq!(err.current_context().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_payment_request_shape() {
        let request = test_connector()
            .get_payment_request(&test_transaction())
            .unwrap();
        assert_eq!(request.method, crate::request::Method::Post);
        assert_eq!(
            request.url,
            "https://api-preprod.phonepe.com/apis/pg-sandbox/pg/v1/pay"
        );

        let header_map = request.get_headers_map();
        assert_eq!(header_map["Content-Type"], "application/json");
        assert!(checksum_shape(&header_map["X-VERIFY"]));
        assert!(!header_map.contains_key("X-MERCHANT-ID"));
        assert!(request
            .get_header(headers::X_VERIFY)
            .is_some_and(|value| matches!(value, Maskable::Masked(_))));

        let body: serde_json::Value =
            serde_json::from_slice(&request.body.unwrap().get_body_bytes()).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let encoded = object["request"].as_str().unwrap();
        assert!(base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .is_ok());
    }

    #[test]
    fn test_status_request_shape() {
        let request = test_connector().get_status_request("T1").unwrap();
        assert_eq!(request.method, crate::request::Method::Get);
        assert_eq!(
            request.url,
            "https://api-preprod.phonepe.com/apis/pg-sandbox/pg/v1/status/M1/T1"
        );
        assert!(request.body.is_none());

        let header_map = request.get_headers_map();
        assert_eq!(header_map["X-MERCHANT-ID"], "M1");
        assert_eq!(
            header_map["X-VERIFY"],
            "9ea83cc97404fbb5b5108bb104952fa8e4cfda0b3cee3b918d55c23d7db7accd###1"
        );
    }

    #[test]
    fn test_production_base_url_is_used() {
        let connector =
            Phonepe::new(test_auth(), Environment::Production, &HttpOptions::default()).unwrap();
        let request = connector.get_status_request("T1").unwrap();
        assert_eq!(
            request.url,
            "https://api.phonepe.com/apis/hermes/pg/v1/status/M1/T1"
        );
    }

    #[test]
    fn test_error_response_prefers_gateway_body() {
        let response = Response {
            headers: None,
            response: bytes::Bytes::from_static(
                br#"{"success":false,"code":"KEY_NOT_CONFIGURED","message":"Key not found for the merchant"}"#,
            ),
            status_code: 400,
        };
        let err = test_connector().handle_response(response).unwrap_err();
        let error_response = err.current_context().error_response().unwrap();
        assert_eq!(error_response.status_code, 400);
        assert_eq!(error_response.code, "KEY_NOT_CONFIGURED");
        assert_eq!(error_response.message, "Key not found for the merchant");
        assert_eq!(
            error_response.body.as_ref().unwrap()["success"],
            serde_json::Value::Bool(false)
        );
        assert!(!error_response.is_retryable());
    }

    #[test]
    fn test_error_response_falls_back_to_raw_body() {
        let response = Response {
            headers: None,
            response: bytes::Bytes::from_static(b"Bad Gateway"),
            status_code: 502,
        };
        let error_response = test_connector().build_error_response(&response);
        assert_eq!(error_response.code, crate::consts::NO_ERROR_CODE);
        assert_eq!(error_response.message, "Bad Gateway");
        assert!(error_response.body.is_none());
        assert!(error_response.is_retryable());
    }

    #[test]
    fn test_success_body_is_passed_through() {
        let body = serde_json::json!({
            "success": true,
            "code": "PAYMENT_SUCCESS",
            "message": "Your payment is successful.",
            "data": {"merchantId": "M1", "merchantTransactionId": "T1", "amount": 10000}
        });
        let response = Response {
            headers: None,
            response: bytes::Bytes::from(body.to_string()),
            status_code: 200,
        };
        let value = test_connector().handle_response(response).unwrap();
        assert_eq!(value, body);

        let typed = transformers::PhonepeResponse::try_from(&value).unwrap();
        assert_eq!(
            typed.payment_status(),
            transformers::PhonepePaymentStatus::Charged
        );
    }

    #[test]
    fn test_payment_status_mapping() {
        use transformers::PhonepePaymentStatus;

        assert_eq!(
            PhonepePaymentStatus::from("PAYMENT_INITIATED"),
            PhonepePaymentStatus::Initiated
        );
        assert_eq!(
            PhonepePaymentStatus::from("PAYMENT_PENDING"),
            PhonepePaymentStatus::Pending
        );
        assert_eq!(
            PhonepePaymentStatus::from("PAYMENT_DECLINED"),
            PhonepePaymentStatus::Failure
        );
        assert_eq!(
            PhonepePaymentStatus::from("AUTHORIZATION_FAILED"),
            PhonepePaymentStatus::AuthenticationFailed
        );
        assert_eq!(
            PhonepePaymentStatus::from("SOMETHING_NEW"),
            PhonepePaymentStatus::Unknown
        );
    }

    #[test]
    fn test_environment_parsing() {
        use std::str::FromStr;

        assert_eq!(Environment::from_str("uat").unwrap(), Environment::Sandbox);
        assert_eq!(
            Environment::from_str("production").unwrap(),
            Environment::Production
        );
        assert_eq!(Environment::Sandbox.to_string(), "SANDBOX");
        let parsed: Environment = serde_json::from_str(r#""prod""#).unwrap();
        assert_eq!(parsed, Environment::Production);
        assert!(serde_json::from_str::<Environment>(r#""mars""#).is_err());
    }
}
