use nppsim::plant::PlantSimulator;
use nppsim::protocol::{
    ProtocolHandler, ProtocolError, Request, RequestKind, Response, ResponseStatus,
    MAX_REQUEST_SIZE,
};
use nppsim::ActionCode;

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn test_parse_reset_request() {
        let mut handler = ProtocolHandler::new();
        let request = handler
            .parse_request(r#"{"id":1,"kind":"Reset"}"#)
            .expect("valid request");

        assert_eq!(request.id, 1);
        assert!(matches!(request.kind, RequestKind::Reset));
    }

    #[test]
    fn test_parse_step_request() {
        let mut handler = ProtocolHandler::new();
        let request = handler
            .parse_request(r#"{"id":7,"kind":{"Step":{"code":3}}}"#)
            .expect("valid request");

        assert_eq!(request.id, 7);
        assert!(matches!(request.kind, RequestKind::Step { code: 3 }));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let mut handler = ProtocolHandler::new();
        let err = handler.parse_request("{not json").unwrap_err();
        assert_eq!(err, ProtocolError::InvalidJson);
    }

    #[test]
    fn test_unknown_request_kind_is_rejected() {
        let mut handler = ProtocolHandler::new();
        let err = handler
            .parse_request(r#"{"id":1,"kind":"SelfDestruct"}"#)
            .unwrap_err();
        assert_eq!(err, ProtocolError::InvalidJson);
    }

    #[test]
    fn test_oversized_request_is_rejected_before_parsing() {
        let mut handler = ProtocolHandler::new();
        let oversized = "a".repeat(MAX_REQUEST_SIZE + 1);
        let err = handler.parse_request(&oversized).unwrap_err();
        assert_eq!(err, ProtocolError::MessageTooLarge);
    }

    #[test]
    fn test_request_round_trip() {
        let mut handler = ProtocolHandler::new();
        let request = Request {
            id: 42,
            kind: RequestKind::Step { code: 11 },
        };

        let json = serde_json::to_string(&request).unwrap();
        let parsed = handler.parse_request(&json).unwrap();
        assert_eq!(parsed.id, 42);
        assert!(matches!(parsed.kind, RequestKind::Step { code: 11 }));
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn test_observation_response_serializes_without_step_report() {
        let mut handler = ProtocolHandler::new();
        let mut simulator = PlantSimulator::new();
        let observation = simulator.reset();

        let response = handler.observation_response(1, observation);
        let json = handler.serialize_response(&response).unwrap().to_string();

        assert!(json.contains("\"observation\""));
        assert!(!json.contains("\"step\""));
        assert!(!json.contains("\"message\""));

        let parsed: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, ResponseStatus::Success);
        assert_eq!(parsed.observation.unwrap(), observation);
    }

    #[test]
    fn test_step_response_carries_the_full_report() {
        let mut handler = ProtocolHandler::new();
        let mut simulator = PlantSimulator::new();
        simulator.reset();
        let outcome = simulator.step(ActionCode::AddWater);

        let response = handler.step_response(9, &outcome);
        let json = handler.serialize_response(&response).unwrap().to_string();
        let parsed: Response = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, 9);
        let report = parsed.step.expect("step report present");
        assert_eq!(report.reward, -100.0);
        assert!(report.anomaly_detected);
        assert!(report.had_effect);
        assert!(report.anomaly_messages.contains("above the maximum"));
        assert_eq!(parsed.observation.unwrap(), outcome.observation);
    }

    #[test]
    fn test_invalid_action_response() {
        let handler = ProtocolHandler::new();
        let response = handler.invalid_action_response(3, 99);

        assert_eq!(response.status, ResponseStatus::InvalidAction);
        assert!(response.message.as_deref().unwrap().contains("99"));
        assert!(response.observation.is_none());
    }

    #[test]
    fn test_error_response_keeps_the_request_id() {
        let mut handler = ProtocolHandler::new();
        let response = handler.error_response(17, ResponseStatus::InvalidRequest, "bad frame");
        let json = handler.serialize_response(&response).unwrap().to_string();
        let parsed: Response = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, 17);
        assert_eq!(parsed.status, ResponseStatus::InvalidRequest);
        assert_eq!(parsed.message.as_deref(), Some("bad frame"));
    }
}
