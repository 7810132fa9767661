#[cfg(test)]
mod tests {
    use crate::constants::TICK_SECS;
    use crate::enums::*;
    use crate::events::Decision;
    use crate::types::{ContactId, ContactReport, DecoySpec, Position, SimTime, Velocity};

    #[test]
    fn test_bearing_north_east_south_west() {
        let origin = Position::default();
        assert!((origin.bearing_deg_to(&Position::planar(0.0, 10.0)) - 0.0).abs() < 1e-9);
        assert!((origin.bearing_deg_to(&Position::planar(10.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_deg_to(&Position::planar(0.0, -10.0)) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_deg_to(&Position::planar(-10.0, 0.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_range_ignores_z() {
        let a = Position::new(0.0, 0.0, -50.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.horizontal_range_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_from_heading_round_trip() {
        let v = Velocity::from_heading(3.0, 135.0);
        assert!((v.horizontal_speed() - 3.0).abs() < 1e-9);
        assert!((v.heading_deg() - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        t.advance(0.5);
        t.advance(0.5);
        assert_eq!(t.tick, 2);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decoy_spec_defaults() {
        let json = r#"{"type":"self_propelled","lifespan":7.2}"#;
        let spec: DecoySpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.decoy_type, DecoyType::SelfPropelled);
        assert_eq!(spec.effective_cost(), 2.5);
        assert_eq!(spec.lifespan_ticks(), 8);

        let priced = DecoySpec {
            cost: Some(0.5),
            ..spec
        };
        assert_eq!(priced.effective_cost(), 0.5);
    }

    #[test]
    fn test_lifespan_seconds_round_up_to_ticks() {
        let spec = |lifespan: f64| DecoySpec {
            decoy_type: DecoyType::Stationary,
            lifespan,
            speed: 0.0,
            heading: 0.0,
            cost: None,
        };
        assert_eq!(spec(3.0 * TICK_SECS).lifespan_ticks(), 3);
        assert_eq!(spec(3.0 * TICK_SECS + 0.01).lifespan_ticks(), 4);
        assert_eq!(spec(0.0).lifespan_ticks(), 0);
        assert_eq!(spec(-2.0).lifespan_ticks(), 0);
    }

    #[test]
    fn test_contact_report_optional_fields() {
        let json = r#"{"id":7,"position":{"x":1.0,"y":2.0}}"#;
        let report: ContactReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.id, ContactId(7));
        assert_eq!(report.position, Position::planar(1.0, 2.0));
        assert!(report.xy_speed.is_none());
        assert!(report.signature.is_none());
    }

    #[test]
    fn test_decision_is_tagged() {
        let d = Decision::Maneuver {
            heading_deg: 270.0,
            speed_factor: 1.2,
        };
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""type":"Maneuver""#));
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }

    #[test]
    fn test_suspected_type_wire_names() {
        let json = serde_json::to_string(&SuspectedType::SelfPropelledDecoy).unwrap();
        assert_eq!(json, r#""SELF_PROPELLED_DECOY""#);
        assert!(SuspectedType::StationaryDecoy.is_decoy());
        assert!(!SuspectedType::GenuineTarget.is_decoy());
    }
}
