use super::*;

#[test]
fn duration_is_floor_of_1000_over_fps() {
    assert_eq!(frame_duration_ms(None, 25.0).unwrap(), 40);
    assert_eq!(frame_duration_ms(None, 3.0).unwrap(), 333);
    assert_eq!(frame_duration_ms(None, 10.0).unwrap(), 100);
    assert_eq!(frame_duration_ms(None, 29.97).unwrap(), 33);
    assert_eq!(frame_duration_ms(None, 0.5).unwrap(), 2000);
}

#[test]
fn override_takes_precedence() {
    assert_eq!(frame_duration_ms(Some(50.0), 10.0).unwrap(), 20);
}

#[test]
fn zero_override_falls_back_to_canvas_rate() {
    assert_eq!(frame_duration_ms(Some(0.0), 25.0).unwrap(), 40);
    assert!(matches!(
        frame_duration_ms(Some(0.0), 0.0),
        Err(ExportError::InvalidFrameRate(_))
    ));
}

#[test]
fn non_positive_or_non_finite_rates_are_rejected() {
    for (ovr, canvas) in [
        (None, 0.0),
        (None, -24.0),
        (Some(-1.0), 30.0),
        (Some(f64::NAN), 30.0),
        (Some(f64::INFINITY), 30.0),
    ] {
        assert!(
            matches!(
                frame_duration_ms(ovr, canvas),
                Err(ExportError::InvalidFrameRate(_))
            ),
            "{ovr:?} / {canvas}"
        );
    }
}
