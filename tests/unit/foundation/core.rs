use super::*;

#[test]
fn time_range_is_inclusive() {
    let r = TimeRange::new(FrameTime(5), FrameTime(9)).unwrap();
    assert_eq!(r.len_frames(), 5);
    assert_eq!(r.bounded_len_frames().unwrap(), 5);
    let times: Vec<i64> = r.iter().map(|t| t.0).collect();
    assert_eq!(times, vec![5, 6, 7, 8, 9]);
}

#[test]
fn single_frame_range_has_one_frame() {
    let r = TimeRange::new(FrameTime(3), FrameTime(3)).unwrap();
    assert_eq!(r.len_frames(), 1);
    assert_eq!(r.iter().count(), 1);
}

#[test]
fn reversed_range_is_rejected() {
    let err = TimeRange::new(FrameTime(4), FrameTime(2)).unwrap_err();
    assert!(err.is_invalid_configuration());
}

#[test]
fn negative_times_are_supported() {
    let r = TimeRange::new(FrameTime(-2), FrameTime(1)).unwrap();
    assert_eq!(r.len_frames(), 4);
}

#[test]
fn time_range_json_shape() {
    let r: TimeRange = serde_json::from_str(r#"{ "start": 0, "end": 10 }"#).unwrap();
    assert_eq!(r.start, FrameTime(0));
    assert_eq!(r.end, FrameTime(10));
}

#[test]
fn extreme_ranges_do_not_overflow() {
    let full = TimeRange::new(FrameTime(i64::MIN), FrameTime(i64::MAX)).unwrap();
    assert_eq!(full.len_frames(), u64::MAX);
    assert!(full.bounded_len_frames().unwrap_err().is_invalid_configuration());

    let huge = TimeRange::new(FrameTime(0), FrameTime(5_000_000_000)).unwrap();
    let err = huge.bounded_len_frames().unwrap_err();
    assert!(err.to_string().contains("5000000001 frames"), "{err}");
}

#[test]
fn frame_limit_is_inclusive() {
    let last = i64::try_from(MAX_TIMELINE_FRAMES).unwrap() - 1;
    let at_limit = TimeRange::new(FrameTime(0), FrameTime(last)).unwrap();
    assert_eq!(
        u64::from(at_limit.bounded_len_frames().unwrap()),
        MAX_TIMELINE_FRAMES
    );
    let over = TimeRange::new(FrameTime(0), FrameTime(last + 1)).unwrap();
    assert!(over.bounded_len_frames().is_err());
}
