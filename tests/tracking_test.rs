use pitchsight::{BallTracker, Rect, TrackerConfig};

fn ball(x: f32, y: f32) -> Rect {
    Rect::new(x, y, 0.1, 0.1)
}

#[test]
fn test_basic_tracking() {
    let mut tracker = BallTracker::new(TrackerConfig::default());

    // Frame 1: balls seen on the very first frame are reported straight away
    let tracks1 = tracker.update(&[ball(0.40, 0.40)]);
    assert_eq!(tracks1.len(), 1);
    let id1 = tracks1[0].track_id;

    // Frame 2: same ball moved slightly
    let tracks2 = tracker.update(&[ball(0.405, 0.405)]);
    assert_eq!(tracks2.len(), 1);
    assert_eq!(tracks2[0].track_id, id1);

    // Frame 3: ball occluded
    let tracks3 = tracker.update(&[]);
    assert!(tracks3.is_empty());
    assert_eq!(tracker.tracks().len(), 1);

    // Frame 4: ball reappears and keeps its identity
    let tracks4 = tracker.update(&[ball(0.41, 0.41)]);
    assert_eq!(tracks4.len(), 1);
    assert_eq!(tracks4[0].track_id, id1);
}

#[test]
fn test_lost_track_expires() {
    let mut tracker = BallTracker::new(TrackerConfig {
        track_buffer: 2,
        min_hits: 1,
        ..Default::default()
    });

    let first = tracker.update(&[ball(0.2, 0.2)]);
    assert_eq!(first[0].track_id, 1);

    for _ in 0..3 {
        assert!(tracker.update(&[]).is_empty());
    }
    assert!(tracker.tracks().is_empty());

    let again = tracker.update(&[ball(0.2, 0.2)]);
    assert_eq!(again.len(), 1);
    assert_eq!(again[0].track_id, 2);
}

#[test]
fn test_moving_ball_is_followed() {
    let mut tracker = BallTracker::default();
    let mut id = None;
    for step in 0..20 {
        let x = 0.1 + step as f32 * 0.01;
        let tracks = tracker.update(&[ball(x, 0.5)]);
        assert_eq!(tracks.len(), 1);
        let track_id = tracks[0].track_id;
        assert_eq!(*id.get_or_insert(track_id), track_id);
    }

    let track = &tracker.tracks()[0];
    let (vx, vy) = track.velocity();
    assert!((vx - 0.01).abs() < 0.003);
    assert!(vy.abs() < 0.003);
}
