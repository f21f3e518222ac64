//! Landmark buffers in, reps, form scores and coaching out

use assert_approx_eq::assert_approx_eq;
use curl_web::pose::{
    ArmSide, EventLog, LandmarkSnapshot, PoseSession, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST,
    POSE_LANDMARK_COUNT, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_WRIST, VALUES_PER_POINT,
};
use curl_web::PipelineConfig;

/// Flat MediaPipe buffer with the given arms posed at elbow angles
fn buffer(left: Option<f32>, right: Option<f32>, visibility: f32) -> Vec<f32> {
    let mut data = vec![0.0_f32; POSE_LANDMARK_COUNT * VALUES_PER_POINT];
    let arms = [
        (left, 0.7, [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST]),
        (right, 0.3, [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST]),
    ];
    for (angle, x, [shoulder, elbow, wrist]) in arms {
        let Some(angle) = angle else { continue };
        let theta = angle.to_radians();
        let points = [
            (shoulder, x, 0.3),
            (elbow, x, 0.5),
            (wrist, x + 0.2 * theta.sin(), 0.5 - 0.2 * theta.cos()),
        ];
        for (index, px, py) in points {
            data[index * 3] = px;
            data[index * 3 + 1] = py;
            data[index * 3 + 2] = visibility;
        }
    }
    data
}

fn frame(left: Option<f32>, right: Option<f32>) -> LandmarkSnapshot {
    LandmarkSnapshot::from_flat(&buffer(left, right, 0.9)).unwrap()
}

#[test]
fn single_left_curl_from_buffers() {
    let mut session = PoseSession::default();
    session.start();
    let mut log = EventLog::default();

    for (i, angle) in [170.0, 45.0, 170.0].into_iter().enumerate() {
        session.on_frame_with(&frame(Some(angle), None), i as f64 * 0.1, &mut log);
    }

    assert_eq!(log.reps, 1);
    assert_eq!(log.game_actions, 1);
    assert_approx_eq!(log.angles[1], 107.5, 0.05);
    assert_approx_eq!(log.angles[2], 128.33, 0.05);
    assert_eq!(log.scores, vec![82, 72, 77]);
    assert_eq!(
        log.feedback,
        vec!["Great left arm control! Keep that smooth motion.".to_string()]
    );
}

#[test]
fn bilateral_curls_count_per_arm_by_default() {
    let mut session = PoseSession::default();
    session.start();

    let mut t = 0.0;
    for _ in 0..3 {
        for angle in [170.0, 40.0] {
            session.on_frame(&frame(Some(angle), Some(angle)), t);
            t += 0.1;
        }
    }

    assert_eq!(session.arm_reps(ArmSide::Left), 3);
    assert_eq!(session.arm_reps(ArmSide::Right), 3);
    assert_eq!(session.total_reps(), 6);
}

#[test]
fn collapse_policy_from_json_config() {
    let config = PipelineConfig::from_json(r#"{"reps": {"bilateral": "collapse"}}"#).unwrap();
    let mut session = PoseSession::new(config);
    session.start();

    let mut t = 0.0;
    for _ in 0..3 {
        for angle in [170.0, 40.0] {
            session.on_frame(&frame(Some(angle), Some(angle)), t);
            t += 0.1;
        }
    }

    assert_eq!(session.arm_reps(ArmSide::Left), 3);
    assert_eq!(session.arm_reps(ArmSide::Right), 3);
    assert_eq!(session.total_reps(), 3);
}

#[test]
fn occluded_arm_prompts_to_move_closer() {
    let mut session = PoseSession::default();
    session.start();

    let snapshot = LandmarkSnapshot::from_flat(&buffer(Some(170.0), None, 0.3)).unwrap();
    let mut log = EventLog::default();
    session.on_frame_with(&snapshot, 0.0, &mut log);

    assert!(log.angles.is_empty());
    assert!(log.scores.is_empty());
    assert_eq!(log.feedback.len(), 1);
    assert!(log.feedback[0].contains("closer"));
}

#[test]
fn cleanup_starts_a_fresh_session() {
    let mut session = PoseSession::default();
    session.start();
    session.on_frame(&frame(Some(170.0), None), 0.0);
    session.on_frame(&frame(Some(40.0), None), 0.1);
    assert_eq!(session.total_reps(), 1);

    session.cleanup();
    session.start();
    session.on_frame(&frame(Some(40.0), None), 0.2);
    assert_eq!(session.total_reps(), 0);
}
