//! A daily challenge round driven by a live pose session

use curl_web::config::BeamConfig;
use curl_web::games::{
    todays_object, validate_session, ChallengeRound, RoundPhase, SkillLevel, WeightPerRep,
    DAILY_OBJECTS,
};
use curl_web::pose::{
    LandmarkPoint, LandmarkSnapshot, PoseSession, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST,
};

fn left_arm(angle: f32) -> LandmarkSnapshot {
    let theta = angle.to_radians();
    LandmarkSnapshot::new()
        .with(LEFT_SHOULDER, LandmarkPoint::new(0.7, 0.3, 0.9))
        .with(LEFT_ELBOW, LandmarkPoint::new(0.7, 0.5, 0.9))
        .with(
            LEFT_WRIST,
            LandmarkPoint::new(0.7 + 0.2 * theta.sin(), 0.5 - 0.2 * theta.cos(), 0.9),
        )
}

#[test]
fn six_curls_against_the_labrador() {
    let labrador = DAILY_OBJECTS.iter().find(|o| o.weight == 65).unwrap();
    let mut round = ChallengeRound::new(labrador, WeightPerRep::default());
    let mut session = PoseSession::default();
    session.start();

    round.reveal_done();
    round.set_weight_per_rep(10.0);
    round.start_curling(session.total_reps());
    assert_eq!(round.phase(), RoundPhase::Curl);

    let mut t = 0.0;
    for _ in 0..6 {
        for angle in [170.0, 40.0] {
            session.on_frame(&left_arm(angle), t);
            t += 0.1;
        }
        // First hint only unlocks at 10 reps
        assert!(round.on_reps(session.total_reps()).is_none());
    }
    round.tick(30);
    round.finish();

    assert_eq!(round.phase(), RoundPhase::Result);
    assert_eq!(round.round_reps(), 6);
    assert_eq!(round.lifted_weight(), 60.0);
    assert_eq!(round.accuracy(), 92.3);

    let beam = round.beam(&BeamConfig::default());
    assert!(beam.is_balanced);
    assert_eq!(beam.accuracy, 92.0);
    assert!(beam.rotation < 0.0);

    assert!(validate_session(round.round_reps(), round.time_used() as f32).is_ok());
    let score = round.score();
    assert_eq!(score.accuracy_score, 92);
    assert_eq!(score.time_bonus, 15);
    assert_eq!(score.hint_penalty, 0);
}

#[test]
fn todays_object_matches_skill_level() {
    for key in ["Mon Jan 01 2024", "Tue Jan 02 2024", "Wed Jan 03 2024"] {
        assert!(todays_object(SkillLevel::Beginner, key).weight <= 30);
        assert!(todays_object(SkillLevel::Advanced, key).weight > 70);
        let intermediate = todays_object(SkillLevel::Intermediate, key).weight;
        assert!(intermediate > 30 && intermediate <= 70);
    }
}
