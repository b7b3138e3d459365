use std::time::Duration;

use common::GameLog;
use terminal::playback::{Advance, PlaybackController, PlaybackState};

fn plain_log(rounds: usize) -> GameLog {
    let entries = vec!["{}"; rounds].join(",");
    GameLog::parse(&format!(r#"{{"game_log": [{}]}}"#, entries)).unwrap()
}

fn meeting_log() -> GameLog {
    // Three rounds; round number 2 has a meeting.
    GameLog::parse(
        r#"{
            "game_log": [{"round": 1}, {"round": 2}, {"round": 3}],
            "meeting_history": [
                {
                    "round_called": 2,
                    "trigger": "body_report",
                    "called_by": "player_0",
                    "voted_out": "player_1",
                    "role_revealed": "impostor"
                }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn starts_idle_at_first_round() {
    let controller = PlaybackController::new(plain_log(5));
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.current_round_idx(), 0);
    assert!(!controller.has_pending_advance());
}

#[test]
fn go_to_clamps_into_range() {
    let mut controller = PlaybackController::new(plain_log(5));

    controller.go_to(3);
    assert_eq!(controller.current_round_idx(), 3);

    controller.go_to(-10);
    assert_eq!(controller.current_round_idx(), 0);

    controller.go_to(999);
    assert_eq!(controller.current_round_idx(), 4);

    controller.step_back(100);
    assert_eq!(controller.current_round_idx(), 0);

    controller.step_forward(2);
    assert_eq!(controller.current_round_idx(), 2);
}

#[test]
fn go_to_always_pauses_first() {
    let mut controller = PlaybackController::new(plain_log(5));
    controller.play();
    assert!(controller.is_playing());
    assert!(controller.has_pending_advance());

    controller.go_to(2);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(!controller.has_pending_advance());
}

#[test]
fn autoplay_terminates_at_last_round() {
    let mut controller = PlaybackController::new(plain_log(4));
    controller.play();

    assert_eq!(controller.tick(), Advance::Stepped);
    assert_eq!(controller.tick(), Advance::Stepped);
    assert_eq!(controller.tick(), Advance::Stepped);
    assert_eq!(controller.current_round_idx(), 3);
    assert!(controller.is_playing());

    // The advance that fires at the last index pauses without moving.
    assert_eq!(controller.tick(), Advance::Finished);
    assert_eq!(controller.current_round_idx(), 3);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(!controller.has_pending_advance());

    // Never advances further.
    assert_eq!(controller.tick(), Advance::Finished);
    assert_eq!(controller.current_round_idx(), 3);
}

#[test]
fn autoplay_pauses_on_meeting_round() {
    let mut controller = PlaybackController::new(meeting_log());
    controller.play();

    // Default speed is 1.0s per round; a long frame elapses the advance.
    let outcome = controller.update(Duration::from_secs(2));
    assert_eq!(outcome, Some(Advance::MeetingReached));
    assert_eq!(controller.current_round_number(), 2);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(!controller.has_pending_advance());

    let meeting = controller
        .log()
        .meetings_for(controller.current_round_number())
        .next()
        .unwrap();
    assert_eq!(meeting.result_line(), "PLAYER_1 EJECTED (IMPOSTOR)");
}

#[test]
fn update_accumulates_until_the_deadline() {
    let mut controller = PlaybackController::new(plain_log(3));
    controller.play();

    assert_eq!(controller.update(Duration::from_millis(400)), None);
    assert_eq!(controller.update(Duration::from_millis(400)), None);
    assert_eq!(
        controller.update(Duration::from_millis(400)),
        Some(Advance::Stepped)
    );
    assert_eq!(controller.current_round_idx(), 1);
    // tick rearmed exactly one new advance
    assert!(controller.has_pending_advance());
}

#[test]
fn speed_change_only_affects_future_scheduling() {
    let mut controller = PlaybackController::new(plain_log(5));
    controller.play();
    assert_eq!(controller.update(Duration::from_millis(500)), None);

    // The armed advance keeps its original 1.0s deadline.
    controller.set_speed(3.0);
    assert_eq!(
        controller.update(Duration::from_millis(600)),
        Some(Advance::Stepped)
    );

    // The rearmed advance uses the new 3.0s delay.
    assert_eq!(controller.update(Duration::from_millis(1200)), None);
    assert_eq!(controller.update(Duration::from_millis(2000)), Some(Advance::Stepped));
}

#[test]
fn speed_clamps_and_delay_has_a_floor() {
    let mut controller = PlaybackController::new(plain_log(2));

    controller.set_speed(10.0);
    assert_eq!(controller.speed(), 3.0);

    controller.set_speed(0.01);
    assert_eq!(controller.speed(), 0.2);
    assert_eq!(controller.step_delay(), Duration::from_millis(200));

    controller.set_speed(1.5);
    assert_eq!(controller.step_delay(), Duration::from_millis(1500));
}

#[test]
fn pause_is_a_no_op_when_not_playing() {
    let mut controller = PlaybackController::new(plain_log(2));
    controller.pause();
    assert_eq!(controller.state(), PlaybackState::Idle);

    controller.play();
    controller.pause();
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert!(!controller.has_pending_advance());
}

#[test]
fn toggle_round_trips_between_playing_and_paused() {
    let mut controller = PlaybackController::new(plain_log(3));
    controller.toggle_play();
    assert!(controller.is_playing());
    controller.toggle_play();
    assert_eq!(controller.state(), PlaybackState::Paused);
}

#[test]
fn loading_a_new_document_resets_playback() {
    let mut controller = PlaybackController::new(plain_log(5));
    controller.play();
    controller.tick();
    controller.tick();
    assert_eq!(controller.current_round_idx(), 2);

    controller.load(plain_log(2));
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.current_round_idx(), 0);
    assert!(!controller.has_pending_advance());
    assert_eq!(controller.log().total_rounds(), 2);
}

#[test]
fn sparse_round_numbers_reach_the_meeting_by_number() {
    // Round numbers diverge from sequence indices; the meeting is keyed to
    // the recorded number 7, which lives at sequence index 1.
    let log = GameLog::parse(
        r#"{
            "game_log": [{"round": 4}, {"round": 7}, {"round": 9}],
            "meeting_history": [{"round_called": 7, "called_by": "player_2"}]
        }"#,
    )
    .unwrap();
    let mut controller = PlaybackController::new(log);
    controller.play();

    assert_eq!(controller.tick(), Advance::MeetingReached);
    assert_eq!(controller.current_round_idx(), 1);
    assert_eq!(controller.current_round_number(), 7);
}
