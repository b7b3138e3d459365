use common::GameLog;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use terminal::playback::PlaybackState;
use terminal::views::{TheaterState, View};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn doc_a() -> GameLog {
    GameLog::parse(
        r#"{
            "game_log": [
                {
                    "state": {
                        "player_locations": {"player_0": "Cafeteria", "player_1": "Admin"},
                        "alive_players": ["player_0", "player_1"],
                        "sabotage": {"type": "lights", "fix_progress": {"Electrical": 1}}
                    }
                },
                {},
                {}
            ]
        }"#,
    )
    .unwrap()
}

fn doc_b() -> GameLog {
    GameLog::parse(
        r#"{
            "game_log": [{
                "state": {
                    "player_locations": {"player_9": "Reactor"},
                    "alive_players": ["player_9"]
                }
            }]
        }"#,
    )
    .unwrap()
}

#[test]
fn reload_resets_controller_and_replaces_scene() {
    let mut theater = TheaterState::new(doc_a(), "a.json".to_string());

    // Move off the first round and start playback on document A.
    theater.handle_input(key(KeyCode::Right));
    theater.handle_input(key(KeyCode::Char(' ')));
    assert_eq!(theater.controller().current_round_idx(), 1);
    assert!(theater.controller().is_playing());
    assert!(theater.scene().token("player_0").is_some());

    theater.load_document(doc_b(), "b.json".to_string());

    assert_eq!(theater.controller().state(), PlaybackState::Idle);
    assert_eq!(theater.controller().current_round_idx(), 0);
    assert!(!theater.controller().has_pending_advance());
    assert_eq!(theater.controller().log().total_rounds(), 1);

    // No element keyed by a document-A-only player id survives, and the
    // new projection is already applied.
    assert!(theater.scene().token("player_0").is_none());
    assert!(theater.scene().token("player_1").is_none());
    assert!(theater.scene().token("player_9").is_some());
    assert_eq!(theater.scene().token_count(), 1);
    assert!(!theater.scene().room_flags("Electrical").sabotaged);
}
