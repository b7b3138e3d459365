use common::{project, GameLog};
use terminal::scene::Scene;

fn derived_for(raw: &str) -> common::DerivedState {
    let log = GameLog::parse(raw).unwrap();
    project(log.get_round(0), &log.all_roles)
}

const DOC_A: &str = r#"{
    "game_log": [{
        "state": {
            "player_locations": {
                "player_0": "Cafeteria",
                "player_1": "Admin",
                "player_2": "Electrical"
            },
            "alive_players": ["player_0", "player_1", "player_2"],
            "bodies": [{"location": "Storage"}],
            "sabotage": {"type": "lights", "fix_progress": {"Electrical": 1}}
        }
    }]
}"#;

const DOC_B: &str = r#"{
    "game_log": [{
        "state": {
            "player_locations": {"player_1": "Shields", "player_9": "Reactor"},
            "alive_players": ["player_9"]
        }
    }]
}"#;

#[test]
fn apply_is_idempotent() {
    let derived = derived_for(DOC_A);
    let mut scene = Scene::new();

    scene.apply(&derived);
    let first: Vec<_> = scene.tokens().cloned().collect();
    let slots = scene.slot_count();

    scene.apply(&derived);
    let second: Vec<_> = scene.tokens().cloned().collect();

    assert_eq!(first, second);
    assert_eq!(scene.slot_count(), slots);
    assert_eq!(scene.token_count(), 3);
    assert_eq!(scene.bodies().len(), 1);
}

#[test]
fn tokens_update_in_place_and_stale_ids_are_freed() {
    let mut scene = Scene::new();
    scene.apply(&derived_for(DOC_A));
    assert_eq!(scene.token_count(), 3);
    assert_eq!(scene.slot_count(), 3);

    scene.apply(&derived_for(DOC_B));

    // player_0 and player_2 are gone, player_1 survived in place,
    // player_9 reused a freed slot.
    assert!(scene.token("player_0").is_none());
    assert!(scene.token("player_2").is_none());
    assert_eq!(scene.token_count(), 2);
    assert_eq!(scene.slot_count(), 3);

    let p1 = scene.token("player_1").unwrap();
    assert_eq!(p1.room, "Shields");
    assert!(!p1.alive);
    let p9 = scene.token("player_9").unwrap();
    assert_eq!(p9.room, "Reactor");
    assert!(p9.alive);
}

#[test]
fn room_flags_are_toggled_not_rebuilt() {
    let mut scene = Scene::new();
    scene.apply(&derived_for(DOC_A));
    assert!(scene.room_flags("Electrical").sabotaged);
    assert!(scene.room_flags("Storage").has_body);

    scene.apply(&derived_for(DOC_B));
    assert!(!scene.room_flags("Electrical").sabotaged);
    assert!(!scene.room_flags("Storage").has_body);
    assert!(scene.bodies().is_empty());
}

#[test]
fn document_replace_leaves_no_prior_tokens() {
    let mut scene = Scene::new();
    scene.apply(&derived_for(DOC_A));

    // Atomic document replace: clear then apply the new projection.
    scene.clear();
    scene.apply(&derived_for(DOC_B));

    let ids: Vec<&str> = {
        let mut ids: Vec<&str> = scene.tokens().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids
    };
    assert_eq!(ids, vec!["player_1", "player_9"]);
    assert!(scene.token("player_0").is_none());
    assert!(!scene.room_flags("Electrical").sabotaged);
}

#[test]
fn unknown_rooms_never_reach_the_scene() {
    let derived = derived_for(
        r#"{
            "game_log": [{
                "state": {
                    "player_locations": {"player_0": "Cargo Hold"},
                    "bodies": [{"location": "Cargo Hold"}]
                }
            }]
        }"#,
    );
    let mut scene = Scene::new();
    scene.apply(&derived);
    assert_eq!(scene.token_count(), 0);
    assert!(scene.bodies().is_empty());
}
