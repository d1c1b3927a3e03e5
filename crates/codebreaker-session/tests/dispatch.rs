//! Integration tests for the dispatcher: whole games driven through
//! `Dispatcher::handle`, checked down to the JSON each player receives.

use codebreaker_protocol::{ClientEvent, ErrorKind, RoomCode, SeatIndex, ServerEvent};
use codebreaker_room::{RegistryConfig, RoomRegistry};
use codebreaker_session::{Dispatcher, Outbound, SessionError};
use codebreaker_transport::ConnectionId;
use serde_json::{Value, json};

// =========================================================================
// Helpers
// =========================================================================

const ADA: ConnectionId = ConnectionId::new(1);
const BOB: ConnectionId = ConnectionId::new(2);

fn code(n: u16) -> RoomCode {
    RoomCode::new(n).expect("in range")
}

/// A dispatcher whose rooms always get code 4821.
fn dispatcher() -> Dispatcher {
    Dispatcher::new(RoomRegistry::with_code_source(
        RegistryConfig::default(),
        || code(4821),
    ))
}

fn send(d: &mut Dispatcher, conn: ConnectionId, event: ClientEvent) -> Vec<Outbound> {
    d.handle(conn, event).expect("event should be accepted")
}

/// The events addressed to `conn`, as the JSON they go out as.
fn json_for(out: &[Outbound], conn: ConnectionId) -> Vec<Value> {
    out.iter()
        .filter(|o| o.to == conn)
        .map(|o| serde_json::to_value(&o.event).expect("serializable"))
        .collect()
}

fn set_name(name: &str) -> ClientEvent {
    ClientEvent::SetName { name: name.into() }
}

fn join(code: &str) -> ClientEvent {
    ClientEvent::JoinRoom {
        room_code: code.into(),
    }
}

fn secret(s: &str) -> ClientEvent {
    ClientEvent::SetSecret { secret: s.into() }
}

fn guess(s: &str) -> ClientEvent {
    ClientEvent::Guess { guess: s.into() }
}

/// Ada creates 4821, Bob joins, both secrets are in.
fn started_game(ada_secret: &str, bob_secret: &str) -> Dispatcher {
    let mut d = dispatcher();
    for (conn, name) in [(ADA, "Ada"), (BOB, "Bob")] {
        d.connect(conn).unwrap();
        send(&mut d, conn, set_name(name));
    }
    send(&mut d, ADA, ClientEvent::CreateRoom);
    send(&mut d, BOB, join("4821"));
    send(&mut d, ADA, secret(ada_secret));
    send(&mut d, BOB, secret(bob_secret));
    d
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn test_end_to_end_scenario() {
    let mut d = dispatcher();
    d.connect(ADA).unwrap();
    d.connect(BOB).unwrap();
    assert!(send(&mut d, ADA, set_name("Ada")).is_empty());
    assert!(send(&mut d, BOB, set_name("Bob")).is_empty());

    let out = send(&mut d, ADA, ClientEvent::CreateRoom);
    assert_eq!(json_for(&out, ADA), vec![json!({"type": "room_created", "roomCode": "4821"})]);
    assert!(json_for(&out, BOB).is_empty());

    let out = send(&mut d, BOB, join("4821"));
    for conn in [ADA, BOB] {
        assert_eq!(json_for(&out, conn), vec![json!({"type": "game_start"})]);
    }

    assert!(send(&mut d, ADA, secret("1234")).is_empty());
    let out = send(&mut d, BOB, secret("5678"));
    assert_eq!(
        json_for(&out, ADA),
        vec![json!({"type": "turn", "yourTurn": true, "activeName": "Ada", "player": 0})]
    );
    assert_eq!(
        json_for(&out, BOB),
        vec![json!({"type": "turn", "yourTurn": false, "activeName": "Ada", "player": 0})]
    );

    // Ada misses: feedback to her, then the turn flips to Bob.
    let out = send(&mut d, ADA, guess("1234"));
    assert_eq!(
        json_for(&out, ADA),
        vec![
            json!({
                "type": "feedback",
                "guess": "1234",
                "digitsCount": 0,
                "positionsCount": 0,
                "history": [{"guess": "1234", "digitsCount": 0, "positionsCount": 0}]
            }),
            json!({"type": "turn", "yourTurn": false, "activeName": "Bob", "player": 1}),
        ]
    );
    assert_eq!(
        json_for(&out, BOB),
        vec![json!({"type": "turn", "yourTurn": true, "activeName": "Bob", "player": 1})]
    );

    // Bob misses too.
    let out = send(&mut d, BOB, guess("5678"));
    assert_eq!(json_for(&out, BOB)[0]["digitsCount"], 0);
    assert_eq!(json_for(&out, BOB)[0]["positionsCount"], 0);
    assert_eq!(json_for(&out, ADA), vec![json!({
        "type": "turn", "yourTurn": true, "activeName": "Ada", "player": 0
    })]);

    // Ada cracks Bob's code.
    let out = send(&mut d, ADA, guess("5678"));
    let game_over = json!({"type": "game_over", "winnerSeat": 0, "winnerName": "Ada"});
    let ada = json_for(&out, ADA);
    assert_eq!(ada.len(), 2);
    assert_eq!(ada[0]["type"], "feedback");
    assert_eq!(ada[0]["digitsCount"], 4);
    assert_eq!(ada[0]["positionsCount"], 4);
    assert_eq!(ada[0]["history"].as_array().map(Vec::len), Some(2));
    assert_eq!(ada[1], game_over);
    assert_eq!(json_for(&out, BOB), vec![game_over]);

    let room = d.rooms().get_room(code(4821)).unwrap();
    assert_eq!(room.phase().winner(), Some(SeatIndex::Creator));
}

#[test]
fn test_wrong_turn_is_rejected_without_effect() {
    let mut d = started_game("1234", "5678");
    let err = d.handle(BOB, guess("1234")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::WrongTurn));

    // Ada is still on turn and Bob's history is empty.
    let room = d.rooms().get_room(code(4821)).unwrap();
    assert_eq!(room.phase().turn(), Some(SeatIndex::Creator));
    assert!(room.seat(SeatIndex::Joiner).unwrap().history().is_empty());
}

#[test]
fn test_finished_game_rejects_further_guesses() {
    let mut d = started_game("1234", "5678");
    send(&mut d, ADA, guess("5678"));

    for conn in [ADA, BOB] {
        let err = d.handle(conn, guess("1234")).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::GameNotInProgress));
    }
}

#[test]
fn test_disconnect_after_game_over_notifies_loser_once() {
    let mut d = started_game("1234", "5678");
    send(&mut d, ADA, guess("5678"));

    let out = d.disconnect(ADA);
    assert_eq!(out.len(), 1);
    assert_eq!(
        json_for(&out, BOB),
        vec![json!({"type": "opponent_left", "name": "Ada"})]
    );
    assert!(!d.rooms().contains(code(4821)));

    // Bob is unseated and nothing is left to notify.
    assert_eq!(d.handle(BOB, guess("1234")), Err(SessionError::NotInRoom));
    assert!(d.disconnect(BOB).is_empty());
}

#[test]
fn test_blank_rename_mid_game_keeps_active_name() {
    let mut d = started_game("1234", "5678");
    send(&mut d, BOB, set_name("  "));
    let out = send(&mut d, ADA, guess("0000"));
    assert_eq!(json_for(&out, BOB)[0]["activeName"], "Bob");
}

#[test]
fn test_second_secret_is_rejected() {
    let mut d = started_game("1234", "5678");
    let err = d.handle(ADA, secret("9999")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::SecretAlreadySet));
}

#[test]
fn test_repeated_digits_are_scored_by_presence() {
    let mut d = started_game("5678", "1123");
    let out = send(&mut d, ADA, guess("1111"));
    let ada = json_for(&out, ADA);
    assert_eq!(ada[0]["digitsCount"], 4);
    assert_eq!(ada[0]["positionsCount"], 2);
}

#[test]
fn test_rename_mid_game_shows_in_turn_events() {
    let mut d = started_game("1234", "5678");
    send(&mut d, BOB, set_name("Robert"));
    let out = send(&mut d, ADA, guess("0000"));
    assert_eq!(json_for(&out, BOB)[0]["activeName"], "Robert");
}

#[test]
fn test_disconnect_mid_game_frees_code() {
    let mut d = started_game("1234", "5678");
    let out = d.disconnect(BOB);
    assert_eq!(
        json_for(&out, ADA),
        vec![json!({"type": "opponent_left", "name": "Bob"})]
    );
    assert!(!d.rooms().contains(code(4821)));

    // Ada's later game events fail cleanly instead of reaching a dead room.
    assert_eq!(d.handle(ADA, guess("5678")), Err(SessionError::NotInRoom));

    // The name survives, so Ada can host again.
    let out = send(&mut d, ADA, ClientEvent::CreateRoom);
    let created = ServerEvent::RoomCreated {
        room_code: code(4821),
    };
    assert_eq!(out, vec![Outbound::new(ADA, created)]);
}

#[test]
fn test_rooms_are_isolated() {
    let mut next = 4821u16;
    let mut d = Dispatcher::new(RoomRegistry::with_code_source(
        RegistryConfig::default(),
        move || {
            let c = code(next);
            next += 1;
            c
        },
    ));
    for id in 1..=4 {
        let conn = ConnectionId::new(id);
        d.connect(conn).unwrap();
        send(&mut d, conn, set_name(&format!("p{id}")));
    }
    let c1 = ConnectionId::new(1);
    let c2 = ConnectionId::new(2);
    let c3 = ConnectionId::new(3);
    let c4 = ConnectionId::new(4);

    send(&mut d, c1, ClientEvent::CreateRoom);
    send(&mut d, c3, ClientEvent::CreateRoom);
    let out = send(&mut d, c4, join("4822"));
    assert!(out.iter().all(|o| o.to == c3 || o.to == c4));

    let out = send(&mut d, c2, join("4821"));
    assert!(out.iter().all(|o| o.to == c1 || o.to == c2));

    let out = d.disconnect(c3);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to, c4);
    assert!(d.rooms().contains(code(4821)));
}
