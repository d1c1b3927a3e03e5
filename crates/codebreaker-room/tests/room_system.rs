//! Integration tests for the room system: registry, room and scoring
//! working together through a whole game.

use codebreaker_protocol::{Digits, RoomCode, SeatIndex};
use codebreaker_room::{
    Phase, RegistryConfig, RoomError, RoomRegistry, SecretOutcome,
};
use codebreaker_transport::ConnectionId;

// =========================================================================
// Helpers
// =========================================================================

const CREATOR: SeatIndex = SeatIndex::Creator;
const JOINER: SeatIndex = SeatIndex::Joiner;

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn digits(s: &str) -> Digits {
    Digits::parse(s).expect("test digits must be valid")
}

/// A registry whose rooms get codes 4821, 4822, 4823, ...
fn sequential_registry() -> RoomRegistry {
    let mut next = 4821u16;
    RoomRegistry::with_code_source(RegistryConfig::default(), move || {
        let code = RoomCode::new(next).expect("in range");
        next += 1;
        code
    })
}

/// Creates a room for conn 1 ("Ada") joined by conn 2 ("Bob").
fn paired(reg: &mut RoomRegistry) -> RoomCode {
    let code = reg.create_room(conn(1), "Ada".into()).unwrap();
    reg.join_room(code, conn(2), "Bob".into()).unwrap();
    code
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn test_full_game_scenario() {
    let mut reg = sequential_registry();
    let code = paired(&mut reg);
    assert_eq!(code.to_string(), "4821");

    let room = reg.get_room_mut(code).unwrap();
    assert_eq!(room.phase(), Phase::AwaitingSecrets);

    assert_eq!(room.commit_secret(CREATOR, digits("1234")), Ok(SecretOutcome::Waiting));
    assert_eq!(
        room.commit_secret(JOINER, digits("5678")),
        Ok(SecretOutcome::Started { turn: CREATOR })
    );

    // Ada guesses her own secret against Bob's: nothing matches.
    let out = room.guess(CREATOR, digits("1234")).unwrap();
    assert_eq!((out.result.digits_count, out.result.positions_count), (0, 0));
    assert_eq!(room.phase().turn(), Some(JOINER));

    // Bob does the same against Ada's.
    let out = room.guess(JOINER, digits("5678")).unwrap();
    assert_eq!((out.result.digits_count, out.result.positions_count), (0, 0));
    assert_eq!(room.phase().turn(), Some(CREATOR));

    // Ada cracks it.
    let out = room.guess(CREATOR, digits("5678")).unwrap();
    assert_eq!((out.result.digits_count, out.result.positions_count), (4, 4));
    assert_eq!(out.history.len(), 2);
    assert_eq!(room.phase(), Phase::Finished { winner: CREATOR });

    // A finished room stays registered until someone disconnects.
    assert!(reg.contains(code));
}

#[test]
fn test_turn_never_moves_on_rejected_guesses() {
    let mut reg = sequential_registry();
    let code = paired(&mut reg);
    let room = reg.get_room_mut(code).unwrap();
    room.commit_secret(CREATOR, digits("1111")).unwrap();
    room.commit_secret(JOINER, digits("2222")).unwrap();

    let mut expected = CREATOR;
    for round in 0..10 {
        // The seat off turn tries first and is turned away.
        let err = room.guess(expected.opponent(), digits("9999")).unwrap_err();
        assert_eq!(err, RoomError::WrongTurn(expected.opponent()), "round {round}");
        assert_eq!(room.phase().turn(), Some(expected));

        room.guess(expected, digits("9999")).unwrap();
        expected = expected.opponent();
        assert_eq!(room.phase().turn(), Some(expected));
    }
    assert_eq!(room.seat(CREATOR).unwrap().history().len(), 5);
    assert_eq!(room.seat(JOINER).unwrap().history().len(), 5);
}

#[test]
fn test_rooms_are_isolated() {
    let mut reg = sequential_registry();
    let a = paired(&mut reg);
    let b = reg.create_room(conn(3), "Cy".into()).unwrap();
    reg.join_room(b, conn(4), "Di".into()).unwrap();
    assert_ne!(a, b);

    reg.get_room_mut(a)
        .unwrap()
        .commit_secret(CREATOR, digits("1234"))
        .unwrap();

    let room_b = reg.get_room(b).unwrap();
    assert!(!room_b.seat(CREATOR).unwrap().has_secret());
    assert_eq!(room_b.phase(), Phase::AwaitingSecrets);

    reg.remove_room(a);
    assert!(reg.get_room(b).is_some());
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_join_after_start_is_full() {
    let mut reg = sequential_registry();
    let code = paired(&mut reg);
    assert_eq!(
        reg.join_room(code, conn(9), "Late".into()),
        Err(RoomError::RoomFull(code))
    );
}

#[test]
fn test_error_kinds_map_to_wire_kinds() {
    use codebreaker_protocol::ErrorKind;

    let code = RoomCode::new(4821).unwrap();
    assert_eq!(RoomError::NotFound(code).kind(), ErrorKind::RoomNotFound);
    assert_eq!(RoomError::RoomFull(code).kind(), ErrorKind::RoomFull);
    assert_eq!(RoomError::WrongTurn(JOINER).kind(), ErrorKind::WrongTurn);
    assert_eq!(RoomError::SeatEmpty(JOINER).kind(), ErrorKind::NotInRoom);
    assert_eq!(
        RoomError::SecretAlreadySet(CREATOR).kind(),
        ErrorKind::SecretAlreadySet
    );
    assert_eq!(
        RoomError::GameNotInProgress(Phase::AwaitingSecrets).kind(),
        ErrorKind::GameNotInProgress
    );
    assert_eq!(RoomError::CapacityExhausted.kind(), ErrorKind::CapacityExhausted);
}
