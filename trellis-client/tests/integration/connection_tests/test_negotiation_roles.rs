use crate::init_tracing;
use crate::utils::{create_test_registry, local_tracks};
use trellis_core::{PeerId, SdpType, SessionDescription, SignalMessage};
use trellis_client::peer::{NegotiationState, PeerRole};

/// Calling a peer makes us the caller and emits an offer addressed to them.
#[tokio::test]
async fn caller_sends_offer_and_tracks_state() {
    init_tracing();
    let mut t = create_test_registry();
    let peer = PeerId::from("p2");

    t.registry
        .call_peer(peer.clone(), &t.self_id, &local_tracks())
        .await
        .expect("call failed");

    let entry = t.registry.get(&peer).unwrap();
    assert_eq!(entry.role, PeerRole::Caller);
    assert_eq!(entry.state, NegotiationState::OfferSent);

    let offer = t.sink.offer_to(&peer).expect("no offer sent");
    assert_eq!(offer.kind, SdpType::Offer);

    // The from tag carries our relay-assigned identity.
    assert!(t.sink.sent().iter().any(|m| matches!(
        m,
        SignalMessage::Offer { from, .. } if from == &t.self_id
    )));
}

/// The receiver of an offer is always the callee; it answers immediately.
#[tokio::test]
async fn offer_receipt_creates_callee_and_answers() {
    init_tracing();
    let mut t = create_test_registry();
    let peer = PeerId::from("p1");

    t.registry
        .handle_offer(
            peer.clone(),
            SessionDescription::offer("v=0"),
            &t.self_id,
            &local_tracks(),
        )
        .await
        .expect("offer handling failed");

    let entry = t.registry.get(&peer).unwrap();
    assert_eq!(entry.role, PeerRole::Callee);
    assert_eq!(entry.state, NegotiationState::AnswerSent);

    let conn = t.connector.connection(&peer).unwrap();
    assert_eq!(
        conn.remote_description(),
        Some(SessionDescription::offer("v=0"))
    );
    let answer = t.sink.answer_to(&peer).expect("no answer sent");
    assert_eq!(answer.kind, SdpType::Answer);
}

/// An answer for an entry that never sent an offer is stale signaling and
/// leaves the entry untouched.
#[tokio::test]
async fn stale_answer_is_ignored() {
    init_tracing();
    let mut t = create_test_registry();
    let peer = PeerId::from("p1");

    // Callee path: we answered them, no offer of ours is in flight.
    t.registry
        .handle_offer(
            peer.clone(),
            SessionDescription::offer("v=0"),
            &t.self_id,
            &local_tracks(),
        )
        .await
        .expect("offer handling failed");

    t.registry
        .handle_answer(peer.clone(), SessionDescription::answer("v=1"))
        .await;

    let entry = t.registry.get(&peer).unwrap();
    assert_eq!(entry.state, NegotiationState::AnswerSent);
    let conn = t.connector.connection(&peer).unwrap();
    assert_eq!(
        conn.remote_description(),
        Some(SessionDescription::offer("v=0")),
        "stale answer must not overwrite the remote description"
    );
}

/// An answer from a peer with no entry at all is ignored.
#[tokio::test]
async fn answer_from_unknown_peer_is_ignored() {
    init_tracing();
    let mut t = create_test_registry();

    t.registry
        .handle_answer(PeerId::from("stranger"), SessionDescription::answer("v=0"))
        .await;

    assert!(t.registry.is_empty());
    assert!(t.sink.sent().is_empty());
}
