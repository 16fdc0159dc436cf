use flotilla::{Airwave, Message, Received, Role, TurnChannel};
use tokio::time::Duration;

const SHORT: Duration = Duration::from_millis(10);

#[tokio::test]
async fn broadcast_reaches_every_other_endpoint_but_not_the_sender() {
    let air = Airwave::new();
    let mut a = air.join();
    let mut b = air.join();
    let mut c = air.join();

    let msg = Message::Ready { role: Role::First };
    a.broadcast(msg).await.unwrap();

    assert_eq!(b.recv(SHORT).await.unwrap(), Received::Message(msg));
    assert_eq!(c.recv(SHORT).await.unwrap(), Received::Message(msg));
    // no self-echo
    assert_eq!(a.recv(SHORT).await.unwrap(), Received::TimedOut);
}

#[tokio::test]
async fn recv_times_out_on_an_idle_medium() {
    let (mut a, _b) = Airwave::pair();
    assert_eq!(a.recv(SHORT).await.unwrap(), Received::TimedOut);
}

#[tokio::test]
async fn messages_queue_in_order() {
    let (mut a, mut b) = Airwave::pair();
    for seq in 0..3 {
        a.broadcast(Message::Shot { seq, row: 0, col: 0 }).await.unwrap();
    }
    for seq in 0..3 {
        assert_eq!(
            b.recv(SHORT).await.unwrap(),
            Received::Message(Message::Shot { seq, row: 0, col: 0 })
        );
    }
}

#[tokio::test]
async fn malformed_traffic_is_an_error_not_a_timeout() {
    let (a, mut b) = Airwave::pair();
    a.broadcast_raw("this is not a turn message");
    let err = b.recv(SHORT).await.unwrap_err();
    assert!(err.to_string().contains("malformed"), "{}", err);
}

#[tokio::test]
async fn third_party_crosstalk_is_delivered() {
    // the medium is a shared group: a late joiner's traffic reaches
    // everyone already playing
    let air = Airwave::new();
    let mut a = air.join();
    let _b = air.join();
    let mut stranger = air.join();

    stranger
        .broadcast(Message::Ready { role: Role::Second })
        .await
        .unwrap();
    assert_eq!(
        a.recv(SHORT).await.unwrap(),
        Received::Message(Message::Ready { role: Role::Second })
    );
}
