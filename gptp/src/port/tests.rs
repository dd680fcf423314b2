use super::{test::*, MessageInterval, PeerDelayState, PortError, Role};
use crate::{
    config::PortConfig,
    datastructures::{
        common::{ClockQuality, PortIdentity, TimeInterval, WireTimestamp},
        messages::{Message, MessageIntervalRequest, MessageType},
        WireFormatError,
    },
    time::{Interval, RtcTime},
};

fn ts(nanos: u32) -> WireTimestamp {
    WireTimestamp { seconds: 0, nanos }
}

fn ticks(port: &mut TestPort<'_>, count: usize) {
    for _ in 0..count {
        port.handle_tick();
    }
}

fn announce_from(source: PortIdentity, priority_1: u8, steps_removed: u16) -> Vec<u8> {
    frame(
        &Message::builder()
            .source_port_identity(source)
            .log_message_interval(-3)
            .announce_message(
                WireTimestamp::default(),
                0,
                priority_1,
                ClockQuality::default(),
                248,
                source.clock_identity,
                steps_removed,
                0xa0,
            ),
    )
}

fn announce(priority_1: u8) -> Vec<u8> {
    announce_from(identity(2), priority_1, 0)
}

fn sync_from(source: PortIdentity, sequence_id: u16) -> Vec<u8> {
    frame(
        &Message::builder()
            .source_port_identity(source)
            .sequence_id(sequence_id)
            .two_step_flag(true)
            .log_message_interval(-3)
            .sync_message(WireTimestamp::default()),
    )
}

fn sync(sequence_id: u16) -> Vec<u8> {
    sync_from(identity(2), sequence_id)
}

fn follow_up(sequence_id: u16, origin: u32) -> Vec<u8> {
    frame(
        &Message::builder()
            .source_port_identity(identity(2))
            .sequence_id(sequence_id)
            .log_message_interval(-3)
            .follow_up_message(ts(origin)),
    )
}

fn pdelay_resp(source: PortIdentity, sequence_id: u16, t2: u32) -> Vec<u8> {
    frame(
        &Message::builder()
            .source_port_identity(source)
            .sequence_id(sequence_id)
            .pdelay_resp_message(ts(t2), identity(1)),
    )
}

fn pdelay_resp_follow_up(sequence_id: u16, t3: u32) -> Vec<u8> {
    frame(
        &Message::builder()
            .source_port_identity(identity(2))
            .sequence_id(sequence_id)
            .pdelay_resp_follow_up_message(ts(t3), identity(1)),
    )
}

fn signaling(request: MessageIntervalRequest) -> Vec<u8> {
    frame(
        &Message::builder()
            .source_port_identity(identity(2))
            .signaling_message(identity(1), Some(request)),
    )
}

/// Send a peer delay request, returning its sequence id.
fn request_link_delay(port: &mut TestPort<'_>) -> u16 {
    port.send_pdelay_req();
    match port.transport_mut().take_messages().as_slice() {
        [Message::PDelayReq(request)] => request.header().sequence_id(),
        other => panic!("expected a peer delay request, got {:?}", other),
    }
}

/// Complete a peer delay exchange measuring 55ns
fn measure_link_delay(port: &mut TestPort<'_>) {
    port.transport_mut().tx_timestamp = 1000;
    let sequence_id = request_link_delay(port);
    port.process_frame(&pdelay_resp(identity(2), sequence_id, 1050), 1160)
        .unwrap();
    port.process_frame(&pdelay_resp_follow_up(sequence_id, 1100), 0)
        .unwrap();
}

fn become_slave(port: &mut TestPort<'_>) {
    port.process_frame(&announce(100), 0).unwrap();
    assert_eq!(port.role(), Role::Slave);
}

#[test]
fn master_is_silent_without_capable_peer() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    ticks(&mut port, 200);

    let types: Vec<_> = port
        .transport_mut()
        .take_messages()
        .iter()
        .map(Message::content_type)
        .collect();
    assert_eq!(types, [MessageType::PDelayReq]);
    assert_eq!(port.role(), Role::Master);
    assert!(sink.notifications().is_empty());
}

#[test]
fn link_delay_from_exchange() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    measure_link_delay(&mut port);

    assert_eq!(port.link_delay(), 55);
    assert!(port.is_as_capable());
    assert!(port.peer_delay().state().follow_up_received());
}

#[test]
fn link_delay_includes_latencies() {
    let sink = TestSink::default();
    let mut port = test_port(
        PortConfig {
            tx_latency: 20,
            rx_latency: 30,
            ..test_config()
        },
        &sink,
    );

    port.transport_mut().tx_timestamp = 1000;
    let sequence_id = request_link_delay(&mut port);
    port.process_frame(&pdelay_resp(identity(2), sequence_id, 1050), 1210)
        .unwrap();
    port.process_frame(&pdelay_resp_follow_up(sequence_id, 1100), 0)
        .unwrap();

    // (1180 - 1020 - 50) / 2
    assert_eq!(port.link_delay(), 55);
}

#[test]
fn capable_master_sends_sync_and_announce() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    measure_link_delay(&mut port);

    port.clock_mut().now = RtcTime::new(5, 400);
    port.transport_mut().tx_timestamp = 1000;
    ticks(&mut port, 16);

    let messages = port.transport_mut().take_messages();
    let [Message::Sync(sync), Message::FollowUp(follow_up)] = messages.as_slice() else {
        panic!("expected sync and follow up, got {:?}", messages);
    };
    let origin = WireTimestamp {
        seconds: 5,
        nanos: 400,
    };
    assert!(sync.header().two_step_flag());
    assert_eq!(sync.header().log_message_interval(), -3);
    assert_eq!(sync.origin_timestamp(), origin);
    assert_eq!(follow_up.header().sequence_id(), sync.header().sequence_id());
    assert_eq!(follow_up.precise_origin_timestamp(), origin);
    assert_eq!(
        follow_up.header().correction_field(),
        TimeInterval::from_nanos(600)
    );

    ticks(&mut port, 112);
    let messages = port.transport_mut().take_messages();
    let announce = messages
        .iter()
        .find_map(|message| match message {
            Message::Announce(announce) => Some(*announce),
            _ => None,
        })
        .unwrap();
    assert_eq!(announce.grandmaster_identity(), identity(1).clock_identity);
    assert_eq!(announce.grandmaster_priority_1(), 248);
    assert_eq!(announce.steps_removed(), 0);
    assert_eq!(announce.header().log_message_interval(), 0);
    assert_eq!(
        messages
            .iter()
            .filter(|message| message.content_type() == MessageType::Sync)
            .count(),
        7
    );
}

#[test]
fn better_announce_makes_slave() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    become_slave(&mut port);

    assert_eq!(
        port.grandmaster().grandmaster_identity,
        identity(2).clock_identity
    );
    assert_eq!(port.grandmaster().announce_interval, 16);
    assert_eq!(sink.notifications(), [true]);
}

#[test]
fn worse_announce_is_ignored() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    port.process_frame(&announce(250), 0).unwrap();

    assert_eq!(port.role(), Role::Master);
    assert_eq!(port.grandmaster(), port.local_record());
    assert!(sink.notifications().is_empty());
}

#[test]
fn announce_timeout_returns_to_master_once() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);

    // announces every eighth of a second, so two intervals of 15 ticks
    ticks(&mut port, 30);
    assert_eq!(port.role(), Role::Slave);
    ticks(&mut port, 1);
    assert_eq!(port.role(), Role::Master);
    assert_eq!(port.grandmaster(), port.local_record());
    assert_eq!(
        port.clock().increment,
        port.config().servo.nominal_increment
    );

    ticks(&mut port, 300);
    assert_eq!(sink.notifications(), [true, false]);
}

#[test]
fn sync_timeout_returns_to_master() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);

    ticks(&mut port, 25);
    port.process_frame(&announce(100), 0).unwrap();
    ticks(&mut port, 20);
    assert_eq!(port.role(), Role::Slave);
    ticks(&mut port, 1);
    assert_eq!(port.role(), Role::Master);
    assert_eq!(sink.notifications(), [true, false]);
}

#[test]
fn repeated_announce_is_idempotent() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);
    let grandmaster = *port.grandmaster();

    // longer than the announce timeout in total, shorter than the sync one
    for _ in 0..4 {
        ticks(&mut port, 10);
        port.process_frame(&announce(100), 0).unwrap();
    }

    assert_eq!(port.role(), Role::Slave);
    assert_eq!(*port.grandmaster(), grandmaster);
    assert_eq!(sink.notifications(), [true]);
}

#[test]
fn refresh_takes_announced_interval() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);
    assert_eq!(port.grandmaster().announce_interval, 16);

    let slower = frame(
        &Message::builder()
            .source_port_identity(identity(2))
            .log_message_interval(-2)
            .announce_message(
                WireTimestamp::default(),
                0,
                100,
                ClockQuality::default(),
                248,
                identity(2).clock_identity,
                0,
                0xa0,
            ),
    );
    port.process_frame(&slower, 0).unwrap();

    assert_eq!(port.role(), Role::Slave);
    assert_eq!(port.grandmaster().announce_interval, 32);
    assert_eq!(sink.notifications(), [true]);
}

#[test]
fn other_grandmaster_ignored_while_slave() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);

    port.process_frame(&announce_from(identity(3), 1, 0), 0)
        .unwrap();

    assert_eq!(
        port.grandmaster().grandmaster_identity,
        identity(2).clock_identity
    );
    assert_eq!(sink.notifications(), [true]);
}

#[test]
fn unusable_announces_are_dropped() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    assert_eq!(
        port.process_frame(&announce_from(identity(1), 1, 0), 0),
        Err(PortError::SelfOrigin)
    );
    assert_eq!(
        port.process_frame(&announce_from(identity(2), 1, 255), 0),
        Err(PortError::StepsRemoved(255))
    );
    assert_eq!(port.role(), Role::Master);
}

#[test]
fn local_update_reclaims_master() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);

    port.update_local_announce(ClockQuality::default(), 200, 248);
    assert_eq!(port.role(), Role::Slave);

    port.update_local_announce(ClockQuality::default(), 50, 248);
    assert_eq!(port.role(), Role::Master);
    assert_eq!(port.grandmaster().priority_1, 50);
    assert_eq!(sink.notifications(), [true, false]);
}

#[test]
fn follow_up_needs_matching_sync() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);

    assert_eq!(
        port.process_frame(&follow_up(5, 1200), 0),
        Err(PortError::OutOfOrder)
    );
    port.process_frame(&sync(5), 1000).unwrap();
    assert_eq!(
        port.process_frame(&follow_up(4, 1200), 0),
        Err(PortError::SequenceMismatch {
            expected: 5,
            received: 4
        })
    );
    assert!(port.clock().phase_offsets.is_empty());

    port.process_frame(&follow_up(5, 1200), 0).unwrap();
    assert_eq!(port.clock().phase_offsets, [200]);

    // the sync is consumed
    assert_eq!(
        port.process_frame(&follow_up(5, 1200), 0),
        Err(PortError::OutOfOrder)
    );
}

#[test]
fn sync_only_from_grandmaster_port() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    // a master has no use for syncs
    port.process_frame(&sync(1), 0).unwrap();
    port.process_frame(&follow_up(1, 0), 0).unwrap();
    assert!(port.clock().phase_offsets.is_empty());

    become_slave(&mut port);
    assert_eq!(
        port.process_frame(&sync_from(identity(3), 1), 0),
        Err(PortError::UnexpectedSource(identity(3)))
    );
}

#[test]
fn lock_makes_peer_capable() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    become_slave(&mut port);
    assert!(!port.is_as_capable());

    for sequence_id in 0..3 {
        let time = sequence_id as u32 * 125_000_000;
        port.process_frame(&sync(sequence_id), time).unwrap();
        port.process_frame(&follow_up(sequence_id, time), 0)
            .unwrap();
    }

    assert!(port.is_locked());
    assert!(port.is_as_capable());
    assert_eq!(sink.notifications(), [true, false]);
    assert_eq!(
        port.clock().increment,
        port.config().servo.nominal_increment
    );
}

#[test]
fn looped_link_revokes_capability() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    measure_link_delay(&mut port);

    let sequence_id = request_link_delay(&mut port);
    assert_eq!(
        port.process_frame(&pdelay_resp(identity(1), sequence_id, 0), 0),
        Err(PortError::SelfOrigin)
    );
    assert!(!port.is_as_capable());
}

#[test]
fn lost_responses_revoke_capability() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    measure_link_delay(&mut port);

    for _ in 0..3 {
        request_link_delay(&mut port);
    }
    assert!(port.is_as_capable());
    assert_eq!(port.peer_delay().lost_responses(), 2);

    request_link_delay(&mut port);
    assert!(!port.is_as_capable());
    assert_eq!(port.peer_delay().lost_responses(), 3);
}

#[test]
fn excessive_delay_is_discarded() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    port.transport_mut().tx_timestamp = 0;
    let sequence_id = request_link_delay(&mut port);
    port.process_frame(&pdelay_resp(identity(2), sequence_id, 100), 2000)
        .unwrap();
    assert_eq!(
        port.process_frame(&pdelay_resp_follow_up(sequence_id, 200), 0),
        Err(PortError::DelayOutOfRange(950))
    );
    assert!(!port.is_as_capable());
    assert_eq!(port.link_delay(), 0);
}

#[test]
fn excessive_delay_keeps_capable_peer() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    measure_link_delay(&mut port);
    assert!(port.is_as_capable());

    port.transport_mut().tx_timestamp = 0;
    let sequence_id = request_link_delay(&mut port);
    port.process_frame(&pdelay_resp(identity(2), sequence_id, 100), 2000)
        .unwrap();
    assert_eq!(
        port.process_frame(&pdelay_resp_follow_up(sequence_id, 200), 0),
        Err(PortError::DelayOutOfRange(950))
    );
    assert!(port.is_as_capable());
    assert_eq!(port.link_delay(), 55);
}

#[test]
fn responds_to_peer_delay_request() {
    let sink = TestSink::default();
    let mut port = test_port(
        PortConfig {
            tx_latency: 20,
            rx_latency: 10,
            ..test_config()
        },
        &sink,
    );
    port.clock_mut().now = RtcTime::new(7, 5_000);
    port.transport_mut().tx_timestamp = 3_000;

    let request = Message::builder()
        .source_port_identity(identity(2))
        .sequence_id(9)
        .pdelay_req_message();
    port.process_frame(&frame(&request), 2_000).unwrap();

    let messages = port.transport_mut().take_messages();
    let [Message::PDelayResp(response), Message::PDelayRespFollowUp(follow_up)] =
        messages.as_slice()
    else {
        panic!("expected response and follow up, got {:?}", messages);
    };
    assert_eq!(response.header().sequence_id(), 9);
    assert_eq!(response.requesting_port_identity(), identity(2));
    assert_eq!(
        response.request_receipt_timestamp(),
        WireTimestamp {
            seconds: 7,
            nanos: 1_990
        }
    );
    assert_eq!(follow_up.header().sequence_id(), 9);
    assert_eq!(follow_up.requesting_port_identity(), identity(2));
    assert_eq!(
        follow_up.response_origin_timestamp(),
        WireTimestamp {
            seconds: 7,
            nanos: 3_020
        }
    );
}

#[test]
fn response_timestamp_before_second_rollover() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    port.clock_mut().now = RtcTime::new(7, 100);
    port.transport_mut().tx_timestamp = 50;

    let request = Message::builder()
        .source_port_identity(identity(2))
        .pdelay_req_message();
    port.process_frame(&frame(&request), 999_999_000).unwrap();

    let messages = port.transport_mut().take_messages();
    let Message::PDelayResp(response) = messages[0] else {
        panic!("expected response, got {:?}", messages);
    };
    assert_eq!(
        response.request_receipt_timestamp(),
        WireTimestamp {
            seconds: 6,
            nanos: 999_999_000
        }
    );
}

#[test]
fn signaling_changes_intervals() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    port.process_frame(
        &signaling(MessageIntervalRequest {
            link_delay_interval: 127,
            time_sync_interval: -128,
            announce_interval: 2,
            flags: 0,
        }),
        0,
    )
    .unwrap();

    let intervals = port.intervals();
    assert_eq!(intervals.link_delay, MessageInterval::Disabled);
    assert_eq!(
        intervals.sync,
        MessageInterval::Enabled(port.config().sync_interval)
    );
    assert_eq!(
        intervals.announce,
        MessageInterval::Enabled(Interval::from_log_2(2).unwrap())
    );

    ticks(&mut port, 300);
    assert!(port.transport().sent.is_empty());

    assert_eq!(
        port.process_frame(
            &signaling(MessageIntervalRequest {
                link_delay_interval: 126,
                time_sync_interval: 10,
                announce_interval: -128,
                flags: 0,
            }),
            0,
        ),
        Err(PortError::UnsupportedInterval(10))
    );
    let intervals = port.intervals();
    assert_eq!(
        intervals.link_delay,
        MessageInterval::Enabled(port.config().pdelay_interval)
    );
    assert_eq!(
        intervals.sync,
        MessageInterval::Enabled(port.config().sync_interval)
    );
}

#[test]
fn foreign_frames_are_dropped() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);

    let mut other_ethertype = sync(1);
    other_ethertype[12..14].copy_from_slice(&[0x08, 0x00]);
    assert_eq!(
        port.process_frame(&other_ethertype, 0),
        Err(PortError::NotPtp(0x0800))
    );

    let mut other_version = sync(1);
    other_version[15] = 0x01;
    assert_eq!(
        port.process_frame(&other_version, 0),
        Err(PortError::UnsupportedVersion(1))
    );

    assert_eq!(
        port.process_frame(&sync(1)[..20], 0),
        Err(PortError::WireFormat(WireFormatError::BufferTooShort))
    );
    assert_eq!(
        port.process_frame(&sync(1)[..10], 0),
        Err(PortError::WireFormat(WireFormatError::BufferTooShort))
    );

    // dropping is all handle_frame does with them
    port.handle_frame(&other_ethertype, 0);
    assert!(port.transport().sent.is_empty());
}

#[test]
fn transmit_failure_is_contained() {
    let sink = TestSink::default();
    let mut port = test_port(test_config(), &sink);
    port.transport_mut().fail = true;

    port.send_pdelay_req();
    assert_eq!(port.peer_delay().state(), PeerDelayState::Idle);

    let request = Message::builder()
        .source_port_identity(identity(2))
        .pdelay_req_message();
    assert_eq!(
        port.process_frame(&frame(&request), 0),
        Err(PortError::Network)
    );
}
