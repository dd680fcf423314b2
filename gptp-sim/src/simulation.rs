//! Discrete event simulation of two ports on a link

use std::{
    cell::RefCell,
    cmp::Reverse,
    collections::BinaryHeap,
    fmt::{Display, Formatter},
    rc::Rc,
};

use gptp::{
    datastructures::frame::Frame, time::NANOS_PER_SECOND, DiscontinuitySink, Port, PortConfig,
    Role,
};

use crate::{
    clock::{ClockState, SimClock},
    config::Config,
    transport::SimTransport,
};

/// True nanoseconds between two ticks of a port
pub const TICK_INTERVAL: u64 = NANOS_PER_SECOND as u64 / 128;

/// Records the discontinuity notifications of a port
#[derive(Debug, Default)]
pub struct SimSink {
    notifications: RefCell<Vec<bool>>,
}

impl SimSink {
    pub fn notifications(&self) -> Vec<bool> {
        self.notifications.borrow().clone()
    }
}

impl DiscontinuitySink for SimSink {
    fn grandmaster_discontinuity(&self, timestamps_uncertain: bool) {
        log::debug!("Discontinuity, timestamps uncertain: {}", timestamps_uncertain);
        self.notifications.borrow_mut().push(timestamps_uncertain);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Event {
    Tick(usize),
    Deliver { node: usize, frame: Frame },
}

struct Node<'s> {
    port: Port<'s, SimClock, SimTransport, SimSink>,
    clock: Rc<RefCell<ClockState>>,
    /// Time from the transmit timestamp point to the wire
    tx_latency: u64,
    /// Time from the wire to the receive timestamp point
    rx_latency: u64,
}

/// State of one node at the end of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeReport {
    pub role: Role,
    pub locked: bool,
    pub as_capable: bool,
    pub link_delay: u32,
    /// Synchronized time minus that of the other node, within the second
    pub offset: i64,
    pub frequency_error_ppm: f64,
}

impl Display for NodeReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} locked={} as-capable={} link-delay={}ns offset={}ns frequency-error={:.3}ppm",
            self.role,
            self.locked,
            self.as_capable,
            self.link_delay,
            self.offset,
            self.frequency_error_ppm
        )
    }
}

pub struct Simulation<'s> {
    nodes: Vec<Node<'s>>,
    queue: BinaryHeap<Reverse<(u64, u64, Event)>>,
    now: u64,
    scheduled: u64,
    link_delay: u64,
    link_up: bool,
}

impl<'s> Simulation<'s> {
    /// Set up the nodes of `config`, each notifying its own sink.
    pub fn new(config: &Config, sinks: &'s [SimSink]) -> Self {
        let nodes = config
            .nodes
            .iter()
            .zip(sinks)
            .map(|(node, sink)| {
                let clock = Rc::new(RefCell::new(ClockState::new(
                    node.servo.nominal_increment,
                    node.drift_ppm,
                    node.initial_time,
                )));
                let port = Port::new(
                    PortConfig::from(node),
                    SimClock(clock.clone()),
                    SimTransport::new(clock.clone()),
                    sink,
                );
                Node {
                    port,
                    clock,
                    tx_latency: node.tx_latency as u64,
                    rx_latency: node.rx_latency as u64,
                }
            })
            .collect();

        let mut simulation = Simulation {
            nodes,
            queue: BinaryHeap::new(),
            now: 0,
            scheduled: 0,
            link_delay: config.link_delay,
            link_up: true,
        };
        // stagger the ticks so the nodes never act at the same instant
        for node in 0..simulation.nodes.len() {
            simulation.schedule(node as u64 * TICK_INTERVAL / 3, Event::Tick(node));
        }
        simulation
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Connect or cut the link. Frames sent while it is down are lost.
    pub fn set_link_up(&mut self, up: bool) {
        log::info!("Link {}", if up { "up" } else { "down" });
        self.link_up = up;
    }

    fn schedule(&mut self, time: u64, event: Event) {
        self.scheduled += 1;
        self.queue.push(Reverse((time, self.scheduled, event)));
    }

    /// Process all events up to and including true time `end`.
    pub fn run_until(&mut self, end: u64) {
        while let Some(Reverse((time, _, _))) = self.queue.peek() {
            if *time > end {
                break;
            }
            let Some(Reverse((time, _, event))) = self.queue.pop() else {
                break;
            };

            self.now = time;
            for node in &self.nodes {
                node.clock.borrow_mut().set_now(time);
            }

            match event {
                Event::Tick(node) => {
                    self.nodes[node].port.handle_tick();
                    self.schedule(time + TICK_INTERVAL, Event::Tick(node));
                    self.transmit(node);
                }
                Event::Deliver { node, frame } => {
                    let receipt = self.nodes[node].clock.borrow().timestamp();
                    self.nodes[node].port.handle_frame(&frame, receipt);
                    self.transmit(node);
                }
            }
        }
        self.now = self.now.max(end);
    }

    /// Put everything `node` sent on the link to its peer. Frames arrive
    /// when they pass the peer's receive timestamp point.
    fn transmit(&mut self, node: usize) {
        let frames = self.nodes[node].port.transport_mut().take_outbox();
        if !self.link_up {
            return;
        }
        let peer = (node + 1) % self.nodes.len();
        let arrival = self.now
            + self.nodes[node].tx_latency
            + self.link_delay
            + self.nodes[peer].rx_latency;
        for frame in frames {
            self.schedule(arrival, Event::Deliver { node: peer, frame });
        }
    }

    pub fn port(&self, node: usize) -> &Port<'s, SimClock, SimTransport, SimSink> {
        &self.nodes[node].port
    }

    /// Synchronized time of `node` minus that of `other`, folded into half a
    /// second either way
    pub fn offset(&self, node: usize, other: usize) -> i64 {
        let nanos = |index: usize| {
            (self.nodes[index].clock.borrow().synchronized() % NANOS_PER_SECOND as u64) as i64
        };
        let second = NANOS_PER_SECOND as i64;
        let difference = (nanos(node) - nanos(other)).rem_euclid(second);
        if difference > second / 2 {
            difference - second
        } else {
            difference
        }
    }

    pub fn report(&self) -> Vec<NodeReport> {
        (0..self.nodes.len())
            .map(|index| {
                let node = &self.nodes[index];
                NodeReport {
                    role: node.port.role(),
                    locked: node.port.is_locked(),
                    as_capable: node.port.is_as_capable(),
                    link_delay: node.port.link_delay(),
                    offset: self.offset(index, (index + 1) % self.nodes.len()),
                    frequency_error_ppm: node.clock.borrow().frequency_error_ppm(),
                }
            })
            .collect()
    }
}
