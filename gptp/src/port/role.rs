//! Master/slave role selection

use core::fmt::{Display, Formatter};

use super::{
    error::{PortError, Result},
    Port,
};
use crate::{
    bmc::{compare, winning_level, GrandmasterRecord},
    clock::Clock,
    datastructures::{
        common::ClockQuality,
        messages::{AnnounceMessage, SignalingMessage},
    },
    network::MessageTransport,
    notify::DiscontinuitySink,
};

/// Announces this many steps from their grandmaster are discarded
const MAX_STEPS_REMOVED: u16 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Distributing this port's time, or waiting for a better grandmaster
    Master,
    /// Following the grandmaster of the received announces
    Slave,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Master => write!(f, "master"),
            Role::Slave => write!(f, "slave"),
        }
    }
}

impl<'s, C: Clock, T: MessageTransport, S: DiscontinuitySink> Port<'s, C, T, S> {
    /// Change what the port advertises about its own clock, and rerun the
    /// best master selection against it.
    pub fn update_local_announce(
        &mut self,
        clock_quality: ClockQuality,
        priority_1: u8,
        priority_2: u8,
    ) {
        self.local_record = GrandmasterRecord::local(
            self.config.port_identity,
            clock_quality,
            priority_1,
            priority_2,
            self.config.announce_interval,
        );
        self.check_local_record();
    }

    /// Become master. The local record is reloaded as grandmaster unless it
    /// just won the comparison that led here.
    pub(super) fn become_master(&mut self, local_record_won: bool) {
        if !local_record_won {
            self.grandmaster = self.local_record;
        }
        self.clock
            .write_frequency_increment(self.config.servo.nominal_increment);
        self.pending_sync = None;

        if self.role == Role::Slave {
            log::info!("Becoming master");
            self.role = Role::Master;
            self.sink.grandmaster_discontinuity(false);
        }
    }

    pub(super) fn become_slave(&mut self) {
        self.counters.sync = 0;
        self.sync_receipt_interval = self.config.sync_interval.as_ticks();
        self.servo.reset();

        if self.role == Role::Master {
            log::info!(
                "Becoming slave of {} through {}",
                self.grandmaster.grandmaster_identity,
                self.grandmaster.source_port_identity
            );
            self.role = Role::Slave;
            self.sink.grandmaster_discontinuity(true);
        }
    }

    /// Master when the local record beats the current grandmaster, or when
    /// already master.
    fn check_local_record(&mut self) {
        if self.role == Role::Master || compare(&self.local_record, &self.grandmaster) {
            self.grandmaster = self.local_record;
            self.become_master(true);
        }
    }

    pub(super) fn handle_announce(&mut self, message: &AnnounceMessage) -> Result<()> {
        let source = message.header().source_port_identity();
        if source.clock_identity == self.config.port_identity.clock_identity {
            return Err(PortError::SelfOrigin);
        }
        if message.steps_removed() >= MAX_STEPS_REMOVED {
            return Err(PortError::StepsRemoved(message.steps_removed()));
        }

        let candidate = GrandmasterRecord::from_announce(message, self.config.announce_interval);

        if candidate.grandmaster_identity == self.grandmaster.grandmaster_identity {
            // a refresh of the current grandmaster
            self.counters.announce = 0;
            self.grandmaster = candidate;
            self.check_local_record();
        } else if self.role == Role::Master {
            match winning_level(&candidate, &self.grandmaster) {
                Some(level) => {
                    log::info!(
                        "Grandmaster {} wins on {:?}",
                        candidate.grandmaster_identity,
                        level
                    );
                    self.grandmaster = candidate;
                    self.counters.announce = 0;
                    self.become_slave();
                }
                None => log::debug!(
                    "Not following worse grandmaster {}",
                    candidate.grandmaster_identity
                ),
            }
        } else {
            log::debug!(
                "Ignoring grandmaster {} while following {}",
                candidate.grandmaster_identity,
                self.grandmaster.grandmaster_identity
            );
        }

        Ok(())
    }

    pub(super) fn handle_signaling(&mut self, message: &SignalingMessage) -> Result<()> {
        let source = message.header().source_port_identity();
        if source == self.config.port_identity {
            return Err(PortError::SelfOrigin);
        }
        match message.message_interval_request() {
            Some(request) => self.intervals.apply_request(&request, &self.config),
            None => {
                log::debug!("Signaling from {} without interval request", source);
                Ok(())
            }
        }
    }

    /// React to the servo gaining or losing lock.
    pub(super) fn lock_changed(&mut self, locked: bool) {
        log::info!("Servo {}", if locked { "locked" } else { "lost lock" });
        self.peer_delay.set_as_capable(locked);
        self.sink.grandmaster_discontinuity(!locked);
    }
}
