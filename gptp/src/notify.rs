/// Receiver of grandmaster discontinuity notifications
///
/// The port notifies on every master/slave role change and every change of
/// the servo's lock state. Implementations are called from inside the port's
/// event handlers and must not block.
pub trait DiscontinuitySink {
    /// `timestamps_uncertain` is true when the local time has stopped being
    /// trustworthy, and false once it is again.
    fn grandmaster_discontinuity(&self, timestamps_uncertain: bool);
}

/// A sink for integrations that do not care about discontinuities
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreDiscontinuities;

impl DiscontinuitySink for IgnoreDiscontinuities {
    fn grandmaster_discontinuity(&self, _timestamps_uncertain: bool) {}
}
