//! Status polling for the wait operations.
//!
//! [`Poller`] decides, from each RAMP_STAT read, whether the awaited goal was
//! reached, whether to sleep and read again, or whether the poll bound ran out.
//! It performs no I/O, so the sequencing can be tested without a chip.

use crate::config::PollPolicy;
use crate::registers::RampStatus;

/// Condition a wait operation suspends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionGoal {
    /// XACTUAL equals XTARGET.
    PositionReached,
    /// VACTUAL equals the commanded VMAX.
    VelocityReached,
    /// VACTUAL is zero.
    Stopped,
}

impl MotionGoal {
    /// Whether `status` satisfies the goal.
    #[inline]
    pub fn is_met(self, status: &RampStatus) -> bool {
        match self {
            MotionGoal::PositionReached => status.position_reached(),
            MotionGoal::VelocityReached => status.velocity_reached(),
            MotionGoal::Stopped => status.vzero(),
        }
    }
}

/// What to do after a status read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Goal observed.
    Done,
    /// Sleep this many milliseconds, then read again.
    Sleep(u32),
    /// Poll bound reached without observing the goal.
    Exhausted,
}

/// Polling state machine for one wait.
#[derive(Debug, Clone)]
pub struct Poller {
    goal: MotionGoal,
    policy: PollPolicy,
    polls: u32,
}

impl Poller {
    /// Start waiting for `goal`.
    pub fn new(goal: MotionGoal, policy: PollPolicy) -> Self {
        Self {
            goal,
            policy,
            polls: 0,
        }
    }

    /// Goal being awaited.
    #[inline]
    pub fn goal(&self) -> MotionGoal {
        self.goal
    }

    /// Status reads observed so far.
    #[inline]
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Feed the result of one status read.
    pub fn observe(&mut self, status: &RampStatus) -> PollStep {
        self.polls = self.polls.saturating_add(1);

        if self.goal.is_met(status) {
            return PollStep::Done;
        }

        match self.policy.max_polls {
            Some(max) if self.polls >= max => PollStep::Exhausted,
            _ => PollStep::Sleep(self.policy.interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITION_REACHED: u32 = 1 << 9;

    #[test]
    fn test_done_on_first_matching_read() {
        let mut poller = Poller::new(MotionGoal::PositionReached, PollPolicy::default());
        assert_eq!(poller.observe(&RampStatus::from_bits(0)), PollStep::Sleep(100));
        assert_eq!(poller.observe(&RampStatus::from_bits(0)), PollStep::Sleep(100));
        assert_eq!(
            poller.observe(&RampStatus::from_bits(POSITION_REACHED)),
            PollStep::Done
        );
        assert_eq!(poller.polls(), 3);
    }

    #[test]
    fn test_default_policy_is_unbounded() {
        let mut poller = Poller::new(MotionGoal::Stopped, PollPolicy::default());
        for _ in 0..10_000 {
            assert_eq!(poller.observe(&RampStatus::default()), PollStep::Sleep(100));
        }
    }

    #[test]
    fn test_bounded_policy_exhausts() {
        let policy = PollPolicy {
            interval_ms: 5,
            max_polls: Some(3),
        };
        let mut poller = Poller::new(MotionGoal::VelocityReached, policy);
        assert_eq!(poller.observe(&RampStatus::default()), PollStep::Sleep(5));
        assert_eq!(poller.observe(&RampStatus::default()), PollStep::Sleep(5));
        assert_eq!(poller.observe(&RampStatus::default()), PollStep::Exhausted);
    }

    #[test]
    fn test_goal_flags() {
        let vzero = RampStatus::from_bits(1 << 10);
        assert!(MotionGoal::Stopped.is_met(&vzero));
        assert!(!MotionGoal::PositionReached.is_met(&vzero));
        assert!(MotionGoal::VelocityReached.is_met(&RampStatus::from_bits(1 << 8)));
    }
}
