use serde::{Deserialize, Serialize};

use ringdash_core::timer::Countdown;

use crate::config::AbilityTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    SpeedBoost,
    Flight,
    WallBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightPhase {
    Idle,
    /// Climbing at full lift until `target_height` above `origin_y`.
    Ascending { origin_y: f32 },
    /// Manual vertical control.
    Hovering,
}

/// Ability sub-state. Exactly one variant per character; which one is fixed by
/// the archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityState {
    SpeedBoost {
        remaining: Countdown,
        cooldown: Countdown,
    },
    Flight {
        fuel: f32,
        phase: FlightPhase,
        cooldown: Countdown,
    },
    WallBreak {
        cooldown: Countdown,
        punch: Countdown,
    },
}

impl AbilityState {
    pub fn new(kind: AbilityKind, tuning: &AbilityTuning) -> Self {
        match kind {
            AbilityKind::SpeedBoost => AbilityState::SpeedBoost {
                remaining: Countdown::idle(),
                cooldown: Countdown::idle(),
            },
            AbilityKind::Flight => AbilityState::Flight {
                fuel: tuning.flight_max_time,
                phase: FlightPhase::Idle,
                cooldown: Countdown::idle(),
            },
            AbilityKind::WallBreak => AbilityState::WallBreak {
                cooldown: Countdown::idle(),
                punch: Countdown::idle(),
            },
        }
    }

    pub fn kind(&self) -> AbilityKind {
        match self {
            AbilityState::SpeedBoost { .. } => AbilityKind::SpeedBoost,
            AbilityState::Flight { .. } => AbilityKind::Flight,
            AbilityState::WallBreak { .. } => AbilityKind::WallBreak,
        }
    }

    /// Can be triggered right now.
    pub fn is_ready(&self) -> bool {
        match self {
            AbilityState::SpeedBoost {
                remaining,
                cooldown,
            } => remaining.is_expired() && cooldown.is_expired(),
            AbilityState::Flight {
                fuel,
                phase,
                cooldown,
            } => *phase == FlightPhase::Idle && cooldown.is_expired() && *fuel > 0.0,
            AbilityState::WallBreak { cooldown, .. } => cooldown.is_expired(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            AbilityState::SpeedBoost { remaining, .. } => remaining.is_running(),
            AbilityState::Flight { phase, .. } => *phase != FlightPhase::Idle,
            AbilityState::WallBreak { punch, .. } => punch.is_running(),
        }
    }

    pub fn is_flying(&self) -> bool {
        matches!(self, AbilityState::Flight { phase, .. } if *phase != FlightPhase::Idle)
    }

    /// Max-speed multiplier contributed by the ability.
    pub fn speed_multiplier(&self, tuning: &AbilityTuning) -> f32 {
        match self {
            AbilityState::SpeedBoost { remaining, .. } if remaining.is_running() => {
                tuning.boost_factor
            },
            _ => 1.0,
        }
    }

    /// Enter the boost window. Caller checks `is_ready`.
    pub(crate) fn start_boost(&mut self, tuning: &AbilityTuning) {
        if let AbilityState::SpeedBoost { remaining, .. } = self {
            remaining.restart(tuning.boost_duration);
        }
    }

    /// Enter the flight climb from height `y`.
    pub(crate) fn start_flight(&mut self, y: f32) {
        if let AbilityState::Flight { phase, .. } = self {
            *phase = FlightPhase::Ascending { origin_y: y };
        }
    }

    pub(crate) fn start_punch(&mut self, tuning: &AbilityTuning) {
        if let AbilityState::WallBreak { cooldown, punch } = self {
            punch.restart(tuning.punch_duration);
            cooldown.restart(tuning.punch_cooldown);
        }
    }

    /// Stop flying and enter cooldown. Returns whether a flight was in progress.
    pub fn end_flight(&mut self, tuning: &AbilityTuning) -> bool {
        if let AbilityState::Flight {
            phase, cooldown, ..
        } = self
            && *phase != FlightPhase::Idle
        {
            *phase = FlightPhase::Idle;
            cooldown.restart(tuning.flight_cooldown);
            return true;
        }
        false
    }

    /// Special-boost pickup: clear the cooldown and top up flight time.
    pub fn refresh(&mut self, tuning: &AbilityTuning) {
        match self {
            AbilityState::SpeedBoost { cooldown, .. } => cooldown.clear(),
            AbilityState::Flight { fuel, cooldown, .. } => {
                cooldown.clear();
                *fuel = tuning.flight_max_time;
            },
            AbilityState::WallBreak { cooldown, .. } => cooldown.clear(),
        }
    }

    /// Advance timers. Flight fuel drains while airborne in flight and
    /// recharges while grounded and idle.
    pub fn tick(&mut self, dt: f32, on_ground: bool, tuning: &AbilityTuning) {
        match self {
            AbilityState::SpeedBoost {
                remaining,
                cooldown,
            } => {
                if remaining.is_running() {
                    remaining.tick(dt);
                    if remaining.is_expired() {
                        cooldown.restart(tuning.boost_cooldown);
                        tracing::debug!("Speed boost expired");
                    }
                } else {
                    cooldown.tick(dt);
                }
            },
            AbilityState::Flight {
                fuel,
                phase,
                cooldown,
            } => {
                if *phase != FlightPhase::Idle {
                    *fuel = (*fuel - dt).max(0.0);
                } else if on_ground {
                    *fuel = (*fuel + dt * tuning.flight_recharge_rate).min(tuning.flight_max_time);
                }
                cooldown.tick(dt);
            },
            AbilityState::WallBreak { cooldown, punch } => {
                cooldown.tick(dt);
                punch.tick(dt);
            },
        }
    }
}
