//! Menu and run lifecycle
//!
//! A `Session` sits where the start screen would: it validates the player
//! name, owns at most one `Simulation`, and routes the host's commands to it.
//! Leaving to the menu tears the run down completely.

use std::fmt;

use crate::consts::MAX_NAME_LEN;
use crate::error::{NameError, SimError};
use crate::settings::Settings;
use crate::sim::{Direction, FrameReport, GameEvent, Simulation};

/// Validated player name (trimmed, 1..=20 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let name = raw.trim();
        let len = name.chars().count();
        if len == 0 {
            return Err(NameError::Empty);
        }
        if len > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                len,
                max: MAX_NAME_LEN,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application lifecycle around a single run
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    seed: u64,
    player: Option<PlayerName>,
    sim: Option<Simulation>,
    events: Vec<GameEvent>,
    runs_started: u64,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            seed,
            player: None,
            sim: None,
            events: Vec::new(),
            runs_started: 0,
        }
    }

    /// Leave the menu and start a run
    pub fn start(&mut self, name: &str, now_ms: f64) -> Result<(), SimError> {
        if self.sim.is_some() {
            return Err(SimError::RunInProgress);
        }
        let player = PlayerName::parse(name)?;
        // Each run from the same session gets its own stream
        let seed = self.seed.wrapping_add(self.runs_started);
        let sim = Simulation::new(self.settings.clone(), seed, now_ms)?;
        log::info!("{} starting run #{}", player, self.runs_started + 1);
        self.runs_started += 1;
        self.player = Some(player);
        self.sim = Some(sim);
        Ok(())
    }

    pub fn advance(&mut self, now_ms: f64) -> Result<FrameReport, SimError> {
        let report = self.sim_mut()?.advance(now_ms)?;
        self.collect();
        Ok(report)
    }

    pub fn pause(&mut self, now_ms: f64) -> Result<bool, SimError> {
        let paused = self.sim_mut()?.pause(now_ms)?;
        self.collect();
        Ok(paused)
    }

    pub fn resume(&mut self, now_ms: f64) -> Result<bool, SimError> {
        let resumed = self.sim_mut()?.resume(now_ms)?;
        self.collect();
        Ok(resumed)
    }

    pub fn restart(&mut self, now_ms: f64) -> Result<(), SimError> {
        self.sim_mut()?.restart(now_ms)?;
        self.collect();
        Ok(())
    }

    /// Tear the run down and go back to the start screen
    pub fn return_to_menu(&mut self) -> Result<(), SimError> {
        let mut sim = self.sim.take().ok_or(SimError::NoActiveRun)?;
        self.events.extend(sim.drain_events());
        sim.teardown();
        self.events.push(GameEvent::ReturnedToMenu);
        log::info!("Returned to menu");
        Ok(())
    }

    pub fn set_intent(&mut self, intent: Option<Direction>) -> Result<(), SimError> {
        self.sim_mut()?.set_intent(intent);
        Ok(())
    }

    /// Take queued lifecycle events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.collect();
        std::mem::take(&mut self.events)
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.sim.as_ref()
    }

    pub fn player(&self) -> Option<&PlayerName> {
        self.player.as_ref()
    }

    pub fn in_run(&self) -> bool {
        self.sim.is_some()
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn sim_mut(&mut self) -> Result<&mut Simulation, SimError> {
        self.sim.as_mut().ok_or(SimError::NoActiveRun)
    }

    fn collect(&mut self) {
        if let Some(sim) = self.sim.as_mut() {
            self.events.extend(sim.drain_events());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_player_name_rules() {
        assert_eq!(PlayerName::parse("  Ada  ").unwrap().as_str(), "Ada");
        assert_eq!(PlayerName::parse("   "), Err(NameError::Empty));
        assert_eq!(PlayerName::parse(&"x".repeat(20)).unwrap().as_str().len(), 20);
        assert_eq!(
            PlayerName::parse(&"x".repeat(21)),
            Err(NameError::TooLong { len: 21, max: 20 })
        );
        // Counted in characters, not bytes
        assert!(PlayerName::parse(&"é".repeat(20)).is_ok());
    }

    #[test]
    fn test_commands_need_a_run() {
        let mut session = Session::new(Settings::default(), 1);
        assert_eq!(session.advance(0.0), Err(SimError::NoActiveRun));
        assert_eq!(session.pause(0.0), Err(SimError::NoActiveRun));
        assert_eq!(session.restart(0.0), Err(SimError::NoActiveRun));
        assert_eq!(session.return_to_menu(), Err(SimError::NoActiveRun));
    }

    #[test]
    fn test_start_validates_and_rejects_second_run() {
        let mut session = Session::new(Settings::default(), 1);
        assert_eq!(
            session.start("", 0.0),
            Err(SimError::Name(NameError::Empty))
        );
        assert!(!session.in_run());

        session.start("Grace", 0.0).unwrap();
        assert_eq!(session.player().map(PlayerName::as_str), Some("Grace"));
        assert_eq!(session.start("Grace", 10.0), Err(SimError::RunInProgress));
        assert_eq!(session.runs_started(), 1);
    }

    #[test]
    fn test_menu_round_trip() {
        let mut session = Session::new(Settings::default(), 1);
        session.start("Ada", 0.0).unwrap();
        session.advance(1000.0).unwrap();
        session.pause(1200.0).unwrap();

        session.return_to_menu().unwrap();
        assert!(!session.in_run());
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Paused, GameEvent::ReturnedToMenu]
        );

        // A fresh run starts clean
        session.start("Ada", 5000.0).unwrap();
        let sim = session.simulation().unwrap();
        assert_eq!(sim.phase(), GamePhase::Playing);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.pool().active_len(), 0);
        assert_ne!(sim.seed(), 1);
    }

    #[test]
    fn test_restart_forwards_event() {
        let mut session = Session::new(Settings::default(), 3);
        session.start("Ada", 0.0).unwrap();
        session.set_intent(Some(Direction::East)).unwrap();
        session.restart(50.0).unwrap();
        assert_eq!(session.drain_events(), vec![GameEvent::Restarted]);
        assert_eq!(session.simulation().unwrap().intent(), None);
    }
}
