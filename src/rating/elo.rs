//! ELO update arithmetic with a goal-difference multiplier
//!
//! Expectation uses the standard logistic curve from the skillratings
//! crate; the delta adds a `1 + ln(1 + goal_difference)` multiplier so a
//! blowout moves ratings more than a narrow win, with diminishing
//! returns.

use crate::error::LeagueError;
use crate::types::MatchOutcome;
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};

/// Tunable parameters for the ELO engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloSettings {
    /// Fixed K factor applied to every update
    pub k_factor: f64,
    /// Rating assigned to newly registered players
    pub initial_rating: i32,
    /// Ratings never drop below this value
    pub rating_floor: i32,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: 1000,
            rating_floor: 0,
        }
    }
}

impl From<&crate::config::RatingSettings> for EloSettings {
    fn from(settings: &crate::config::RatingSettings) -> Self {
        Self {
            k_factor: settings.k_factor,
            initial_rating: settings.initial_rating,
            rating_floor: settings.rating_floor,
        }
    }
}

impl EloSettings {
    /// Validate settings parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.k_factor <= 0.0 {
            return Err(LeagueError::ConfigurationError {
                message: "K factor must be positive".to_string(),
            }
            .into());
        }

        if self.initial_rating < self.rating_floor {
            return Err(LeagueError::ConfigurationError {
                message: format!(
                    "Initial rating {} is below the rating floor {}",
                    self.initial_rating, self.rating_floor
                ),
            }
            .into());
        }

        Ok(())
    }
}

/// The rating calculator shared by the match resolver
#[derive(Debug, Clone)]
pub struct EloEngine {
    settings: EloSettings,
}

impl EloEngine {
    /// Create a new engine with validated settings
    pub fn new(settings: EloSettings) -> crate::error::Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Rating assigned to newly registered players
    pub fn initial_rating(&self) -> i32 {
        self.settings.initial_rating
    }

    /// Floor below which no rating may drop
    pub fn rating_floor(&self) -> i32 {
        self.settings.rating_floor
    }

    /// Probability that team A beats team B, from the teams' average ratings
    pub fn expected_score(avg_a: f64, avg_b: f64) -> f64 {
        let team_a = EloRating { rating: avg_a };
        let team_b = EloRating { rating: avg_b };
        let (expected_a, _expected_b) = expected_score(&team_a, &team_b);
        expected_a
    }

    /// Goal-difference multiplier: `1 + ln(1 + goal_difference)`
    pub fn goal_multiplier(goal_difference: u32) -> f64 {
        1.0 + (1.0 + goal_difference as f64).ln()
    }

    /// Signed rating delta for every member of team A.
    ///
    /// Team B members receive the exact negation, so a single value
    /// describes the whole match.
    pub fn team_delta(
        &self,
        avg_a: f64,
        avg_b: f64,
        outcome: MatchOutcome,
        goal_difference: u32,
    ) -> i32 {
        let expected_a = Self::expected_score(avg_a, avg_b);
        let actual_a = match outcome {
            MatchOutcome::A => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::B => 0.0,
        };

        let raw =
            self.settings.k_factor * Self::goal_multiplier(goal_difference) * (actual_a - expected_a);
        raw.round() as i32
    }

    /// Clamp a prospective rating to the configured floor
    pub fn clamp_to_floor(&self, rating: i32) -> i32 {
        rating.max(self.settings.rating_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> EloEngine {
        EloEngine::new(EloSettings::default()).unwrap()
    }

    #[test]
    fn test_settings_validation() {
        assert!(EloSettings::default().validate().is_ok());

        let bad_k = EloSettings {
            k_factor: 0.0,
            ..EloSettings::default()
        };
        assert!(bad_k.validate().is_err());

        let below_floor = EloSettings {
            initial_rating: 10,
            rating_floor: 100,
            ..EloSettings::default()
        };
        assert!(below_floor.validate().is_err());
    }

    #[test]
    fn test_expected_score_equal_teams() {
        let expected = EloEngine::expected_score(1000.0, 1000.0);
        assert!((expected - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_expected_score_favors_stronger_team() {
        let strong = EloEngine::expected_score(1400.0, 1000.0);
        let weak = EloEngine::expected_score(1000.0, 1400.0);
        assert!(strong > 0.9);
        assert!(weak < 0.1);
        assert!((strong + weak - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_multiplier_monotone_with_diminishing_returns() {
        assert_eq!(EloEngine::goal_multiplier(0), 1.0);

        let mut previous = EloEngine::goal_multiplier(0);
        let mut previous_step = f64::INFINITY;
        for gd in 1..=10 {
            let current = EloEngine::goal_multiplier(gd);
            let step = current - previous;
            assert!(current > previous);
            assert!(step < previous_step);
            previous = current;
            previous_step = step;
        }

        // A 10-goal blowout stays well short of 10x a narrow win
        assert!(EloEngine::goal_multiplier(10) < 4.0);
    }

    #[test]
    fn test_even_match_delta_is_sixteen() {
        // Equal averages, A wins, no goal difference:
        // round(32 * 1 * (1 - 0.5)) = 16
        let delta = engine().team_delta(1000.0, 1000.0, MatchOutcome::A, 0);
        assert_eq!(delta, 16);
    }

    #[test]
    fn test_delta_negates_for_team_b_win() {
        let engine = engine();
        let a_wins = engine.team_delta(1000.0, 1000.0, MatchOutcome::A, 0);
        let b_wins = engine.team_delta(1000.0, 1000.0, MatchOutcome::B, 0);
        assert_eq!(a_wins, -b_wins);
    }

    #[test]
    fn test_draw_between_equal_teams_moves_nothing() {
        let delta = engine().team_delta(1000.0, 1000.0, MatchOutcome::Draw, 0);
        assert_eq!(delta, 0);
    }

    #[test]
    fn test_draw_rewards_the_underdog() {
        // The weaker team over-performed its expectation by drawing
        let delta = engine().team_delta(900.0, 1100.0, MatchOutcome::Draw, 0);
        assert!(delta > 0);
    }

    #[test]
    fn test_upset_pays_more_than_expected_win() {
        let engine = engine();
        let upset = engine.team_delta(900.0, 1100.0, MatchOutcome::A, 0);
        let expected_win = engine.team_delta(1100.0, 900.0, MatchOutcome::A, 0);
        assert!(upset > expected_win);
        assert!(expected_win > 0);
    }

    #[test]
    fn test_goal_difference_scales_delta() {
        let engine = engine();
        let narrow = engine.team_delta(1000.0, 1000.0, MatchOutcome::A, 1);
        let blowout = engine.team_delta(1000.0, 1000.0, MatchOutcome::A, 6);
        assert!(blowout > narrow);
        assert!(narrow > engine.team_delta(1000.0, 1000.0, MatchOutcome::A, 0) - 1);
    }

    #[test]
    fn test_clamp_to_floor() {
        let engine = engine();
        assert_eq!(engine.clamp_to_floor(-12), 0);
        assert_eq!(engine.clamp_to_floor(0), 0);
        assert_eq!(engine.clamp_to_floor(850), 850);
    }
}
