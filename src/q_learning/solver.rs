//! Epsilon-greedy Q-learning solver
//!
//! Learns Q* by TD(0) control: every applied action is updated towards the
//! observed reward plus the discounted greedy value of the successor. The
//! behaviour policy explores with probability ε and otherwise plays the
//! greedy action. One seeded random source drives both the exploration draws
//! and the opponent's replies, so a fixed seed reproduces a run exactly.

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::QTable;
use crate::{
    Error, Result,
    config::QLearningConfig,
    environment::{Environment, Step, TicTacToeEnvironment},
    mdp::Outcome,
    policy::{Policy, select_greedy},
    ports::{EpisodeSummary, Solver, TrainingObserver, TrainingStats},
    tictactoe::{BoardState, GameOutcome, Move, decision_states},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
pub struct QLearningSolver {
    config: QLearningConfig,
    q_table: QTable,
    env: Box<dyn Environment>,
    rng: StdRng,
    observers: Vec<Box<dyn TrainingObserver>>,
    stats: TrainingStats,
}

impl QLearningSolver {
    /// Create a solver whose environment and opponent come from `config`
    pub fn new(config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        let env = TicTacToeEnvironment::new(
            config.agent,
            config.opponent.into_boxed_opponent(),
            config.rewards,
            config.first_mover,
        );
        let q_table = QTable::initialised(&decision_states(config.agent), 0.0);
        Ok(Self {
            rng: build_rng(config.seed),
            config,
            q_table,
            env: Box::new(env),
            observers: Vec::new(),
            stats: TrainingStats::default(),
        })
    }

    /// Train against a custom environment instead of the configured one
    pub fn with_environment<E: Environment + 'static>(mut self, env: E) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// The learned table, for diagnostic inspection
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// ε-greedy action selection
    ///
    /// The candidate actions are the Q-table's keys for `state`, which were
    /// fixed at initialisation.
    pub fn select_action(&mut self, state: &BoardState) -> Result<Move> {
        let actions = self.q_table.get(state)?;
        let explore = self.rng.random::<f64>() < self.config.epsilon;

        let chosen = if explore {
            let candidates: Vec<Move> = actions.keys().copied().collect();
            candidates.choose(&mut self.rng).copied()
        } else {
            select_greedy(actions.iter().map(|(&action, &value)| (action, value)))
                .map(|(action, _)| action)
        };

        chosen.ok_or_else(|| Error::UnknownState {
            state: state.encode(),
            table: "Q-table",
        })
    }

    /// `Q(s,a) ← (1-α)·Q(s,a) + α·target`, where the target is the reward
    /// alone for a terminal successor.
    fn update(&mut self, outcome: &Outcome) -> Result<()> {
        let target = if outcome.next_state.is_terminal() {
            outcome.reward
        } else {
            outcome.reward + self.config.discount * self.q_table.max_value(&outcome.next_state)?
        };
        let current = self.q_table.get_value(&outcome.state, outcome.action)?;
        let alpha = self.config.learning_rate;
        self.q_table.add(
            outcome.state,
            outcome.action,
            (1.0 - alpha) * current + alpha * target,
        );
        self.stats.updates += 1;
        Ok(())
    }

    /// Play one episode from a fresh environment, learning from every
    /// applied action.
    ///
    /// Illegal-move reports leave the table untouched and the same state is
    /// tried again.
    pub fn run_episode(&mut self) -> Result<EpisodeSummary> {
        let episode = self.stats.episodes;
        self.env.reset(&mut self.rng)?;

        let mut summary = EpisodeSummary {
            outcome: None,
            steps: 0,
            total_reward: 0.0,
            illegal_moves: 0,
        };

        loop {
            let state = self.env.current_state();
            if state.is_terminal() {
                summary.outcome = state.outcome();
                break;
            }

            let action = self.select_action(&state)?;
            let outcome = match self.env.execute_move(action, &mut self.rng)? {
                Step::Applied(outcome) => outcome,
                Step::Illegal => {
                    debug!(
                        "episode {episode}: illegal position {} in {}, retrying",
                        action.position,
                        state.encode()
                    );
                    summary.illegal_moves += 1;
                    continue;
                }
            };

            self.update(&outcome)?;
            summary.steps += 1;
            summary.total_reward += outcome.reward;
            for observer in &mut self.observers {
                observer.on_step(episode, &outcome)?;
            }
        }

        self.record(&summary);
        for observer in &mut self.observers {
            observer.on_episode_end(episode, &summary)?;
        }
        Ok(summary)
    }

    fn record(&mut self, summary: &EpisodeSummary) {
        self.stats.episodes += 1;
        self.stats.illegal_moves += summary.illegal_moves;
        match summary.outcome {
            Some(GameOutcome::Win(winner)) if winner == self.config.agent => self.stats.wins += 1,
            Some(GameOutcome::Win(_)) => self.stats.losses += 1,
            Some(GameOutcome::Draw) => self.stats.draws += 1,
            None => {}
        }
    }

    /// Greedy action for every state in the table
    pub fn extract_policy(&self) -> Result<Policy> {
        let mut policy = Policy::new();
        for (state, actions) in self.q_table.iter() {
            match select_greedy(actions.iter().map(|(&action, &value)| (action, value))) {
                Some((action, _)) => policy.insert(*state, action),
                None => policy.mark_unresolved(*state),
            }
        }
        Ok(policy)
    }
}

impl Solver for QLearningSolver {
    fn name(&self) -> &str {
        "q_learning"
    }

    fn train(&mut self) -> Result<Policy> {
        let episodes = self.config.episodes;
        info!(
            "q-learning: {episodes} episodes, alpha {}, gamma {}, epsilon {}, opponent {}",
            self.config.learning_rate,
            self.config.discount,
            self.config.epsilon,
            self.config.opponent.label()
        );
        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        for _ in 0..episodes {
            self.run_episode()?;
        }

        for observer in &mut self.observers {
            observer.on_training_end(&self.stats)?;
        }
        info!(
            "q-learning finished: {} wins, {} draws, {} losses, {} illegal moves retried",
            self.stats.wins, self.stats.draws, self.stats.losses, self.stats.illegal_moves
        );
        self.extract_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponents::OpponentKind;

    fn config() -> QLearningConfig {
        QLearningConfig::default()
            .with_episodes(200)
            .with_opponent(OpponentKind::Random)
            .with_seed(11)
    }

    #[test]
    fn test_table_is_initialised_for_every_decision_state() {
        let solver = QLearningSolver::new(config()).unwrap();
        let table = solver.q_table();
        let opening = table.get(&BoardState::new()).unwrap();
        assert_eq!(opening.len(), 9);
        assert!(opening.values().all(|&q| q == 0.0));
        assert!(table.states().all(|s| !s.is_terminal()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(QLearningSolver::new(config().with_learning_rate(0.0)).is_err());
    }

    #[test]
    fn test_greedy_selection_without_exploration() {
        let mut solver = QLearningSolver::new(config().with_epsilon(0.0)).unwrap();
        let state = BoardState::new();
        // All zero: last cell wins the tie
        assert_eq!(solver.select_action(&state).unwrap().position, 8);

        solver.q_table.add(state, Move::new(4, state.to_move), 1.0);
        assert_eq!(solver.select_action(&state).unwrap().position, 4);
    }

    #[test]
    fn test_episode_updates_stats() {
        let mut solver = QLearningSolver::new(config()).unwrap();
        let summary = solver.run_episode().unwrap();
        assert!(summary.outcome.is_some());
        assert!(summary.steps >= 3);
        assert_eq!(summary.illegal_moves, 0);

        let stats = solver.stats();
        assert_eq!(stats.episodes, 1);
        assert_eq!(stats.wins + stats.draws + stats.losses, 1);
        assert_eq!(stats.updates, summary.steps);
    }

    #[test]
    fn test_same_seed_same_table() {
        let mut a = QLearningSolver::new(config()).unwrap();
        let mut b = QLearningSolver::new(config()).unwrap();
        a.train().unwrap();
        b.train().unwrap();
        assert_eq!(a.q_table(), b.q_table());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_lone_action_extracted_whatever_its_value() {
        let mut solver = QLearningSolver::new(config()).unwrap();
        let state = BoardState::from_label("XOXXOOOX._X").unwrap();
        for value in [f64::NEG_INFINITY, f64::NAN, -1e9] {
            solver.q_table.add(state, Move::new(8, state.to_move), value);
            let policy = solver.extract_policy().unwrap();
            assert_eq!(policy.action(&state), Some(Move::new(8, state.to_move)));
        }
    }

    #[test]
    fn test_unknown_state_selection_fails() {
        let mut solver = QLearningSolver::new(config()).unwrap();
        // O to move is never a decision state for an X agent
        let state = BoardState::new().make_move(4).unwrap();
        assert!(matches!(
            solver.select_action(&state),
            Err(Error::UnknownState { .. })
        ));
    }
}
