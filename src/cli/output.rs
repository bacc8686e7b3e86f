//! Output formatting and progress bars for CLI

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Result,
    ports::{EpisodeSummary, TrainingObserver, TrainingStats},
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a rate as a percentage
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Board as three rows; empty cells show their index
pub fn render_board(state: &BoardState) -> String {
    let mut rows = Vec::with_capacity(3);
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let pos = row * 3 + col;
                if state.is_empty(pos) {
                    pos.to_string()
                } else {
                    state.get(pos).to_char().to_string()
                }
            })
            .collect();
        rows.push(format!("  {}", cells.join(" | ")));
    }
    rows.join("\n  ---------\n")
}

/// Progress bar observer - shows Q-learning progress
pub struct ProgressObserver {
    agent: Player,
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    pub fn new(agent: Player) -> Self {
        Self {
            agent,
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Some(GameOutcome::Win(winner)) if winner == self.agent => self.wins += 1,
            Some(GameOutcome::Win(_)) => self.losses += 1,
            Some(GameOutcome::Draw) => self.draws += 1,
            None => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            if episode.is_multiple_of(100) {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self, _stats: &TrainingStats) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(60_000), "60,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_render_board() {
        let state = BoardState::from_label("X...O...._X").unwrap();
        let rendered = render_board(&state);
        assert!(rendered.starts_with("  X | 1 | 2"));
        assert!(rendered.contains("3 | O | 5"));
    }

    #[test]
    fn test_progress_observer_counts_from_agent_view() {
        let mut observer = ProgressObserver::new(Player::O);
        let summary = |outcome| EpisodeSummary {
            outcome: Some(outcome),
            steps: 3,
            total_reward: 0.0,
            illegal_moves: 0,
        };
        observer
            .on_episode_end(0, &summary(GameOutcome::Win(Player::O)))
            .unwrap();
        observer
            .on_episode_end(1, &summary(GameOutcome::Win(Player::X)))
            .unwrap();
        observer.on_episode_end(2, &summary(GameOutcome::Draw)).unwrap();
        assert_eq!((observer.wins, observer.draws, observer.losses), (1, 1, 1));
    }
}
