/// Running totals across every number round played since the program started.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionStatistics {
    wins: u32,
    losses: u32,
    total_placements: u32,
}

impl SessionStatistics {
    pub fn record_win(&mut self, placements: u32) {
        self.wins += 1;
        self.total_placements += placements;
    }

    pub fn record_loss(&mut self, placements: u32) {
        self.losses += 1;
        self.total_placements += placements;
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn total_placements(&self) -> u32 {
        self.total_placements
    }

    pub fn average_placements(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            games => self.total_placements as f64 / games as f64,
        }
    }

    pub fn summary_message(&self) -> String {
        let games = self.games_played();
        if games == 0 {
            return "No games played yet.".to_string();
        }
        let games_word = if games == 1 { "game" } else { "games" };
        let outcome = match (self.wins, self.losses) {
            (0, losses) => format!("You lost {losses} out of {games} {games_word}"),
            (wins, 0) => format!("You won {wins} out of {games} {games_word}"),
            (wins, losses) => format!(
                "You won {wins} out of {games} {games_word} and you lost {losses} out of {games} {games_word}"
            ),
        };
        let placements = format!(
            ", with {} successful placements, an average of {:.2} per game",
            self.total_placements,
            self.average_placements()
        );
        outcome + &placements
    }
}
