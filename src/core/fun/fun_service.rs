// Fun commands logic - coin flips and the magic 8 ball.
//
// Randomness is passed in so tests can use a seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;

pub const MAGIC_8_BALL_ANSWERS: [&str; 24] = [
    "It is certain.",
    "It is decidedly so.",
    "Without a doubt.",
    "Yes, definitely.",
    "You may rely on it.",
    "As I see it, yes.",
    "Most likely.",
    "Outlook good.",
    "Yes.",
    "Signs point to yes.",
    "Don't count on it.",
    "My answer is no.",
    "My sources say no.",
    "Doubtful.",
    "Ask me again.",
    "Can't right now, ask later.",
    "Meh. Maybe.",
    "Telling you would ruin the surprise.",
    "Nuh uh.",
    "Absolutely not.",
    "Not a chance.",
    "You sure you want to know?",
    "Sure, I guess.",
    "What do you expect me to say?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    pub fn as_str(self) -> &'static str {
        match self {
            CoinSide::Heads => "heads",
            CoinSide::Tails => "tails",
        }
    }

    pub fn outcome_text(self) -> String {
        format!("And the outcome was {}!", self.as_str())
    }
}

pub fn flip_coin<R: Rng + ?Sized>(rng: &mut R) -> CoinSide {
    if rng.gen_bool(0.5) {
        CoinSide::Heads
    } else {
        CoinSide::Tails
    }
}

/// Pick an answer, echoing the question back when one was asked.
pub fn magic_8_ball<R: Rng + ?Sized>(rng: &mut R, question: Option<&str>) -> String {
    let answer = MAGIC_8_BALL_ANSWERS
        .choose(rng)
        .copied()
        .unwrap_or(MAGIC_8_BALL_ANSWERS[0]);

    match question.map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => format!("You asked: '{}'\n\nMy answer: {}", question, answer),
        None => answer.to_string(),
    }
}
