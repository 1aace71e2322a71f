use crate::game::state::GameState;

/// Points for the first correct guess of a round.
const BASE_POINTS: i64 = 100;
/// Decrease per position in the correct-guess order.
const TIER_STEP: i64 = 20;
/// Floor below which awards never drop.
const MIN_POINTS: i64 = 10;

/// Result of evaluating one submitted guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessOutcome {
    /// First correct guess from this player this round.
    Correct { word: String, points: u32, order: usize },
    /// Wrong word, or a retry from an already-credited player; the guess is
    /// relayed verbatim so wrong guesses still show up in chat.
    Incorrect,
    /// No current word, so guessing is not active; the message is dropped.
    Inactive,
}

/// Points for the `order`-th correct guesser (1-based): 100, 80, 60, 40,
/// 20, 10, 10, ...
pub fn award_for_order(order: usize) -> u32 {
    let tier = BASE_POINTS - TIER_STEP * (order as i64 - 1);
    tier.max(MIN_POINTS) as u32
}

/// Evaluate a guess against the current word and apply any award.
///
/// Matching is case-insensitive exact-string comparison. A player is
/// credited at most once per round; the running score is monotonically
/// non-decreasing and is never reset between rounds.
pub fn evaluate(game: &mut GameState, player_id: &str, guess: &str) -> GuessOutcome {
    if game.current_word.is_empty() {
        return GuessOutcome::Inactive;
    }

    if guess.to_lowercase() != game.current_word.to_lowercase() {
        return GuessOutcome::Incorrect;
    }

    if game.has_guessed_correctly(player_id) {
        return GuessOutcome::Incorrect;
    }

    let order = game.correct_guesses.len() + 1;
    let points = award_for_order(order);
    *game.scores.entry(player_id.to_string()).or_insert(0) += points;
    game.record_correct_guess(player_id);

    GuessOutcome::Correct {
        word: game.current_word.clone(),
        points,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_tiers() {
        let awards: Vec<u32> = (1..=8).map(award_for_order).collect();
        assert_eq!(awards, vec![100, 80, 60, 40, 20, 10, 10, 10]);
    }

    #[test]
    fn test_correct_guess_awards_points_in_arrival_order() {
        let mut game = GameState::new();
        game.current_word = "pizza".to_string();

        for (i, (player, expected)) in [("g1", 100), ("g2", 80), ("g3", 60)]
            .iter()
            .enumerate()
        {
            let outcome = evaluate(&mut game, player, "pizza");
            assert_eq!(
                outcome,
                GuessOutcome::Correct {
                    word: "pizza".to_string(),
                    points: *expected,
                    order: i + 1,
                }
            );
            assert_eq!(game.scores[*player], *expected);
        }
        assert_eq!(game.correct_guesses, vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn test_guess_is_case_insensitive() {
        let mut game = GameState::new();
        game.current_word = "cat".to_string();
        assert!(matches!(
            evaluate(&mut game, "p1", "CAT"),
            GuessOutcome::Correct { points: 100, .. }
        ));

        game.current_word = "Dog".to_string();
        assert!(matches!(
            evaluate(&mut game, "p2", "dog"),
            GuessOutcome::Correct { .. }
        ));
    }

    #[test]
    fn test_repeat_correct_guess_is_not_credited_twice() {
        let mut game = GameState::new();
        game.current_word = "pizza".to_string();

        assert!(matches!(
            evaluate(&mut game, "p1", "Pizza"),
            GuessOutcome::Correct { points: 100, .. }
        ));
        assert_eq!(evaluate(&mut game, "p1", "pizza"), GuessOutcome::Incorrect);
        assert_eq!(game.scores["p1"], 100);
        assert_eq!(game.correct_guesses.len(), 1);
    }

    #[test]
    fn test_wrong_guess_changes_nothing() {
        let mut game = GameState::new();
        game.current_word = "pizza".to_string();
        assert_eq!(evaluate(&mut game, "p1", "pasta"), GuessOutcome::Incorrect);
        assert!(game.scores.is_empty());
        assert!(game.correct_guesses.is_empty());
    }

    #[test]
    fn test_guess_without_current_word_is_inactive() {
        let mut game = GameState::new();
        assert_eq!(evaluate(&mut game, "p1", "anything"), GuessOutcome::Inactive);
    }

    #[test]
    fn test_scores_accumulate_across_rounds() {
        let mut game = GameState::new();
        game.current_word = "cat".to_string();
        evaluate(&mut game, "p1", "cat");

        // New round: word replaced, correct-guess ledger cleared, scores kept.
        game.begin_round("dog");
        evaluate(&mut game, "p1", "dog");

        assert_eq!(game.scores["p1"], 200);
    }

    #[test]
    fn test_floor_never_goes_negative() {
        assert_eq!(award_for_order(50), 10);
    }
}
