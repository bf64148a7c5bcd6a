//! Question selection: picks the next correct answer and the distractors shown with it.

use rand::Rng;
use rand::seq::{SliceRandom, index};
use thiserror::Error;

use crate::model::{AnswerKey, Prompt, QuestionBank};

/// Number of options shown for every question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Number of wrong options shown next to the correct answer.
pub const DISTRACTORS_PER_QUESTION: usize = OPTIONS_PER_QUESTION - 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("{missing} options must come from asked questions, only {available} were asked")]
    NotEnoughCandidates { missing: usize, available: usize },

    #[error("answer key {0} has no prompt in the question bank")]
    MissingPrompt(AnswerKey),

    #[error("drew {0} options, expected {}", OPTIONS_PER_QUESTION)]
    OptionCount(usize),
}

/// A question ready to be shown: its prompt, the correct answer and four shuffled options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedQuestion {
    pub correct: AnswerKey,
    pub prompt: Prompt,
    pub options: [AnswerKey; OPTIONS_PER_QUESTION],
    /// How many options were taken from previously asked answers.
    pub fallback_count: usize,
}

/// Outcome of asking the selector for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    Question(ServedQuestion),
    /// Every key has been used as a correct answer; the session is over.
    PoolExhausted,
}

/// Owns the pool of keys not yet asked and the chronological list of asked keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistractorSelector {
    pool: Vec<AnswerKey>,
    asked: Vec<AnswerKey>,
}

impl DistractorSelector {
    #[must_use]
    pub fn new(bank: &QuestionBank) -> Self {
        Self {
            pool: bank.keys().cloned().collect(),
            asked: Vec::new(),
        }
    }

    /// Keys that have not been used as a correct answer yet.
    #[must_use]
    pub fn pool(&self) -> &[AnswerKey] {
        &self.pool
    }

    /// Keys already used as correct answers, oldest first.
    #[must_use]
    pub fn asked(&self) -> &[AnswerKey] {
        &self.asked
    }

    /// Draw the next question.
    ///
    /// The correct answer leaves the pool; distractors are sampled from what remains
    /// and stay eligible. When fewer than three distractors are left, the missing
    /// slots are filled from the front of the asked list, in the order it was built.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NotEnoughCandidates` if the asked list is too short
    /// to fill the missing slots. The selector is left untouched in that case.
    /// Returns `SelectionError::MissingPrompt` if `bank` is not the bank this
    /// selector was built from.
    pub fn next<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<Draw, SelectionError> {
        if self.pool.is_empty() {
            return Ok(Draw::PoolExhausted);
        }

        let remaining = self.pool.len() - 1;
        let sampled = remaining.min(DISTRACTORS_PER_QUESTION);
        let missing = DISTRACTORS_PER_QUESTION - sampled;
        if missing > self.asked.len() {
            return Err(SelectionError::NotEnoughCandidates {
                missing,
                available: self.asked.len(),
            });
        }

        let pick = rng.random_range(0..self.pool.len());
        let prompt = bank
            .prompt(&self.pool[pick])
            .cloned()
            .ok_or_else(|| SelectionError::MissingPrompt(self.pool[pick].clone()))?;
        let correct = self.pool.swap_remove(pick);

        let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
        options.push(correct.clone());
        options.extend(
            index::sample(rng, self.pool.len(), sampled)
                .into_iter()
                .map(|i| self.pool[i].clone()),
        );
        options.extend(self.asked.iter().take(missing).cloned());
        options.shuffle(rng);

        let options: [AnswerKey; OPTIONS_PER_QUESTION] = options
            .try_into()
            .map_err(|drawn: Vec<AnswerKey>| SelectionError::OptionCount(drawn.len()))?;

        log::debug!(
            "served {correct} with {missing} fallback option(s), {} left in pool",
            self.pool.len()
        );

        Ok(Draw::Question(ServedQuestion {
            correct,
            prompt,
            options,
            fallback_count: missing,
        }))
    }

    /// Record a resolved question so it can serve as fallback filler later.
    pub fn record_asked(&mut self, key: AnswerKey) {
        debug_assert!(!self.pool.contains(&key), "asked key still in pool");
        self.asked.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bank(keys: &[&str]) -> QuestionBank {
        QuestionBank::from_pairs(keys.iter().map(|k| (*k, format!("prompt {k}")))).unwrap()
    }

    fn serve(
        selector: &mut DistractorSelector,
        bank: &QuestionBank,
        rng: &mut StdRng,
    ) -> ServedQuestion {
        match selector.next(bank, rng).unwrap() {
            Draw::Question(q) => q,
            Draw::PoolExhausted => panic!("pool exhausted too early"),
        }
    }

    #[test]
    fn options_hold_correct_answer_once_and_prompt_matches() {
        let bank = bank(&["A", "B", "C", "D", "E", "F"]);
        let mut selector = DistractorSelector::new(&bank);
        let mut rng = StdRng::seed_from_u64(7);

        let q = serve(&mut selector, &bank, &mut rng);

        assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
        assert_eq!(q.options.iter().filter(|o| **o == q.correct).count(), 1);
        assert_eq!(bank.prompt(&q.correct), Some(&q.prompt));
        assert_eq!(q.fallback_count, 0);
        assert!(!selector.pool().contains(&q.correct));
        assert_eq!(selector.pool().len(), 5);
        for distractor in q.options.iter().filter(|o| **o != q.correct) {
            assert!(selector.pool().contains(distractor));
        }
    }

    #[test]
    fn pool_and_asked_partition_the_bank_across_a_session() {
        let bank = bank(&["A", "B", "C", "D", "E", "F", "G"]);
        let mut selector = DistractorSelector::new(&bank);
        let mut rng = StdRng::seed_from_u64(11);

        for served in 1..=bank.len() {
            let q = serve(&mut selector, &bank, &mut rng);
            assert_eq!(selector.pool().len() + selector.asked().len() + 1, bank.len());
            selector.record_asked(q.correct);
            assert_eq!(selector.pool().len() + selector.asked().len(), bank.len());
            assert_eq!(selector.asked().len(), served);
            assert!(selector.asked().iter().all(|k| !selector.pool().contains(k)));
        }

        assert_eq!(selector.next(&bank, &mut rng).unwrap(), Draw::PoolExhausted);
    }

    #[test]
    fn fallback_fills_from_front_of_asked_list() {
        let bank = bank(&["A", "B", "C", "D", "E"]);
        let mut selector = DistractorSelector::new(&bank);
        let mut rng = StdRng::seed_from_u64(3);

        // Three questions resolved: two keys left in the pool.
        for _ in 0..3 {
            let q = serve(&mut selector, &bank, &mut rng);
            selector.record_asked(q.correct);
        }
        let asked = selector.asked().to_vec();

        let q = serve(&mut selector, &bank, &mut rng);
        assert_eq!(q.fallback_count, 2);
        assert!(q.options.contains(&asked[0]));
        assert!(q.options.contains(&asked[1]));
        assert!(!q.options.contains(&asked[2]));
        selector.record_asked(q.correct);

        let q = serve(&mut selector, &bank, &mut rng);
        assert_eq!(q.fallback_count, 3);
        let mut options = q.options.to_vec();
        options.sort();
        let mut expected = vec![q.correct.clone(), asked[0].clone(), asked[1].clone(), asked[2].clone()];
        expected.sort();
        assert_eq!(options, expected);
    }

    #[test]
    fn minimum_bank_plays_through_without_repeats() {
        let bank = bank(&["A", "B", "C", "D"]);
        let mut selector = DistractorSelector::new(&bank);
        let mut rng = StdRng::seed_from_u64(99);

        for expected_fallback in 0..4 {
            let q = serve(&mut selector, &bank, &mut rng);
            assert_eq!(q.fallback_count, expected_fallback);
            let mut options = q.options.to_vec();
            options.sort();
            options.dedup();
            assert_eq!(options.len(), OPTIONS_PER_QUESTION);
            selector.record_asked(q.correct);
        }
    }

    #[test]
    fn every_draw_has_exactly_four_options() {
        let bank = bank(&["A", "B", "C", "D", "E", "F"]);
        for seed in 0..20 {
            let mut selector = DistractorSelector::new(&bank);
            let mut rng = StdRng::seed_from_u64(seed);
            while let Draw::Question(q) = selector.next(&bank, &mut rng).unwrap() {
                assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
                selector.record_asked(q.correct);
            }
        }
        assert_eq!(
            SelectionError::OptionCount(3).to_string(),
            "drew 3 options, expected 4"
        );
    }

    #[test]
    fn unresolved_question_leaves_too_few_fallbacks() {
        let bank = bank(&["A", "B", "C", "D"]);
        let mut selector = DistractorSelector::new(&bank);
        let mut rng = StdRng::seed_from_u64(5);

        let _first = serve(&mut selector, &bank, &mut rng);
        let before = selector.clone();

        let err = selector.next(&bank, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NotEnoughCandidates {
                missing: 1,
                available: 0
            }
        );
        assert_eq!(selector, before);
    }
}
