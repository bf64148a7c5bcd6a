//! Text rendering of session snapshots and parsing of player input.

use std::fmt::Write as _;

use quiz_core::model::AnswerKey;
use quiz_core::session::{Feedback, Progress, SessionPhase, SessionSnapshot};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Answer(AnswerKey),
    Next,
    Quit,
}

/// Interpret one line typed by the player against the current screen.
///
/// Option numbers are 1-based. An empty line means "next" once it is offered.
#[must_use]
pub fn parse_command(line: &str, snapshot: &SessionSnapshot) -> Option<PlayerCommand> {
    let line = line.trim();
    match line {
        "q" | "quit" => return Some(PlayerCommand::Quit),
        "n" | "next" | "" if snapshot.show_next => return Some(PlayerCommand::Next),
        _ => {}
    }

    let index: usize = line.parse().ok()?;
    let options = snapshot.options.as_ref()?;
    let key = options.get(index.checked_sub(1)?)?;
    Some(PlayerCommand::Answer(key.clone()))
}

#[must_use]
pub fn progress_bar(progress: Progress) -> String {
    let filled = if progress.total == 0 {
        0
    } else {
        (progress.answered * BAR_WIDTH / progress.total).min(BAR_WIDTH)
    };
    format!(
        "[{}{}] {} / {}",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        progress.answered,
        progress.total
    )
}

#[must_use]
pub fn feedback_text(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Correct => "Correct !".to_string(),
        Feedback::Missed { correct } => format!("Dommage, la bonne réponse était : {correct}"),
    }
}

/// Full screen for the current state.
#[must_use]
pub fn render(title: &str, snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    if !title.is_empty() {
        let _ = writeln!(out, "== {title} ==");
    }
    let _ = writeln!(out, "{}", progress_bar(snapshot.progress));

    match snapshot.phase {
        SessionPhase::Loading => {
            let _ = writeln!(out, "Chargement des questions...");
        }
        SessionPhase::Failed => {
            let _ = writeln!(out, "Ce quiz ne peut pas être lancé.");
        }
        SessionPhase::Complete => {
            if let Some(score) = snapshot.final_score {
                let _ = writeln!(out, "Quiz terminé ! Score final : {score}");
            }
        }
        SessionPhase::AwaitingAnswer | SessionPhase::Resolved(_) => {
            let _ = writeln!(
                out,
                "Score : {}   Essais restants : {}",
                snapshot.score, snapshot.attempts_remaining
            );
            if let Some(prompt) = &snapshot.prompt {
                let _ = writeln!(out, "\n{prompt}\n");
            }
            if let Some(options) = &snapshot.options {
                for (i, option) in options.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {option}", i + 1);
                }
            }
            if let Some(feedback) = &snapshot.feedback {
                let _ = writeln!(out, "\n{}", feedback_text(feedback));
            }
            if snapshot.show_next {
                let _ = writeln!(out, "[Entrée] question suivante");
            } else if !snapshot.answering_locked {
                let _ = writeln!(out, "Votre réponse (1-4, q pour quitter) :");
            }
        }
    }
    out
}
