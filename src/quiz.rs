//! Guess-the-violation quiz over the same box data.
//!
//! Boxes start hidden. Clicking inside one reveals it and opens a
//! multiple-choice question; answering colors the box and shows feedback
//! for a short window, during which the UI is locked. All per-image state
//! resets when the active image changes.

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use web_time::Instant;

use crate::config::StudioConfig;
use crate::constants::{FEEDBACK_DURATION, QUIZ_CHOICES, feedback};
use crate::geometry::Point;
use crate::model::{BoundingBox, Issue};

/// Visibility/answer state of one quiz box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizBoxState {
    Hidden,
    /// Revealed and waiting for an answer
    Revealed,
    Answered { correct: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizBox {
    pub bbox: BoundingBox,
    pub state: QuizBoxState,
}

impl QuizBox {
    /// Feedback color; hidden and unanswered boxes are not colored.
    pub fn color(&self) -> Option<[u8; 3]> {
        match self.state {
            QuizBoxState::Answered { correct: true } => Some(feedback::CORRECT),
            QuizBoxState::Answered { correct: false } => Some(feedback::INCORRECT),
            _ => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self.state, QuizBoxState::Answered { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizChoice {
    pub value: String,
    pub label: String,
}

/// The multiple-choice question for a revealed box.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub box_index: usize,
    pub choices: Vec<QuizChoice>,
}

/// Feedback overlay after an answer or a "no issues" claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    pub shown_at: Instant,
}

/// Result of a click on the quiz canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum RevealOutcome {
    /// A question is open; clicks elsewhere do nothing
    Locked,
    /// The click only dismissed the feedback overlay
    FeedbackDismissed,
    /// The click hit no box
    Miss,
    /// The box under the pointer was already answered
    AlreadyAnswered,
    /// A box was revealed and its question opened
    Opened(usize),
}

/// Correct/answered counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizScore {
    pub correct: u32,
    pub answered: u32,
}

impl QuizScore {
    fn record(&mut self, correct: bool) {
        self.answered += 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// Quiz state for the active image plus a running total.
#[derive(Debug, Clone)]
pub struct QuizSession {
    image_key: String,
    boxes: Vec<QuizBox>,
    vocabulary: Vec<Issue>,
    question: Option<Question>,
    feedback: Option<Feedback>,
    feedback_duration: Duration,
    score: QuizScore,
    total: QuizScore,
    /// Set on a correct answer; the UI fires its effect and calls `take_celebration`
    celebrate: bool,
    no_issues_claimed: bool,
}

impl QuizSession {
    pub fn new(vocabulary: Vec<Issue>) -> Self {
        Self {
            image_key: String::new(),
            boxes: Vec::new(),
            vocabulary,
            question: None,
            feedback: None,
            feedback_duration: FEEDBACK_DURATION,
            score: QuizScore::default(),
            total: QuizScore::default(),
            celebrate: false,
            no_issues_claimed: false,
        }
    }

    /// Quiz over the configured issue vocabulary and feedback window.
    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.issues.clone())
            .with_feedback_duration(config.preferences.feedback_duration())
    }

    pub fn with_feedback_duration(mut self, duration: Duration) -> Self {
        self.feedback_duration = duration;
        self
    }

    /// Switch to another image, resetting everything but the running total.
    pub fn load_image(&mut self, image_key: &str, boxes: &[BoundingBox]) {
        log::debug!("Quiz: loading '{}' with {} boxes", image_key, boxes.len());
        self.image_key = image_key.to_string();
        self.boxes = boxes
            .iter()
            .cloned()
            .map(|bbox| QuizBox {
                bbox,
                state: QuizBoxState::Hidden,
            })
            .collect();
        self.question = None;
        self.feedback = None;
        self.score = QuizScore::default();
        self.celebrate = false;
        self.no_issues_claimed = false;
    }

    pub fn image_key(&self) -> &str {
        &self.image_key
    }

    pub fn boxes(&self) -> &[QuizBox] {
        &self.boxes
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn score(&self) -> QuizScore {
        self.score
    }

    pub fn total(&self) -> QuizScore {
        self.total
    }

    /// A question or the feedback overlay holds the UI.
    pub fn is_locked(&self) -> bool {
        self.question.is_some() || self.feedback.is_some()
    }

    /// Every box answered, or the "no issues" claim made.
    pub fn is_finished(&self) -> bool {
        self.no_issues_claimed
            || (!self.boxes.is_empty() && self.boxes.iter().all(QuizBox::is_answered))
    }

    /// Consume the celebration flag.
    pub fn take_celebration(&mut self) -> bool {
        std::mem::take(&mut self.celebrate)
    }

    /// Auto-dismiss feedback once its window has elapsed.
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .feedback
            .is_some_and(|fb| now.duration_since(fb.shown_at) >= self.feedback_duration);
        if expired {
            self.feedback = None;
        }
    }

    /// Handle a click at a canvas position.
    pub fn reveal_at<R: Rng + ?Sized>(&mut self, point: Point, rng: &mut R) -> RevealOutcome {
        if self.feedback.take().is_some() {
            return RevealOutcome::FeedbackDismissed;
        }
        if self.question.is_some() {
            return RevealOutcome::Locked;
        }

        let hit = self
            .boxes
            .iter()
            .position(|b| !b.is_answered() && b.bbox.contains(point));
        let Some(index) = hit else {
            if self.boxes.iter().any(|b| b.bbox.contains(point)) {
                return RevealOutcome::AlreadyAnswered;
            }
            return RevealOutcome::Miss;
        };

        self.boxes[index].state = QuizBoxState::Revealed;
        let choices = self.build_choices(&self.boxes[index].bbox.violation_name, rng);
        log::debug!("Quiz: revealed box {} with {} choices", index, choices.len());
        self.question = Some(Question {
            box_index: index,
            choices,
        });
        RevealOutcome::Opened(index)
    }

    /// The correct label plus up to three random distractors, shuffled.
    fn build_choices<R: Rng + ?Sized>(&self, correct: &str, rng: &mut R) -> Vec<QuizChoice> {
        let label_of = |value: &str| {
            self.vocabulary
                .iter()
                .find(|i| i.value == value)
                .map(|i| i.label.clone())
                .unwrap_or_else(|| value.to_string())
        };

        let distractors: Vec<&Issue> = self
            .vocabulary
            .iter()
            .filter(|i| i.value != correct)
            .collect();
        let mut choices: Vec<QuizChoice> = distractors
            .choose_multiple(rng, QUIZ_CHOICES - 1)
            .map(|i| QuizChoice {
                value: i.value.clone(),
                label: i.label.clone(),
            })
            .collect();
        choices.push(QuizChoice {
            value: correct.to_string(),
            label: label_of(correct),
        });
        choices.shuffle(rng);
        choices
    }

    /// Answer the open question. Returns whether the answer was correct,
    /// or `None` if no question is open.
    pub fn answer(&mut self, value: &str, now: Instant) -> Option<bool> {
        let question = self.question.take()?;
        let quiz_box = &mut self.boxes[question.box_index];
        let correct = quiz_box.bbox.violation_name == value;
        quiz_box.state = QuizBoxState::Answered { correct };

        self.score.record(correct);
        self.total.record(correct);
        self.celebrate |= correct;
        self.feedback = Some(Feedback {
            correct,
            shown_at: now,
        });
        log::debug!(
            "Quiz: answered '{}' -> {}",
            value,
            if correct { "correct" } else { "wrong" }
        );
        Some(correct)
    }

    /// Claim the image has no violations at all.
    ///
    /// Correct only when there are no boxes; otherwise every box is marked
    /// answered and wrong.
    pub fn claim_no_issues(&mut self, now: Instant) -> Option<bool> {
        if self.is_locked() || self.is_finished() {
            return None;
        }
        let correct = self.boxes.is_empty();
        for quiz_box in &mut self.boxes {
            quiz_box.state = QuizBoxState::Answered { correct: false };
        }
        self.no_issues_claimed = true;
        self.score.record(correct);
        self.total.record(correct);
        self.celebrate |= correct;
        self.feedback = Some(Feedback {
            correct,
            shown_at: now,
        });
        log::debug!("Quiz: no-issues claim on '{}' -> {}", self.image_key, correct);
        Some(correct)
    }
}
