//! In-memory project: picture cards, quiz questions and page settings.
//!
//! Plain records owned by the editing session. Every mutation keeps positions
//! contiguous; nothing outside the session holds references into these lists.

use crate::libquiz::error::{Error, Result};
use log::debug;

pub const DEFAULT_CARDS_PER_ROW: usize = 3;
pub const DEFAULT_OUTPUT_FILE: &str = "animal_game.html";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub image_url: String,
    pub title: String,
    /// Spoken word. Only used as the image alt text in the exported page.
    pub word: String,
    pub audio_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question {
    pub image_url: String,
    pub text: String,
    pub answers: Vec<String>,
    /// `None` until an answer is chosen. The exporter treats it as 0.
    pub correct_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub cards: Vec<Card>,
    pub questions: Vec<Question>,
    cards_per_row: usize,
    pub output_file: String,
}

impl Question {
    /// A fresh question as the editor offers it: two blank answers, none chosen.
    pub fn blank() -> Self {
        Question {
            answers: vec![String::new(), String::new()],
            ..Default::default()
        }
    }

    pub fn add_answer(&mut self, text: impl Into<String>) -> usize {
        self.answers.push(text.into());
        self.answers.len() - 1
    }

    /// Removes the answer at `idx`. A selection on a later answer follows it
    /// to its new position; a selection on the removed answer is cleared.
    pub fn remove_answer(&mut self, idx: usize) -> Result<String> {
        check_position("answer", idx, self.answers.len())?;
        let removed = self.answers.remove(idx);
        self.correct_index = match self.correct_index {
            Some(correct) if correct == idx => None,
            Some(correct) if correct > idx => Some(correct - 1),
            other => other,
        };
        Ok(removed)
    }

    pub fn set_answer(&mut self, idx: usize, text: impl Into<String>) -> Result<()> {
        let len = self.answers.len();
        let slot = self
            .answers
            .get_mut(idx)
            .ok_or_else(|| out_of_range("answer", idx, len))?;
        *slot = text.into();
        Ok(())
    }

    pub fn set_correct(&mut self, idx: usize) -> Result<()> {
        check_position("correct answer", idx, self.answers.len())?;
        self.correct_index = Some(idx);
        Ok(())
    }

    /// Index written to the project file and to the page: unset means 0.
    pub fn effective_correct_index(&self) -> usize {
        self.correct_index.unwrap_or(0)
    }

    /// Text of the effective correct answer, if that index is in range.
    pub fn correct_answer(&self) -> Option<&str> {
        self.answers
            .get(self.effective_correct_index())
            .map(String::as_str)
    }
}

impl Default for Project {
    /// One blank card, one blank question, three cards per row.
    fn default() -> Self {
        Project {
            cards: vec![Card::default()],
            questions: vec![Question::blank()],
            cards_per_row: DEFAULT_CARDS_PER_ROW,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl Project {
    /// A project with no cards and no questions.
    pub fn empty() -> Self {
        Project {
            cards: Vec::new(),
            questions: Vec::new(),
            cards_per_row: DEFAULT_CARDS_PER_ROW,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }

    pub fn cards_per_row(&self) -> usize {
        self.cards_per_row
    }

    pub fn set_cards_per_row(&mut self, per_row: usize) -> Result<()> {
        if per_row == 0 {
            return Err(Error::validation("cards per row", "must be at least 1"));
        }
        self.cards_per_row = per_row;
        Ok(())
    }

    pub fn add_card(&mut self, card: Card) -> usize {
        self.cards.push(card);
        debug!("[Project] Added card #{}", self.cards.len());
        self.cards.len() - 1
    }

    pub fn remove_card(&mut self, idx: usize) -> Result<Card> {
        check_position("card", idx, self.cards.len())?;
        debug!("[Project] Removing card #{}", idx + 1);
        Ok(self.cards.remove(idx))
    }

    pub fn card_mut(&mut self, idx: usize) -> Result<&mut Card> {
        let len = self.cards.len();
        self.cards
            .get_mut(idx)
            .ok_or_else(|| out_of_range("card", idx, len))
    }

    pub fn add_question(&mut self, question: Question) -> usize {
        self.questions.push(question);
        debug!("[Project] Added question #{}", self.questions.len());
        self.questions.len() - 1
    }

    pub fn remove_question(&mut self, idx: usize) -> Result<Question> {
        check_position("question", idx, self.questions.len())?;
        debug!("[Project] Removing question #{}", idx + 1);
        Ok(self.questions.remove(idx))
    }

    pub fn question_mut(&mut self, idx: usize) -> Result<&mut Question> {
        let len = self.questions.len();
        self.questions
            .get_mut(idx)
            .ok_or_else(|| out_of_range("question", idx, len))
    }
}

fn check_position(field: &'static str, idx: usize, len: usize) -> Result<()> {
    if idx < len {
        Ok(())
    } else {
        Err(out_of_range(field, idx, len))
    }
}

fn out_of_range(field: &'static str, idx: usize, len: usize) -> Error {
    Error::validation(
        field,
        format!("position {} does not exist (there are {})", idx + 1, len),
    )
}
