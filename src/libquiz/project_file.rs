//! JSON project file.
//!
//! The on-disk keys keep the names the game started with (`animals`,
//! `animals_per_row`). Question images are read but never written back: a
//! saved project loses every question's `image_url`. Callers that need the
//! field must keep the original file.
//!
//! An unchosen correct answer does not survive a save either. It is written
//! as `0` and read back as a choice of the first answer.
//!
//! `animals_per_row` and `correct_index` may be JSON numbers or numeric
//! strings. Anything else in those fields is a validation error.

use crate::libquiz::error::{Error, Result};
use crate::libquiz::files;
use crate::libquiz::model::{
    Card, Project, Question, DEFAULT_CARDS_PER_ROW, DEFAULT_OUTPUT_FILE,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Serialize, Deserialize, Debug)]
struct ProjectJson {
    #[serde(default)]
    animals: Vec<CardJson>,
    #[serde(default)]
    questions: Vec<QuestionJson>,
    #[serde(default)]
    animals_per_row: Option<Value>,
    #[serde(default)]
    output_file: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct CardJson {
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    word: String,
    #[serde(default)]
    audio: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct QuestionJson {
    #[serde(default, skip_serializing)]
    image_url: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    answers: Vec<String>,
    #[serde(default)]
    correct_index: Option<Value>,
}

/// Reads an integer given either as a JSON number or as a numeric string.
fn integer_field(field: &'static str, value: Option<Value>) -> Result<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::validation(field, format!("{n} is not an integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::validation(field, format!("{s:?} is not a number"))),
        Some(other) => Err(Error::validation(field, format!("{other} is not a number"))),
    }
}

impl From<&Card> for CardJson {
    fn from(card: &Card) -> Self {
        CardJson {
            image_url: card.image_url.clone(),
            title: card.title.clone(),
            word: card.word.clone(),
            audio: card.audio_path.clone(),
        }
    }
}

impl From<CardJson> for Card {
    fn from(json: CardJson) -> Self {
        Card {
            image_url: json.image_url,
            title: json.title,
            word: json.word,
            audio_path: json.audio,
        }
    }
}

impl From<&Question> for QuestionJson {
    fn from(question: &Question) -> Self {
        QuestionJson {
            image_url: question.image_url.clone(),
            text: question.text.clone(),
            answers: question.answers.clone(),
            correct_index: Some(Value::from(question.effective_correct_index())),
        }
    }
}

impl TryFrom<QuestionJson> for Question {
    type Error = Error;

    fn try_from(json: QuestionJson) -> Result<Self> {
        let correct = integer_field("correct answer", json.correct_index)?.unwrap_or(0);
        let correct_index = usize::try_from(correct)
            .ok()
            .filter(|idx| *idx < json.answers.len());
        Ok(Question {
            image_url: json.image_url,
            text: json.text,
            answers: json.answers,
            correct_index,
        })
    }
}

pub fn to_json(project: &Project) -> Result<String> {
    let json = ProjectJson {
        animals: project.cards.iter().map(CardJson::from).collect(),
        questions: project.questions.iter().map(QuestionJson::from).collect(),
        animals_per_row: Some(Value::from(project.cards_per_row())),
        output_file: Some(project.output_file.clone()),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn from_json(text: &str) -> Result<Project> {
    let json: ProjectJson = serde_json::from_str(text)?;

    let mut project = Project::empty();
    let per_row = integer_field("cards per row", json.animals_per_row)?
        .unwrap_or(DEFAULT_CARDS_PER_ROW as i64);
    let per_row = usize::try_from(per_row)
        .map_err(|_| Error::validation("cards per row", format!("{per_row} is negative")))?;
    project.set_cards_per_row(per_row)?;
    project.output_file = json
        .output_file
        .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string());
    project.cards = json.animals.into_iter().map(Card::from).collect();
    project.questions = json
        .questions
        .into_iter()
        .map(Question::try_from)
        .collect::<Result<_>>()?;
    Ok(project)
}

pub fn load(path: &Path) -> Result<Project> {
    let now = Instant::now();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let project = from_json(&text)?;
    info!(
        "[Project] Loaded {:?}: {} cards, {} questions",
        path,
        project.cards.len(),
        project.questions.len()
    );
    debug!("[Project] Loading took {} ms.", now.elapsed().as_millis());
    Ok(project)
}

pub fn save(project: &Project, path: &Path) -> Result<()> {
    let json = to_json(project)?;
    files::write_atomically(path, json.as_bytes())?;
    info!("[Project] Saved {:?}", path);
    Ok(())
}
