use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::debug;
use std::path::{Path, PathBuf};

mod cli;
mod libquiz;

use crate::libquiz::edit::{parse_per_row, parse_position};
use crate::libquiz::error::{Error, Result};
use crate::libquiz::model::{Card, Project, Question};
use crate::libquiz::session::Session;
use crate::libquiz::success_audio::{self, SuccessAudio};

#[derive(Parser, Debug)]
#[command(name = "cardquiz")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, default_value = "error")]
    log_level: String,
    #[arg(short, long, global = true, value_name = "FILE", default_value = "project.json")]
    project: PathBuf,
    #[arg(long, global = true, value_name = "FILE")]
    success_audio: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start over with one blank card and one blank question
    New {
        #[arg(short, long, default_value = "false")]
        force: bool,
    },
    /// Print the cards, questions and settings
    Show,
    /// Generate the HTML page
    Export {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Take the quiz in the terminal
    Play {
        #[arg(short, long, default_value = "false")]
        shuffle: bool,
    },
    #[command(flatten)]
    Edit(EditCommand),
}

#[derive(Subcommand, Debug)]
enum EditCommand {
    #[command(subcommand)]
    Card(CardCommand),
    #[command(subcommand)]
    Question(QuestionCommand),
    #[command(subcommand)]
    Answer(AnswerCommand),
    /// Choose the correct answer of a question
    Correct { question: String, answer: String },
    /// Change page settings
    Settings {
        #[arg(long)]
        cards_per_row: Option<String>,
        #[arg(long)]
        output_file: Option<String>,
    },
}

#[derive(ClapArgs, Debug)]
struct CardFields {
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    word: Option<String>,
    #[arg(long)]
    audio: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CardCommand {
    Add(CardFields),
    Remove { card: String },
    Set {
        card: String,
        #[command(flatten)]
        fields: CardFields,
    },
}

#[derive(Subcommand, Debug)]
enum QuestionCommand {
    Add {
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long, default_value = "")]
        image_url: String,
        /// Answers in order; two blank answers when none are given
        #[arg(short, long = "answer")]
        answers: Vec<String>,
    },
    Remove { question: String },
    Set {
        question: String,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum AnswerCommand {
    Add {
        question: String,
        #[arg(default_value = "")]
        text: String,
    },
    Remove { question: String, answer: String },
    Set {
        question: String,
        answer: String,
        text: String,
    },
}

impl CardFields {
    fn apply_to(self, card: &mut Card) {
        if let Some(image_url) = self.image_url {
            card.image_url = image_url;
        }
        if let Some(title) = self.title {
            card.title = title;
        }
        if let Some(word) = self.word {
            card.word = word;
        }
        if let Some(audio) = self.audio {
            card.audio_path = audio;
        }
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    if let Err(err) = run(args) {
        debug!("[Main] {err:?}");
        eprintln!("{}", format!("Error: {err}").red());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let project_path = args.project;
    match args.command {
        Commands::New { force } => {
            if project_path.exists() && !force {
                return Err(Error::Validation {
                    field: "project",
                    reason: format!("{project_path:?} already exists (use --force)"),
                });
            }
            Session::default().save(&project_path)?;
            println!("{}", format!("Created {:?}", project_path).green());
        }
        Commands::Show => {
            let session = open(&project_path, SuccessAudio::default())?;
            cli::print_project(session.project());
        }
        Commands::Export { output } => {
            let session = open(&project_path, load_success_audio(args.success_audio))?;
            let written = session.export(output.as_deref())?;
            println!(
                "{}",
                format!("HTML file generated successfully! Saved as: {}", written.display())
                    .green()
            );
        }
        Commands::Play { shuffle } => {
            let session = open(&project_path, SuccessAudio::default())?;
            let score = cli::cli_loop(session.project(), shuffle);
            println!(
                "{}",
                format!("Score: {}/{}", score.correct, score.asked).cyan()
            );
        }
        Commands::Edit(command) => {
            let mut session = open(&project_path, SuccessAudio::default())?;
            let summary = session.apply(|project| edit(project, command))?;
            session.save(&project_path)?;
            println!("{}", summary.green());
        }
    }
    Ok(())
}

fn open(path: &Path, success: SuccessAudio) -> Result<Session> {
    let mut session = Session::new(success);
    session.load(path)?;
    Ok(session)
}

/// The success clip is optional: a page without it just stays silent on
/// non-Latin answers.
fn load_success_audio(explicit: Option<PathBuf>) -> SuccessAudio {
    let path = success_audio::resolve_path(explicit);
    match SuccessAudio::load(&path) {
        Ok(audio) => audio,
        Err(err) => {
            debug!("[Audio] {err:?}");
            eprintln!(
                "{}",
                format!("Failed to load success audio: {err}").yellow()
            );
            SuccessAudio::default()
        }
    }
}

fn unset_correct_notice(q_idx: usize) -> String {
    format!(
        "Question {} has no chosen answer; the saved file and the page will treat answer 1 as correct.",
        q_idx + 1
    )
}

fn edit(project: &mut Project, command: EditCommand) -> Result<String> {
    debug!("[Edit] {:?}", command);
    let summary = match command {
        EditCommand::Card(CardCommand::Add(fields)) => {
            let mut card = Card::default();
            fields.apply_to(&mut card);
            let idx = project.add_card(card);
            format!("Added card {}", idx + 1)
        }
        EditCommand::Card(CardCommand::Remove { card }) => {
            let idx = parse_position("card", &card)?;
            let removed = project.remove_card(idx)?;
            format!("Removed card {} ({})", idx + 1, removed.title)
        }
        EditCommand::Card(CardCommand::Set { card, fields }) => {
            let idx = parse_position("card", &card)?;
            fields.apply_to(project.card_mut(idx)?);
            format!("Updated card {}", idx + 1)
        }
        EditCommand::Question(QuestionCommand::Add {
            text,
            image_url,
            answers,
        }) => {
            let mut question = if answers.is_empty() {
                Question::blank()
            } else {
                Question {
                    answers,
                    ..Default::default()
                }
            };
            question.text = text;
            question.image_url = image_url;
            let idx = project.add_question(question);
            format!("Added question {}", idx + 1)
        }
        EditCommand::Question(QuestionCommand::Remove { question }) => {
            let idx = parse_position("question", &question)?;
            project.remove_question(idx)?;
            format!("Removed question {}", idx + 1)
        }
        EditCommand::Question(QuestionCommand::Set {
            question,
            text,
            image_url,
        }) => {
            let idx = parse_position("question", &question)?;
            let target = project.question_mut(idx)?;
            if let Some(text) = text {
                target.text = text;
            }
            if let Some(image_url) = image_url {
                target.image_url = image_url;
            }
            format!("Updated question {}", idx + 1)
        }
        EditCommand::Answer(AnswerCommand::Add { question, text }) => {
            let q_idx = parse_position("question", &question)?;
            let a_idx = project.question_mut(q_idx)?.add_answer(text);
            format!("Added answer {} to question {}", a_idx + 1, q_idx + 1)
        }
        EditCommand::Answer(AnswerCommand::Remove { question, answer }) => {
            let q_idx = parse_position("question", &question)?;
            let a_idx = parse_position("answer", &answer)?;
            let target = project.question_mut(q_idx)?;
            target.remove_answer(a_idx)?;
            if target.correct_index.is_none() && !target.answers.is_empty() {
                println!("{}", unset_correct_notice(q_idx).yellow());
            }
            format!("Removed answer {} from question {}", a_idx + 1, q_idx + 1)
        }
        EditCommand::Answer(AnswerCommand::Set {
            question,
            answer,
            text,
        }) => {
            let q_idx = parse_position("question", &question)?;
            let a_idx = parse_position("answer", &answer)?;
            project.question_mut(q_idx)?.set_answer(a_idx, text)?;
            format!("Updated answer {} of question {}", a_idx + 1, q_idx + 1)
        }
        EditCommand::Correct { question, answer } => {
            let q_idx = parse_position("question", &question)?;
            let a_idx = parse_position("correct answer", &answer)?;
            project.question_mut(q_idx)?.set_correct(a_idx)?;
            format!("Answer {} is now correct for question {}", a_idx + 1, q_idx + 1)
        }
        EditCommand::Settings {
            cards_per_row,
            output_file,
        } => {
            if let Some(per_row) = cards_per_row {
                project.set_cards_per_row(parse_per_row(&per_row)?)?;
            }
            if let Some(output_file) = output_file {
                project.output_file = output_file;
            }
            "Updated settings".to_string()
        }
    };
    Ok(summary)
}
