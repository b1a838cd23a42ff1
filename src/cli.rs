use crate::libquiz::export::has_latin_letter;
use crate::libquiz::model::{Project, Question};
use colored::Colorize;
use log::debug;
use rand::rng;
use rand::seq::SliceRandom;
use std::io::{self, Read, Write};
use std::iter::Peekable;
use text_io::try_read;

#[derive(Debug, PartialEq)]
pub enum Choice {
    Option(usize),
    DontKnow,
    Quit,
}

impl Choice {
    pub fn from_str(choices_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if num >= 1 && num <= choices_count => Choice::Option(num - 1),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} options available!", choices_count)
                            .bright_red()
                    );
                    Choice::DontKnow
                }
                Err(_) => Choice::DontKnow,
            },
        }
    }
}

/// How the page greets a correct answer.
#[derive(Debug, PartialEq)]
pub enum Reward<'a> {
    Speak(&'a str),
    SuccessSound,
    Silent,
}

impl<'a> Reward<'a> {
    pub fn for_question(question: &'a Question) -> Reward<'a> {
        match question.correct_answer() {
            Some(text) if text.is_empty() => Reward::Silent,
            Some(text) if has_latin_letter(text) => Reward::Speak(text),
            Some(_) => Reward::SuccessSound,
            None => Reward::Silent,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Score {
    pub correct: usize,
    pub asked: usize,
}

/// Reads one answer line. End of input quits, like `q`.
pub fn next_choice<I>(input: &mut Peekable<I>, choices_count: usize) -> Choice
where
    I: Iterator<Item = u8>,
{
    if input.peek().is_none() {
        return Choice::Quit;
    }
    let line: Result<String, _> = try_read!("{}\n", input.by_ref());
    match line {
        Ok(line) => Choice::from_str(choices_count, &line),
        Err(err) => {
            debug!("[Play] unreadable answer: {err}");
            Choice::DontKnow
        }
    }
}

/// Display order of a question's answers as indices into `answers`.
pub fn answer_order(question: &Question, shuffle: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..question.answers.len()).collect();
    if shuffle {
        order.shuffle(&mut rng());
    }
    order
}

/// Plays the quiz in the terminal, one question at a time.
pub fn cli_loop(project: &Project, shuffle: bool) -> Score {
    let mut score = Score::default();
    let mut input = io::stdin().lock().bytes().map_while(Result::ok).peekable();
    let question_count = project.questions.len();

    for (idx, question) in project.questions.iter().enumerate() {
        let leading = format!("{}/{}. ", idx + 1, question_count);
        println!(
            "{}{}",
            leading.cyan(),
            question.text.as_str().black().bold().on_white()
        );
        if !question.image_url.is_empty() {
            println!("{}{}", " ".repeat(leading.len()), question.image_url.dimmed());
        }

        let order = answer_order(question, shuffle);
        let indent = " ".repeat(leading.len());
        for (i, answer_idx) in order.iter().enumerate() {
            println!(
                "{}{}. {}",
                indent,
                format!("{}", i + 1).bold(),
                question.answers[*answer_idx]
            );
        }

        print!(
            "{} ",
            format!(
                "Answer (1-{}, q to quit prematurely and anything else if you don't know):",
                order.len()
            )
            .cyan()
        );
        // The prompt has to be visible before the end-of-input check blocks.
        if let Err(err) = io::stdout().flush() {
            debug!("[Play] cannot flush prompt: {err}");
        }
        let choice = next_choice(&mut input, order.len());
        debug!("[Play] choice: {:?}", choice);

        let correct = question.effective_correct_index();
        match choice {
            Choice::Option(num) if order[num] == correct => {
                score.asked += 1;
                score.correct += 1;
                println!("{}", "Correct! Well done! 🎉".bright_green());
                match Reward::for_question(question) {
                    Reward::Speak(text) => println!("{}", format!("🔊 \"{}\"", text).green()),
                    Reward::SuccessSound => println!("{}", "🔔".green()),
                    Reward::Silent => {}
                }
            }
            Choice::Option(_) | Choice::DontKnow => {
                score.asked += 1;
                println!("{}", "Try again!".bright_red());
                if let Some(text) = question.correct_answer() {
                    println!("{}", format!("The correct choice was {:?}.", text).green());
                }
            }
            Choice::Quit => {
                println!("{}", "Quitting Early!".cyan());
                return score;
            }
        }
    }
    score
}

/// Prints the project as a tree, numbering everything from 1.
pub fn print_project(project: &Project) {
    println!(
        "{}",
        format!(
            "Cards ({}, {} per row)",
            project.cards.len(),
            project.cards_per_row()
        )
        .blue()
    );
    for (i, card) in project.cards.iter().enumerate() {
        println!(
            "├ {}. {} [word: {:?}, image: {:?}, audio: {:?}]",
            i + 1,
            card.title.as_str().bold(),
            card.word,
            card.image_url,
            card.audio_path
        );
    }
    println!("{}", format!("Questions ({})", project.questions.len()).blue());
    for (i, question) in project.questions.iter().enumerate() {
        println!("├ {}. {}", i + 1, question.text.as_str().bold());
        if !question.image_url.is_empty() {
            println!("│ ├ image: {:?}", question.image_url);
        }
        for (j, answer) in question.answers.iter().enumerate() {
            let line = format!("│ ├ {}. {}", j + 1, answer);
            if question.correct_index == Some(j) {
                println!("{} {}", line.green(), "✔".green());
            } else {
                println!("{}", line);
            }
        }
        if question.correct_index.is_none() {
            println!(
                "{}",
                "│ └ correct answer unset (the page will accept answer 1)".yellow()
            );
        }
    }
    println!("{}", format!("Output file: {}", project.output_file).blue());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answers: &[&str], correct_index: Option<usize>) -> Question {
        Question {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            correct_index,
            ..Default::default()
        }
    }

    #[test]
    fn test_choice_from_str() {
        assert_eq!(Choice::from_str(4, "1"), Choice::Option(0));
        assert_eq!(Choice::from_str(4, "4\r"), Choice::Option(3));
        assert_eq!(Choice::from_str(4, "5"), Choice::DontKnow);
        assert_eq!(Choice::from_str(4, "0"), Choice::DontKnow);
        assert_eq!(Choice::from_str(4, "q"), Choice::Quit);
        assert_eq!(Choice::from_str(4, "?"), Choice::DontKnow);
    }

    #[test]
    fn test_next_choice_quits_at_end_of_input() {
        let mut input = "2\n\nq\n3".bytes().peekable();

        assert_eq!(next_choice(&mut input, 3), Choice::Option(1));
        assert_eq!(next_choice(&mut input, 3), Choice::DontKnow);
        assert_eq!(next_choice(&mut input, 3), Choice::Quit);
        assert_eq!(next_choice(&mut input, 3), Choice::Option(2));
        assert_eq!(next_choice(&mut input, 3), Choice::Quit);
        assert_eq!(next_choice(&mut input, 3), Choice::Quit);
    }

    #[test]
    fn test_reward_routes_on_latin_letters() {
        let latin = question(&["Cat", "Dog"], Some(0));
        let arabic = question(&["قطة", "كلب"], Some(0));
        let blank = question(&["", "x"], Some(0));

        assert_eq!(Reward::for_question(&latin), Reward::Speak("Cat"));
        assert_eq!(Reward::for_question(&arabic), Reward::SuccessSound);
        assert_eq!(Reward::for_question(&blank), Reward::Silent);
        assert_eq!(Reward::for_question(&question(&[], None)), Reward::Silent);
    }

    #[test]
    fn test_answer_order_keeps_every_answer() {
        let q = question(&["a", "b", "c", "d"], Some(2));

        assert_eq!(answer_order(&q, false), vec![0, 1, 2, 3]);
        let mut shuffled = answer_order(&q, true);
        shuffled.sort();
        assert_eq!(shuffled, vec![0, 1, 2, 3]);
    }
}
