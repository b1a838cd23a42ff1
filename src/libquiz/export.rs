//! Turns a project into one self-contained HTML page.
//!
//! Card audio is read from disk and embedded as base64 `data:` URIs; the
//! success clip is embedded at the top of every page. Titles, words, question
//! text, answers and image URLs are pasted into the markup and the script
//! tables exactly as typed. Nothing is escaped, so a project can inject
//! arbitrary HTML or JavaScript into its own page. Only export projects you
//! trust.

use crate::libquiz::error::Result;
use crate::libquiz::files;
use crate::libquiz::model::{Card, Project};
use crate::libquiz::success_audio::SuccessAudio;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

const TEMPLATE: &str = include_str!("template.html");
const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// MIME type announced for a card's audio, derived from the file extension.
pub fn mime_type(audio_path: &str) -> String {
    match Path::new(audio_path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("audio/{}", ext.to_lowercase()),
        _ => DEFAULT_AUDIO_MIME.to_string(),
    }
}

/// Same test as the page's `hasEnglishCharacter`: Latin text is spoken by
/// speech synthesis, anything else gets the success clip.
pub fn has_latin_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}

pub fn export(project: &Project, success: &SuccessAudio) -> Result<String> {
    let now = Instant::now();
    let cards_html = render_cards(project)?;
    let html = fill_template(
        TEMPLATE,
        &[
            ("success_audio", &render_success_audio(success)),
            ("cards_html", &cards_html),
            ("questions_html", &render_questions(project)),
            ("correct_answers_js", &render_correct_answers(project)),
            ("correct_answer_text_js", &render_correct_answer_text(project)),
        ],
    );
    debug!(
        "[Export] Rendered {} bytes in {} ms.",
        html.len(),
        now.elapsed().as_millis()
    );
    Ok(html)
}

/// Renders the page and writes it to the project's output file.
pub fn export_to_file(project: &Project, success: &SuccessAudio, dest: &Path) -> Result<()> {
    let html = export(project, success)?;
    files::write_atomically(dest, html.as_bytes())?;
    info!("[Export] Wrote {:?}", dest);
    Ok(())
}

fn render_cards(project: &Project) -> Result<String> {
    let per_row = project.cards_per_row();
    let mut html = String::new();
    for (i, card) in project.cards.iter().enumerate() {
        if i % per_row == 0 {
            if i > 0 {
                html.push_str("</div>\n");
            }
            html.push_str("<div class=\"animals-container\">\n");
        }
        html.push_str(&render_card(i, card)?);
    }
    if !project.cards.is_empty() {
        html.push_str("</div>\n");
    }
    Ok(html)
}

fn render_card(i: usize, card: &Card) -> Result<String> {
    let payload = match files::read_optional(&card.audio_path)? {
        Some(bytes) => {
            debug!("[Export] Embedding {} bytes for card {}", bytes.len(), i);
            BASE64.encode(bytes)
        }
        None => String::new(),
    };
    let mime = mime_type(&card.audio_path);
    Ok(format!(
        r#"
                <div class="animal-card">
                    <img src="{image}" alt="{word}" onclick="playAudio('audio_{i}')">
                    <div class="animal-name">{title}</div>
                    <button class="repeat-btn" onclick="playAudio('audio_{i}')">🔊 Repeat</button>
                    <audio id="audio_{i}">
                        <source src="data:{mime};base64,{payload}" type="{mime}">
                    </audio>
                </div>
                "#,
        image = card.image_url,
        word = card.word,
        title = card.title,
    ))
}

fn render_questions(project: &Project) -> String {
    let mut html = String::new();
    for (i, question) in project.questions.iter().enumerate() {
        let id = i + 1;
        let image_html = if question.image_url.is_empty() {
            String::new()
        } else {
            format!(
                r#"<img src="{}" alt="Question image" style="max-width: 300px; margin-bottom: 15px; border-radius: 15px;">"#,
                question.image_url
            )
        };
        let answers_html: String = question
            .answers
            .iter()
            .enumerate()
            .map(|(j, answer)| {
                format!("<div class=\"answer\" onclick=\"checkAnswer({id}, {j})\">{answer}</div>\n")
            })
            .collect();
        html.push_str(&format!(
            r#"
                <div class="question" id="q{id}">
                    {image_html}
                    <div class="question-text">{text}</div>
                    <div class="answers-container">
                        {answers_html}
                    </div>
                    <div class="feedback" id="feedback{id}"></div>
                </div>
                "#,
            text = question.text,
        ));
    }
    html
}

fn render_correct_answers(project: &Project) -> String {
    let mut js = String::from("const correctAnswers = {\n");
    for (i, question) in project.questions.iter().enumerate() {
        js.push_str(&format!(
            "    {}: {},\n",
            i + 1,
            question.effective_correct_index()
        ));
    }
    js.push_str("};\n");
    js
}

fn render_correct_answer_text(project: &Project) -> String {
    let mut js = String::from("const correctAnswerText = {\n");
    for (i, question) in project.questions.iter().enumerate() {
        if let Some(answer) = question.correct_answer() {
            js.push_str(&format!("    {}: \"{}\",\n", i + 1, answer));
        }
    }
    js.push_str("};\n");
    js
}

fn render_success_audio(success: &SuccessAudio) -> String {
    format!(
        r#"
            <audio id="successAudio" controls style="display: none;">
              <source src="data:audio/mp3;base64,{}" type="audio/mp3">
              Your browser does not support the audio element.
            </audio>
            "#,
        success.encoded()
    )
}

/// Replaces every `{{name}}` in one pass, so substituted text is never
/// scanned again. Unknown names are kept verbatim.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libquiz::model::Question;
    use std::fs;
    use tempfile::tempdir;

    fn project_with_cards(count: usize, per_row: usize) -> Project {
        let mut project = Project::empty();
        project.set_cards_per_row(per_row).unwrap();
        for n in 0..count {
            project.add_card(Card {
                title: format!("Card {n}"),
                ..Default::default()
            });
        }
        project
    }

    fn question(answers: &[&str], correct_index: Option<usize>) -> Question {
        Question {
            text: "What is this?".to_string(),
            answers: answers.iter().map(|a| a.to_string()).collect(),
            correct_index,
            ..Default::default()
        }
    }

    fn grid_count(html: &str) -> usize {
        html.matches("<div class=\"animals-container\">").count()
    }

    #[test]
    fn test_grid_containers_per_row() {
        for (cards, per_row, expected) in [(0, 3, 0), (1, 3, 1), (3, 3, 1), (4, 3, 2), (7, 2, 4)] {
            let html = export(&project_with_cards(cards, per_row), &SuccessAudio::default()).unwrap();
            assert_eq!(grid_count(&html), expected, "{cards} cards, {per_row} per row");
        }
    }

    #[test]
    fn test_grid_containers_are_closed() {
        let html = render_cards(&project_with_cards(5, 2)).unwrap();
        assert_eq!(grid_count(&html), 3);
        assert_eq!(
            html.matches("</div>\n<div class=\"animals-container\">").count(),
            2
        );
        assert!(html.ends_with("</div>\n"));
    }

    #[test]
    fn test_card_audio_ids_follow_position() {
        let html = export(&project_with_cards(4, 3), &SuccessAudio::default()).unwrap();
        for i in 0..4 {
            assert!(html.contains(&format!("<audio id=\"audio_{i}\">")));
        }
        assert!(html.contains("onclick=\"playAudio('audio_3')\""));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("x.wav"), "audio/wav");
        assert_eq!(mime_type("clips/Hello.OGG"), "audio/ogg");
        assert_eq!(mime_type(""), "audio/mpeg");
        assert_eq!(mime_type("noext"), "audio/mpeg");
        assert_eq!(mime_type(".hidden"), "audio/mpeg");
    }

    #[test]
    fn test_has_latin_letter() {
        assert!(has_latin_letter("Cat"));
        assert!(has_latin_letter("قطة z"));
        assert!(!has_latin_letter("قطة"));
        assert!(!has_latin_letter("123 !?"));
        assert!(!has_latin_letter(""));
    }

    #[test]
    fn test_page_script_routes_on_latin_letters() {
        let html = export(&Project::empty(), &SuccessAudio::default()).unwrap();
        assert!(html.contains("return /[a-zA-Z]/.test(text);"));
        assert!(html.contains("new SpeechSynthesisUtterance(text)"));
        assert!(html.contains("document.getElementById('successAudio')"));
    }

    #[test]
    fn test_correct_answer_tables() {
        let mut project = Project::empty();
        project.add_question(question(&["A", "B"], Some(1)));

        let html = export(&project, &SuccessAudio::default()).unwrap();

        assert!(html.contains("const correctAnswers = {\n    1: 1,\n};"));
        assert!(html.contains("const correctAnswerText = {\n    1: \"B\",\n};"));
    }

    #[test]
    fn test_unset_correct_index_exports_as_first_answer() {
        // The page will accept the first answer even though none was chosen.
        let mut project = Project::empty();
        project.add_question(question(&["Wrong", "Right"], None));

        let html = export(&project, &SuccessAudio::default()).unwrap();

        assert!(html.contains("    1: 0,\n"));
        assert!(html.contains("    1: \"Wrong\",\n"));
    }

    #[test]
    fn test_out_of_range_correct_index_omits_text() {
        let mut project = Project::empty();
        project.add_question(question(&[], None));
        project.add_question(question(&["A"], Some(4)));

        let text_js = render_correct_answer_text(&project);

        assert_eq!(text_js, "const correctAnswerText = {\n};\n");
        assert!(render_correct_answers(&project).contains("    2: 4,\n"));
    }

    #[test]
    fn test_answer_handlers_use_question_id() {
        let mut project = Project::empty();
        project.add_question(question(&["x"], Some(0)));
        project.add_question(question(&["a", "b", "c"], Some(2)));

        let html = export(&project, &SuccessAudio::default()).unwrap();

        assert!(html.contains("id=\"q2\""));
        assert!(html.contains("id=\"feedback2\""));
        assert!(html.contains("onclick=\"checkAnswer(2, 2)\">c</div>"));
        assert!(html.contains("onclick=\"checkAnswer(1, 0)\">x</div>"));
    }

    #[test]
    fn test_question_image_is_optional() {
        let mut project = Project::empty();
        project.add_question(question(&["a"], Some(0)));
        let mut with_image = question(&["b"], Some(0));
        with_image.image_url = "https://example.com/q.png".to_string();
        project.add_question(with_image);

        let html = render_questions(&project);

        assert_eq!(html.matches("alt=\"Question image\"").count(), 1);
        assert!(html.contains("src=\"https://example.com/q.png\""));
    }

    #[test]
    fn test_card_audio_is_embedded() {
        let dir = tempdir().unwrap();
        let clip = dir.path().join("meow.WAV");
        fs::write(&clip, b"abc").unwrap();
        let mut project = Project::empty();
        project.add_card(Card {
            audio_path: clip.to_str().unwrap().to_string(),
            ..Default::default()
        });

        let html = export(&project, &SuccessAudio::default()).unwrap();

        assert!(html.contains("src=\"data:audio/wav;base64,YWJj\" type=\"audio/wav\""));
    }

    #[test]
    fn test_missing_card_audio_is_skipped() {
        let mut project = Project::empty();
        project.add_card(Card {
            audio_path: "/definitely/not/here.mp3".to_string(),
            ..Default::default()
        });

        let html = export(&project, &SuccessAudio::default()).unwrap();

        assert!(html.contains("src=\"data:audio/mp3;base64,\" type=\"audio/mp3\""));
    }

    #[test]
    fn test_unreadable_card_audio_fails() {
        let dir = tempdir().unwrap();
        let mut project = Project::empty();
        project.add_card(Card {
            audio_path: dir.path().to_str().unwrap().to_string(),
            ..Default::default()
        });

        assert!(export(&project, &SuccessAudio::default()).is_err());
    }

    #[test]
    fn test_success_audio_is_embedded() {
        let html = export(&Project::empty(), &SuccessAudio::from_bytes(b"abc")).unwrap();
        assert!(html.contains("src=\"data:audio/mp3;base64,YWJj\""));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_user_text_is_not_escaped() {
        let mut project = Project::empty();
        project.add_question(Question {
            text: "<b>{{cards_html}}</b>".to_string(),
            ..question(&["a"], Some(0))
        });

        let html = export(&project, &SuccessAudio::default()).unwrap();

        assert!(html.contains("<div class=\"question-text\"><b>{{cards_html}}</b></div>"));
    }

    #[test]
    fn test_end_to_end_example() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.html");
        let mut project = Project::empty();
        project.add_card(Card {
            title: "Cat (قطة)".to_string(),
            ..Default::default()
        });
        project.add_question(question(&["Cat", "Dog"], Some(0)));
        project.output_file = "out.html".to_string();

        export_to_file(&project, &SuccessAudio::default(), &dest).unwrap();
        let html = fs::read_to_string(&dest).unwrap();

        assert_eq!(grid_count(&html), 1);
        assert_eq!(html.matches("<audio id=\"audio_").count(), 1);
        assert!(html.contains("<source src=\"data:audio/mpeg;base64,\" type=\"audio/mpeg\">"));
        assert!(html.contains("<div class=\"animal-name\">Cat (قطة)</div>"));
        assert!(html.contains("    1: 0,\n"));
        assert!(html.contains("    1: \"Cat\",\n"));
    }

    #[test]
    fn test_fill_template() {
        let filled = fill_template("a{{x}}b{{y}}c{{z", &[("x", "{{y}}"), ("y", "2")]);
        assert_eq!(filled, "a{{y}}b2c{{z");
    }
}
