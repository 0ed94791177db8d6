//! Terminal rendering of a review session.

use std::io::Write;

use anyhow::{Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use services::sessions::SessionPhaseKind;
use services::{AppServices, SessionPhase, SessionView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Choice(usize),
    Submit,
    Quit,
    Unknown,
}

/// Parse one line typed while a question is shown. Choices are 1-based.
fn parse_input(line: &str) -> Input {
    match line.trim() {
        "" => Input::Submit,
        "q" | "quit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n > 0 => Input::Choice(n - 1),
            _ => Input::Unknown,
        },
    }
}

async fn prompt(input: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

fn render_question(view: &SessionView<'_>) {
    let Some(question) = view.question else {
        return;
    };
    println!();
    match view.review_item {
        Some(item) => println!(
            "[{}] answered correctly {} time(s) so far",
            view.position_label(),
            item.correct_count
        ),
        None => println!("[{}]", view.position_label()),
    }
    println!("{}", question.text);
    for (i, choice) in question.choices.iter().enumerate() {
        let marker = if view.selected_answer == Some(i) { '*' } else { ' ' };
        println!(" {marker} {}) {choice}", i + 1);
    }
}

fn render_result(view: &SessionView<'_>) {
    let Some(question) = view.question else {
        return;
    };
    if view.is_correct == Some(true) {
        println!("Correct.");
    } else {
        println!("Incorrect.");
        if let Some(answer) = question.choices.get(question.correct_answer_index) {
            println!("Answer: {}) {answer}", question.correct_answer_index + 1);
        }
    }
    if let Some(explanation) = &question.explanation {
        println!("{explanation}");
    }
}

/// Drive one session from stdin until it ends or the learner quits.
pub(crate) async fn run(services: &AppServices) -> Result<()> {
    let review = services.review_loop();
    let mut session = review.start_session().await;
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut rendered: Option<usize> = None;

    loop {
        match session.phase().kind() {
            SessionPhaseKind::Loading => {
                review.load_current(&mut session).await;
                if session.phase().kind() == SessionPhaseKind::Loading {
                    bail!("review session stalled while loading");
                }
            }
            SessionPhaseKind::Presenting => {
                if rendered != Some(session.cursor()) {
                    render_question(&session.view());
                    rendered = Some(session.cursor());
                }
                let Some(line) = prompt(&mut input, "choice> ").await? else {
                    return Ok(());
                };
                match parse_input(&line) {
                    Input::Choice(index) => match session.select_answer(index) {
                        Ok(()) => println!("Selected {}. Enter to submit.", index + 1),
                        Err(err) => println!("{err}"),
                    },
                    Input::Submit => match review.submit_answer(&mut session).await {
                        Ok(_) => render_result(&session.view()),
                        Err(err) => println!("{err}"),
                    },
                    Input::Quit => return Ok(()),
                    Input::Unknown => println!("Type a choice number, Enter to submit, q to quit."),
                }
            }
            SessionPhaseKind::ShowingResult => {
                let text = if session.view().is_last() {
                    "Enter to finish> "
                } else {
                    "Enter for next, q to quit> "
                };
                let Some(line) = prompt(&mut input, text).await? else {
                    return Ok(());
                };
                if parse_input(&line) == Input::Quit {
                    return Ok(());
                }
                review.next(&mut session).await?;
            }
            SessionPhaseKind::Empty => {
                println!("Nothing to review. Answer some questions first.");
                return Ok(());
            }
            SessionPhaseKind::Complete => {
                if let SessionPhase::Complete {
                    skipped_to_end: true,
                } = session.phase()
                {
                    println!("Nothing left to review; the remaining questions are unavailable.");
                } else {
                    println!("Review complete.");
                }
                let progress = session.progress();
                println!(
                    "{} answered, {} correct ({}%)",
                    progress.answered,
                    progress.correct,
                    progress.accuracy_percent()
                );
                return Ok(());
            }
            SessionPhaseKind::Failed => {
                if let SessionPhase::Failed { message } = session.phase() {
                    bail!("{message}");
                }
                bail!("review session failed");
            }
        }
    }
}
