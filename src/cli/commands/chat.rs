//! Interactive terminal session.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::session::{ProcessStage, SessionController, SessionState};
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    History,
    Help,
    Process(&'a str),
    Question(&'a str),
    Empty,
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();

    if line.is_empty() {
        return Input::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }
    if line == "/history" {
        return Input::History;
    }
    if line == "/help" {
        return Input::Help;
    }
    if let Some(rest) = line
        .strip_prefix("/video")
        .or_else(|| line.strip_prefix("/process"))
    {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return Input::Process(rest.trim());
        }
    }

    Input::Question(line)
}

fn print_help() {
    println!(
        "{}\n",
        style(
            "Type '/video <id or url>' to process a video, then ask questions.\n\
             '/history' shows the conversation, 'exit' quits."
        )
        .dim()
    );
}

/// Run the interactive chat command.
pub async fn run_chat(video: Option<String>, settings: Settings) -> Result<()> {
    let controller = preflight::start_controller(settings)?;
    let mut session = SessionState::new();
    debug!(session = %session.id(), "Started terminal session");

    println!("\n{}", style("YouTube Video Q&A").bold().cyan());
    print_help();

    if let Some(video) = video {
        process(&controller, &mut session, &video).await;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("🧑 You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => {
                Output::info("Goodbye!");
                break;
            }
            Input::Help => print_help(),
            Input::History => {
                Output::header("Chat History");
                for entry in session.history().entries() {
                    Output::chat_entry(entry);
                }
                println!();
            }
            Input::Process(video) => process(&controller, &mut session, video).await,
            Input::Question(question) => ask(&controller, &mut session, question).await,
        }
    }

    Ok(())
}

async fn process(controller: &SessionController, session: &mut SessionState, video: &str) {
    let spinner = Output::spinner(&ProcessStage::FetchingTranscript.to_string());
    let result = controller
        .process_video_with_progress(session, video, |stage| {
            spinner.set_message(stage.to_string())
        })
        .await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            Output::success(&ProcessStage::Done.to_string());
            Output::kv("Video", &result.video_id);
            Output::kv(
                "Language",
                &if result.is_generated {
                    format!("{} (auto-generated)", result.language_code)
                } else {
                    result.language_code.clone()
                },
            );
            Output::kv("Duration", &format_duration(result.duration_seconds));
            Output::kv(
                "Segments",
                &format!(
                    "{} from {} characters",
                    result.segments_indexed, result.transcript_chars
                ),
            );
            println!();
        }
        Err(e) => Output::error(&e.user_message()),
    }
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

async fn ask(controller: &SessionController, session: &mut SessionState, question: &str) {
    let spinner = Output::spinner("Generating answer...");
    let result = controller.answer_question(session, question).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            print!("{}", style("🤖 Assistant:").cyan().bold());
            Output::answer(&response);
        }
        Err(e) => Output::error(&e.user_message()),
    }
}
