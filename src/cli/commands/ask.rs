//! Ask command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::AnswerSource;
use crate::session::{ProcessStage, SessionState};
use anyhow::Result;

/// Process a video and answer one question about it.
pub async fn run_ask(
    video: &str,
    question: &str,
    model: Option<String>,
    top_k: Option<usize>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(model) = model {
        settings.rag.model = model;
    }
    if let Some(top_k) = top_k {
        settings.rag.top_k = top_k;
    }
    settings.validate()?;

    let controller = preflight::start_controller(settings)?;
    let mut session = SessionState::new();

    let spinner = Output::spinner(&ProcessStage::FetchingTranscript.to_string());
    let processed = controller
        .process_video_with_progress(&mut session, video, |stage| {
            spinner.set_message(stage.to_string())
        })
        .await;
    spinner.finish_and_clear();

    match processed {
        Ok(result) => Output::success(&format!(
            "{} ({} segments)",
            ProcessStage::Done,
            result.segments_indexed
        )),
        Err(e) => {
            Output::error(&e.user_message());
            return Err(e.into());
        }
    }

    let spinner = Output::spinner("Generating answer...");
    let answered = controller.answer_question(&mut session, question).await;
    spinner.finish_and_clear();

    match answered {
        Ok(response) => {
            Output::answer(&response);

            if response.source == AnswerSource::Transcript {
                Output::header("Segments");
                Output::sources(&response);
                println!();
            }
        }
        Err(e) => {
            Output::error(&e.user_message());
            return Err(e.into());
        }
    }

    Ok(())
}
