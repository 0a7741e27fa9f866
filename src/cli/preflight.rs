//! Pre-flight checks before talking to upstream services.
//!
//! The API key is the one required secret; every command that reaches the
//! network refuses to start without it.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::session::SessionController;

/// Check that the API key is configured and return it.
pub fn check(settings: &Settings) -> Result<String> {
    settings.api_key()
}

/// Run pre-flight checks and build the session controller.
///
/// Prints a hint and returns the error when a check fails.
pub fn start_controller(settings: Settings) -> Result<SessionController> {
    let api_key = match check(&settings) {
        Ok(key) => key,
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("The API key can also be placed in a .env file in the working directory.");
            return Err(e);
        }
    };

    SessionController::new(settings, &api_key)
}
