//! Handlers for `login`, `logout` and `whoami`.

use dialoguer::{Input, Password};
use serde_json::json;

use crate::adapter::inbound::cli::command::LoginArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::App;

/// Execute `login`, prompting for whatever was not passed as a flag.
pub async fn execute_login(app: &App, args: LoginArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?,
    };

    let pb = output::spinner("Signing in...");
    let profile = match app.account().login(&email, &password).await {
        Ok(profile) => profile,
        Err(err) => {
            output::spinner_fail(&pb);
            return Err(err);
        }
    };
    output::spinner_success(&pb, "Signed in");

    if output::is_json() {
        output::json_output(json!({
            "command": "login",
            "status": "ok",
            "profile": profile,
        }));
        return Ok(());
    }

    if let Some(name) = profile.as_ref().and_then(|p| p.display_name()) {
        output::field("User", name);
    }
    output::field("Email", email.trim());
    Ok(())
}

/// Execute `logout`.
pub async fn execute_logout(app: &App) -> Result<()> {
    let was_logged_in = app.session().is_logged_in();
    app.account().logout().await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "logout",
            "status": "ok",
            "was_logged_in": was_logged_in,
        }));
        return Ok(());
    }

    if was_logged_in {
        output::success("Signed out");
    } else {
        output::note("No active session");
    }
    Ok(())
}

/// Execute `whoami` from the stored session; no request is made.
pub fn execute_whoami(app: &App) {
    let state = app.session().state();

    if output::is_json() {
        output::json_output(json!({
            "command": "whoami",
            "logged_in": state.logged_in,
            "profile": state.profile,
        }));
        return;
    }

    if !state.logged_in {
        output::warning("Not logged in");
        output::hint("run `juspredict login`");
        return;
    }

    let profile = state.profile.unwrap_or_default();
    output::field(
        "User",
        profile.display_name().unwrap_or_else(|| "(unknown)".into()),
    );
    if let Some(email) = profile.email {
        output::field("Email", email);
    }
    if let Some(status) = profile.user_status {
        output::field("Status", output::muted(status));
    }
}
