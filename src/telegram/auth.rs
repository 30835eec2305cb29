//! Interactive login flow for the `login` subcommand. Walks the phone,
//! code, and optional two-factor password steps on the terminal, then
//! persists the authorized session for later headless runs.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Context;
use grammers_client::SignInError;

use crate::infra::config::TelegramConfig;
use crate::telegram::TelegramBridge;

pub async fn login(config: &TelegramConfig, session_path: &Path) -> anyhow::Result<()> {
    let bridge = TelegramBridge::connect(config, session_path).await?;

    if bridge.is_authorized().await? {
        println!("Session is already authorized; nothing to do.");
        return Ok(());
    }

    let client = bridge.client();

    let phone = prompt_nonempty("Phone number (international format): ")?;
    let token = client
        .request_login_code(&phone)
        .await
        .context("failed to request login code")?;

    let code = prompt_nonempty("Login code: ")?;

    match client.sign_in(&token, &code).await {
        Ok(_) => {}
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or_default().to_owned();
            let prompt = if hint.is_empty() {
                "Two-factor password: ".to_owned()
            } else {
                format!("Two-factor password (hint: {hint}): ")
            };
            let password = rpassword::prompt_password(prompt)?;
            client
                .check_password(password_token, password.trim())
                .await
                .context("password verification failed")?;
        }
        Err(error) => return Err(error).context("sign-in failed"),
    }

    client
        .session()
        .save_to_file(session_path)
        .with_context(|| format!("failed to persist session at {}", session_path.display()))?;

    println!("Login successful. The session is stored; start the server with `tgbridge serve`.");

    Ok(())
}

/// Reads one line from stdin, re-prompting until it is non-empty.
fn prompt_nonempty(prompt: &str) -> anyhow::Result<String> {
    let stdin = io::stdin();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_owned());
        }
    }
}
