//! One-shot login for the MCP server.
//!
//! Prompts for phone number, login code and (if enabled) the two-factor
//! password, then prints `TELEGRAM_SESSION_STRING=<token>` on stdout. Prompts
//! and logs go to stderr so stdout can be appended to `.env` directly.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context};
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use grammers_session::Session;
use tgmcp_core::config::{Config, ENV_SESSION_STRING};
use tgmcp_telegram::session::encode_session;

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<String> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("no answer for {label:?}"),
        ));
    }
    Ok(line.trim().to_string())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    Ok(ask(&mut io::stdin().lock(), &mut io::stderr(), label)?)
}

fn parse_api_id(raw: &str) -> anyhow::Result<i32> {
    raw.trim()
        .parse()
        .with_context(|| format!("API id must be a number, got {raw:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tgmcp_core::logging::init("tgmcp-session")?;

    let cfg = Config::load();
    let api_id = match cfg.api_id {
        Some(id) => id,
        None => parse_api_id(&prompt("API id: ")?)?,
    };
    let api_hash = match cfg.api_hash {
        Some(hash) => hash,
        None => prompt("API hash: ")?,
    };

    let client = Client::connect(ClientConfig {
        session: Session::new(),
        api_id,
        api_hash,
        params: InitParams::default(),
    })
    .await
    .map_err(|e| anyhow!("failed to connect to Telegram: {e}"))?;

    let authorized = client
        .is_authorized()
        .await
        .map_err(|e| anyhow!("authorization check failed: {e}"))?;

    if !authorized {
        let phone = prompt("Phone number (with country code, e.g. +351...): ")?;
        let token = client
            .request_login_code(&phone)
            .await
            .map_err(|e| anyhow!("could not request a login code: {e}"))?;
        let code = prompt("Login code: ")?;

        match client.sign_in(&token, &code).await {
            Ok(_) => {}
            Err(SignInError::PasswordRequired(password_token)) => {
                let label = match password_token.hint() {
                    Some(hint) => format!("Two-factor password (hint: {hint}): "),
                    None => "Two-factor password: ".to_string(),
                };
                let password = prompt(&label)?;
                client
                    .check_password(password_token, password.as_bytes())
                    .await
                    .map_err(|e| anyhow!("two-factor check failed: {e}"))?;
            }
            Err(e) => return Err(anyhow!("sign-in failed: {e}")),
        }
    }

    tracing::info!("Session created; add the line below to .env");
    println!("{ENV_SESSION_STRING}={}", encode_session(client.session()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_writes_label_and_trims_answer() {
        let mut input = io::Cursor::new("  +351 123\n");
        let mut out = Vec::new();
        let answer = ask(&mut input, &mut out, "Phone: ").unwrap();
        assert_eq!(answer, "+351 123");
        assert_eq!(out, b"Phone: ");
    }

    #[test]
    fn ask_fails_on_closed_input() {
        let mut input = io::Cursor::new("");
        let err = ask(&mut input, &mut Vec::new(), "Code: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn api_id_must_be_numeric() {
        assert_eq!(parse_api_id(" 12345 ").unwrap(), 12345);
        assert!(parse_api_id("abc").is_err());
    }
}
