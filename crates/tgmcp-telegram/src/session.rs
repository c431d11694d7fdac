//! Session token codec.
//!
//! The token is the base64 form of the MTProto client's serialized session. It
//! is produced once by `tgmcp-session` and read from the environment afterwards.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use grammers_session::Session;

use tgmcp_core::{Error, Result};

pub fn encode_session(session: &Session) -> String {
    STANDARD.encode(session.save())
}

pub fn decode_session(token: &str) -> Result<Session> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| Error::Config(format!("session string is not valid base64: {e}")))?;
    Session::load(&bytes).map_err(|e| Error::Config(format!("session string is not a session: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_base64_tokens() {
        match decode_session("not a token!") {
            Err(Error::Config(_)) => {}
            Err(other) => panic!("expected a config error, got {other}"),
            Ok(_) => panic!("garbage decoded as a session"),
        }
    }

    #[test]
    fn fresh_session_survives_the_token_form() {
        let token = encode_session(&Session::new());
        assert!(!token.is_empty());
        assert!(decode_session(&format!("  {token}\n")).is_ok());
    }
}
