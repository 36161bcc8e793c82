//! Flat comma-joined payload and state formats of the xo family.
//!
//! Values are not escaped, so a separator inside a field would shift every
//! following field. Encoding refuses such values; decoding reports them as
//! malformed state.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    constants::{FIELD_SEPARATOR, GAME_RECORD_FIELDS, NULL_ARGUMENT},
    error::{AppError, Result},
    models::Game,
};

fn ensure_no_separator(field: &str, value: &str) -> Result<()> {
    if value.contains(FIELD_SEPARATOR) {
        return Err(AppError::BadRequest(format!(
            "{} may not contain '{}': {:?}",
            field, FIELD_SEPARATOR, value
        )));
    }
    Ok(())
}

/// `"<game>,<action>,<argument>"` as UTF-8. A missing argument is written as `null`.
pub fn encode_payload(game_name: &str, action: &str, argument: Option<&str>) -> Result<Vec<u8>> {
    ensure_no_separator("game name", game_name)?;
    ensure_no_separator("action", action)?;
    let argument = argument.unwrap_or(NULL_ARGUMENT);
    ensure_no_separator("argument", argument)?;

    Ok(format!("{game_name},{action},{argument}").into_bytes())
}

/// Base64 state value as served by the gateway.
pub fn encode_game_record(game: &Game) -> String {
    let joined = [
        game.name.as_str(),
        game.board.as_str(),
        game.game_state.as_str(),
        game.player1.as_str(),
        game.player2.as_str(),
    ]
    .join(",");
    STANDARD.encode(joined)
}

pub fn decode_game_record(data: &str) -> Result<Game> {
    let raw = STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::MalformedState(format!("state is not base64: {}", e)))?;
    let text = String::from_utf8(raw)
        .map_err(|e| AppError::MalformedState(format!("state is not UTF-8: {}", e)))?;

    let fields: Vec<&str> = text.split(FIELD_SEPARATOR).collect();
    if fields.len() != GAME_RECORD_FIELDS {
        return Err(AppError::MalformedState(format!(
            "expected {} fields, found {} in {:?}",
            GAME_RECORD_FIELDS,
            fields.len(),
            text
        )));
    }

    Ok(Game {
        name: fields[0].to_string(),
        board: fields[1].to_string(),
        game_state: fields[2].parse()?,
        player1: fields[3].to_string(),
        player2: fields[4].to_string(),
    })
}
