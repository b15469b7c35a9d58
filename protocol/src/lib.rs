//! JSON shapes of the game store surface.
//!
//! | call          | request               | response             |
//! |---------------|-----------------------|----------------------|
//! | create game   | [`CreateGameRequest`] | [`CreateGameResponse`] |
//! | record move   | [`StepRequest`]       | [`Ack`]              |
//! | fetch game    |                       | [`GameDetails`]      |
//! | list games    |                       | `Vec<GameSummary>`   |
//!
//! Failures are reported as [`ErrorBody`].

use sapper_core::{CellCount, Coord, GameStatus, Move, MoveResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persistence-assigned game identifier.
pub type GameId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Invalid JSON")]
    InvalidJson,
    #[error("Missing required fields")]
    MissingFields,
    #[error("Width and height must be positive")]
    InvalidDimensions,
    #[error("Invalid step data")]
    InvalidStepData,
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameRequest {
    pub player_name: String,
    pub width: Coord,
    pub height: Coord,
    pub mines_count: CellCount,
    pub mine_locations: Vec<CellCount>,
}

impl CreateGameRequest {
    /// Parses a request body. A body that is not a JSON object is invalid
    /// JSON; an object lacking a field or carrying one of the wrong type is
    /// missing fields. Mine indices and count are taken as given.
    pub fn from_json(body: &str) -> Result<Self> {
        let request: Self = decode_object(
            body,
            ProtocolError::InvalidJson,
            ProtocolError::MissingFields,
        )?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ProtocolError::InvalidDimensions);
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub id: GameId,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRequest {
    pub step_number: u32,
    pub row: Coord,
    pub col: Coord,
    pub result: MoveResult,
}

impl StepRequest {
    pub fn from_json(body: &str) -> Result<Self> {
        decode_object(
            body,
            ProtocolError::InvalidStepData,
            ProtocolError::InvalidStepData,
        )
    }
}

impl From<StepRequest> for Move {
    fn from(step: StepRequest) -> Self {
        Move::new(step.step_number, (step.row, step.col), step.result)
    }
}

impl From<Move> for StepRequest {
    fn from(mv: Move) -> Self {
        Self {
            step_number: mv.step_number,
            row: mv.row,
            col: mv.col,
            result: mv.result,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// One row of the game list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub date: String,
    pub player_name: String,
    pub width: Coord,
    pub height: Coord,
    pub mines_count: CellCount,
    pub status: GameStatus,
}

/// Everything needed to replay a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    #[serde(flatten)]
    pub summary: GameSummary,
    pub mine_locations: Vec<CellCount>,
    /// Ascending by step number.
    pub moves: Vec<Move>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new("Game not found")
    }
}

impl From<&ProtocolError> for ErrorBody {
    fn from(err: &ProtocolError) -> Self {
        Self::new(err.to_string())
    }
}

fn decode_object<T: DeserializeOwned>(
    body: &str,
    not_object: ProtocolError,
    bad_fields: ProtocolError,
) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|_| not_object.clone())?;
    if !value.is_object() {
        return Err(not_object);
    }
    serde_json::from_value(value).map_err(|_| bad_fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_parses_full_body() {
        let body = r#"{"player_name":"ann","width":3,"height":2,"mines_count":1,"mine_locations":[4]}"#;

        let request = CreateGameRequest::from_json(body).unwrap();

        assert_eq!(request.player_name, "ann");
        assert_eq!(request.mine_locations, vec![4]);
    }

    #[test]
    fn create_request_rejects_non_object() {
        assert_eq!(CreateGameRequest::from_json("[1,2]"), Err(ProtocolError::InvalidJson));
        assert_eq!(CreateGameRequest::from_json("{oops"), Err(ProtocolError::InvalidJson));
    }

    #[test]
    fn create_request_reports_missing_fields() {
        let body = r#"{"player_name":"ann","width":3,"height":2,"mines_count":1}"#;

        assert_eq!(CreateGameRequest::from_json(body), Err(ProtocolError::MissingFields));
    }

    #[test]
    fn create_request_rejects_zero_width() {
        let body = r#"{"player_name":"ann","width":0,"height":2,"mines_count":0,"mine_locations":[]}"#;

        assert_eq!(CreateGameRequest::from_json(body), Err(ProtocolError::InvalidDimensions));
    }

    #[test]
    fn step_request_rejects_unknown_result() {
        let body = r#"{"step_number":1,"row":0,"col":0,"result":"maybe"}"#;

        assert_eq!(StepRequest::from_json(body), Err(ProtocolError::InvalidStepData));
    }

    #[test]
    fn step_request_rejects_negative_row() {
        let body = r#"{"step_number":1,"row":-1,"col":0,"result":"ok"}"#;

        assert_eq!(StepRequest::from_json(body), Err(ProtocolError::InvalidStepData));
    }

    #[test]
    fn details_flatten_summary_fields() {
        let details = GameDetails {
            summary: GameSummary {
                id: 7,
                date: "2024-01-02 03:04:05".to_string(),
                player_name: "bo".to_string(),
                width: 2,
                height: 2,
                mines_count: 1,
                status: GameStatus::Lost,
            },
            mine_locations: vec![3],
            moves: vec![Move::new(1, (1, 1), MoveResult::Exploded)],
        };

        let value = serde_json::to_value(&details).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["status"], "lost");
        assert_eq!(value["moves"][0]["result"], "exploded");
        assert_eq!(serde_json::from_value::<GameDetails>(value).unwrap(), details);
    }

    #[test]
    fn error_body_uses_error_message() {
        let body = ErrorBody::from(&ProtocolError::InvalidStepData);

        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"error":"Invalid step data"}"#);
    }
}
