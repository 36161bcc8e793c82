//! Client core for the xo tic-tac-toe transaction family: address derivation,
//! payload and state codecs, secp256k1 signing, batch construction, REST
//! gateway access and read-side game projections.

pub mod addressing;
pub mod builder;
pub mod codec;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod gateway;
pub mod models;
pub mod projector;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use gateway::{LedgerGateway, RestApiClient, RetryPolicy, RetryingGateway};
pub use projector::{GameListSnapshot, GameProjector};
pub use services::{SubmissionOutcome, XoClient};
