//! Read-side projections of xo game state.
//!
//! Every refresh produces a fresh snapshot that replaces the previous one in a
//! `watch` cell. Observers either read the latest value or subscribe for
//! changes.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use crate::{
    addressing, codec,
    error::{AppError, Result},
    gateway::LedgerGateway,
    models::Game,
};

/// All games known to the ledger, sorted by case-insensitive name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameListSnapshot {
    pub games: Vec<Game>,
    /// `None` until the first successful refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl GameListSnapshot {
    pub fn find(&self, name: &str) -> Option<&Game> {
        self.games.iter().find(|game| game.name == name)
    }
}

pub struct GameProjector {
    gateway_tx: watch::Sender<Arc<dyn LedgerGateway>>,
    games_tx: watch::Sender<GameListSnapshot>,
    focus_tx: watch::Sender<Option<Game>>,
}

impl GameProjector {
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        let (games_tx, _) = watch::channel(GameListSnapshot::default());
        let (focus_tx, _) = watch::channel(None);
        let (gateway_tx, _) = watch::channel(gateway);
        Self {
            gateway_tx,
            games_tx,
            focus_tx,
        }
    }

    /// Point subsequent refreshes at another gateway. Published projections
    /// are kept until the next refresh replaces them.
    pub fn replace_gateway(&self, gateway: Arc<dyn LedgerGateway>) {
        self.gateway_tx.send_replace(gateway);
    }

    fn gateway(&self) -> Arc<dyn LedgerGateway> {
        self.gateway_tx.borrow().clone()
    }

    /// Reloads every game under the namespace prefix. A single undecodable
    /// entry fails the whole refresh and leaves the published list untouched.
    pub async fn refresh_all(&self) -> Result<GameListSnapshot> {
        let entries = self
            .gateway()
            .fetch_state(&addressing::namespace_prefix())
            .await?;

        let mut games = entries
            .iter()
            .map(|entry| {
                codec::decode_game_record(&entry.data).map_err(|e| {
                    tracing::warn!("Undecodable game record at {}: {}", entry.address, e);
                    e
                })
            })
            .collect::<Result<Vec<_>>>()?;
        games.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        let snapshot = GameListSnapshot {
            games,
            refreshed_at: Some(Utc::now()),
        };
        tracing::debug!("Game list refreshed: {} games", snapshot.games.len());
        self.games_tx.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Reloads a single game into the focus cell. Zero entries at the game's
    /// address is `NotFound` and keeps the previous focus.
    pub async fn refresh_one(&self, name: &str) -> Result<Game> {
        let address = addressing::record_address(name);
        let entries = self.gateway().fetch_state(&address).await?;

        let entry = entries
            .first()
            .ok_or_else(|| AppError::NotFound(format!("Game {name:?} not found at {address}")))?;
        let game = codec::decode_game_record(&entry.data)?;

        self.focus_tx.send_replace(Some(game.clone()));
        Ok(game)
    }

    pub fn subscribe_games(&self) -> watch::Receiver<GameListSnapshot> {
        self.games_tx.subscribe()
    }

    pub fn subscribe_focus(&self) -> watch::Receiver<Option<Game>> {
        self.focus_tx.subscribe()
    }

    pub fn games(&self) -> GameListSnapshot {
        self.games_tx.borrow().clone()
    }

    pub fn focused(&self) -> Option<Game> {
        self.focus_tx.borrow().clone()
    }

    /// Calls `refresh_all` on a timer until the returned handle is aborted.
    pub fn spawn_polling(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        // tokio panics on a zero period
        let period = period.max(Duration::from_millis(100));
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                if let Err(e) = self.refresh_all().await {
                    tracing::warn!("Game list refresh failed: {}", e);
                }
            }
        })
    }
}
