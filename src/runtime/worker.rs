//! Single-worker command queue around a [`Table`].
//!
//! The table lives on one dedicated thread that executes [`TableCommand`]s
//! strictly in submission order, one at a time. Nothing else touches the
//! table, so the deck, the hand in progress, and roster mutations need no
//! further locking. A hand that has started always runs to completion
//! before the next command, so a queued removal can never interrupt it.
//!
//! [`TableHandle`] is the cloneable sending side. Its plain methods block
//! the calling thread until the worker replies and must not be used from
//! inside a tokio runtime; the `*_async` methods are for that.
//!
//! An affinity-bound roster subscriber must not make blocking calls on a
//! handle: the worker is itself waiting for that subscriber to return.

use std::thread::{self, JoinHandle, ThreadId};

use log::{error, info};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::core::player::{Player, PlayerId};
use crate::roster::RosterEntry;
use crate::rules::{GameEngine, HandOutcome};
use crate::table::{Table, TableError};

/// Errors returned through a [`TableHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    /// The worker has stopped and can no longer run commands.
    #[error("table worker has shut down")]
    Closed,

    #[error(transparent)]
    Table(#[from] TableError),
}

type Reply<T> = oneshot::Sender<T>;
type TableJob = Box<dyn FnOnce(&mut Table) + Send + 'static>;

/// A unit of work for the table worker.
pub enum TableCommand {
    AddPlayer {
        player: Player,
        reply: Reply<Result<RosterEntry, TableError>>,
    },
    RemovePlayer {
        id: PlayerId,
        reply: Reply<bool>,
    },
    PlaceBet {
        id: PlayerId,
        bet: u32,
        reply: Reply<Result<bool, TableError>>,
    },
    ClearBet {
        id: PlayerId,
        reply: Reply<Result<(), TableError>>,
    },
    DealPlayer {
        id: PlayerId,
        delay_ms: u64,
        reply: Reply<Result<HandOutcome, TableError>>,
    },
    DealHouse {
        delay_ms: u64,
        reply: Reply<Result<HandOutcome, TableError>>,
    },
    DealAll {
        reply: Reply<Result<Vec<(PlayerId, HandOutcome)>, TableError>>,
    },
    Players {
        reply: Reply<Vec<Player>>,
    },
    HouseReady {
        reply: Reply<bool>,
    },
    /// Publish a status line; no reply.
    Status(String),
    /// Run arbitrary code against the table.
    With(TableJob),
    Shutdown,
}

impl std::fmt::Debug for TableCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableCommand::AddPlayer { .. } => "AddPlayer",
            TableCommand::RemovePlayer { .. } => "RemovePlayer",
            TableCommand::PlaceBet { .. } => "PlaceBet",
            TableCommand::ClearBet { .. } => "ClearBet",
            TableCommand::DealPlayer { .. } => "DealPlayer",
            TableCommand::DealHouse { .. } => "DealHouse",
            TableCommand::DealAll { .. } => "DealAll",
            TableCommand::Players { .. } => "Players",
            TableCommand::HouseReady { .. } => "HouseReady",
            TableCommand::Status(_) => "Status",
            TableCommand::With(_) => "With",
            TableCommand::Shutdown => "Shutdown",
        };
        f.write_str(name)
    }
}

/// Owns the worker thread. Dropping it stops the worker after the commands
/// already queued.
#[derive(Debug)]
pub struct TableWorker {
    handle: TableHandle,
    thread_id: ThreadId,
    join: Option<JoinHandle<()>>,
}

impl TableWorker {
    /// Move `table` onto a new worker thread.
    ///
    /// # Errors
    ///
    /// If the OS refuses to create the thread.
    pub fn spawn(table: Table) -> std::io::Result<Self> {
        let (sender, inbox) = mpsc::unbounded_channel();
        let join = thread::Builder::new()
            .name("table-worker".to_string())
            .spawn(move || run(table, inbox))?;

        Ok(Self {
            handle: TableHandle { sender },
            thread_id: join.thread().id(),
            join: Some(join),
        })
    }

    #[must_use]
    pub fn handle(&self) -> TableHandle {
        self.handle.clone()
    }

    /// Stop after the queued commands and wait for the thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.handle.sender.send(TableCommand::Shutdown);
        if let Some(join) = self.join.take() {
            if thread::current().id() != self.thread_id && join.join().is_err() {
                error!("Table worker terminated abnormally");
            }
        }
    }
}

impl Drop for TableWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(mut table: Table, mut inbox: mpsc::UnboundedReceiver<TableCommand>) {
    info!("Table worker started");
    while let Some(command) = inbox.blocking_recv() {
        if !execute(&mut table, command) {
            break;
        }
    }
    info!("Table worker stopped");
}

// Replies are best-effort: a caller that gave up waiting is not an error here.
fn execute(table: &mut Table, command: TableCommand) -> bool {
    match command {
        TableCommand::AddPlayer { player, reply } => {
            let _ = reply.send(table.add_player(player));
        }
        TableCommand::RemovePlayer { id, reply } => {
            let _ = reply.send(table.remove_player(&id));
        }
        TableCommand::PlaceBet { id, bet, reply } => {
            let _ = reply.send(table.place_bet(&id, bet));
        }
        TableCommand::ClearBet { id, reply } => {
            let _ = reply.send(table.clear_bet(&id));
        }
        TableCommand::DealPlayer { id, delay_ms, reply } => {
            let _ = reply.send(table.deal_player(&id, delay_ms));
        }
        TableCommand::DealHouse { delay_ms, reply } => {
            let _ = reply.send(table.deal_house(delay_ms));
        }
        TableCommand::DealAll { reply } => {
            let _ = reply.send(table.deal_all());
        }
        TableCommand::Players { reply } => {
            let _ = reply.send(table.engine().all_players().into_iter().cloned().collect());
        }
        TableCommand::HouseReady { reply } => {
            let _ = reply.send(table.house_ready());
        }
        TableCommand::Status(message) => table.publish_status(&message),
        TableCommand::With(job) => job(table),
        TableCommand::Shutdown => return false,
    }
    true
}

/// Cloneable front for a [`TableWorker`].
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::UnboundedSender<TableCommand>,
}

impl TableHandle {
    fn request<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> TableCommand,
    ) -> Result<oneshot::Receiver<T>, WorkerError> {
        let (reply, response) = oneshot::channel();
        self.sender.send(make(reply)).map_err(|_| WorkerError::Closed)?;
        Ok(response)
    }

    fn call<T>(&self, make: impl FnOnce(Reply<T>) -> TableCommand) -> Result<T, WorkerError> {
        self.request(make)?.blocking_recv().map_err(|_| {
            error!("Table worker dropped a reply");
            WorkerError::Closed
        })
    }

    async fn call_async<T>(&self, make: impl FnOnce(Reply<T>) -> TableCommand) -> Result<T, WorkerError> {
        self.request(make)?.await.map_err(|_| {
            error!("Table worker dropped a reply");
            WorkerError::Closed
        })
    }

    /// Whether the worker is still accepting commands.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; table errors from `Table::add_player`.
    pub fn add_player(&self, player: Player) -> Result<RosterEntry, WorkerError> {
        Ok(self.call(|reply| TableCommand::AddPlayer { player, reply })??)
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub fn remove_player(&self, id: &PlayerId) -> Result<bool, WorkerError> {
        let id = id.clone();
        self.call(|reply| TableCommand::RemovePlayer { id, reply })
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; an unknown player.
    pub fn place_bet(&self, id: &PlayerId, bet: u32) -> Result<bool, WorkerError> {
        let id = id.clone();
        Ok(self.call(|reply| TableCommand::PlaceBet { id, bet, reply })??)
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; an unknown player.
    pub fn clear_bet(&self, id: &PlayerId) -> Result<(), WorkerError> {
        let id = id.clone();
        Ok(self.call(|reply| TableCommand::ClearBet { id, reply })??)
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; an unknown player or bad delay.
    pub fn deal_player(&self, id: &PlayerId, delay_ms: u64) -> Result<HandOutcome, WorkerError> {
        let id = id.clone();
        Ok(self.call(|reply| TableCommand::DealPlayer { id, delay_ms, reply })??)
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; a bad delay.
    pub fn deal_house(&self, delay_ms: u64) -> Result<HandOutcome, WorkerError> {
        Ok(self.call(|reply| TableCommand::DealHouse { delay_ms, reply })??)
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; a bad delay.
    pub async fn deal_house_async(&self, delay_ms: u64) -> Result<HandOutcome, WorkerError> {
        Ok(self
            .call_async(|reply| TableCommand::DealHouse { delay_ms, reply })
            .await??)
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown; the first dealing error.
    pub fn deal_all(&self) -> Result<Vec<(PlayerId, HandOutcome)>, WorkerError> {
        Ok(self.call(|reply| TableCommand::DealAll { reply })??)
    }

    /// Copies of all players in id order.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub fn players(&self) -> Result<Vec<Player>, WorkerError> {
        self.call(|reply| TableCommand::Players { reply })
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub fn house_ready(&self) -> Result<bool, WorkerError> {
        self.call(|reply| TableCommand::HouseReady { reply })
    }

    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub async fn house_ready_async(&self) -> Result<bool, WorkerError> {
        self.call_async(|reply| TableCommand::HouseReady { reply }).await
    }

    /// Queue a status line without waiting.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub fn post_status(&self, message: impl Into<String>) -> Result<(), WorkerError> {
        self.sender
            .send(TableCommand::Status(message.into()))
            .map_err(|_| WorkerError::Closed)
    }

    /// Run `f` on the worker with exclusive access to the table.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub fn with<R, F>(&self, f: F) -> Result<R, WorkerError>
    where
        R: Send + 'static,
        F: FnOnce(&mut Table) -> R + Send + 'static,
    {
        self.call(|reply| {
            TableCommand::With(Box::new(move |table: &mut Table| {
                let _ = reply.send(f(table));
            }))
        })
    }

    /// Async form of [`TableHandle::with`].
    ///
    /// # Errors
    ///
    /// [`WorkerError::Closed`] after shutdown.
    pub async fn with_async<R, F>(&self, f: F) -> Result<R, WorkerError>
    where
        R: Send + 'static,
        F: FnOnce(&mut Table) -> R + Send + 'static,
    {
        self.call_async(|reply| {
            TableCommand::With(Box::new(move |table: &mut Table| {
                let _ = reply.send(f(table));
            }))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TableConfig;

    fn worker() -> TableWorker {
        TableWorker::spawn(Table::new(TableConfig::default().with_seed(9)).unwrap()).unwrap()
    }

    #[test]
    fn test_commands_round_trip() {
        let worker = worker();
        let handle = worker.handle();
        let entry = handle.add_player(Player::new("1", "The Shark", 1000)).unwrap();
        assert_eq!(entry.index(), Ok(1));

        let shark = PlayerId::new("1");
        assert!(handle.place_bet(&shark, 100).unwrap());
        handle.deal_player(&shark, 0).unwrap();
        assert!(handle.house_ready().unwrap());
        handle.deal_house(0).unwrap();

        let players = handle.players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].bet(), 0);
    }

    #[test]
    fn test_errors_come_back_through_the_handle() {
        let worker = worker();
        let handle = worker.handle();
        let err = handle.deal_house(5000).unwrap_err();
        assert!(matches!(err, WorkerError::Table(TableError::Engine(_))));
    }

    #[test]
    fn test_closed_after_shutdown() {
        let worker = worker();
        let handle = worker.handle();
        worker.shutdown();
        assert!(!handle.is_open());
        assert_eq!(handle.house_ready(), Err(WorkerError::Closed));
    }

    #[test]
    fn test_with_runs_on_worker_thread() {
        let worker = worker();
        let name = worker
            .handle()
            .with(|_| thread::current().name().map(str::to_string))
            .unwrap();
        assert_eq!(name.as_deref(), Some("table-worker"));
    }
}
