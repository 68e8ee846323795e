use crate::{
    commands::Command,
    coordinator,
    games::{self, Table},
    platform::{Inbound, Platform, Target},
};
use commonware_runtime::{Clock, Handle, Metrics, Spawner};
use futures::{Stream, StreamExt};
use naocoin_execution::{
    casino::{highlow::HighLow, limited_rps::LimitedRps, GameError},
    roll_xp, EconomyError, Ledger, State,
};
use naocoin_types::{
    casino::{required_xp, GameType, Progress, WORK_REWARD},
    UserId,
};
use prometheus_client::metrics::counter::Counter;
use rand::Rng;
use std::{
    sync::Arc,
    time::{Duration, UNIX_EPOCH},
};
use tracing::{debug, info, warn};

/// Configuration for the [Engine].
pub struct Config<P: Platform, S: State> {
    pub platform: P,
    pub ledger: Arc<Ledger<S>>,
    pub mailbox_size: usize,
    pub command_prefix: String,
    pub response_timeout: Duration,
}

/// The engine that routes platform messages to progression, waiting games
/// and commands.
pub struct Engine<E: Spawner + Clock + Metrics + Rng, P: Platform, S: State> {
    context: E,

    coordinator: coordinator::Actor<E>,
    router: Router<E, P, S>,
}

impl<E: Spawner + Clock + Metrics + Rng, P: Platform, S: State> Engine<E, P, S> {
    /// Create a new [Engine].
    pub fn new(context: E, cfg: Config<P, S>) -> Self {
        // Create the coordinator
        let (coordinator, coordinator_mailbox) = coordinator::Actor::new(
            context.with_label("coordinator"),
            coordinator::Config {
                mailbox_size: cfg.mailbox_size,
            },
        );

        // Create the router
        let router = Router::new(
            context.with_label("router"),
            cfg.platform,
            cfg.ledger,
            coordinator_mailbox,
            cfg.command_prefix,
            cfg.response_timeout,
        );

        Self {
            context,
            coordinator,
            router,
        }
    }

    /// Start processing `inbound` messages until the stream ends.
    pub fn start(self, inbound: impl Stream<Item = Inbound> + Send + Unpin + 'static) -> Handle<()> {
        self.context.clone().spawn(|_| self.run(inbound))
    }

    async fn run(self, mut inbound: impl Stream<Item = Inbound> + Send + Unpin + 'static) {
        // Start the coordinator before any message can wait on it
        let coordinator_handle = self.coordinator.start();

        let mut router = self.router;
        while let Some(message) = inbound.next().await {
            router.handle(message).await;
        }
        info!("inbound stream closed");
        coordinator_handle.abort();
    }
}

struct Router<E: Spawner + Clock + Metrics + Rng, P: Platform, S: State> {
    context: E,
    platform: P,
    ledger: Arc<Ledger<S>>,
    coordinator: coordinator::Mailbox,
    command_prefix: String,
    response_timeout: Duration,

    observed: Counter,
    commands: Counter,
    games_started: Counter,
    games_settled: Counter,
}

impl<E: Spawner + Clock + Metrics + Rng, P: Platform, S: State> Router<E, P, S> {
    fn new(
        context: E,
        platform: P,
        ledger: Arc<Ledger<S>>,
        coordinator: coordinator::Mailbox,
        command_prefix: String,
        response_timeout: Duration,
    ) -> Self {
        let observed = Counter::default();
        let commands = Counter::default();
        let games_started = Counter::default();
        let games_settled = Counter::default();
        context.register(
            "observed",
            "Number of user messages credited with xp",
            observed.clone(),
        );
        context.register("commands", "Number of commands handled", commands.clone());
        context.register(
            "games_started",
            "Number of games started",
            games_started.clone(),
        );
        context.register(
            "games_settled",
            "Number of games settled on the ledger",
            games_settled.clone(),
        );
        Self {
            context,
            platform,
            ledger,
            coordinator,
            command_prefix,
            response_timeout,
            observed,
            commands,
            games_started,
            games_settled,
        }
    }

    async fn handle(&mut self, message: Inbound) {
        if message.is_bot {
            return;
        }

        // Progression runs for every message, commands included
        self.observed.inc();
        let gain = roll_xp(&mut self.context);
        match self.ledger.observe(message.author, gain).await {
            Ok(Progress::LeveledUp { level, .. }) => {
                info!(user = message.author, level, "leveled up");
            }
            Ok(Progress::Gained { .. }) => {}
            Err(e) => warn!(?e, user = message.author, "failed to record activity"),
        }

        // A waiting game gets the message before command handling
        match self.coordinator.deliver(message.clone()).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => warn!(?e, "failed to deliver message to coordinator"),
        }

        let Some(command) = Command::parse(&self.command_prefix, &message.content) else {
            return;
        };
        self.commands.inc();
        let reply = Target::reply(&message);
        let command = match command {
            Ok(command) => command,
            Err(usage) => {
                self.send(reply, format!("Usage: {}{}", self.command_prefix, usage.0))
                    .await;
                return;
            }
        };
        debug!(user = message.author, ?command, "handling command");
        match command {
            Command::Rank(target) => self.rank(&message, reply, target).await,
            Command::Work => self.work(&message, reply).await,
            Command::Give { target, amount } => self.give(&message, reply, &target, amount).await,
            Command::Play { game, bet } => self.play(&message, reply, game, bet).await,
        }
    }

    async fn send(&self, target: Target, text: String) {
        if let Err(e) = self.platform.send(target, text).await {
            warn!(?e, ?target, "failed to send message");
        }
    }

    fn resolve(&self, mention: &str) -> Option<UserId> {
        self.platform.resolve_mention(mention)
    }

    fn now(&self) -> u64 {
        self.context
            .current()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    async fn rank(&self, message: &Inbound, reply: Target, target: Option<String>) {
        let user = match target {
            None => message.author,
            Some(mention) => match self.resolve(&mention) {
                Some(user) => user,
                None => {
                    self.send(reply, format!("Unknown user: {mention}")).await;
                    return;
                }
            },
        };
        let name = self.platform.display_name(user);
        let text = match self.ledger.get(user).await {
            None => format!("{name} has no level yet."),
            Some(account) => format!(
                "{name}'s rank card\nLevel: {}\nXP: {}/{}\nCoins: {}",
                account.level,
                account.xp,
                required_xp(account.level),
                account.coins
            ),
        };
        self.send(reply, text).await;
    }

    async fn work(&self, message: &Inbound, reply: Target) {
        let mention = self.platform.mention(message.author);
        let text = match self.ledger.claim_work(message.author, self.now()).await {
            Ok(balance) => format!(
                "{mention}, thanks for your hard work! You earned {WORK_REWARD} coins. Balance: {balance}."
            ),
            Err(EconomyError::CooldownActive(cooldown)) => {
                format!("{mention}, you are still cooling down. You can work again in {cooldown}.")
            }
            Err(e) => {
                warn!(?e, user = message.author, "failed to claim work");
                "Something went wrong, please try again.".to_string()
            }
        };
        self.send(reply, text).await;
    }

    async fn give(&self, message: &Inbound, reply: Target, target: &str, amount: i64) {
        let Some(receiver) = self.resolve(target) else {
            self.send(reply, format!("Unknown user: {target}")).await;
            return;
        };
        let giver = self.platform.mention(message.author);
        let text = match self.ledger.transfer(message.author, receiver, amount).await {
            Ok(_) => format!(
                "{giver} gave {} {amount} coins.",
                self.platform.mention(receiver)
            ),
            Err(EconomyError::InvalidAmount) => "Amount must be a positive integer.".to_string(),
            Err(EconomyError::InsufficientFunds { balance, .. }) => {
                format!("{giver}, you don't have enough coins (balance: {balance}).")
            }
            Err(e) => {
                warn!(?e, from = message.author, to = receiver, "failed to transfer");
                "Something went wrong, please try again.".to_string()
            }
        };
        self.send(reply, text).await;
    }

    async fn play(&mut self, message: &Inbound, reply: Target, game: GameType, bet: i64) {
        if message.is_direct {
            self.send(reply, "Games can only be started in a channel.".to_string())
                .await;
            return;
        }
        let player = message.author;
        let channel = message.channel;
        let balance = self.ledger.balance(player).await;

        // Validate the wager before claiming the channel
        let started = match game {
            GameType::HighLow => {
                HighLow::start(player, bet, balance, &mut self.context).map(Started::HighLow)
            }
            GameType::LimitedRps => LimitedRps::open(player, bet, balance).map(Started::LimitedRps),
        };
        let started = match started {
            Ok(started) => started,
            Err(e) => {
                self.send(reply, self.rejection(player, &e)).await;
                return;
            }
        };
        match self.coordinator.open(channel, game).await {
            Ok(true) => {}
            Ok(false) => {
                self.send(reply, "A game is already running in this channel.".to_string())
                    .await;
                return;
            }
            Err(e) => {
                warn!(?e, channel, "failed to open session");
                return;
            }
        }

        self.games_started.inc();
        let table = Table {
            platform: self.platform.clone(),
            ledger: self.ledger.clone(),
            coordinator: self.coordinator.clone(),
            channel,
            timeout: self.response_timeout,
            prefix: self.command_prefix.clone(),
            settled: self.games_settled.clone(),
        };
        match started {
            Started::HighLow(game) => {
                self.context
                    .with_label("highlow")
                    .spawn(move |mut context| async move {
                        games::highlow::play(&mut context, table, game).await;
                    });
            }
            Started::LimitedRps(game) => {
                self.context
                    .with_label("limited_rps")
                    .spawn(move |context| async move {
                        games::limited_rps::play(&context, table, game).await;
                    });
            }
        }
    }

    fn rejection(&self, player: UserId, error: &GameError) -> String {
        match error {
            GameError::InvalidBet => "Bet must be a positive integer.".to_string(),
            GameError::InsufficientFunds { balance, required } => format!(
                "{}, you don't have enough coins (balance: {balance}, bet: {required}).",
                self.platform.mention(player)
            ),
            other => other.to_string(),
        }
    }
}

enum Started {
    HighLow(HighLow),
    LimitedRps(LimitedRps),
}
