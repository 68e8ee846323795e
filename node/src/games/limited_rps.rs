use super::Table;
use crate::{
    coordinator::{Accept, Author, Filter, Scope, WaitError},
    platform::{Platform, Target},
};
use commonware_runtime::Clock;
use naocoin_execution::{
    casino::limited_rps::{Exchange, LimitedRps},
    Settled, State,
};
use naocoin_types::{
    casino::{Move, JOIN_TOKEN},
    UserId,
};
use tracing::{info, warn};

/// Run an opened [LimitedRps] table: gather players, play the round robin and
/// pay the winner.
pub async fn play<E, P, S>(context: &E, mut table: Table<P, S>, mut game: LimitedRps)
where
    E: Clock,
    P: Platform,
    S: State,
{
    let initiator = game.initiator();
    let channel = table.channel;
    match table.coordinator.seat(channel, initiator).await {
        Ok(true) => {}
        Ok(false) => {
            table
                .announce(format!(
                    "{} is already playing in another tournament.",
                    table.platform.mention(initiator)
                ))
                .await;
            table.close().await;
            return;
        }
        Err(e) => {
            warn!(?e, channel, "failed to seat initiator");
            table.close().await;
            return;
        }
    }
    info!(initiator, bet = game.bet(), channel, "opened tournament");
    table
        .announce(format!(
            "Limited RPS is starting (bet {}). Type `{JOIN_TOKEN}` to take part.",
            game.bet()
        ))
        .await;

    // Each join restarts the wait for the next seat.
    let join = Filter {
        scope: Scope::Channel(channel),
        author: Author::Unseated,
        accept: Accept::Exact(vec![JOIN_TOKEN.to_string()]),
    };
    while !game.is_full() {
        let Ok(message) = table.wait(context, join.clone()).await else {
            break;
        };
        match game.join(message.author) {
            Ok(seats) => {
                table
                    .announce(format!(
                        "{} joined. Players: {seats}",
                        table.platform.mention(message.author)
                    ))
                    .await;
            }
            Err(e) => warn!(?e, user = message.author, "rejected join"),
        }
    }
    if game.begin().is_err() {
        table
            .announce("Not enough players joined. The tournament is cancelled.".to_string())
            .await;
        table.close().await;
        return;
    }
    let roster = game
        .players()
        .into_iter()
        .map(|user| table.platform.mention(user))
        .collect::<Vec<_>>()
        .join(", ");
    table
        .announce(format!("Everyone is here. {roster}, let the tournament begin!"))
        .await;

    while let Some(pairing) = game.next_pairing() {
        let first = game.entrants()[pairing.first].user;
        let second = game.entrants()[pairing.second].user;
        let (first_mention, second_mention) = (
            table.platform.mention(first),
            table.platform.mention(second),
        );
        table
            .announce(format!("{first_mention} vs {second_mention}!"))
            .await;

        let Ok(first_move) = choose(context, &mut table, &mut game, pairing.first).await else {
            return abort(table, first).await;
        };
        let Ok(second_move) = choose(context, &mut table, &mut game, pairing.second).await else {
            return abort(table, second).await;
        };
        let summary = format!("{first_move} vs {second_move}");
        match game.play(pairing, first_move, second_move) {
            Exchange::Draw => table.announce(format!("{summary}: a draw.")).await,
            Exchange::FirstWins => {
                table
                    .announce(format!("{summary}: {first_mention} wins and takes a star."))
                    .await
            }
            Exchange::SecondWins => {
                table
                    .announce(format!("{summary}: {second_mention} wins and takes a star."))
                    .await
            }
        }
    }

    let standings = game
        .entrants()
        .iter()
        .map(|e| format!("{} {}★", table.platform.mention(e.user), e.stars))
        .collect::<Vec<_>>()
        .join(", ");
    if let Some(outcome) = game.outcome() {
        if let Some(Settled::Credited { user, amount, .. }) = table.settle(&outcome).await {
            table
                .announce(format!(
                    "Game over! {standings}\n{} wins the tournament and gains {amount} coins!",
                    table.platform.mention(user)
                ))
                .await;
        }
        info!(channel, ?outcome, "settled tournament");
    }
    table.close().await;
}

/// Ask a participant for a move by direct message until a valid one arrives.
async fn choose<E, P, S>(
    context: &E,
    table: &mut Table<P, S>,
    game: &mut LimitedRps,
    seat: usize,
) -> Result<Move, WaitError>
where
    E: Clock,
    P: Platform,
    S: State,
{
    let user = game.entrants()[seat].user;
    let filter = Filter {
        scope: Scope::Direct,
        author: Author::Only(user),
        accept: Accept::Unprefixed(table.prefix.clone()),
    };
    let mut prompt = format!(
        "Your hand: {}\nChoose a card (✊/✋/✌/*)",
        game.entrants()[seat].tokens
    );
    loop {
        table.send(Target::Direct(user), prompt).await;
        let message = table.wait(context, filter.clone()).await?;
        if let Ok(mv) = message.content.parse::<Move>() {
            if game.select(seat, mv).is_ok() {
                return Ok(mv);
            }
        }
        prompt = format!(
            "Invalid choice. Your hand: {}\nChoose again.",
            game.entrants()[seat].tokens
        );
    }
}

async fn abort<P: Platform, S: State>(table: Table<P, S>, user: UserId) {
    info!(user, channel = table.channel, "tournament timed out");
    table
        .announce(format!(
            "{} did not choose in time. The tournament is cancelled and no coins change hands.",
            table.platform.mention(user)
        ))
        .await;
    table.close().await;
}
