use super::Table;
use crate::{
    coordinator::{Accept, Author, Filter, Scope, WaitError},
    platform::Platform,
};
use commonware_runtime::Clock;
use naocoin_execution::{
    casino::highlow::{Guess, HighLow, ANSWERS},
    Settled, State,
};
use rand::Rng;
use tracing::{info, warn};

/// Play a validated [HighLow] game to completion and settle it.
pub async fn play<E, P, S>(context: &mut E, mut table: Table<P, S>, mut game: HighLow)
where
    E: Clock + Rng,
    P: Platform,
    S: State,
{
    let player = game.player();
    let mention = table.platform.mention(player);
    info!(player, bet = game.bet(), channel = table.channel, "started highlow");
    table
        .announce(format!(
            "{mention} bet {} coins. Current number: {}\nIs the next one higher or lower? (h/l)",
            game.bet(),
            game.current()
        ))
        .await;

    let filter = Filter {
        scope: Scope::Channel(table.channel),
        author: Author::Only(player),
        accept: Accept::IgnoreCase(ANSWERS.iter().map(|a| a.to_string()).collect()),
    };
    while !game.is_complete() {
        let next = game.draw(context);
        let answer = match table.wait(context, filter.clone()).await {
            Ok(answer) => answer,
            Err(WaitError::TimedOut) => {
                if let Err(e) = game.time_out() {
                    warn!(?e, player, "timed out outside a round");
                }
                table
                    .announce(format!(
                        "Time's up. You guessed {} in a row; your bet is untouched.",
                        game.streak()
                    ))
                    .await;
                break;
            }
            Err(WaitError::Closed) => {
                warn!(player, "coordinator stopped while waiting");
                table
                    .announce(
                        "The game was interrupted. Your bet is untouched.".to_string(),
                    )
                    .await;
                break;
            }
        };
        let Ok(guess) = answer.content.parse::<Guess>() else {
            continue;
        };
        let Ok(round) = game.guess(guess, next) else {
            break;
        };
        if !round.correct {
            table
                .announce(format!(
                    "Wrong. The next number was {}. You guessed {} in a row.",
                    round.next, round.streak
                ))
                .await;
        } else if game.is_complete() {
            table
                .announce(format!(
                    "Correct! The next number was {}. {} in a row, that's the maximum!",
                    round.next, round.streak
                ))
                .await;
        } else {
            table
                .announce(format!(
                    "Correct! The next number was {}. {} in a row!\nCurrent number: {}\nHigher or lower? (h/l)",
                    round.next, round.streak, game.current()
                ))
                .await;
        }
    }

    if let Some(outcome) = game.outcome() {
        match table.settle(&outcome).await {
            Some(Settled::Credited { amount, balance, .. }) => {
                table
                    .announce(format!(
                        "{mention} won {} coins (net +{amount}). Balance: {balance}.",
                        game.payout()
                    ))
                    .await;
            }
            Some(Settled::Debited {
                amount, balance, ..
            }) => {
                table
                    .announce(format!(
                        "{mention} lost the game. {amount} coins were taken. Balance: {balance}."
                    ))
                    .await;
            }
            Some(Settled::Unchanged) | None => {}
        }
        info!(player, phase = ?game.phase(), streak = game.streak(), "finished highlow");
    }
    table.close().await;
}
