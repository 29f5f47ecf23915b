use super::*;
use crate::commands::music::utils::{embedded_messages, skip_vote::Voter};

/// Vote to skip a song. The song requester can automatically skip.
///
/// Members with a DJ role skip right away, as does anyone on an autoplay pick.
/// Everyone else needs enough votes to pass.
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let state = guild_state(ctx)?;
    let voter = Voter::new(ctx.author().id, author_role_names(ctx).await);

    match state.vote_skip(&voter).await {
        Ok(outcome) => ctx.send(embedded_messages::skip_outcome(&outcome)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
