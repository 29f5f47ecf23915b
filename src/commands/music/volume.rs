use super::*;
use crate::commands::music::utils::embedded_messages;

/// Sets the volume of the currently played song (and the ones after it).
#[poise::command(prefix_command, slash_command, guild_only, category = "Music")]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume from 0 to 100"] value: i64,
) -> CommandResult {
    let state = guild_state(ctx)?;

    match state.set_volume(value).await {
        Ok(volume) => ctx.send(embedded_messages::volume_set(volume)).await?,
        Err(err) => ctx.send(embedded_messages::error(&err)).await?,
    };

    Ok(())
}
