use super::*;
use tracing::warn;

/// Stops playing audio and leaves the voice channel.
///
/// This also clears the queue.
#[poise::command(slash_command, prefix_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let guild_id = guild_id(ctx)?;

    if let Err(e) = ctx.data().registry.stop(guild_id).await {
        // Log the error but continue, as the main goal (stopping) is achieved
        warn!("Failed to leave voice channel during stop: {}", e);
    }

    ctx.send(embedded_messages::stopped()).await?;

    Ok(())
}
