use anyhow::Result;
use async_trait::async_trait;
use serenity::model::id::GuildId;
use std::time::Duration;

use crate::track::Track;

/// Colaborador de presentación para los anuncios de "now playing".
///
/// El player lo invoca al arrancar una pista nueva (salvo que la instrucción
/// lo suprima). Un error aquí se registra y se descarta: la presentación
/// nunca afecta el estado de reproducción.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn now_playing(&self, guild_id: GuildId, track: &Track, position: Duration)
        -> Result<()>;
}
