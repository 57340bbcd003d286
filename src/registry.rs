use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tracing::info;

use crate::{
    announce::Announcer, config::PlayerConfig, player::Player, sources::SourceFactory,
};

/// Mapa guild → player con ciclo de vida explícito.
///
/// La construcción perezosa pasa por la entry API de `DashMap`, que mantiene
/// el lock del shard durante el cierre: dos primeros accesos concurrentes al
/// mismo guild nunca producen dos players (ni dos loops).
pub struct PlayerRegistry {
    players: DashMap<GuildId, Arc<Player>>,
    factory: Arc<dyn SourceFactory>,
    announcer: Arc<dyn Announcer>,
    config: PlayerConfig,
}

impl PlayerRegistry {
    pub fn new(
        factory: Arc<dyn SourceFactory>,
        announcer: Arc<dyn Announcer>,
        config: PlayerConfig,
    ) -> Self {
        Self {
            players: DashMap::new(),
            factory,
            announcer,
            config,
        }
    }

    /// Devuelve el player del guild, creándolo (y arrancando su loop) la
    /// primera vez
    pub fn get_player(&self, guild_id: GuildId) -> Arc<Player> {
        self.players
            .entry(guild_id)
            .or_insert_with(|| {
                info!("🆕 Creando player para guild {}", guild_id);
                Player::spawn(
                    guild_id,
                    Arc::clone(&self.factory),
                    Arc::clone(&self.announcer),
                    self.config.clone(),
                )
            })
            .clone()
    }

    /// Olvida el mapeo del guild. No detiene el loop por sí solo: el caller
    /// debe invocar `leave()` del player antes.
    pub fn remove_player(&self, guild_id: GuildId) -> Option<Arc<Player>> {
        let removed = self.players.remove(&guild_id).map(|(_, player)| player);
        if removed.is_some() {
            info!("🗑️ Player del guild {} removido del registro", guild_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
